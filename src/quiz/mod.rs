//! Quiz input handling.
//!
//! - `validator`: permissive parsing, name and fixed-sum checks
//! - `scoring`: percentages, chart breakdown and record construction

pub mod scoring;
pub mod validator;

pub use scoring::{breakdown, build_record, calculate_percentages, dominant_styles, result_view};
pub use validator::{parse_score, validate, ValidatedQuiz};
