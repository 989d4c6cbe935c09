//! Core data types for VARK Results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed total every valid score set must reach.
pub const TOTAL_POINTS: i64 = 16;

/// The resolved signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub is_guest: bool,
}

impl Identity {
    /// Build an identity from a cached custom session.
    pub fn from_session(session: &SessionRecord) -> Self {
        Identity {
            email: session.email.clone(),
            display_name: session.name.clone().unwrap_or_default(),
            avatar_ref: session.picture.clone(),
            is_guest: session.is_guest,
        }
    }
}

/// Custom session shape cached under the session key.
///
/// Field names match the JSON written by earlier browser builds so that
/// existing profiles keep restoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(rename = "isGuest", default, skip_serializing_if = "is_false")]
    pub is_guest: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The four VARK learning-style categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
    D,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::A, Category::B, Category::C, Category::D];

    /// Display label shown next to the score.
    pub fn label(&self) -> &'static str {
        match self {
            Category::A => "Visual",
            Category::B => "Auditivo",
            Category::C => "Leitor/Escrita",
            Category::D => "Cinestésico",
        }
    }

    /// Pastel chart colour for this category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::A => "#93C5FD",
            Category::B => "#6EE7B7",
            Category::C => "#FCD34D",
            Category::D => "#FCA5A5",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw form values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizInput {
    pub name: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl QuizInput {
    pub fn new(
        name: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        QuizInput {
            name: name.into(),
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }
}

/// Validated sub-scores. Only constructed once the sum check has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    #[serde(rename = "A")]
    pub a: i64,
    #[serde(rename = "B")]
    pub b: i64,
    #[serde(rename = "C")]
    pub c: i64,
    #[serde(rename = "D")]
    pub d: i64,
}

impl ScoreSet {
    pub fn total(&self) -> i64 {
        self.a + self.b + self.c + self.d
    }

    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::A => self.a,
            Category::B => self.b,
            Category::C => self.c,
            Category::D => self.d,
        }
    }
}

/// Percentages with exactly one fractional digit, e.g. "25.0".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageSet {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl PercentageSet {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::A => &self.a,
            Category::B => &self.b,
            Category::C => &self.c,
            Category::D => &self.d,
        }
    }
}

/// One immutable, persisted quiz outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Creation-time-derived identifier (epoch milliseconds)
    pub id: u64,
    pub name: String,
    pub scores: ScoreSet,
    pub percentages: PercentageSet,
    /// Human-readable local creation time
    pub timestamp: String,
}

/// Chart-ready slice for a category with a positive score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub category: Category,
    pub label: String,
    pub value: i64,
    pub color: String,
}

/// A record together with its chart breakdown, as shown right after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub record: ResultRecord,
    pub breakdown: Vec<BreakdownEntry>,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub identity: Option<Identity>,
    pub history: Vec<ResultRecord>,
    pub current_result: Option<ResultView>,
    pub submitting: bool,
}
