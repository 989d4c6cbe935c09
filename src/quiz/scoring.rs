//! Score transformation: percentages, chart breakdown and record construction.
//!
//! Percentages use the fixed denominator 16, not the live sum. Since
//! 100 / 16 = 6.25, every exact percentage has at most two decimals, so the
//! work is done in integer hundredths and rounded half away from zero to one
//! decimal: 6.25 -> "6.3", 18.75 -> "18.8", -6.25 -> "-6.3".

use super::validator::ValidatedQuiz;
use crate::models::{
    BreakdownEntry, Category, PercentageSet, ResultRecord, ResultView, ScoreSet, TOTAL_POINTS,
};
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hundredths of a percent contributed by one point.
const HUNDREDTHS_PER_POINT: i128 = 10_000 / TOTAL_POINTS as i128;

/// Format `component / 16 * 100` with exactly one fractional digit.
pub fn format_percentage(component: i64) -> String {
    let hundredths = component as i128 * HUNDREDTHS_PER_POINT;
    let tenths = (hundredths.abs() + 5) / 10;
    let sign = if hundredths < 0 { "-" } else { "" };
    format!("{}{}.{}", sign, tenths / 10, tenths % 10)
}

/// Derive the percentage set for `scores`.
pub fn calculate_percentages(scores: &ScoreSet) -> PercentageSet {
    PercentageSet {
        a: format_percentage(scores.a),
        b: format_percentage(scores.b),
        c: format_percentage(scores.c),
        d: format_percentage(scores.d),
    }
}

/// Chart slices for every category with a strictly positive score, A to D.
pub fn breakdown(scores: &ScoreSet) -> Vec<BreakdownEntry> {
    Category::ALL
        .iter()
        .filter(|category| scores.get(**category) > 0)
        .map(|category| BreakdownEntry {
            category: *category,
            label: category.label().to_string(),
            value: scores.get(*category),
            color: category.color().to_string(),
        })
        .collect()
}

/// Categories sharing the highest score, A to D. Empty if nothing is positive.
pub fn dominant_styles(scores: &ScoreSet) -> Vec<Category> {
    let max = Category::ALL
        .iter()
        .map(|c| scores.get(*c))
        .max()
        .unwrap_or(0);
    if max <= 0 {
        return Vec::new();
    }
    Category::ALL
        .iter()
        .copied()
        .filter(|c| scores.get(*c) == max)
        .collect()
}

static LAST_RECORD_ID: AtomicU64 = AtomicU64::new(0);

/// Epoch-millisecond id, bumped so ids stay strictly increasing in-process.
pub fn next_record_id(now: DateTime<Local>) -> u64 {
    let candidate = now.timestamp_millis().max(0) as u64;
    let mut last = LAST_RECORD_ID.load(Ordering::Relaxed);
    loop {
        let next = candidate.max(last + 1);
        match LAST_RECORD_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Human-readable local time, `dd/mm/yyyy, HH:MM:SS`.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// Build the immutable record for a validated submission.
pub fn build_record(quiz: &ValidatedQuiz, now: DateTime<Local>) -> ResultRecord {
    ResultRecord {
        id: next_record_id(now),
        name: quiz.name.clone(),
        scores: quiz.scores,
        percentages: calculate_percentages(&quiz.scores),
        timestamp: format_timestamp(now),
    }
}

/// Pair a record with its chart breakdown.
pub fn result_view(record: ResultRecord) -> ResultView {
    let breakdown = breakdown(&record.scores);
    ResultView { record, breakdown }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0), "0.0");
        assert_eq!(format_percentage(1), "6.3");
        assert_eq!(format_percentage(3), "18.8");
        assert_eq!(format_percentage(4), "25.0");
        assert_eq!(format_percentage(5), "31.3");
        assert_eq!(format_percentage(16), "100.0");
        assert_eq!(format_percentage(-1), "-6.3");
    }

    #[test]
    fn test_even_split() {
        let p = calculate_percentages(&ScoreSet { a: 4, b: 4, c: 4, d: 4 });
        for category in Category::ALL {
            assert_eq!(p.get(category), "25.0");
        }
    }

    #[test]
    fn test_breakdown_skips_zero() {
        let scores = ScoreSet { a: 0, b: 10, c: 0, d: 6 };
        let entries = breakdown(&scores);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Auditivo");
        assert_eq!(entries[0].color, "#6EE7B7");
        assert_eq!(entries[1].value, 6);
    }

    #[test]
    fn test_dominant_styles_keeps_ties() {
        let scores = ScoreSet { a: 6, b: 2, c: 6, d: 2 };
        assert_eq!(dominant_styles(&scores), vec![Category::A, Category::C]);
    }

    #[test]
    fn test_record_ids_strictly_increase() {
        let now = Local::now();
        let first = next_record_id(now);
        let second = next_record_id(now);
        assert!(second > first);
    }

    #[test]
    fn test_build_record() {
        let quiz = ValidatedQuiz {
            name: "Maria".to_string(),
            scores: ScoreSet { a: 4, b: 4, c: 4, d: 4 },
        };
        let record = build_record(&quiz, Local::now());
        assert_eq!(record.name, "Maria");
        assert_eq!(record.percentages.a, "25.0");
        assert!(!record.timestamp.is_empty());
    }
}
