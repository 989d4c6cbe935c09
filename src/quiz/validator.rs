//! Quiz form validation.

use crate::error::ValidationError;
use crate::models::{Category, QuizInput, ScoreSet, TOTAL_POINTS};

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuiz {
    /// Name with surrounding whitespace removed
    pub name: String,
    pub scores: ScoreSet,
}

/// Parse a form field permissively: leading whitespace, optional sign, then
/// leading digits. Anything unparsable is 0. Out-of-range values saturate.
pub fn parse_score(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Parse all four fields into a score set without checking the sum.
pub fn parse_scores(input: &QuizInput) -> ScoreSet {
    ScoreSet {
        a: parse_score(&input.a),
        b: parse_score(&input.b),
        c: parse_score(&input.c),
        d: parse_score(&input.d),
    }
}

/// Run the checks in order: parse, name present, sum equals 16, then every
/// component within `0..=16`.
pub fn validate(input: &QuizInput) -> Result<ValidatedQuiz, ValidationError> {
    let scores = parse_scores(input);

    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    let total = scores
        .a
        .saturating_add(scores.b)
        .saturating_add(scores.c)
        .saturating_add(scores.d);
    if total != TOTAL_POINTS {
        return Err(ValidationError::InvalidSum { total });
    }

    if let Some(category) = Category::ALL
        .into_iter()
        .find(|c| !(0..=TOTAL_POINTS).contains(&scores.get(*c)))
    {
        return Err(ValidationError::ScoreOutOfRange {
            category,
            value: scores.get(category),
        });
    }

    Ok(ValidatedQuiz {
        name: name.to_string(),
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_permissive() {
        assert_eq!(parse_score("7"), 7);
        assert_eq!(parse_score("  7 "), 7);
        assert_eq!(parse_score("7abc"), 7);
        assert_eq!(parse_score("-3"), -3);
        assert_eq!(parse_score("+4"), 4);
        assert_eq!(parse_score("4.9"), 4);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score("-"), 0);
        assert_eq!(parse_score("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_valid_submission() {
        let input = QuizInput::new("  Maria ", "4", "4", "4", "4");
        let quiz = validate(&input).unwrap();
        assert_eq!(quiz.name, "Maria");
        assert_eq!(quiz.scores, ScoreSet { a: 4, b: 4, c: 4, d: 4 });
    }

    #[test]
    fn test_invalid_sum_carries_total() {
        let input = QuizInput::new("Ana", "10", "10", "0", "0");
        assert_eq!(
            validate(&input),
            Err(ValidationError::InvalidSum { total: 20 })
        );
    }

    #[test]
    fn test_empty_fields_count_as_zero() {
        let input = QuizInput::new("Ana", "16", "", "x", " ");
        assert_eq!(validate(&input).unwrap().scores.total(), 16);
    }

    #[test]
    fn test_all_zero_rejected() {
        let input = QuizInput::new("Ana", "", "", "", "");
        assert_eq!(
            validate(&input),
            Err(ValidationError::InvalidSum { total: 0 })
        );
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let input = QuizInput::new(" \t\n", "4", "4", "4", "4");
        assert_eq!(validate(&input), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_negative_component_rejected() {
        let input = QuizInput::new("Ana", "20", "-4", "0", "0");
        assert_eq!(
            validate(&input),
            Err(ValidationError::ScoreOutOfRange {
                category: Category::A,
                value: 20
            })
        );
    }

    #[test]
    fn test_boundaries_accepted() {
        let input = QuizInput::new("Ana", "0", "16", "0", "0");
        assert_eq!(validate(&input).unwrap().scores.b, 16);
    }

    #[test]
    fn test_wrong_sum_reported_before_range() {
        let input = QuizInput::new("Ana", "-1", "0", "0", "0");
        assert_eq!(validate(&input), Err(ValidationError::InvalidSum { total: -1 }));
    }

    #[test]
    fn test_missing_name_reported_before_sum() {
        let input = QuizInput::new("", "1", "1", "1", "1");
        assert_eq!(validate(&input), Err(ValidationError::MissingName));
    }
}
