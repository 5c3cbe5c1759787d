//! # Reference Index
//!
//! Positional display identities for outcomes and objectives.
//!
//! Outcomes are shown as letters (`A`, `B`, ...) and objectives as
//! `module.objective` numbers (`2.3`). Neither is stored: both are derived from
//! the current order every time they are displayed, while the model itself
//! references elements by id (see [`crate::model::Ref`]).
//!
//! The letter alphabet is fixed at thirteen symbols (`A` through `M`).
//! [`outcome_letter`] fails for later positions; the renderer treats that the
//! same as an unresolved reference and leaves the label out.
//!
//! The parsing half of this module turns user-facing labels back into
//! 0-based positions for the CLI.

use crate::error::{CourseMapError, Result};
use std::collections::BTreeSet;

pub const OUTCOME_LETTERS: [char; 13] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
];

/// Letter for the outcome at `position`.
pub fn outcome_letter(position: usize) -> Result<String> {
    OUTCOME_LETTERS
        .get(position)
        .map(|c| c.to_string())
        .ok_or_else(|| CourseMapError::out_of_range("outcome letter", position, OUTCOME_LETTERS.len()))
}

/// `"{module+1}.{objective+1}"`. No upper bound on either part.
pub fn objective_label(module_index: usize, objective_index: usize) -> String {
    format!("{}.{}", module_index + 1, objective_index + 1)
}

/// Labels `indices` in ascending numeric order, whatever order they were
/// given in. Duplicates collapse. The first index the labeler rejects is
/// returned as the error; nothing is skipped.
pub fn resolve_labels<I, F>(indices: I, labeler: F) -> Result<Vec<String>>
where
    I: IntoIterator<Item = usize>,
    F: Fn(usize) -> Result<String>,
{
    let ordered: BTreeSet<usize> = indices.into_iter().collect();
    ordered.into_iter().map(labeler).collect()
}

/// Parses an outcome letter (`"b"` or `"B"`) into its 0-based position.
/// Outcomes past the last letter are addressed by 1-based number, with or
/// without a leading `#` (`"#14"`, `"14"`).
pub fn parse_outcome_label(s: &str) -> Result<usize> {
    let trimmed = s.trim();
    let number = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
        return parse_position(number).map_err(|_| invalid_outcome(s));
    }

    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let upper = c.to_ascii_uppercase();
        if let Some(pos) = OUTCOME_LETTERS.iter().position(|l| *l == upper) {
            return Ok(pos);
        }
    }
    Err(invalid_outcome(s))
}

fn invalid_outcome(s: &str) -> CourseMapError {
    CourseMapError::InvalidLabel(format!(
        "{:?} is not an outcome letter (A-M) or number (#14)",
        s
    ))
}

/// Parses `"m.o"` into 0-based `(module, objective)` positions.
pub fn parse_objective_label(s: &str) -> Result<(usize, usize)> {
    let invalid = || {
        CourseMapError::InvalidLabel(format!(
            "{:?} is not an objective label (expected e.g. 2.1)",
            s
        ))
    };
    let (module, objective) = s.trim().split_once('.').ok_or_else(invalid)?;
    let module = parse_position(module).map_err(|_| invalid())?;
    let objective = parse_position(objective).map_err(|_| invalid())?;
    Ok((module, objective))
}

/// Parses a 1-based display number into a 0-based position.
pub fn parse_position(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CourseMapError::InvalidLabel(format!(
            "{:?} is not a number starting at 1",
            s
        ))),
    }
}

/// Parses a comma separated list of outcome letters. `"-"` or an empty string
/// means the empty set.
pub fn parse_outcome_list(s: &str) -> Result<BTreeSet<usize>> {
    split_list(s).map(parse_outcome_label).collect()
}

/// Parses a comma separated list of objective labels that must all belong to
/// the module at `module_index`.
pub fn parse_objective_list(module_index: usize, s: &str) -> Result<BTreeSet<usize>> {
    split_list(s)
        .map(|part| {
            let (module, objective) = parse_objective_label(part)?;
            if module != module_index {
                return Err(CourseMapError::InvalidLabel(format!(
                    "objective {} does not belong to module {}",
                    part.trim(),
                    module_index + 1
                )));
            }
            Ok(objective)
        })
        .collect()
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    let s = s.trim();
    let s = if s == "-" { "" } else { s };
    s.split(',').filter(|part| !part.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_letters() {
        assert_eq!(outcome_letter(0).unwrap(), "A");
        assert_eq!(outcome_letter(12).unwrap(), "M");
        assert!(matches!(
            outcome_letter(13),
            Err(CourseMapError::IndexOutOfRange { index: 13, len: 13, .. })
        ));
    }

    #[test]
    fn test_objective_labels() {
        assert_eq!(objective_label(2, 0), "3.1");
        assert_eq!(objective_label(0, 41), "1.42");
    }

    #[test]
    fn test_resolve_labels_sorts_ascending() {
        let labels = resolve_labels(vec![2, 0, 2], outcome_letter).unwrap();
        assert_eq!(labels, vec!["A", "C"]);
        assert_eq!(labels.join(", "), "A, C");
    }

    #[test]
    fn test_resolve_labels_reports_failures() {
        assert!(resolve_labels(vec![0, 13], outcome_letter).is_err());

        let labels = resolve_labels(vec![1, 0], |i| Ok(objective_label(0, i))).unwrap();
        assert_eq!(labels, vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_parse_outcome_label() {
        assert_eq!(parse_outcome_label("A").unwrap(), 0);
        assert_eq!(parse_outcome_label("m").unwrap(), 12);
        assert_eq!(parse_outcome_label(" c ").unwrap(), 2);
        assert!(parse_outcome_label("N").is_err());
        assert!(parse_outcome_label("AB").is_err());
        assert!(parse_outcome_label("").is_err());
    }

    #[test]
    fn test_parse_outcome_number() {
        assert_eq!(parse_outcome_label("#14").unwrap(), 13);
        assert_eq!(parse_outcome_label("14").unwrap(), 13);
        assert_eq!(parse_outcome_label(" #1 ").unwrap(), 0);
        assert!(parse_outcome_label("#0").is_err());
        assert!(parse_outcome_label("#").is_err());
        assert!(parse_outcome_label("#1a").is_err());
        assert_eq!(
            parse_outcome_list("A, #15").unwrap().into_iter().collect::<Vec<_>>(),
            vec![0, 14]
        );
    }

    #[test]
    fn test_parse_objective_label() {
        assert_eq!(parse_objective_label("1.1").unwrap(), (0, 0));
        assert_eq!(parse_objective_label("3.12").unwrap(), (2, 11));
        assert!(parse_objective_label("0.1").is_err());
        assert!(parse_objective_label("1").is_err());
        assert!(parse_objective_label("a.b").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1").unwrap(), 0);
        assert!(parse_position("0").is_err());
        assert!(parse_position("-1").is_err());
    }

    #[test]
    fn test_parse_lists() {
        let set = parse_outcome_list("C, a").unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(parse_outcome_list("-").unwrap().is_empty());
        assert!(parse_outcome_list("").unwrap().is_empty());

        let set = parse_objective_list(1, "2.3,2.1").unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(parse_objective_list(1, "1.1").is_err());
    }
}
