use crate::commands::{check_index, drop_covered_stale};
use crate::error::Result;
use crate::model::{Course, Outcome, Ref};

/// Appends an empty outcome. Stale mappings to the new position are dropped.
pub fn add(course: &Course) -> Result<Course> {
    let mut next = course.clone();
    next.learning_outcomes.push(Outcome::new(""));
    let len = next.learning_outcomes.len();
    for module in &mut next.modules {
        drop_covered_stale(&mut module.related_slos, len);
    }
    Ok(next)
}

pub fn update(course: &Course, index: usize, text: impl Into<String>) -> Result<Course> {
    check_index("outcome", index, course.learning_outcomes.len())?;
    let mut next = course.clone();
    next.learning_outcomes[index].text = text.into();
    Ok(next)
}

/// Removes the outcome and unmaps it from every module.
pub fn remove(course: &Course, index: usize) -> Result<Course> {
    check_index("outcome", index, course.learning_outcomes.len())?;
    let mut next = course.clone();
    let removed = Ref::Live(next.learning_outcomes.remove(index).id);
    for module in &mut next.modules {
        module.related_slos.remove(&removed);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CourseMapError;
    use crate::index::{outcome_letter, resolve_labels};
    use crate::store::memory::fixtures::CourseFixture;

    fn mapped_letters(course: &Course, module: usize) -> String {
        let positions = course.modules[module]
            .related_slos
            .iter()
            .filter_map(|r| course.outcome_position(r));
        resolve_labels(positions, outcome_letter).unwrap().join(", ")
    }

    #[test]
    fn test_add_appends_empty() {
        let course = add(&Course::default()).unwrap();
        let course = add(&course).unwrap();
        assert_eq!(course.learning_outcomes.len(), 2);
        assert_eq!(course.learning_outcomes[1].text, "");
        assert_ne!(course.learning_outcomes[0].id, course.learning_outcomes[1].id);
    }

    #[test]
    fn test_add_does_not_revive_stale_mapping() {
        use crate::document::{decode, encode};
        use crate::render::module_row;

        let course =
            decode(br#"{"learningOutcomes":["a"],"modules":[{"relatedSLOs":[0,2]}]}"#).unwrap();
        assert!(course.modules[0].related_slos.contains(&Ref::Stale(2)));

        let grown = add(&add(&course).unwrap()).unwrap();
        let reloaded = decode(&encode(&grown).unwrap()).unwrap();

        assert_eq!(module_row(&reloaded, 0).unwrap().mapped_slos, "A");
        assert_eq!(reloaded.modules[0].related_slos.len(), 1);
        assert_eq!(reloaded, grown);
    }

    #[test]
    fn test_add_keeps_stale_mapping_still_out_of_range() {
        let mut course = CourseFixture::new()
            .with_outcomes(&["a"])
            .with_module("m", &[0], &[])
            .build();
        course.modules[0].related_slos.insert(Ref::Stale(5));

        let next = add(&course).unwrap();
        assert!(next.modules[0].related_slos.contains(&Ref::Stale(5)));
    }

    #[test]
    fn test_update() {
        let course = CourseFixture::new().with_outcomes(&["a", "b"]).build();
        let next = update(&course, 1, "Apply Y").unwrap();
        assert_eq!(next.learning_outcomes[1].text, "Apply Y");
        assert_eq!(next.learning_outcomes[1].id, course.learning_outcomes[1].id);
    }

    #[test]
    fn test_update_out_of_range() {
        let course = CourseFixture::new().with_outcomes(&["a"]).build();
        let err = update(&course, 1, "x").unwrap_err();
        assert!(matches!(
            err,
            CourseMapError::IndexOutOfRange { what: "outcome", index: 1, len: 1 }
        ));
    }

    #[test]
    fn test_remove_repairs_module_mappings() {
        let course = CourseFixture::new()
            .with_outcomes(&["a", "b", "c"])
            .with_module("m", &[0, 1, 2], &[])
            .with_module("n", &[1], &[])
            .build();
        assert_eq!(mapped_letters(&course, 0), "A, B, C");

        let next = remove(&course, 1).unwrap();

        let texts: Vec<_> = next.learning_outcomes.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        // "c" moved from C to B; nothing points at the removed outcome.
        assert_eq!(mapped_letters(&next, 0), "A, B");
        assert_eq!(next.modules[0].related_slos.len(), 2);
        assert!(next.modules[1].related_slos.is_empty());
    }

    #[test]
    fn test_remove_out_of_range_leaves_course() {
        let course = CourseFixture::new()
            .with_outcomes(&["a"])
            .with_module("m", &[0], &[])
            .build();
        assert!(remove(&course, 3).is_err());
        assert_eq!(course.learning_outcomes.len(), 1);
        assert_eq!(course.modules[0].related_slos.len(), 1);
    }

    #[test]
    fn test_remove_keeps_stale_references() {
        let mut course = CourseFixture::new()
            .with_outcomes(&["a", "b"])
            .with_module("m", &[0], &[])
            .build();
        course.modules[0].related_slos.insert(Ref::Stale(9));

        let next = remove(&course, 0).unwrap();
        assert_eq!(
            next.modules[0].related_slos.iter().copied().collect::<Vec<_>>(),
            vec![Ref::Stale(9)]
        );
    }
}
