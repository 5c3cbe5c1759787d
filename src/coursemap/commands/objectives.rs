use crate::commands::{check_index, drop_covered_stale};
use crate::error::Result;
use crate::model::{Course, ItemKind, Objective, Ref};

/// Appends an empty objective to the module. Stale links from the module's
/// items to the new position are dropped.
pub fn add(course: &Course, module: usize) -> Result<Course> {
    check_index("module", module, course.modules.len())?;
    let mut next = course.clone();
    let owner = &mut next.modules[module];
    owner.objectives.push(Objective::new(""));
    let len = owner.objectives.len();
    for kind in ItemKind::all() {
        for item in owner.items_mut(*kind).iter_mut() {
            drop_covered_stale(&mut item.related_objectives, len);
        }
    }
    Ok(next)
}

pub fn update(course: &Course, module: usize, index: usize, text: impl Into<String>) -> Result<Course> {
    check_index("module", module, course.modules.len())?;
    check_index("objective", index, course.modules[module].objectives.len())?;
    let mut next = course.clone();
    next.modules[module].objectives[index].text = text.into();
    Ok(next)
}

/// Removes the objective and unlinks it from every item of its module.
pub fn remove(course: &Course, module: usize, index: usize) -> Result<Course> {
    check_index("module", module, course.modules.len())?;
    check_index("objective", index, course.modules[module].objectives.len())?;

    let mut next = course.clone();
    let owner = &mut next.modules[module];
    let removed = Ref::Live(owner.objectives.remove(index).id);
    for kind in ItemKind::all() {
        for item in owner.items_mut(*kind).iter_mut() {
            item.related_objectives.remove(&removed);
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{objective_label, resolve_labels};
    use crate::store::memory::fixtures::CourseFixture;

    fn item_labels(course: &Course, module: usize, kind: ItemKind, item: usize) -> Vec<String> {
        let owner = &course.modules[module];
        let positions = owner.items(kind)[item]
            .related_objectives
            .iter()
            .filter_map(|r| owner.objective_position(r));
        resolve_labels(positions, |p| Ok(objective_label(module, p))).unwrap()
    }

    #[test]
    fn test_add_and_update() {
        let course = CourseFixture::new().with_module("m", &[], &[]).build();
        let course = add(&course, 0).unwrap();
        let course = update(&course, 0, 0, "Define X").unwrap();
        assert_eq!(course.modules[0].objectives[0].text, "Define X");
    }

    #[test]
    fn test_add_does_not_revive_stale_link() {
        let mut course = CourseFixture::new()
            .with_module("m", &[], &["x"])
            .with_item(0, ItemKind::Resource, "r", &[0])
            .build();
        let links = &mut course.modules[0].resources[0].related_objectives;
        links.insert(Ref::Stale(1));
        links.insert(Ref::Stale(4));

        let next = add(&course, 0).unwrap();

        let links = &next.modules[0].resources[0].related_objectives;
        assert!(!links.contains(&Ref::Stale(1)));
        assert!(links.contains(&Ref::Stale(4)));
        assert_eq!(item_labels(&next, 0, ItemKind::Resource, 0), vec!["1.1"]);
    }

    #[test]
    fn test_add_to_missing_module() {
        assert!(add(&Course::default(), 0).is_err());
    }

    #[test]
    fn test_remove_renumbers_item_references() {
        let course = CourseFixture::new()
            .with_module("m", &[], &["x", "y", "z"])
            .with_item(0, ItemKind::Resource, "r", &[0, 2])
            .build();
        assert_eq!(item_labels(&course, 0, ItemKind::Resource, 0), vec!["1.1", "1.3"]);

        let next = remove(&course, 0, 1).unwrap();

        let texts: Vec<_> = next.modules[0].objectives.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "z"]);
        // Both referenced objectives survive and now sit at positions 0 and 1.
        let owner = &next.modules[0];
        let positions: Vec<_> = owner.resources[0]
            .related_objectives
            .iter()
            .filter_map(|r| owner.objective_position(r))
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(item_labels(&next, 0, ItemKind::Resource, 0), vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_remove_drops_references_to_removed() {
        let course = CourseFixture::new()
            .with_module("m", &[], &["x", "y"])
            .with_item(0, ItemKind::Activity, "a", &[1])
            .with_item(0, ItemKind::Assessment, "q", &[0, 1])
            .build();

        let next = remove(&course, 0, 1).unwrap();
        assert!(next.modules[0].activities[0].related_objectives.is_empty());
        assert_eq!(item_labels(&next, 0, ItemKind::Assessment, 0), vec!["1.1"]);
    }

    #[test]
    fn test_remove_only_touches_owning_module() {
        let course = CourseFixture::new()
            .with_module("m", &[], &["x"])
            .with_module("n", &[], &["y"])
            .with_item(1, ItemKind::Resource, "r", &[0])
            .build();

        let next = remove(&course, 0, 0).unwrap();
        assert_eq!(item_labels(&next, 1, ItemKind::Resource, 0), vec!["2.1"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let course = CourseFixture::new().with_module("m", &[], &["x"]).build();
        assert!(remove(&course, 0, 1).is_err());
        assert!(remove(&course, 1, 0).is_err());
        assert_eq!(course.modules[0].objectives.len(), 1);
    }
}
