use crate::commands::check_index;
use crate::error::Result;
use crate::model::{Course, ItemKind, ModuleItem, Ref};
use std::collections::BTreeSet;

/// Appends an item with empty content and no objectives.
pub fn add(course: &Course, module: usize, kind: ItemKind) -> Result<Course> {
    check_index("module", module, course.modules.len())?;
    let mut next = course.clone();
    next.modules[module].items_mut(kind).push(ModuleItem::default());
    Ok(next)
}

/// Replaces the item's content. `related` is the new set of objective
/// positions: `None` keeps the current set, `Some` of an empty set clears it.
pub fn update(
    course: &Course,
    module: usize,
    kind: ItemKind,
    index: usize,
    content: impl Into<String>,
    related: Option<BTreeSet<usize>>,
) -> Result<Course> {
    check_index("module", module, course.modules.len())?;
    let owner = &course.modules[module];
    check_index(kind.singular(), index, owner.items(kind).len())?;

    let related = match related {
        Some(positions) => {
            let refs = positions
                .into_iter()
                .map(|p| {
                    check_index("objective", p, owner.objectives.len())?;
                    Ok(Ref::Live(owner.objectives[p].id))
                })
                .collect::<Result<BTreeSet<_>>>()?;
            Some(refs)
        }
        None => None,
    };

    let mut next = course.clone();
    let item = &mut next.modules[module].items_mut(kind)[index];
    item.content = content.into();
    if let Some(refs) = related {
        item.related_objectives = refs;
    }
    Ok(next)
}

pub fn remove(course: &Course, module: usize, kind: ItemKind, index: usize) -> Result<Course> {
    check_index("module", module, course.modules.len())?;
    check_index(kind.singular(), index, course.modules[module].items(kind).len())?;
    let mut next = course.clone();
    next.modules[module].items_mut(kind).remove(index);
    Ok(next)
}
