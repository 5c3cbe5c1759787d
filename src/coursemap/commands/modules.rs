use crate::commands::{check_index, ModuleField};
use crate::error::Result;
use crate::model::{Course, Module, Ref};

/// Appends an empty module.
pub fn add(course: &Course) -> Result<Course> {
    let mut next = course.clone();
    next.modules.push(Module::new(""));
    Ok(next)
}

/// Removes a module with its objectives and items. Objectives are module
/// scoped, so no other module can reference them.
pub fn remove(course: &Course, index: usize) -> Result<Course> {
    check_index("module", index, course.modules.len())?;
    let mut next = course.clone();
    next.modules.remove(index);
    Ok(next)
}

pub fn update_field(course: &Course, index: usize, field: ModuleField) -> Result<Course> {
    check_index("module", index, course.modules.len())?;

    match field {
        ModuleField::Title(title) => {
            let mut next = course.clone();
            next.modules[index].title = title;
            Ok(next)
        }
        ModuleField::RelatedSlos(positions) => {
            let len = course.learning_outcomes.len();
            let refs = positions
                .iter()
                .map(|&p| {
                    check_index("outcome", p, len)?;
                    Ok(course.learning_outcomes[p].id)
                })
                .collect::<Result<Vec<_>>>()?;

            let mut next = course.clone();
            next.modules[index].related_slos = refs.into_iter().map(Ref::Live).collect();
            Ok(next)
        }
    }
}
