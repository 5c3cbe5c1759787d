use super::DataStore;
use crate::error::Result;
use crate::model::Course;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    course: Option<Course>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(course: Course) -> Self {
        Self {
            course: Some(course),
            saves: 0,
        }
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl DataStore for InMemoryStore {
    fn load(&self) -> Result<Course> {
        Ok(self.course.clone().unwrap_or_default())
    }

    fn save(&mut self, course: &Course) -> Result<()> {
        self.course = Some(course.clone());
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{ItemKind, Module, ModuleItem, Objective, Outcome};

    /// Builds a course with live references from positions.
    pub struct CourseFixture {
        course: Course,
    }

    impl Default for CourseFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CourseFixture {
        pub fn new() -> Self {
            Self {
                course: Course::default(),
            }
        }

        pub fn with_header(mut self, number: &str, name: &str, description: &str) -> Self {
            self.course.course_number = number.to_string();
            self.course.course_name = name.to_string();
            self.course.description = description.to_string();
            self
        }

        pub fn with_outcomes(mut self, outcomes: &[&str]) -> Self {
            self.course
                .learning_outcomes
                .extend(outcomes.iter().map(|text| Outcome::new(*text)));
            self
        }

        /// `slos` are positions in the outcomes added so far.
        pub fn with_module(mut self, title: &str, slos: &[usize], objectives: &[&str]) -> Self {
            let mut module = Module::new(title);
            module.related_slos = slos
                .iter()
                .map(|&p| self.course.outcome_ref(p).unwrap())
                .collect();
            module.objectives = objectives.iter().map(|t| Objective::new(*t)).collect();
            self.course.modules.push(module);
            self
        }

        /// `objectives` are positions in the module's objectives.
        pub fn with_item(
            mut self,
            module: usize,
            kind: ItemKind,
            content: &str,
            objectives: &[usize],
        ) -> Self {
            let owner = &mut self.course.modules[module];
            let mut item = ModuleItem::new(content);
            item.related_objectives = objectives
                .iter()
                .map(|&p| owner.objective_ref(p).unwrap())
                .collect();
            owner.items_mut(kind).push(item);
            self
        }

        pub fn build(self) -> Course {
            self.course
        }

        pub fn into_store(self) -> InMemoryStore {
            InMemoryStore::with_course(self.course)
        }
    }
}
