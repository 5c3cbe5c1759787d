//! Core data types: [`Course`], [`Outcome`], [`Module`], [`Objective`], [`ModuleItem`].
//!
//! Outcomes, modules and objectives carry a stable [`Uuid`] assigned at creation.
//! Cross-references ([`Ref`]) point at those ids, never at positions, so removing
//! or reordering an element cannot silently retarget a reference. The labels users
//! see ("B", "2.3") are positional and computed on demand by [`crate::index`].

use crate::document::CourseDocument;
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

/// A cross-reference from a module to an outcome, or from an item to an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ref {
    /// Points at the element with this id.
    Live(Uuid),
    /// A positional reference read from a document that did not resolve when
    /// it was loaded. Kept verbatim so it is written back unchanged, until the
    /// target list grows to cover it and it is dropped.
    Stale(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub id: Uuid,
    pub text: String,
}

impl Outcome {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub id: Uuid,
    pub text: String,
}

impl Objective {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleItem {
    pub content: String,
    pub related_objectives: BTreeSet<Ref>,
}

impl ModuleItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            related_objectives: BTreeSet::new(),
        }
    }
}

/// The three item lists of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Resource,
    Activity,
    Assessment,
}

impl ItemKind {
    pub fn all() -> &'static [ItemKind] {
        &[ItemKind::Resource, ItemKind::Activity, ItemKind::Assessment]
    }

    /// Field name in the persisted document.
    pub fn field_name(&self) -> &'static str {
        match self {
            ItemKind::Resource => "resources",
            ItemKind::Activity => "activities",
            ItemKind::Assessment => "assessments",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            ItemKind::Resource => "Resources",
            ItemKind::Activity => "Activities",
            ItemKind::Assessment => "Assessments",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ItemKind::Resource => "resource",
            ItemKind::Activity => "activity",
            ItemKind::Assessment => "assessment",
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resource" | "resources" => Ok(ItemKind::Resource),
            "activity" | "activities" => Ok(ItemKind::Activity),
            "assessment" | "assessments" => Ok(ItemKind::Assessment),
            other => Err(format!(
                "Unknown item kind: {} (expected resource, activity or assessment)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: Uuid,
    pub title: String,
    pub related_slos: BTreeSet<Ref>,
    pub objectives: Vec<Objective>,
    pub resources: Vec<ModuleItem>,
    pub activities: Vec<ModuleItem>,
    pub assessments: Vec<ModuleItem>,
}

impl Default for Module {
    fn default() -> Self {
        Self::new("")
    }
}

impl Module {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            related_slos: BTreeSet::new(),
            objectives: Vec::new(),
            resources: Vec::new(),
            activities: Vec::new(),
            assessments: Vec::new(),
        }
    }

    pub fn items(&self, kind: ItemKind) -> &[ModuleItem] {
        match kind {
            ItemKind::Resource => &self.resources,
            ItemKind::Activity => &self.activities,
            ItemKind::Assessment => &self.assessments,
        }
    }

    pub fn items_mut(&mut self, kind: ItemKind) -> &mut Vec<ModuleItem> {
        match kind {
            ItemKind::Resource => &mut self.resources,
            ItemKind::Activity => &mut self.activities,
            ItemKind::Assessment => &mut self.assessments,
        }
    }

    /// Current position of the referenced objective, if it still exists.
    pub fn objective_position(&self, reference: &Ref) -> Option<usize> {
        match reference {
            Ref::Live(id) => self.objectives.iter().position(|o| o.id == *id),
            Ref::Stale(_) => None,
        }
    }

    pub fn objective_ref(&self, position: usize) -> Option<Ref> {
        self.objectives.get(position).map(|o| Ref::Live(o.id))
    }
}

/// A course map. Exclusively owns everything beneath it.
///
/// Equality is structural over the persisted form: two courses are equal when
/// they encode to the same document. Ids are identity, not content.
#[derive(Debug, Clone, Default)]
pub struct Course {
    pub course_number: String,
    pub course_name: String,
    pub description: String,
    pub learning_outcomes: Vec<Outcome>,
    pub modules: Vec<Module>,
}

impl Course {
    pub fn new(course_number: impl Into<String>, course_name: impl Into<String>) -> Self {
        Self {
            course_number: course_number.into(),
            course_name: course_name.into(),
            ..Self::default()
        }
    }

    /// Current position of the referenced outcome, if it still exists.
    pub fn outcome_position(&self, reference: &Ref) -> Option<usize> {
        match reference {
            Ref::Live(id) => self.learning_outcomes.iter().position(|o| o.id == *id),
            Ref::Stale(_) => None,
        }
    }

    pub fn outcome_ref(&self, position: usize) -> Option<Ref> {
        self.learning_outcomes.get(position).map(|o| Ref::Live(o.id))
    }

    /// `"{number} - {name}"`, the course line of the report.
    pub fn heading(&self) -> String {
        format!("{} - {}", self.course_number, self.course_name)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        CourseDocument::from(self) == CourseDocument::from(other)
    }
}

impl Eq for Course {}
