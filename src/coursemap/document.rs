//! # Persisted Document Format
//!
//! A course is saved as one JSON object that mirrors the model, with every
//! cross-reference written as a 0-based position into its target list:
//!
//! ```text
//! {
//!   "courseNumber": "CS101",
//!   "courseName": "Intro",
//!   "description": "...",
//!   "learningOutcomes": ["Explain X", "Apply Y"],
//!   "modules": [
//!     {
//!       "title": "Intro",
//!       "relatedSLOs": [0],
//!       "objectives": ["Define X"],
//!       "resources": [{ "content": "Textbook ch.1", "relatedObjectives": [0] }],
//!       "activities": [],
//!       "assessments": []
//!     }
//!   ]
//! }
//! ```
//!
//! There is no version field. Decoding is permissive so that documents from
//! older or partial writers load: missing or `null` lists become empty, missing
//! or `null` strings become `""`, and reference entries may be numbers or numeric
//! strings (`"0"`). Anything that is not a JSON object at the top level, or
//! holds a value of the wrong type, is a [`CourseMapError::MalformedDocument`].
//!
//! References are not validated. A position past the end of its target list is
//! kept as [`Ref::Stale`] and written back unchanged; the renderer leaves it out.
//! Adding an outcome or objective drops the stale positions it would cover, so
//! a reload never turns one into a live link.

use crate::error::{CourseMapError, Result};
use crate::model::{Course, ItemKind, Module, ModuleItem, Objective, Outcome, Ref};
use log::warn;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// The persisted shape of a [`Course`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDocument {
    #[serde(deserialize_with = "nullable")]
    pub course_number: String,
    #[serde(deserialize_with = "nullable")]
    pub course_name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub learning_outcomes: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub modules: Vec<ModuleDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleDocument {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename = "relatedSLOs", deserialize_with = "nullable")]
    pub related_slos: Vec<Position>,
    #[serde(deserialize_with = "nullable")]
    pub objectives: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub resources: Vec<ItemDocument>,
    #[serde(deserialize_with = "nullable")]
    pub activities: Vec<ItemDocument>,
    #[serde(deserialize_with = "nullable")]
    pub assessments: Vec<ItemDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDocument {
    #[serde(deserialize_with = "nullable")]
    pub content: String,
    #[serde(deserialize_with = "nullable")]
    pub related_objectives: Vec<Position>,
}

/// A 0-based reference position. Written as a number; read from a number or a
/// numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Position(pub usize);

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => usize::try_from(n).map(Position).map_err(de::Error::custom),
            Raw::Text(s) => s
                .trim()
                .parse::<usize>()
                .map(Position)
                .map_err(|_| de::Error::custom(format!("invalid reference index {:?}", s))),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Encodes a course as pretty-printed JSON.
pub fn encode(course: &Course) -> Result<Vec<u8>> {
    let doc = CourseDocument::from(course);
    Ok(serde_json::to_vec_pretty(&doc)?)
}

/// Decodes a course from JSON bytes. See the module docs for what is accepted.
pub fn decode(bytes: &[u8]) -> Result<Course> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| CourseMapError::MalformedDocument(format!("not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(CourseMapError::MalformedDocument(format!(
            "expected a JSON object at the top level, found {}",
            json_kind(&value)
        )));
    }

    let doc: CourseDocument = serde_json::from_value(value)
        .map_err(|e| CourseMapError::MalformedDocument(e.to_string()))?;
    Ok(Course::from(doc))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl From<&Course> for CourseDocument {
    fn from(course: &Course) -> Self {
        Self {
            course_number: course.course_number.clone(),
            course_name: course.course_name.clone(),
            description: course.description.clone(),
            learning_outcomes: course
                .learning_outcomes
                .iter()
                .map(|o| o.text.clone())
                .collect(),
            modules: course
                .modules
                .iter()
                .map(|module| ModuleDocument {
                    title: module.title.clone(),
                    related_slos: positions(&module.related_slos, |r| course.outcome_position(r)),
                    objectives: module.objectives.iter().map(|o| o.text.clone()).collect(),
                    resources: item_documents(module, ItemKind::Resource),
                    activities: item_documents(module, ItemKind::Activity),
                    assessments: item_documents(module, ItemKind::Assessment),
                })
                .collect(),
        }
    }
}

fn item_documents(module: &Module, kind: ItemKind) -> Vec<ItemDocument> {
    module
        .items(kind)
        .iter()
        .map(|item| ItemDocument {
            content: item.content.clone(),
            related_objectives: positions(&item.related_objectives, |r| {
                module.objective_position(r)
            }),
        })
        .collect()
}

/// Ascending positions for a reference set. Stale entries keep their recorded
/// position; live ids that no longer resolve have no position and are dropped.
fn positions<F>(refs: &BTreeSet<Ref>, locate: F) -> Vec<Position>
where
    F: Fn(&Ref) -> Option<usize>,
{
    let found: BTreeSet<usize> = refs
        .iter()
        .filter_map(|r| match r {
            Ref::Stale(n) => Some(*n),
            live => locate(live),
        })
        .collect();
    found.into_iter().map(Position).collect()
}

impl From<CourseDocument> for Course {
    fn from(doc: CourseDocument) -> Self {
        let learning_outcomes: Vec<Outcome> =
            doc.learning_outcomes.into_iter().map(Outcome::new).collect();
        let outcome_ids: Vec<Uuid> = learning_outcomes.iter().map(|o| o.id).collect();

        let modules = doc
            .modules
            .into_iter()
            .enumerate()
            .map(|(index, module)| module.into_module(index, &outcome_ids))
            .collect();

        Course {
            course_number: doc.course_number,
            course_name: doc.course_name,
            description: doc.description,
            learning_outcomes,
            modules,
        }
    }
}

impl ModuleDocument {
    fn into_module(self, module_index: usize, outcome_ids: &[Uuid]) -> Module {
        let objectives: Vec<Objective> = self.objectives.into_iter().map(Objective::new).collect();
        let objective_ids: Vec<Uuid> = objectives.iter().map(|o| o.id).collect();

        let related_slos = self
            .related_slos
            .iter()
            .map(|p| link(*p, outcome_ids, "outcome", module_index))
            .collect();

        let items = |docs: Vec<ItemDocument>| -> Vec<ModuleItem> {
            docs.into_iter()
                .map(|item| ModuleItem {
                    content: item.content,
                    related_objectives: item
                        .related_objectives
                        .iter()
                        .map(|p| link(*p, &objective_ids, "objective", module_index))
                        .collect(),
                })
                .collect()
        };

        let mut module = Module::new(self.title);
        module.related_slos = related_slos;
        module.resources = items(self.resources);
        module.activities = items(self.activities);
        module.assessments = items(self.assessments);
        module.objectives = objectives;
        module
    }
}

fn link(position: Position, ids: &[Uuid], target: &str, module_index: usize) -> Ref {
    match ids.get(position.0) {
        Some(id) => Ref::Live(*id),
        None => {
            warn!(
                "event=stale_reference module=document target={} module_index={} position={} len={}",
                target,
                module_index,
                position.0,
                ids.len()
            );
            Ref::Stale(position.0)
        }
    }
}
