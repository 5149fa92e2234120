use crate::error::{KeydrillError, Result};
use crate::lesson::{LessonKind, LessonSpec};
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use log::warn;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

static LESSON_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lessons");

pub const CORE_PACK: &str = "core-pack.json";

/// Ordered set of loadable lessons
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lessons: Vec<LessonSpec>,
}

impl Catalog {
    /// Parse a JSON array of lessons, skipping entries that are malformed,
    /// invalid or reuse an earlier id. Only a non-array document is an error.
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<Value> = match serde_json::from_str(raw)? {
            Value::Array(entries) => entries,
            _ => return Err(KeydrillError::Catalog("expected a list of lessons".into())),
        };

        let mut seen = HashSet::new();
        let mut lessons = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            match parse_entry(entry) {
                Ok(lesson) if seen.insert(lesson.id.clone()) => lessons.push(lesson),
                Ok(lesson) => warn!("skipping lesson #{position}: duplicate id {}", lesson.id),
                Err(e) => warn!("skipping lesson #{position}: {e}"),
            }
        }
        Ok(Self { lessons })
    }

    /// The lesson pack compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let file = LESSON_DIR
            .get_file(CORE_PACK)
            .ok_or_else(|| KeydrillError::Catalog(format!("{CORE_PACK} not bundled")))?;
        let raw = file
            .contents_utf8()
            .ok_or_else(|| KeydrillError::Catalog(format!("{CORE_PACK} is not UTF-8")))?;
        Self::from_json(raw)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn lessons(&self) -> &[LessonSpec] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LessonSpec> {
        self.lessons.iter().find(|lesson| lesson.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&LessonSpec> {
        self.get(id)
            .ok_or_else(|| KeydrillError::LessonNotFound(id.to_string()))
    }

    /// Lessons grouped by level, catalog order kept within each level.
    pub fn levels(&self) -> BTreeMap<u32, Vec<&LessonSpec>> {
        self.lessons
            .iter()
            .into_group_map_by(|lesson| lesson.level())
            .into_iter()
            .collect()
    }
}

fn parse_entry(entry: Value) -> Result<LessonSpec> {
    let tag = entry.get("type").and_then(Value::as_str).unwrap_or_default();
    if LessonKind::from_tag(tag).is_none() {
        return Err(KeydrillError::UnknownLessonType(tag.to_string()));
    }
    let lesson: LessonSpec = serde_json::from_value(entry)?;
    lesson.validate()?;
    Ok(lesson)
}
