use crate::error::{KeydrillError, Result};
use serde::{Deserialize, Serialize};

/// Longest practice text a lesson may ask for.
pub const MAX_OUTPUT_LEN: usize = 10_000;

/// Target speed and accuracy for a lesson
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub wpm: f64,
    pub accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_sec: Option<u32>,
}

/// Base ordering used by sequence lessons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SequencePattern {
    Ascend,
    Descend,
    Mirror,
    Shuffle,
}

/// Finger a finger-mix lesson is aimed at. Descriptive only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Finger {
    LL,
    LR,
    LM,
    LI,
    RI,
    RM,
    RR,
    RL,
}

/// Variant tag of a lesson, as written in the catalog's `type` field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LessonKind {
    Sequence,
    FingerMix,
    RegionRandom,
    Timed,
}

impl LessonKind {
    pub const ALL: [LessonKind; 4] = [
        LessonKind::Sequence,
        LessonKind::FingerMix,
        LessonKind::RegionRandom,
        LessonKind::Timed,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.to_string() == tag)
    }
}

/// Variant-specific parameters; exactly one is present per lesson
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LessonVariant {
    Sequence {
        pattern: SequencePattern,
        chunk: usize,
        repeat: usize,
    },
    #[serde(rename_all = "camelCase")]
    FingerMix {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finger: Option<Finger>,
        chunk: usize,
        repeat: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_repeat: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    RegionRandom {
        length: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_run: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_repeat: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    Timed { time_limit_sec: u32 },
}

impl LessonVariant {
    pub fn kind(&self) -> LessonKind {
        match self {
            LessonVariant::Sequence { .. } => LessonKind::Sequence,
            LessonVariant::FingerMix { .. } => LessonKind::FingerMix,
            LessonVariant::RegionRandom { .. } => LessonKind::RegionRandom,
            LessonVariant::Timed { .. } => LessonKind::Timed,
        }
    }
}

/// A declarative lesson description as it appears in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonSpec {
    pub id: String,
    pub title: String,
    pub pool: Vec<char>,
    pub goal: Goal,
    #[serde(default)]
    pub allow_backspace: bool,
    #[serde(flatten)]
    pub variant: LessonVariant,
}

impl LessonSpec {
    pub fn kind(&self) -> LessonKind {
        self.variant.kind()
    }

    /// Level encoded in the id as `L<n>-...`; anything else is level 1.
    pub fn level(&self) -> u32 {
        level_from_id(&self.id)
    }

    /// Number of characters the generator will produce for this lesson,
    /// `None` if the size does not fit in a `usize`.
    pub fn output_len(&self) -> Option<usize> {
        match self.variant {
            LessonVariant::Sequence { chunk, repeat, .. }
            | LessonVariant::FingerMix { chunk, repeat, .. } => chunk.checked_mul(repeat),
            LessonVariant::RegionRandom { length, .. } => Some(length),
            LessonVariant::Timed { time_limit_sec } => Some(
                crate::generator::timed::estimated_length(time_limit_sec, self.goal.wpm),
            ),
        }
    }

    /// Errors if the text would be larger than [`MAX_OUTPUT_LEN`].
    pub fn check_size(&self) -> Result<usize> {
        match self.output_len() {
            Some(len) if len <= MAX_OUTPUT_LEN => Ok(len),
            _ => Err(KeydrillError::Catalog(format!(
                "lesson {} asks for more than {MAX_OUTPUT_LEN} characters",
                self.id
            ))),
        }
    }

    /// Rejects lessons that cannot be generated or could never be completed.
    pub fn validate(&self) -> Result<()> {
        if self.pool.is_empty() {
            return Err(KeydrillError::EmptyPool {
                lesson_id: self.id.clone(),
            });
        }
        if self.check_size()? == 0 {
            return Err(KeydrillError::Catalog(format!(
                "lesson {} would generate no text",
                self.id
            )));
        }
        Ok(())
    }
}

pub fn level_from_id(id: &str) -> u32 {
    id.strip_prefix('L')
        .and_then(|rest| rest.split_once('-'))
        .filter(|(digits, _)| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .and_then(|(digits, _)| digits.parse().ok())
        .unwrap_or(1)
}

/// Text produced for one practice attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedTarget {
    pub text: String,
    pub kind: LessonKind,
}

impl GeneratedTarget {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
