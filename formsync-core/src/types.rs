//! Domain types for a forms configuration document.
//!
//! Optional fields keep their presence from the source document: a question
//! written without `required` serializes without `required`. Fingerprints are
//! computed over the serialized form, so absence and `false` hash differently.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Logical form identifier chosen by the configuration author.
///
/// Stable across runs; the join key into the sync state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub String);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FormId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FormId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for FormId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The `type` of a question.
///
/// Any string outside the supported set is kept as [`QuestionKind::Unsupported`]
/// so the compiler can reject it with the form and position attached, instead
/// of the whole document failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Unsupported(String),
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::Paragraph => "paragraph",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Unsupported(other) => other,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for QuestionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "short_answer" => QuestionKind::ShortAnswer,
            "paragraph" => QuestionKind::Paragraph,
            "multiple_choice" => QuestionKind::MultipleChoice,
            _ => QuestionKind::Unsupported(s),
        }
    }
}

impl From<&str> for QuestionKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Unsupported(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Specification structs
// ---------------------------------------------------------------------------

/// One question of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Choice labels; only meaningful for `multiple_choice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl QuestionSpec {
    /// `required` with the absent-means-false default applied.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// One form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    pub id: FormId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

/// Root of a forms configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormConfig {
    #[serde(default)]
    pub forms: Vec<FormSpec>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
