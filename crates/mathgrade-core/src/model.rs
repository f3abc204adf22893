//! Core data model types for mathgrade.
//!
//! These are the input types the quiz front end hands to the grader: one
//! [`AttemptRecord`] per answered (or skipped) question, plus the learner's
//! [`Grade`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One learner's submission for one question, paired with its canonical answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// Question identifier as issued by the question bank.
    #[serde(default)]
    pub question_id: Option<Identifier>,
    /// Question text shown to the learner.
    #[serde(default)]
    pub question: Option<String>,
    /// Pedagogical topic, e.g. "Fractions" or "Number Series".
    #[serde(default)]
    pub topic: Option<String>,
    /// Question type tag ("tableInput", "factorTree", anything else is scalar).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Table layout variant for table-input questions.
    #[serde(default)]
    pub variant: Option<String>,
    /// Canonical answer: a plain value or a JSON-encoded structure.
    #[serde(default)]
    pub answer: serde_json::Value,
    /// Submitted answer; `null` or absent when the learner skipped.
    #[serde(default)]
    pub user_answer: serde_json::Value,
    /// Seconds spent on the question. Non-numeric values are dropped.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub time_taken: Option<f64>,
    /// Image shown with the question.
    #[serde(default)]
    pub image: Option<String>,
    /// Answer options for multiple-choice questions.
    #[serde(default)]
    pub options: Option<Vec<serde_json::Value>>,
    /// Table rows for table-input questions.
    #[serde(default)]
    pub rows: Option<Vec<serde_json::Value>>,
    /// Column headers for table-input questions.
    #[serde(default)]
    pub headers: Option<serde_json::Value>,
    /// Per-column input keys for table-input questions.
    #[serde(default)]
    pub input_keys: Option<serde_json::Value>,
    /// Canonical multiplication tree for factor-tree questions.
    #[serde(default)]
    pub tree: Option<serde_json::Value>,
}

impl AttemptRecord {
    /// The scoring archetype this record dispatches to.
    pub fn question_type(&self) -> QuestionType {
        self.kind.as_deref().map(QuestionType::from_tag).unwrap_or_default()
    }

    /// The topic name, with unlabelled questions grouped under `"General"`.
    pub fn topic_name(&self) -> &str {
        match self.topic.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_TOPIC,
        }
    }
}

/// Topic used for records that carry no topic label.
pub const DEFAULT_TOPIC: &str = "General";

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|secs| secs.is_finite()))
}

/// A question or tree-node identifier. Question banks use both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Scoring archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuestionType {
    /// Single value or short text; binary credit.
    #[default]
    Scalar,
    /// Multi-row table; per-row partial credit.
    TableInput,
    /// Prime factor tree with blanked nodes; binary credit.
    FactorTree,
}

impl QuestionType {
    /// Map a type tag to its archetype. Unknown tags (mcq, userInput, ...) are scalar.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "tableInput" => QuestionType::TableInput,
            "factorTree" => QuestionType::FactorTree,
            _ => QuestionType::Scalar,
        }
    }

    /// Whether submissions are JSON structures rather than plain values.
    pub fn is_structured(self) -> bool {
        !matches!(self, QuestionType::Scalar)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Scalar => write!(f, "scalar"),
            QuestionType::TableInput => write!(f, "tableInput"),
            QuestionType::FactorTree => write!(f, "factorTree"),
        }
    }
}

/// Type tags the question bank is known to emit.
pub const KNOWN_TYPE_TAGS: &[&str] = &["mcq", "userInput", "tableInput", "factorTree"];

/// Layout variants of table-input questions. They share one scoring
/// algorithm; the variant only decides which cell shapes appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableVariant {
    Default,
    Fraction,
    Coordinate,
    DoubleInput,
    TripleInput,
}

impl fmt::Display for TableVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableVariant::Default => write!(f, "default"),
            TableVariant::Fraction => write!(f, "fraction"),
            TableVariant::Coordinate => write!(f, "coordinate"),
            TableVariant::DoubleInput => write!(f, "double-input"),
            TableVariant::TripleInput => write!(f, "triple-input"),
        }
    }
}

impl FromStr for TableVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "" => Ok(TableVariant::Default),
            "fraction" => Ok(TableVariant::Fraction),
            "coordinate" => Ok(TableVariant::Coordinate),
            "double-input" | "double" => Ok(TableVariant::DoubleInput),
            "triple-input" | "triple" => Ok(TableVariant::TripleInput),
            other => Err(format!("unknown table variant: {other}")),
        }
    }
}

/// One node of a factor tree as issued by the question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorTreeNode {
    /// Node identifier; submissions are keyed by it.
    #[serde(default)]
    pub id: Option<Identifier>,
    /// The node value. Input nodes still carry the expected value.
    #[serde(default)]
    pub val: serde_json::Value,
    /// Whether the learner has to fill this node in.
    #[serde(default)]
    pub is_input: bool,
    #[serde(default)]
    pub children: Option<Vec<FactorTreeNode>>,
}

impl FactorTreeNode {
    pub fn children(&self) -> &[FactorTreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Label used in error messages: the id if present, else the value.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => format!("<val {}>", self.val),
        }
    }
}

/// A learner's school grade, parsed from strings like `"Grade 5"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grade {
    level: Option<u8>,
}

/// Grade bands used for topic-specific improvement hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    /// Grades 1 to 3.
    Early,
    /// Grades 4 to 6.
    Middle,
    /// Everything else, including unknown grades.
    Upper,
}

impl Grade {
    /// Parse a grade label. Accepts `"Grade 5"`, `"grade 5"` and `"5"`;
    /// anything else yields an unknown grade.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        let digits = trimmed
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("grade"))
            .map(|_| &trimmed[5..])
            .unwrap_or(trimmed);
        Self {
            level: digits.trim().parse().ok(),
        }
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    /// Grades 1 to 5 get the primary-school learning plan templates.
    pub fn is_primary(&self) -> bool {
        matches!(self.level, Some(1..=5))
    }

    pub fn band(&self) -> GradeBand {
        match self.level {
            Some(1..=3) => GradeBand::Early,
            Some(4..=6) => GradeBand::Middle,
            _ => GradeBand::Upper,
        }
    }
}
