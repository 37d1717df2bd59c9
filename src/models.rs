// src/models.rs
use serde::de::{self, Deserializer, Unexpected};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A validated, transport-ready image: base64 payload (no data-URI header),
/// its declared media type, and the size of the source bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub encoded_data: String,
    pub media_type: String,
    pub source_size: usize,
}

/// The tri-state verdict the model returns for `isFixable`.
/// On the wire this is JSON `true`, `false`, or the literal `"maybe"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixability {
    Fixable,
    NotFixable,
    Maybe,
}

impl Serialize for Fixability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fixability::Fixable => serializer.serialize_bool(true),
            Fixability::NotFixable => serializer.serialize_bool(false),
            Fixability::Maybe => serializer.serialize_str("maybe"),
        }
    }
}

impl<'de> Deserialize<'de> for Fixability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(true) => Ok(Fixability::Fixable),
            Raw::Bool(false) => Ok(Fixability::NotFixable),
            // Models drift on casing; accept any spelling of "maybe".
            Raw::Text(s) if s.eq_ignore_ascii_case("maybe") => Ok(Fixability::Maybe),
            Raw::Text(s) => Err(de::Error::invalid_value(
                Unexpected::Str(&s),
                &"true, false, or \"maybe\"",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepairMethod {
    pub method: String,
    pub description: String,
}

/// The structured verdict parsed from the model's JSON response.
/// Field names follow the wire contract the system prompt dictates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    pub is_fixable: Fixability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixability_reason: Option<String>,
    #[serde(default)]
    pub repair_methods: Option<Vec<RepairMethod>>,
    #[serde(default)]
    pub estimated_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<String>,
}

impl RepairAssessment {
    /// Display projection enforcing the verdict policy: when the object is
    /// not fixable, repair methods and cost are disregarded no matter what
    /// the service returned. Parsing keeps them; rendering never sees them.
    pub fn for_display(&self) -> RepairAssessment {
        let mut view = self.clone();
        if view.is_fixable == Fixability::NotFixable {
            view.repair_methods = None;
            view.estimated_cost = None;
        }
        view
    }
}

/// Outcome of one analysis invocation. Replaced wholesale on the next
/// invocation, never merged or patched.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AnalysisOutcome {
    /// The call settled but produced no usable verdict.
    Failure { error: String },
    /// The service answered without committing to a verdict.
    Pending,
    /// A parsed, well-formed assessment.
    Judgment(RepairAssessment),
}

impl AnalysisOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        AnalysisOutcome::Failure { error: error.into() }
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Failure { error } => Some(error),
            _ => None,
        }
    }

    /// Applies the display-time verdict policy to the Judgment case.
    pub fn for_display(&self) -> AnalysisOutcome {
        match self {
            AnalysisOutcome::Judgment(a) => AnalysisOutcome::Judgment(a.for_display()),
            other => other.clone(),
        }
    }
}

/// One settled analysis with its bookkeeping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub outcome: AnalysisOutcome,
    pub latency_ms: u64,
    pub timestamp: String,
}

impl AnalysisRecord {
    pub fn new(outcome: AnalysisOutcome, latency_ms: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            outcome,
            latency_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
