//! Data types flowing through the analysis pipeline.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque pagination token owned by the post source. `None` means
/// "start of timeline" on input and "end of timeline" on output.
pub type PaginationCursor = Option<String>;

// ============ Posts ============

/// How a post relates to another post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Retweeted,
    Quoted,
    RepliedTo,
    #[serde(other)]
    Other,
}

/// Reference from a post to another post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub id: String,
}

/// A fetched post. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    #[serde(default, rename = "referenced_tweets")]
    pub references: Vec<PostReference>,
}

impl Post {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            references: Vec::new(),
        }
    }

    pub fn with_reference(mut self, kind: ReferenceKind, id: impl Into<String>) -> Self {
        self.references.push(PostReference {
            kind,
            id: id.into(),
        });
        self
    }

    /// True when the post repeats another author's content.
    pub fn is_repost(&self) -> bool {
        self.references
            .iter()
            .any(|r| matches!(r.kind, ReferenceKind::Retweeted | ReferenceKind::Quoted))
    }
}

/// One page of posts plus the token for the page after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostBatch {
    pub posts: Vec<Post>,
    pub next_cursor: PaginationCursor,
}

/// Resolved account identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

/// Public profile details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub bio: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub created_at: String,
}

// ============ Severity ============

/// Depression severity taxonomy produced by the severity classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityLabel {
    NotDepression,
    Moderate,
    Severe,
}

impl SeverityLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SeverityLabel::NotDepression => "Not depression",
            SeverityLabel::Moderate => "Moderate",
            SeverityLabel::Severe => "Severe",
        }
    }

    /// Moderate and Severe flag the user.
    pub const fn is_concerning(&self) -> bool {
        matches!(self, SeverityLabel::Moderate | SeverityLabel::Severe)
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label text that is not one of the three severity classes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity label: {0}")]
pub struct UnknownSeverityLabel(pub String);

impl FromStr for SeverityLabel {
    type Err = UnknownSeverityLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "not depression" => Ok(SeverityLabel::NotDepression),
            "moderate" => Ok(SeverityLabel::Moderate),
            "severe" => Ok(SeverityLabel::Severe),
            _ => Err(UnknownSeverityLabel(s.to_string())),
        }
    }
}

impl Serialize for SeverityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SeverityLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============ Analysis Results ============

/// Classifier verdicts for a single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAnalysis {
    pub text: String,
    #[serde(rename = "emotion")]
    pub emotion_label: String,
    #[serde(rename = "analysis")]
    pub severity_label: SeverityLabel,
    /// Severity confidence in [0, 100], two decimals.
    #[serde(rename = "confidence_score", with = "confidence")]
    pub confidence_percent: f64,
}

impl PostAnalysis {
    /// Build a result from a raw severity probability in [0, 1].
    pub fn new(
        text: impl Into<String>,
        emotion_label: impl Into<String>,
        severity_label: SeverityLabel,
        severity_score: f64,
    ) -> Self {
        Self {
            text: text.into(),
            emotion_label: emotion_label.into(),
            severity_label,
            confidence_percent: round_percent(severity_score),
        }
    }

    /// Confidence as shown to clients, e.g. `"97.25%"`.
    pub fn confidence_score(&self) -> String {
        confidence::format(self.confidence_percent)
    }
}

/// `score * 100` rounded to two decimal places.
pub fn round_percent(score: f64) -> f64 {
    (score * 10_000.0).round() / 100.0
}

mod confidence {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn format(value: f64) -> String {
        format!("{:.2}%", value)
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(PercentVisitor)
    }

    struct PercentVisitor;

    impl PercentVisitor {
        fn check<E: de::Error>(value: f64) -> Result<f64, E> {
            if (0.0..=100.0).contains(&value) {
                Ok(value)
            } else {
                Err(E::custom(format!("confidence {} outside 0-100", value)))
            }
        }
    }

    impl<'de> Visitor<'de> for PercentVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a percentage string such as \"97.25%\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            let number = v
                .trim()
                .strip_suffix('%')
                .ok_or_else(|| E::custom(format!("confidence {:?} must end with '%'", v)))?;
            let value: f64 = number
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("confidence {:?} is not a number", v)))?;
            Self::check(value)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Self::check(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Self::check(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Self::check(v as f64)
        }
    }
}

// ============ Reports ============

/// User-level verdict: any Moderate or Severe post flags the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAssessment {
    ShowsSigns,
    NoSigns,
}

impl UserAssessment {
    /// Logical OR over the batch; order and confidence play no part.
    pub fn from_results(results: &[PostAnalysis]) -> Self {
        if results.iter().any(|r| r.severity_label.is_concerning()) {
            UserAssessment::ShowsSigns
        } else {
            UserAssessment::NoSigns
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            UserAssessment::ShowsSigns => "The user shows signs of depression.",
            UserAssessment::NoSigns => "No signs of depression detected.",
        }
    }
}

/// Full-batch report returned by `/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnalysisReport {
    pub username: String,
    pub message: String,
    pub results: Vec<PostAnalysis>,
    #[serde(rename = "pagination_token")]
    pub next_cursor: PaginationCursor,
}

/// "Load more" report: no username, no aggregate message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuationReport {
    pub results: Vec<PostAnalysis>,
    #[serde(rename = "pagination_token")]
    pub next_cursor: PaginationCursor,
}

/// Narrative summary returned by the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub response: String,
}
