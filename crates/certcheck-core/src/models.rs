//! Domain models for submissions and classifier verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Owner metadata submitted alongside an uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionFields {
    pub name: String,
    pub branch: String,
    pub email: String,
    pub subject: String,
}

/// One stored upload: its owner metadata plus the name of the file on disk.
///
/// `id` and `created_at` are absent from stores written by older deployments;
/// they are filled in on load and persisted the next time the store is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub branch: String,
    pub email: String,
    pub subject: String,
    pub filename: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(fields: SubmissionFields, filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            branch: fields.branch,
            email: fields.email,
            subject: fields.subject,
            filename: filename.into(),
            created_at: Utc::now(),
        }
    }

    pub fn fields(&self) -> SubmissionFields {
        SubmissionFields {
            name: self.name.clone(),
            branch: self.branch.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
        }
    }
}

/// Binary classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    /// Map the classifier's thresholded label: 1 is genuine, anything else is not.
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Verdict::Real
        } else {
            Verdict::Fake
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Verdict::Real => 1,
            Verdict::Fake => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Real => "Real",
            Verdict::Fake => "Fake",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Real" => Ok(Verdict::Real),
            "Fake" => Ok(Verdict::Fake),
            other => Err(format!("unknown verdict '{}'", other)),
        }
    }
}

/// Raw classifier score together with the verdict derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    pub score: f32,
    pub verdict: Verdict,
}

impl ClassificationOutcome {
    /// Threshold a score into a verdict. Scores strictly above `threshold` are label 1.
    pub fn from_score(score: f32, threshold: f32) -> Self {
        let label = u8::from(score > threshold);
        Self {
            score,
            verdict: Verdict::from_label(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_label_mapping() {
        assert_eq!(Verdict::from_label(1), Verdict::Real);
        assert_eq!(Verdict::from_label(0), Verdict::Fake);
        assert_eq!(Verdict::Real.to_string(), "Real");
        assert_eq!(Verdict::Fake.to_string(), "Fake");
        assert_eq!("Fake".parse::<Verdict>(), Ok(Verdict::Fake));
        assert!("real".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_outcome_threshold_is_strict() {
        assert_eq!(ClassificationOutcome::from_score(0.5, 0.5).verdict, Verdict::Fake);
        assert_eq!(ClassificationOutcome::from_score(0.51, 0.5).verdict, Verdict::Real);
        assert_eq!(ClassificationOutcome::from_score(0.0, 0.5).verdict, Verdict::Fake);
    }

    #[test]
    fn test_legacy_record_without_id_deserializes() {
        let json = r#"{"name":"Alice","branch":"CS","email":"a@x.com","subject":"Thesis","filename":"cert.png"}"#;
        let record: SubmissionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Alice");
        assert_eq!(record.filename, "cert.png");
        assert!(!record.id.is_nil());
    }

    #[test]
    fn test_record_serializes_owner_fields() {
        let record = SubmissionRecord::new(
            SubmissionFields {
                name: "Bob".to_string(),
                branch: "EE".to_string(),
                email: "b@x.com".to_string(),
                subject: "Report".to_string(),
            },
            "report.jpg",
        );
        let value = serde_json::to_value(&record).unwrap();
        for key in ["name", "branch", "email", "subject", "filename", "id"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(record.fields().branch, "EE");
    }
}
