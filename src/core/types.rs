// src/core/types.rs — Core domain types

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single interview question. Its id is its position in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    pub key_points: Vec<String>,
    pub expected_answer: String,
    pub difficulty: Difficulty,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Behavioral,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Technical => write!(f, "Technical"),
            Category::Behavioral => write!(f, "Behavioral"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(Category::Technical),
            "behavioral" | "behavioural" => Ok(Category::Behavioral),
            other => Err(format!(
                "unknown category '{other}' (expected technical or behavioral)"
            )),
        }
    }
}

/// Result of evaluating one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: u32,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub key_points_covered: Vec<String>,
    pub missing_points: Vec<String>,
}

impl Evaluation {
    /// Covered and missing points split `key_points` exactly: disjoint, nothing
    /// left over, nothing invented.
    pub fn partitions(&self, key_points: &[String]) -> bool {
        let overlap = self
            .key_points_covered
            .iter()
            .any(|p| self.missing_points.contains(p));
        let all_known = self
            .key_points_covered
            .iter()
            .chain(&self.missing_points)
            .all(|p| key_points.contains(p));
        let all_present = key_points
            .iter()
            .all(|p| self.key_points_covered.contains(p) || self.missing_points.contains(p));
        !overlap && all_known && all_present
    }
}

/// Captured answer text plus its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "answer")]
    pub answer_text: String,
    pub evaluation: Evaluation,
}

/// Answers keyed by question index, in the order they were answered.
pub type AnswerMap = IndexMap<usize, AnswerRecord>;

/// Camera and microphone switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for DeviceConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Recording,
    Evaluating,
    Answered,
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Recording => write!(f, "recording"),
            Phase::Evaluating => write!(f, "evaluating"),
            Phase::Answered => write!(f, "answered"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

pub const EXPERIENCE_OPTIONS: &[&str] = &[
    "0-1 years",
    "1-3 years",
    "3-5 years",
    "5-8 years",
    "8+ years",
];

/// (value, label) pairs for why the candidate is practising.
pub const REASON_OPTIONS: &[(&str, &str)] = &[
    ("new-job", "Looking for a new job"),
    ("practice", "General practice"),
    ("upcoming", "Preparing for upcoming interview"),
    ("skills", "Improving interview skills"),
    ("career-switch", "Switching career paths"),
];

/// Details entered before a session begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewProfile {
    pub title: String,
    pub job_role: String,
    pub years_of_experience: String,
    pub reason_for_interview: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl InterviewProfile {
    pub fn new(title: impl Into<String>, job_role: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            job_role: job_role.into(),
            years_of_experience: EXPERIENCE_OPTIONS[0].to_string(),
            reason_for_interview: REASON_OPTIONS[1].0.to_string(),
            timestamp: Utc::now(),
            user_id: None,
        }
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.years_of_experience = experience.into();
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason_for_interview = reason.into();
        self
    }

    /// Both option lists are closed sets.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("interview title is required".into());
        }
        if self.job_role.trim().is_empty() {
            return Err("job role is required".into());
        }
        if !EXPERIENCE_OPTIONS.contains(&self.years_of_experience.as_str()) {
            return Err(format!(
                "unknown experience '{}', expected one of: {}",
                self.years_of_experience,
                EXPERIENCE_OPTIONS.join(", ")
            ));
        }
        if !REASON_OPTIONS
            .iter()
            .any(|(value, _)| *value == self.reason_for_interview)
        {
            let values: Vec<&str> = REASON_OPTIONS.iter().map(|(v, _)| *v).collect();
            return Err(format!(
                "unknown reason '{}', expected one of: {}",
                self.reason_for_interview,
                values.join(", ")
            ));
        }
        Ok(())
    }
}

/// Events emitted by the session controller at lifecycle transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    QuestionShown {
        index: usize,
        total: usize,
    },
    RecordingStarted {
        index: usize,
        time_limit: u32,
    },
    Tick {
        time_remaining: u32,
    },
    RecordingRestarted {
        index: usize,
        constraints: DeviceConstraints,
    },
    Evaluating {
        index: usize,
        expired: bool,
    },
    Answered {
        index: usize,
        score: u32,
        overall: u32,
        percent_complete: u32,
    },
    EvaluationFailed {
        index: usize,
        message: String,
    },
    DeviceError {
        message: String,
    },
    Completed {
        answered: usize,
        total: usize,
        overall_score: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    fn eval_with(covered: &[&str], missing: &[&str]) -> Evaluation {
        Evaluation {
            score: 80,
            feedback: String::new(),
            strengths: vec![],
            improvements: vec![],
            key_points_covered: covered.iter().map(|s| s.to_string()).collect(),
            missing_points: missing.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_partition_exact() {
        assert!(eval_with(&["a", "c"], &["b"]).partitions(&points()));
        assert!(eval_with(&[], &["a", "b", "c"]).partitions(&points()));
    }

    #[test]
    fn test_partition_detects_overlap_and_gaps() {
        assert!(!eval_with(&["a", "b"], &["b", "c"]).partitions(&points()));
        assert!(!eval_with(&["a"], &["b"]).partitions(&points()));
        assert!(!eval_with(&["a", "b", "z"], &["c"]).partitions(&points()));
    }

    #[test]
    fn test_question_json_uses_camel_case() {
        let q = Question {
            prompt: "Explain hooks".into(),
            key_points: vec!["useState".into()],
            expected_answer: "Hooks are...".into(),
            difficulty: Difficulty::Medium,
            category: Category::Technical,
        };
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"keyPoints\""));
        assert!(json.contains("\"expectedAnswer\""));
        assert!(json.contains("\"difficulty\":\"medium\""));
        assert!(json.contains("\"category\":\"technical\""));
    }

    #[test]
    fn test_answer_map_keeps_answer_order() {
        let mut answers = AnswerMap::new();
        for idx in [2usize, 0, 1] {
            answers.insert(
                idx,
                AnswerRecord {
                    answer_text: format!("answer {idx}"),
                    evaluation: eval_with(&[], &[]),
                },
            );
        }
        let json = serde_json::to_string(&answers).unwrap();
        let parsed: AnswerMap = serde_json::from_str(&json).unwrap();
        let keys: Vec<usize> = parsed.keys().copied().collect();
        assert_eq!(keys, vec![2, 0, 1]);
    }

    #[test]
    fn test_profile_validation() {
        let profile = InterviewProfile::new("Frontend loop", "React developer")
            .with_experience("3-5 years")
            .with_reason("upcoming");
        assert!(profile.validate().is_ok());

        let bad = profile.clone().with_experience("forever");
        assert!(bad.validate().unwrap_err().contains("forever"));

        let blank = InterviewProfile::new("  ", "dev");
        assert!(blank.validate().is_err());
    }
}
