// src/core/progress.rs — Session progress and score aggregation

use serde::{Deserialize, Serialize};

use super::types::AnswerMap;

/// Rounded mean of all recorded scores; 0 when nothing is answered.
pub fn overall_score(answers: &AnswerMap) -> u32 {
    mean_score(answers.values().map(|r| r.evaluation.score))
}

/// Rounded mean of an arbitrary score list; 0 when empty.
pub fn mean_score(scores: impl IntoIterator<Item = u32>) -> u32 {
    let (sum, count) = scores
        .into_iter()
        .fold((0u64, 0u64), |(sum, n), s| (sum + s as u64, n + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}

/// `round(100 * answered / total)`, 0 for an empty catalog.
pub fn percent_complete(answered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * answered as f64 / total as f64).round() as u32;
    // 100 is reserved for a fully answered session (199/200 would round up).
    if answered < total {
        pct.min(99)
    } else {
        pct
    }
}

/// Coarse rating of a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => ScoreBand::Excellent,
            75..=89 => ScoreBand::Good,
            60..=74 => ScoreBand::Fair,
            _ => ScoreBand::NeedsWork,
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreBand::Excellent => write!(f, "excellent"),
            ScoreBand::Good => write!(f, "good"),
            ScoreBand::Fair => write!(f, "fair"),
            ScoreBand::NeedsWork => write!(f, "needs work"),
        }
    }
}

/// Fill level of each progress-bar segment: done, current (half), upcoming.
pub fn question_progress(current_index: usize, total: usize) -> Vec<u8> {
    (0..total)
        .map(|i| match i.cmp(&current_index) {
            std::cmp::Ordering::Less => 100,
            std::cmp::Ordering::Equal => 50,
            std::cmp::Ordering::Greater => 0,
        })
        .collect()
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUrgency {
    Normal,
    Warning,
    Critical,
}

impl TimeUrgency {
    pub fn from_remaining(seconds: u32) -> Self {
        if seconds <= 30 {
            TimeUrgency::Critical
        } else if seconds <= 60 {
            TimeUrgency::Warning
        } else {
            TimeUrgency::Normal
        }
    }
}
