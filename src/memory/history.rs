// src/memory/history.rs — Completed interview history and dashboard stats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bridge::PersistedSession;
use super::store::KeyValueStore;
use crate::core::progress;
use crate::core::types::{AnswerMap, InterviewProfile, Question};
use crate::infra::errors::PrepError;

pub const HISTORY_KEY: &str = "interviewHistory";

/// Keep the log bounded; the oldest entries go first.
const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    pub score: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub answers: AnswerMap,
    pub questions: Vec<Question>,
}

impl HistoryEntry {
    pub fn from_session(session: &PersistedSession, profile: Option<&InterviewProfile>) -> Self {
        Self {
            date: Utc::now(),
            score: session.overall_score,
            title: profile.map(|p| p.title.clone()),
            role: profile.map(|p| p.job_role.clone()),
            answers: session.answers.clone(),
            questions: session.questions.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_interviews: usize,
    /// Mean over entries that have at least one answer.
    pub average_score: u32,
    pub best_score: u32,
}

/// Read the history. A missing or unreadable log is an empty one.
pub fn read_history(store: &dyn KeyValueStore) -> Vec<HistoryEntry> {
    let raw = match store.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read interview history: {}", e);
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!("Interview history is malformed, starting fresh: {}", e);
        Vec::new()
    })
}

pub fn append_history(store: &dyn KeyValueStore, entry: HistoryEntry) -> Result<usize, PrepError> {
    let mut history = read_history(store);
    history.push(entry);
    if history.len() > MAX_ENTRIES {
        let excess = history.len() - MAX_ENTRIES;
        history.drain(..excess);
    }
    store.set(HISTORY_KEY, &serde_json::to_string(&history)?)?;
    Ok(history.len())
}

/// Entries whose title or role contains `query`, ignoring case. A blank
/// query matches everything.
pub fn filter_history<'a>(history: &'a [HistoryEntry], query: &str) -> Vec<&'a HistoryEntry> {
    let query = query.trim().to_lowercase();
    history
        .iter()
        .filter(|e| {
            query.is_empty()
                || [e.title.as_deref(), e.role.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn dashboard_stats(history: &[HistoryEntry]) -> DashboardStats {
    let scored: Vec<u32> = history
        .iter()
        .filter(|e| !e.answers.is_empty())
        .map(|e| e.score)
        .collect();
    DashboardStats {
        total_interviews: history.len(),
        average_score: progress::mean_score(scored.iter().copied()),
        best_score: scored.iter().copied().max().unwrap_or(0),
    }
}
