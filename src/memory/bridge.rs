// src/memory/bridge.rs — Session artifact persistence
//
// Three entries under stable keys, written together when a session completes
// and read back by the results view.

use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;
use crate::core::progress;
use crate::core::types::{AnswerMap, InterviewProfile, Question};
use crate::infra::errors::PrepError;

pub const QUESTIONS_KEY: &str = "interviewQuestions";
pub const ANSWERS_KEY: &str = "interviewAnswers";
pub const OVERALL_SCORE_KEY: &str = "overallScore";
pub const PROFILE_KEY: &str = "interviewData";

/// Durable snapshot of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub questions: Vec<Question>,
    pub answers: AnswerMap,
    pub overall_score: u32,
}

pub fn save_session(
    store: &dyn KeyValueStore,
    questions: &[Question],
    answers: &AnswerMap,
    overall_score: u32,
) -> Result<(), PrepError> {
    let questions_json = serde_json::to_string(questions)?;
    let answers_json = serde_json::to_string(answers)?;
    let score = overall_score.to_string();
    store.set_many(&[
        (QUESTIONS_KEY, questions_json.as_str()),
        (ANSWERS_KEY, answers_json.as_str()),
        (OVERALL_SCORE_KEY, score.as_str()),
    ])?;
    tracing::info!(
        "Saved session: {} question(s), {} answer(s), overall {}",
        questions.len(),
        answers.len(),
        overall_score
    );
    Ok(())
}

/// Missing or unreadable questions/answers mean there is nothing to show.
/// The score entry is only a cache; it is recomputed when absent or garbled.
pub fn load_session(store: &dyn KeyValueStore) -> Result<PersistedSession, PrepError> {
    let questions: Vec<Question> = read_json(store, QUESTIONS_KEY)?;
    let answers: AnswerMap = read_json(store, ANSWERS_KEY)?;

    let overall_score = match store.get(OVERALL_SCORE_KEY)? {
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(score) => score,
            Err(_) => {
                tracing::warn!("Ignoring malformed {} entry: {:?}", OVERALL_SCORE_KEY, raw);
                progress::overall_score(&answers)
            }
        },
        None => progress::overall_score(&answers),
    };

    Ok(PersistedSession {
        questions,
        answers,
        overall_score,
    })
}

pub fn save_profile(
    store: &dyn KeyValueStore,
    profile: &InterviewProfile,
) -> Result<(), PrepError> {
    store.set(PROFILE_KEY, &serde_json::to_string(profile)?)
}

pub fn load_profile(store: &dyn KeyValueStore) -> Result<InterviewProfile, PrepError> {
    read_json(store, PROFILE_KEY)
}

fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<T, PrepError> {
    let raw = store.get(key)?.ok_or(PrepError::PersistenceNotFound)?;
    serde_json::from_str(&raw).map_err(|e| {
        tracing::warn!("Stored {} is malformed: {}", key, e);
        PrepError::PersistenceNotFound
    })
}
