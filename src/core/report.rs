// src/core/report.rs — Results report built from a saved session

use std::path::Path;

use serde::Serialize;

use super::progress::{self, ScoreBand};
use super::types::{AnswerMap, Category, Difficulty, Question};
use crate::infra::errors::PrepError;
use crate::memory::bridge::{self, PersistedSession};
use crate::memory::store::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub index: usize,
    pub prompt: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// `None` when the question was skipped.
    pub score: Option<u32>,
    pub answer: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFeedback {
    pub category: String,
    pub score: u32,
    pub feedback: String,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Article,
    Course,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    pub kind: ResourceKind,
}

/// Everything the results view shows. `Default` is the empty state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    pub questions: Vec<Question>,
    pub answers: AnswerMap,
    pub overall_score: u32,
    pub rows: Vec<QuestionRow>,
    pub feedback: Vec<CategoryFeedback>,
    pub resources: Vec<LearningResource>,
}

impl ResultsReport {
    pub fn from_session(session: &PersistedSession) -> Self {
        let rows = session
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let record = session.answers.get(&index);
                QuestionRow {
                    index,
                    prompt: q.prompt.clone(),
                    category: q.category,
                    difficulty: q.difficulty,
                    score: record.map(|r| r.evaluation.score),
                    answer: record.map(|r| r.answer_text.clone()),
                    feedback: record.map(|r| r.evaluation.feedback.clone()),
                }
            })
            .collect();

        let feedback = if session.answers.is_empty() {
            Vec::new()
        } else {
            category_feedback(&session.answers)
        };

        Self {
            questions: session.questions.clone(),
            answers: session.answers.clone(),
            overall_score: session.overall_score,
            rows,
            feedback,
            resources: learning_resources(),
        }
    }

    /// Load the saved session; nothing saved gives the empty report.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, PrepError> {
        match bridge::load_session(store) {
            Ok(session) => Ok(Self::from_session(&session)),
            Err(PrepError::PersistenceNotFound) => {
                tracing::info!("No saved session, showing empty results");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn share_text(&self) -> String {
        format!(
            "I just completed a mock interview and scored {}%!",
            self.overall_score
        )
    }

    /// Pretty JSON with the saved questions, answers, overall score and
    /// category feedback.
    pub fn to_export_json(&self) -> Result<String, PrepError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Export<'a> {
            questions: &'a [Question],
            answers: &'a AnswerMap,
            overall_score: u32,
            feedback: &'a [CategoryFeedback],
        }
        let export = Export {
            questions: &self.questions,
            answers: &self.answers,
            overall_score: self.overall_score,
            feedback: &self.feedback,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), PrepError> {
        std::fs::write(path, self.to_export_json()?)?;
        tracing::info!("Exported results to {}", path.display());
        Ok(())
    }
}

fn category_feedback(answers: &AnswerMap) -> Vec<CategoryFeedback> {
    let score = progress::overall_score(answers);

    // First two improvements across answers, in answer order, de-duplicated.
    let mut technical: Vec<String> = Vec::new();
    for item in answers
        .values()
        .flat_map(|r| r.evaluation.improvements.iter())
        .take(2)
    {
        if !technical.contains(item) {
            technical.push(item.clone());
        }
    }

    vec![
        CategoryFeedback {
            category: "Technical Knowledge".into(),
            score,
            feedback: "Overall technical understanding demonstrated".into(),
            improvements: technical,
        },
        CategoryFeedback {
            category: "Communication".into(),
            score,
            feedback: "Clear and structured responses provided".into(),
            improvements: vec![
                "Use more specific examples".into(),
                "Reduce filler words".into(),
            ],
        },
        CategoryFeedback {
            category: "Problem Solving".into(),
            score,
            feedback: "Good approach to problem-solving demonstrated".into(),
            improvements: vec![
                "Explain thought process more clearly".into(),
                "Consider edge cases".into(),
            ],
        },
    ]
}

fn learning_resources() -> Vec<LearningResource> {
    vec![
        LearningResource {
            title: "System Design Interview Guide".into(),
            url: "https://example.com/guide".into(),
            kind: ResourceKind::Article,
        },
        LearningResource {
            title: "Data Structures Fundamentals".into(),
            url: "https://example.com/ds".into(),
            kind: ResourceKind::Course,
        },
    ]
}
