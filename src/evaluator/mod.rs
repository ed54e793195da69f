// src/evaluator/mod.rs — Answer evaluation framework

pub mod feedback;
pub mod simulated;

use async_trait::async_trait;

use crate::core::types::{Evaluation, Question};
use crate::infra::errors::PrepError;

pub use simulated::SimulatedEvaluator;

/// Scores a submitted answer. The session engine only sees this trait, so a
/// remote scoring service can replace the simulator without touching it.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &str;

    async fn evaluate(&self, question: &Question, answer: &str) -> Result<Evaluation, PrepError>;
}

/// Check an evaluator's output before it is attached to a session.
pub fn validate(question: &Question, evaluation: &Evaluation) -> Result<(), PrepError> {
    if evaluation.score > 100 {
        return Err(PrepError::EvaluationFailed {
            message: format!("score {} is outside 0-100", evaluation.score),
        });
    }
    if !evaluation.partitions(&question.key_points) {
        return Err(PrepError::EvaluationFailed {
            message: "covered and missing key points do not partition the question's key points"
                .into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_questions;

    #[test]
    fn test_validate_rejects_bad_partition() {
        let q = &builtin_questions()[0];
        let eval = Evaluation {
            score: 80,
            feedback: String::new(),
            strengths: vec![],
            improvements: vec![],
            key_points_covered: vec!["useState".into()],
            missing_points: vec![],
        };
        assert!(matches!(
            validate(q, &eval),
            Err(PrepError::EvaluationFailed { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_score() {
        let q = &builtin_questions()[0];
        let eval = Evaluation {
            score: 101,
            feedback: String::new(),
            strengths: vec![],
            improvements: vec![],
            key_points_covered: q.key_points.clone(),
            missing_points: vec![],
        };
        assert!(validate(q, &eval).is_err());
    }
}
