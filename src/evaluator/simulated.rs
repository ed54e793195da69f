// src/evaluator/simulated.rs — Randomised stand-in for a real scoring service
//
// Scores are drawn at random and feedback is canned. Nothing here reads the
// answer text; it exists so the session flow can run end to end.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{feedback, Evaluator};
use crate::core::types::{Evaluation, Question};
use crate::infra::config::EvaluatorConfig;
use crate::infra::errors::PrepError;

pub struct SimulatedEvaluator {
    latency: Duration,
    min_score: u32,
    max_score: u32,
    coverage_probability: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedEvaluator {
    pub fn from_config(config: &EvaluatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            latency: Duration::from_millis(config.latency_ms),
            min_score: config.min_score,
            max_score: config.max_score.max(config.min_score),
            coverage_probability: config.coverage_probability.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    /// Zero latency, fixed seed. Handy in tests.
    pub fn instant(seed: u64) -> Self {
        Self::from_config(&EvaluatorConfig {
            latency_ms: 0,
            seed: Some(seed),
            ..EvaluatorConfig::default()
        })
    }

    /// Draw a score and split the key points into covered / missing,
    /// preserving their catalog order.
    fn draw(&self, key_points: &[String]) -> (u32, Vec<String>, Vec<String>) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let score = rng.gen_range(self.min_score..=self.max_score);

        let mut covered = Vec::new();
        let mut missing = Vec::new();
        for point in key_points {
            if rng.gen_bool(self.coverage_probability) {
                covered.push(point.clone());
            } else {
                missing.push(point.clone());
            }
        }
        (score, covered, missing)
    }
}

#[async_trait]
impl Evaluator for SimulatedEvaluator {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn evaluate(&self, question: &Question, answer: &str) -> Result<Evaluation, PrepError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let (score, covered, missing) = self.draw(&question.key_points);
        tracing::debug!(
            "Simulated evaluation: score={} covered={}/{} answer_chars={}",
            score,
            covered.len(),
            question.key_points.len(),
            answer.chars().count()
        );

        Ok(Evaluation {
            score,
            feedback: feedback::FEEDBACK.to_string(),
            strengths: feedback::strengths(),
            improvements: feedback::improvements(),
            key_points_covered: covered,
            missing_points: missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_questions;

    #[tokio::test]
    async fn test_scores_within_range_and_partition_holds() {
        let evaluator = SimulatedEvaluator::instant(7);
        for q in builtin_questions() {
            for _ in 0..50 {
                let eval = evaluator.evaluate(&q, "answer").await.unwrap();
                assert!((70..=99).contains(&eval.score), "score {}", eval.score);
                assert!(eval.partitions(&q.key_points));
            }
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_results() {
        let q = &builtin_questions()[0];
        let a = SimulatedEvaluator::instant(42).evaluate(q, "x").await.unwrap();
        let b = SimulatedEvaluator::instant(42).evaluate(q, "y").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_feedback_is_canned() {
        let q = &builtin_questions()[1];
        let eval = SimulatedEvaluator::instant(1).evaluate(q, "").await.unwrap();
        assert_eq!(eval.feedback, feedback::FEEDBACK);
        assert_eq!(eval.strengths.len(), 3);
        assert_eq!(eval.improvements[0], "Provide more specific examples");
    }

    #[tokio::test]
    async fn test_coverage_extremes() {
        let q = &builtin_questions()[2];
        let all = SimulatedEvaluator::from_config(&EvaluatorConfig {
            latency_ms: 0,
            coverage_probability: 1.0,
            seed: Some(3),
            ..EvaluatorConfig::default()
        });
        let eval = all.evaluate(q, "").await.unwrap();
        assert_eq!(eval.key_points_covered, q.key_points);
        assert!(eval.missing_points.is_empty());

        let none = SimulatedEvaluator::from_config(&EvaluatorConfig {
            latency_ms: 0,
            coverage_probability: 0.0,
            seed: Some(3),
            ..EvaluatorConfig::default()
        });
        let eval = none.evaluate(q, "").await.unwrap();
        assert!(eval.key_points_covered.is_empty());
        assert_eq!(eval.missing_points, q.key_points);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let evaluator = SimulatedEvaluator::from_config(&EvaluatorConfig {
            seed: Some(9),
            ..EvaluatorConfig::default()
        });
        let start = tokio::time::Instant::now();
        evaluator
            .evaluate(&builtin_questions()[0], "")
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
