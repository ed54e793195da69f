// tests/session_flow_test.rs — Integration test: full session through the controller

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockprep::catalog::builtin_questions;
use mockprep::core::controller::SessionController;
use mockprep::core::recording::SimulatedCapture;
use mockprep::core::session::{Advance, TickOutcome};
use mockprep::core::types::{Evaluation, InterviewProfile, Phase, ProgressEvent, Question};
use mockprep::evaluator::{Evaluator, SimulatedEvaluator};
use mockprep::infra::config::SessionConfig;
use mockprep::infra::errors::{DeviceError, PrepError};
use mockprep::memory::bridge;
use mockprep::memory::history;
use mockprep::memory::store::{MemoryStore, SqliteStore};
use mockprep::memory::{shared, SharedStore};

fn session_config(time_limit_secs: u32) -> SessionConfig {
    SessionConfig {
        time_limit_secs,
        tick_interval_ms: 1000,
        allow_skip: true,
        restart_delay_ms: 500,
    }
}

fn two_questions() -> Vec<Question> {
    builtin_questions().into_iter().take(2).collect()
}

fn profile() -> InterviewProfile {
    InterviewProfile::new("Integration", "Fullstack engineer")
}

/// Fails the first `failures` calls, then scores everything `score`.
struct FlakyEvaluator {
    failures: Mutex<u32>,
    score: u32,
}

#[async_trait]
impl Evaluator for FlakyEvaluator {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn evaluate(&self, question: &Question, _answer: &str) -> Result<Evaluation, PrepError> {
        let mut left = self.failures.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(PrepError::EvaluationFailed {
                message: "scoring service unavailable".into(),
            });
        }
        Ok(Evaluation {
            score: self.score,
            feedback: "ok".into(),
            strengths: vec![],
            improvements: vec![],
            key_points_covered: question.key_points.clone(),
            missing_points: vec![],
        })
    }
}

/// Answer both questions (one by stop, one by expiry) and check what lands in the store.
#[tokio::test(start_paused = true)]
async fn test_two_question_session_persists_rounded_mean() {
    let store: SharedStore = shared(MemoryStore::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut controller = SessionController::new(
        two_questions(),
        &session_config(5),
        Arc::new(SimulatedCapture::new()),
        Arc::new(SimulatedEvaluator::instant(42)),
        store.clone(),
    )
    .unwrap()
    .with_progress(move |e| sink.lock().unwrap().push(e));
    let mut ticks = controller.take_ticks().unwrap();

    controller.begin(profile()).unwrap();

    // Question 1: stop manually.
    controller.append_draft("Hooks let function components hold state.").unwrap();
    controller.start_recording().await.unwrap();
    let event = ticks.recv().await.unwrap();
    assert_eq!(controller.on_tick(event).await.unwrap(), TickOutcome::Running(4));
    let s1 = controller.stop_recording().await.unwrap();
    assert_eq!(controller.state().percent_complete(), 50);

    assert_eq!(controller.next().unwrap(), Advance::Moved(1));
    assert_eq!(controller.state().time_remaining(), 5);

    // Question 2: let the clock run out.
    controller.append_draft("A hard bug I fixed...").unwrap();
    controller.start_recording().await.unwrap();
    while controller.phase() == Phase::Recording {
        let event = ticks.recv().await.unwrap();
        controller.on_tick(event).await.unwrap();
    }
    assert_eq!(controller.phase(), Phase::Answered);
    let s2 = controller.state().current_answer().unwrap().evaluation.score;
    assert_eq!(controller.state().percent_complete(), 100);

    assert_eq!(controller.next().unwrap(), Advance::Completed);
    controller.shutdown();

    let expected = ((s1 + s2) as f64 / 2.0).round() as u32;
    let guard = store.lock().unwrap();
    let saved = bridge::load_session(&*guard).unwrap();
    assert_eq!(saved.overall_score, expected);
    assert_eq!(saved.questions.len(), 2);
    assert_eq!(saved.answers.len(), 2);
    assert_eq!(
        saved.answers[&0].answer_text,
        "Hooks let function components hold state."
    );
    assert_eq!(history::read_history(&*guard).len(), 1);

    let events = events.lock().unwrap();
    assert!(events.contains(&ProgressEvent::Evaluating {
        index: 1,
        expired: true
    }));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::Completed { answered: 2, total: 2, .. })
    ));
}

/// Toggling a device mid-recording resets the clock and keeps recording.
#[tokio::test(start_paused = true)]
async fn test_device_toggle_resets_timer_and_keeps_recording() {
    let capture = Arc::new(SimulatedCapture::new());
    let mut controller = SessionController::new(
        two_questions(),
        &session_config(30),
        capture.clone(),
        Arc::new(SimulatedEvaluator::instant(1)),
        shared(MemoryStore::new()),
    )
    .unwrap();
    let mut ticks = controller.take_ticks().unwrap();
    controller.begin(profile()).unwrap();
    controller.start_recording().await.unwrap();

    for _ in 0..12 {
        let event = ticks.recv().await.unwrap();
        controller.on_tick(event).await.unwrap();
    }
    assert_eq!(controller.state().time_remaining(), 18);

    controller.toggle_audio().await.unwrap();
    assert_eq!(controller.state().time_remaining(), 30);
    assert!(controller.state().is_recording());
    assert!(!controller.state().devices().audio);

    // The new timer keeps counting from the full limit.
    loop {
        let event = ticks.recv().await.unwrap();
        if let TickOutcome::Running(left) = controller.on_tick(event).await.unwrap() {
            assert_eq!(left, 29);
            break;
        }
    }
    assert_eq!(capture.requests(), 2);
}

#[tokio::test]
async fn test_permission_denied_keeps_question_answerable() {
    let mut controller = SessionController::new(
        two_questions(),
        &session_config(60),
        Arc::new(SimulatedCapture::failing(DeviceError::NotFound)),
        Arc::new(SimulatedEvaluator::instant(1)),
        shared(MemoryStore::new()),
    )
    .unwrap();
    controller.begin(profile()).unwrap();

    let err = controller.start_recording().await.unwrap_err();
    assert!(matches!(err, PrepError::Device(DeviceError::NotFound)));
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(
        controller.last_error(),
        Some(DeviceError::NotFound.user_message())
    );
    // Navigation still works after a device failure.
    assert_eq!(controller.next().unwrap(), Advance::Moved(1));
}

#[tokio::test]
async fn test_failed_evaluation_can_be_retried() {
    let mut controller = SessionController::new(
        two_questions(),
        &session_config(60),
        Arc::new(SimulatedCapture::new()),
        Arc::new(FlakyEvaluator {
            failures: Mutex::new(1),
            score: 84,
        }),
        shared(MemoryStore::new()),
    )
    .unwrap();
    controller.begin(profile()).unwrap();
    controller.append_draft("draft survives").unwrap();
    controller.start_recording().await.unwrap();

    let err = controller.stop_recording().await.unwrap_err();
    assert!(err.is_retriable());
    assert_eq!(controller.phase(), Phase::Evaluating);
    assert!(controller.state().evaluation_failed());
    assert!(controller.next().is_err());

    assert_eq!(controller.retry_evaluation().await.unwrap(), 84);
    assert_eq!(controller.phase(), Phase::Answered);
    assert_eq!(
        controller.state().current_answer().unwrap().answer_text,
        "draft survives"
    );
}

#[tokio::test]
async fn test_discarded_attempt_returns_to_idle() {
    let mut controller = SessionController::new(
        two_questions(),
        &session_config(60),
        Arc::new(SimulatedCapture::new()),
        Arc::new(FlakyEvaluator {
            failures: Mutex::new(5),
            score: 0,
        }),
        shared(MemoryStore::new()),
    )
    .unwrap();
    controller.begin(profile()).unwrap();
    controller.start_recording().await.unwrap();
    assert!(controller.stop_recording().await.is_err());

    controller.discard_attempt().unwrap();
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(controller.last_error().is_none());
    assert!(controller.state().answers().is_empty());
}

#[tokio::test]
async fn test_completed_session_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("mockprep.db");
    {
        let store = shared(SqliteStore::open(&path).unwrap());
        let mut controller = SessionController::new(
            builtin_questions().into_iter().take(1).collect(),
            &session_config(60),
            Arc::new(SimulatedCapture::new()),
            Arc::new(SimulatedEvaluator::instant(9)),
            store,
        )
        .unwrap();
        controller.begin(profile()).unwrap();
        controller.start_recording().await.unwrap();
        controller.stop_recording().await.unwrap();
        controller.next().unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let saved = bridge::load_session(&store).unwrap();
    assert_eq!(saved.answers.len(), 1);
    assert_eq!(bridge::load_profile(&store).unwrap().title, "Integration");
}
