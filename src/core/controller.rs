// src/core/controller.rs — Drives one interview session
//
// Owns the state machine plus everything with side effects: device capture,
// the countdown task, the evaluator and the store. All mutation goes through
// `&mut self`, so the caller's single loop serializes ticks and commands.

use std::sync::{Arc, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;

use super::auth::{AllowAll, Authorizer};
use super::recording::{CaptureBackend, Recorder};
use super::session::{Advance, SessionState, TickOutcome};
use super::timer::{RecordingTimer, TimerEvent};
use super::types::{DeviceConstraints, InterviewProfile, Phase, ProgressEvent, Question};
use crate::evaluator::{self, Evaluator};
use crate::infra::config::SessionConfig;
use crate::infra::errors::{DeviceError, PrepError};
use crate::memory::bridge::{self, PersistedSession};
use crate::memory::history::{self, HistoryEntry};
use crate::memory::store::KeyValueStore;
use crate::memory::SharedStore;

pub struct SessionController {
    state: SessionState,
    profile: Option<InterviewProfile>,
    tick_interval: Duration,
    restart_delay: Duration,
    recorder: Recorder,
    timer: Option<RecordingTimer>,
    generation: u64,
    tick_tx: mpsc::UnboundedSender<TimerEvent>,
    tick_rx: Option<mpsc::UnboundedReceiver<TimerEvent>>,
    evaluator: Arc<dyn Evaluator>,
    authorizer: Arc<dyn Authorizer>,
    store: SharedStore,
    /// User-facing text for the most recent recoverable failure.
    last_error: Option<String>,
    on_progress: Option<Box<dyn Fn(ProgressEvent) + Send>>,
}

impl SessionController {
    pub fn new(
        questions: Vec<Question>,
        config: &SessionConfig,
        capture: Arc<dyn CaptureBackend>,
        evaluator: Arc<dyn Evaluator>,
        store: SharedStore,
    ) -> Result<Self, PrepError> {
        let state = SessionState::new(questions, config.time_limit_secs)?
            .with_allow_skip(config.allow_skip);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Ok(Self {
            state,
            profile: None,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            restart_delay: Duration::from_millis(config.restart_delay_ms),
            recorder: Recorder::new(capture),
            timer: None,
            generation: 0,
            tick_tx,
            tick_rx: Some(tick_rx),
            evaluator,
            authorizer: Arc::new(AllowAll),
            store,
            last_error: None,
            on_progress: None,
        })
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Initial camera / microphone switches.
    pub fn with_devices(mut self, devices: DeviceConstraints) -> Self {
        self.state = self.state.with_devices(devices);
        self
    }

    /// Set a callback for progress events at lifecycle transitions.
    pub fn with_progress(mut self, cb: impl Fn(ProgressEvent) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(cb));
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    // -- Accessors --

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn profile(&self) -> Option<&InterviewProfile> {
        self.profile.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn evaluator_name(&self) -> &str {
        self.evaluator.name()
    }

    pub fn is_capturing(&self) -> bool {
        self.recorder.is_capturing()
    }

    /// Chunks collected by the capture in progress.
    pub fn captured_chunks(&self) -> usize {
        self.recorder.active().map_or(0, |a| a.chunk_count())
    }

    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| t.is_running())
    }

    /// Hand the tick stream to the caller's event loop. Returns `None` after
    /// the first call.
    pub fn take_ticks(&mut self) -> Option<mpsc::UnboundedReceiver<TimerEvent>> {
        self.tick_rx.take()
    }

    // -- Operations --

    /// Authorize and record the profile. Must precede any recording.
    pub fn begin(&mut self, mut profile: InterviewProfile) -> Result<(), PrepError> {
        if !self.authorizer.is_authorized() {
            return Err(PrepError::Unauthorized);
        }
        profile.validate().map_err(PrepError::Config)?;
        if profile.user_id.is_none() {
            profile.user_id = self.authorizer.user_id();
        }
        {
            let store = self.lock_store()?;
            bridge::save_profile(&*store, &profile)?;
        }
        tracing::info!(
            "Interview '{}' for {} begins with {} question(s)",
            profile.title,
            profile.job_role,
            self.state.question_count()
        );
        tracing::debug!(
            "Capture backend: {}, evaluator: {}",
            self.recorder.backend_name(),
            self.evaluator.name()
        );
        self.profile = Some(profile);
        self.emit(ProgressEvent::QuestionShown {
            index: self.state.current_index(),
            total: self.state.question_count(),
        });
        Ok(())
    }

    /// Acquire devices, then `Idle -> Recording`. A device failure leaves the
    /// session idle with `last_error` set.
    pub async fn start_recording(&mut self) -> Result<(), PrepError> {
        if self.profile.is_none() {
            return Err(PrepError::invalid("start recording", "the session has not begun"));
        }
        self.state.ensure_can_start()?;

        let handle = match self.recorder.acquire(self.state.devices()).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.device_failure(e)),
        };
        self.state.begin_recording()?;
        self.last_error = None;
        self.recorder.start(handle);
        self.start_timer();
        self.emit(ProgressEvent::RecordingStarted {
            index: self.state.current_index(),
            time_limit: self.state.time_limit(),
        });
        Ok(())
    }

    /// Apply a tick from the timer. Ticks from a cancelled timer are dropped.
    /// On expiry the answer goes straight to the evaluator.
    pub async fn on_tick(&mut self, event: TimerEvent) -> Result<TickOutcome, PrepError> {
        let TimerEvent::Tick { generation } = event;
        let live = self.timer.as_ref().map(|t| t.generation());
        if live != Some(generation) {
            tracing::trace!("Dropping stale tick from timer {}", generation);
            return Ok(TickOutcome::Ignored);
        }

        let outcome = self.state.tick();
        match outcome {
            TickOutcome::Running(time_remaining) => {
                self.recorder.record_chunk();
                self.emit(ProgressEvent::Tick { time_remaining });
            }
            TickOutcome::Expired => {
                tracing::info!("Time expired on question {}", self.state.current_index() + 1);
                self.end_capture();
                self.emit(ProgressEvent::Evaluating {
                    index: self.state.current_index(),
                    expired: true,
                });
                // Failure is recorded on the state and in `last_error`.
                let _ = self.evaluate().await;
            }
            TickOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// `Recording -> Evaluating`, then run the evaluator. Returns the score.
    pub async fn stop_recording(&mut self) -> Result<u32, PrepError> {
        self.state.stop_recording()?;
        self.end_capture();
        self.emit(ProgressEvent::Evaluating {
            index: self.state.current_index(),
            expired: false,
        });
        self.evaluate().await
    }

    pub async fn retry_evaluation(&mut self) -> Result<u32, PrepError> {
        if !self.state.evaluation_failed() {
            return Err(PrepError::invalid(
                "retry the evaluation",
                "no evaluation has failed",
            ));
        }
        self.evaluate().await
    }

    pub fn discard_attempt(&mut self) -> Result<(), PrepError> {
        self.state.discard_attempt()?;
        self.last_error = None;
        Ok(())
    }

    pub async fn toggle_video(&mut self) -> Result<bool, PrepError> {
        let restart = self.state.toggle_video();
        tracing::info!("Camera {}", on_off(self.state.devices().video));
        if restart {
            self.restart_capture().await?;
        }
        Ok(self.state.devices().video)
    }

    pub async fn toggle_audio(&mut self) -> Result<bool, PrepError> {
        let restart = self.state.toggle_audio();
        tracing::info!("Microphone {}", on_off(self.state.devices().audio));
        if restart {
            self.restart_capture().await?;
        }
        Ok(self.state.devices().audio)
    }

    /// Advance. On the last question this saves the session and only then
    /// completes it; a failed save leaves the session where it was so `next`
    /// can be tried again.
    pub fn next(&mut self) -> Result<Advance, PrepError> {
        let advance = self.state.next()?;
        self.cancel_timer();
        match advance {
            Advance::Moved(index) => self.emit(ProgressEvent::QuestionShown {
                index,
                total: self.state.question_count(),
            }),
            Advance::Completed => self.finish()?,
        }
        Ok(advance)
    }

    pub fn previous(&mut self) -> Result<usize, PrepError> {
        let index = self.state.previous()?;
        self.cancel_timer();
        self.emit(ProgressEvent::QuestionShown {
            index,
            total: self.state.question_count(),
        });
        Ok(index)
    }

    pub fn reset_answer(&mut self) -> Result<(), PrepError> {
        let old = self.state.reset_answer()?;
        tracing::info!(
            "Cleared answer to question {} (was {})",
            self.state.current_index() + 1,
            old.evaluation.score
        );
        Ok(())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), PrepError> {
        self.state.set_draft(text)
    }

    pub fn append_draft(&mut self, line: &str) -> Result<(), PrepError> {
        self.state.append_draft(line)
    }

    /// Cancel the countdown and release devices.
    pub fn shutdown(&mut self) {
        self.cancel_timer();
        self.end_capture();
        tracing::debug!("Session controller shut down");
    }

    // -- Internals --

    async fn evaluate(&mut self) -> Result<u32, PrepError> {
        let index = self.state.current_index();
        let question = self.state.current_question().clone();
        let answer = self.state.draft().to_string();

        let result = self
            .evaluator
            .evaluate(&question, &answer)
            .await
            .and_then(|eval| evaluator::validate(&question, &eval).map(|_| eval));

        match result {
            Ok(evaluation) => {
                let score = self.state.attach_evaluation(evaluation)?.evaluation.score;
                self.last_error = None;
                self.emit(ProgressEvent::Answered {
                    index,
                    score,
                    overall: self.state.overall_score(),
                    percent_complete: self.state.percent_complete(),
                });
                Ok(score)
            }
            Err(e) => {
                tracing::warn!("Evaluation of question {} failed: {}", index + 1, e);
                self.state.mark_evaluation_failed()?;
                let message = e.to_string();
                self.last_error = Some(format!("{message}. Retry or discard the attempt."));
                self.emit(ProgressEvent::EvaluationFailed { index, message });
                Err(e)
            }
        }
    }

    /// Stop capture, wait briefly, re-acquire with the new constraints and
    /// start the countdown over.
    async fn restart_capture(&mut self) -> Result<(), PrepError> {
        self.cancel_timer();
        self.recorder.stop();
        if !self.restart_delay.is_zero() {
            tokio::time::sleep(self.restart_delay).await;
        }

        match self.recorder.acquire(self.state.devices()).await {
            Ok(handle) => {
                self.state.restart_recording()?;
                self.recorder.start(handle);
                self.start_timer();
                self.emit(ProgressEvent::RecordingRestarted {
                    index: self.state.current_index(),
                    constraints: self.state.devices(),
                });
                Ok(())
            }
            Err(e) => {
                self.state.abort_recording()?;
                Err(self.device_failure(e))
            }
        }
    }

    fn device_failure(&mut self, error: DeviceError) -> PrepError {
        tracing::warn!("Device acquisition failed: {}", error);
        let message = error.user_message().to_string();
        self.last_error = Some(message.clone());
        self.emit(ProgressEvent::DeviceError { message });
        PrepError::Device(error)
    }

    fn start_timer(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        self.timer = Some(RecordingTimer::start(
            self.tick_interval,
            self.generation,
            self.tick_tx.clone(),
        ));
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn end_capture(&mut self) {
        self.cancel_timer();
        if self.recorder.is_capturing() {
            let chunks = self.recorder.stop();
            tracing::debug!("Discarding {} captured chunk(s)", chunks.len());
        }
    }

    fn finish(&mut self) -> Result<(), PrepError> {
        self.end_capture();
        let session = PersistedSession {
            questions: self.state.questions().to_vec(),
            answers: self.state.answers().clone(),
            overall_score: self.state.overall_score(),
        };
        {
            let store = self.lock_store()?;
            bridge::save_session(
                &*store,
                &session.questions,
                &session.answers,
                session.overall_score,
            )?;
            let entry = HistoryEntry::from_session(&session, self.profile.as_ref());
            history::append_history(&*store, entry)?;
        }
        self.state.complete()?;
        self.emit(ProgressEvent::Completed {
            answered: session.answers.len(),
            total: session.questions.len(),
            overall_score: session.overall_score,
        });
        Ok(())
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, dyn KeyValueStore + 'static>, PrepError> {
        self.store
            .lock()
            .map_err(|_| PrepError::Other(anyhow::anyhow!("session store lock poisoned")))
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
