// src/core/session.rs — Interview session state machine
//
// Pure, synchronous state. Device capture, timers and the evaluator live in
// the controller; this type only decides which transitions are legal and
// applies them. A rejected transition leaves every field untouched.

use super::progress;
use super::types::{
    AnswerMap, AnswerRecord, DeviceConstraints, Evaluation, Phase, Question,
};
use crate::infra::errors::PrepError;

/// Result of a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still recording, this many seconds left.
    Running(u32),
    /// Countdown hit zero; the session is now evaluating.
    Expired,
    /// Not recording; the tick was dropped.
    Ignored,
}

/// Result of moving forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Completed,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    questions: Vec<Question>,
    current_index: usize,
    time_limit: u32,
    time_remaining: u32,
    is_recording: bool,
    evaluating: bool,
    /// Last evaluation attempt for the current question failed.
    evaluation_failed: bool,
    completed: bool,
    allow_skip: bool,
    answers: AnswerMap,
    draft: String,
    devices: DeviceConstraints,
}

impl SessionState {
    pub fn new(questions: Vec<Question>, time_limit: u32) -> Result<Self, PrepError> {
        if questions.is_empty() {
            return Err(PrepError::Catalog(
                "a session needs at least one question".into(),
            ));
        }
        Ok(Self {
            questions,
            current_index: 0,
            time_limit,
            time_remaining: time_limit,
            is_recording: false,
            evaluating: false,
            evaluation_failed: false,
            completed: false,
            allow_skip: true,
            answers: AnswerMap::new(),
            draft: String::new(),
            devices: DeviceConstraints::default(),
        })
    }

    pub fn with_allow_skip(mut self, allow_skip: bool) -> Self {
        self.allow_skip = allow_skip;
        self
    }

    pub fn with_devices(mut self, devices: DeviceConstraints) -> Self {
        self.devices = devices;
        self
    }

    // -- Queries --

    pub fn phase(&self) -> Phase {
        if self.completed {
            Phase::Completed
        } else if self.is_recording {
            Phase::Recording
        } else if self.evaluating {
            Phase::Evaluating
        } else if self.answers.contains_key(&self.current_index) {
            Phase::Answered
        } else {
            Phase::Idle
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn is_evaluating(&self) -> bool {
        self.evaluating
    }

    pub fn evaluation_failed(&self) -> bool {
        self.evaluation_failed
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        self.answers.get(&self.current_index)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn devices(&self) -> DeviceConstraints {
        self.devices
    }

    /// Live aggregate, same formula as the persisted one.
    pub fn overall_score(&self) -> u32 {
        progress::overall_score(&self.answers)
    }

    pub fn percent_complete(&self) -> u32 {
        progress::percent_complete(self.answers.len(), self.questions.len())
    }

    // -- Transitions --

    /// Check `Idle --start--> Recording` without applying it, so the caller
    /// can acquire devices first.
    pub fn ensure_can_start(&self) -> Result<(), PrepError> {
        match self.phase() {
            Phase::Idle => Ok(()),
            Phase::Answered => Err(PrepError::invalid(
                "start recording",
                "the question is already answered (reset it first)",
            )),
            other => Err(PrepError::invalid("start recording", other)),
        }
    }

    pub fn begin_recording(&mut self) -> Result<(), PrepError> {
        self.ensure_can_start()?;
        self.is_recording = true;
        self.evaluation_failed = false;
        self.time_remaining = self.time_limit;
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_recording {
            return TickOutcome::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.is_recording = false;
            self.evaluating = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.time_remaining)
        }
    }

    pub fn stop_recording(&mut self) -> Result<(), PrepError> {
        if !self.is_recording {
            return Err(PrepError::invalid("stop recording", self.phase()));
        }
        self.is_recording = false;
        self.evaluating = true;
        Ok(())
    }

    /// Device toggle while recording: capture restarts and the countdown
    /// starts over from the full limit.
    pub fn restart_recording(&mut self) -> Result<(), PrepError> {
        if !self.is_recording {
            return Err(PrepError::invalid("restart recording", self.phase()));
        }
        self.time_remaining = self.time_limit;
        Ok(())
    }

    /// Capture could not be restarted: back to `Idle` without evaluating.
    pub fn abort_recording(&mut self) -> Result<(), PrepError> {
        if !self.is_recording {
            return Err(PrepError::invalid("abort recording", self.phase()));
        }
        self.is_recording = false;
        self.time_remaining = self.time_limit;
        Ok(())
    }

    /// Flip the camera; returns whether capture must be restarted.
    pub fn toggle_video(&mut self) -> bool {
        self.devices.video = !self.devices.video;
        self.is_recording
    }

    /// Flip the microphone; returns whether capture must be restarted.
    pub fn toggle_audio(&mut self) -> bool {
        self.devices.audio = !self.devices.audio;
        self.is_recording
    }

    /// `Evaluating --done--> Answered`. A re-answer after reset replaces the
    /// whole record.
    pub fn attach_evaluation(
        &mut self,
        evaluation: Evaluation,
    ) -> Result<&AnswerRecord, PrepError> {
        if !self.evaluating {
            return Err(PrepError::invalid("attach an evaluation", self.phase()));
        }
        self.evaluating = false;
        self.evaluation_failed = false;
        let idx = self.current_index;
        self.answers.insert(
            idx,
            AnswerRecord {
                answer_text: self.draft.clone(),
                evaluation,
            },
        );
        Ok(&self.answers[&idx])
    }

    /// The evaluator failed; stay in `Evaluating` so the attempt can be retried.
    pub fn mark_evaluation_failed(&mut self) -> Result<(), PrepError> {
        if !self.evaluating {
            return Err(PrepError::invalid("record an evaluation failure", self.phase()));
        }
        self.evaluation_failed = true;
        Ok(())
    }

    /// Give up on a failed evaluation and return to `Idle`. The draft is kept.
    pub fn discard_attempt(&mut self) -> Result<(), PrepError> {
        if !self.evaluating {
            return Err(PrepError::invalid("discard the attempt", self.phase()));
        }
        self.evaluating = false;
        self.evaluation_failed = false;
        self.time_remaining = self.time_limit;
        Ok(())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), PrepError> {
        match self.phase() {
            Phase::Idle | Phase::Recording => {
                self.draft = text.into();
                Ok(())
            }
            other => Err(PrepError::invalid("edit the answer", other)),
        }
    }

    pub fn append_draft(&mut self, line: &str) -> Result<(), PrepError> {
        let mut text = self.draft.clone();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        self.set_draft(text)
    }

    /// Remove the current record so the question can be answered again.
    pub fn reset_answer(&mut self) -> Result<AnswerRecord, PrepError> {
        if self.phase() != Phase::Answered {
            return Err(PrepError::invalid("reset the answer", self.phase()));
        }
        let record = self
            .answers
            .shift_remove(&self.current_index)
            .ok_or_else(|| PrepError::invalid("reset the answer", Phase::Idle))?;
        self.draft = record.answer_text.clone();
        self.time_remaining = self.time_limit;
        Ok(record)
    }

    fn ensure_can_navigate(&self, action: &'static str) -> Result<(), PrepError> {
        match self.phase() {
            Phase::Idle | Phase::Answered => Ok(()),
            other => Err(PrepError::invalid(action, other)),
        }
    }

    fn ensure_can_advance(&self, action: &'static str) -> Result<(), PrepError> {
        self.ensure_can_navigate(action)?;
        if !self.allow_skip && self.current_answer().is_none() {
            return Err(PrepError::invalid(action, "the question is unanswered"));
        }
        Ok(())
    }

    /// Move forward. On the last question nothing changes and
    /// `Advance::Completed` is returned; the caller saves the session and
    /// then calls [`complete`](Self::complete).
    pub fn next(&mut self) -> Result<Advance, PrepError> {
        self.ensure_can_advance("move to the next question")?;
        if self.is_last_question() {
            return Ok(Advance::Completed);
        }
        self.show(self.current_index + 1);
        Ok(Advance::Moved(self.current_index))
    }

    /// Enter `Completed`. Only legal from the last question.
    pub fn complete(&mut self) -> Result<(), PrepError> {
        self.ensure_can_advance("complete the session")?;
        if !self.is_last_question() {
            return Err(PrepError::invalid(
                "complete the session",
                "questions remain",
            ));
        }
        self.completed = true;
        Ok(())
    }

    pub fn previous(&mut self) -> Result<usize, PrepError> {
        self.ensure_can_navigate("move to the previous question")?;
        if self.current_index == 0 {
            return Err(PrepError::invalid(
                "move to the previous question",
                "on the first question",
            ));
        }
        self.show(self.current_index - 1);
        Ok(self.current_index)
    }

    fn show(&mut self, index: usize) {
        self.current_index = index;
        self.time_remaining = self.time_limit;
        self.evaluation_failed = false;
        self.draft = self
            .answers
            .get(&index)
            .map(|r| r.answer_text.clone())
            .unwrap_or_default();
    }
}
