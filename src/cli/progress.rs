// src/cli/progress.rs — Terminal progress renderer for session feedback

use crate::core::progress::{format_time, ScoreBand, TimeUrgency};
use crate::core::types::ProgressEvent;

/// Build a progress callback that writes formatted output to stderr.
///
/// Returns a closure suitable for `SessionController::with_progress()`.
pub fn terminal_progress() -> impl Fn(ProgressEvent) + Send + 'static {
    move |event| {
        if let Some(line) = format_event(&event) {
            eprintln!("{line}");
        }
    }
}

/// One status line per event. Most ticks are silent: the countdown is shown
/// every 30 seconds, then every second for the last ten.
pub fn format_event(event: &ProgressEvent) -> Option<String> {
    let line = match event {
        ProgressEvent::QuestionShown { index, total } => {
            format!("[question {}/{}]", index + 1, total)
        }
        ProgressEvent::RecordingStarted { index, time_limit } => format!(
            "[rec] question {} recording, {} on the clock",
            index + 1,
            format_time(*time_limit)
        ),
        ProgressEvent::Tick { time_remaining } => {
            if *time_remaining % 30 != 0 && *time_remaining > 10 {
                return None;
            }
            let tag = match TimeUrgency::from_remaining(*time_remaining) {
                TimeUrgency::Normal => "timer",
                TimeUrgency::Warning => "timer!",
                TimeUrgency::Critical => "timer!!",
            };
            format!("[{}] {} remaining", tag, format_time(*time_remaining))
        }
        ProgressEvent::RecordingRestarted { constraints, .. } => format!(
            "[rec] restarted (camera {}, mic {}), clock reset",
            if constraints.video { "on" } else { "off" },
            if constraints.audio { "on" } else { "off" },
        ),
        ProgressEvent::Evaluating { index, expired } => {
            if *expired {
                format!("[eval] time's up, evaluating answer {}...", index + 1)
            } else {
                format!("[eval] evaluating answer {}...", index + 1)
            }
        }
        ProgressEvent::Answered {
            index,
            score,
            overall,
            percent_complete,
        } => format!(
            "[done] question {} scored {} ({}), overall {} | {}% complete",
            index + 1,
            score,
            ScoreBand::from_score(*score),
            overall,
            percent_complete
        ),
        ProgressEvent::EvaluationFailed { index, message } => {
            format!("[eval] question {} failed: {}", index + 1, message)
        }
        ProgressEvent::DeviceError { message } => format!("[device] {}", message),
        ProgressEvent::Completed {
            answered,
            total,
            overall_score,
        } => format!(
            "[complete] {}/{} answered, overall score {}",
            answered, total, overall_score
        ),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DeviceConstraints;
    use std::sync::{Arc, Mutex};

    /// Helper that captures progress output into a Vec instead of stderr.
    fn capturing_progress() -> (
        impl Fn(ProgressEvent) + Send + 'static,
        Arc<Mutex<Vec<String>>>,
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let cb = move |event: ProgressEvent| {
            if let Some(msg) = format_event(&event) {
                log_clone.lock().unwrap().push(msg);
            }
        };
        (cb, log)
    }

    #[test]
    fn test_question_shown_format() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::QuestionShown { index: 0, total: 5 });
        assert_eq!(log.lock().unwrap()[0], "[question 1/5]");
    }

    #[test]
    fn test_ticks_are_sparse() {
        let (cb, log) = capturing_progress();
        for time_remaining in (1..=179).rev() {
            cb(ProgressEvent::Tick { time_remaining });
        }
        let msgs = log.lock().unwrap();
        // 150, 120, 90, 60, 30 and 10..=1
        assert_eq!(msgs.len(), 15);
        assert_eq!(msgs[0], "[timer] 2:30 remaining");
        assert_eq!(msgs[3], "[timer!] 1:00 remaining");
        assert_eq!(msgs[14], "[timer!!] 0:01 remaining");
    }

    #[test]
    fn test_answered_format() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::Answered {
            index: 1,
            score: 92,
            overall: 88,
            percent_complete: 40,
        });
        let msgs = log.lock().unwrap();
        assert!(msgs[0].contains("question 2 scored 92 (excellent)"));
        assert!(msgs[0].contains("40% complete"));
    }

    #[test]
    fn test_restart_format() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::RecordingRestarted {
            index: 0,
            constraints: DeviceConstraints {
                video: false,
                audio: true,
            },
        });
        assert_eq!(
            log.lock().unwrap()[0],
            "[rec] restarted (camera off, mic on), clock reset"
        );
    }

    #[test]
    fn test_full_lifecycle_sequence() {
        let (cb, log) = capturing_progress();
        cb(ProgressEvent::QuestionShown { index: 0, total: 1 });
        cb(ProgressEvent::RecordingStarted {
            index: 0,
            time_limit: 180,
        });
        cb(ProgressEvent::Evaluating {
            index: 0,
            expired: true,
        });
        cb(ProgressEvent::Answered {
            index: 0,
            score: 77,
            overall: 77,
            percent_complete: 100,
        });
        cb(ProgressEvent::Completed {
            answered: 1,
            total: 1,
            overall_score: 77,
        });

        let msgs = log.lock().unwrap();
        assert_eq!(msgs.len(), 5);
        assert!(msgs[1].contains("3:00 on the clock"));
        assert!(msgs[2].contains("time's up"));
        assert!(msgs[3].contains("(good)"));
        assert!(msgs[4].starts_with("[complete]"));
    }
}
