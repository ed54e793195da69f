// src/cli/start.rs — Interactive interview session

use std::io::IsTerminal;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::progress::terminal_progress;
use super::StartArgs;
use crate::catalog::{self, FileCatalog, QuestionSource, StaticCatalog};
use crate::core::controller::SessionController;
use crate::core::progress::{format_time, question_progress};
use crate::core::recording::SimulatedCapture;
use crate::core::session::Advance;
use crate::core::types::{
    DeviceConstraints, InterviewProfile, Phase, Question, EXPERIENCE_OPTIONS, REASON_OPTIONS,
};
use crate::evaluator::SimulatedEvaluator;
use crate::infra::config::Config;
use crate::infra::errors::PrepError;
use crate::infra::paths;
use crate::memory;

/// A line typed during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
    Next,
    Previous,
    Reset,
    Camera,
    Mic,
    Retry,
    Discard,
    ModelAnswer,
    Status,
    Help,
    Quit,
    /// Anything else is answer text.
    Text(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let cmd = match trimmed.to_ascii_lowercase().as_str() {
            "start" | "/start" => Self::Start,
            "stop" | "/stop" => Self::Stop,
            "next" | "/next" => Self::Next,
            "prev" | "previous" | "/prev" => Self::Previous,
            "reset" | "/reset" => Self::Reset,
            "camera" | "/camera" => Self::Camera,
            "mic" | "/mic" => Self::Mic,
            "retry" | "/retry" => Self::Retry,
            "discard" | "/discard" => Self::Discard,
            "model" | "/model" => Self::ModelAnswer,
            "status" | "/status" => Self::Status,
            "help" | "/help" | "?" => Self::Help,
            "quit" | "exit" | "/quit" => Self::Quit,
            _ => Self::Text(line.trim_end().to_string()),
        };
        Some(cmd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run an interview from the terminal.
pub async fn run_start(args: StartArgs, config: &Config, quiet: bool) -> anyhow::Result<()> {
    let questions = load_questions(&args, config)?;
    let profile = resolve_profile(&args)?;
    paths::ensure_dirs().await?;
    let store = memory::open_store(&config.storage)?;

    let mut controller = SessionController::new(
        questions,
        &config.session,
        Arc::new(SimulatedCapture::new()),
        Arc::new(SimulatedEvaluator::from_config(&config.evaluator)),
        store,
    )?
    .with_devices(DeviceConstraints {
        video: !args.no_camera,
        audio: !args.no_mic,
    });
    if !quiet {
        controller = controller.with_progress(terminal_progress());
    }

    controller.begin(profile)?;
    let result = drive(&mut controller).await;
    controller.shutdown();
    result?;

    if controller.phase() == Phase::Completed {
        println!();
        println!("Interview complete. Run `mockprep results` for the full report.");
    } else {
        println!("Session ended early; nothing was saved.");
    }
    Ok(())
}

async fn drive(controller: &mut SessionController) -> anyhow::Result<()> {
    let mut ticks = controller
        .take_ticks()
        .ok_or_else(|| anyhow::anyhow!("session tick stream already taken"))?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    show_question(controller);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(cmd) = SessionCommand::parse(&line) else { continue };
                if handle_command(controller, cmd).await == Flow::Quit {
                    break;
                }
            }
            Some(event) = ticks.recv() => {
                let before = controller.phase();
                controller.on_tick(event).await?;
                if before == Phase::Recording && controller.phase() != Phase::Recording {
                    report_outcome(controller);
                }
            }
        }
        if controller.phase() == Phase::Completed {
            break;
        }
    }
    Ok(())
}

async fn handle_command(controller: &mut SessionController, cmd: SessionCommand) -> Flow {
    let result: Result<(), PrepError> = match cmd {
        SessionCommand::Start => controller.start_recording().await.map(|_| {
            println!("Recording. Type your answer, then `stop` when done.");
        }),
        SessionCommand::Stop => controller
            .stop_recording()
            .await
            .map(|_| report_outcome(controller)),
        SessionCommand::Next => match controller.next() {
            Ok(Advance::Moved(_)) => {
                show_question(controller);
                Ok(())
            }
            Ok(Advance::Completed) => Ok(()),
            Err(e) => Err(e),
        },
        SessionCommand::Previous => controller.previous().map(|_| show_question(controller)),
        SessionCommand::Reset => controller.reset_answer().map(|_| {
            println!("Answer cleared. `start` to answer again.");
        }),
        SessionCommand::Camera => controller
            .toggle_video()
            .await
            .map(|on| println!("Camera {}", if on { "on" } else { "off" })),
        SessionCommand::Mic => controller
            .toggle_audio()
            .await
            .map(|on| println!("Microphone {}", if on { "on" } else { "off" })),
        SessionCommand::Retry => controller
            .retry_evaluation()
            .await
            .map(|_| report_outcome(controller)),
        SessionCommand::Discard => controller.discard_attempt().map(|_| {
            println!("Attempt discarded. Your draft is kept; `start` to try again.");
        }),
        SessionCommand::ModelAnswer => {
            let q = controller.state().current_question();
            println!("Model answer:\n  {}", q.expected_answer);
            Ok(())
        }
        SessionCommand::Status => {
            show_status(controller);
            Ok(())
        }
        SessionCommand::Help => {
            print_help();
            Ok(())
        }
        SessionCommand::Quit => return Flow::Quit,
        SessionCommand::Text(text) => controller.append_draft(&text),
    };

    if let Err(e) = result {
        match controller.last_error() {
            Some(message) if e.is_retriable() => eprintln!("{message}"),
            _ => eprintln!("{e}"),
        }
    }
    Flow::Continue
}

fn load_questions(args: &StartArgs, config: &Config) -> anyhow::Result<Vec<Question>> {
    let path = args.catalog.clone().or_else(|| config.catalog.path.clone());
    let source: Box<dyn QuestionSource> = match path {
        Some(path) => Box::new(FileCatalog::new(path)),
        None => Box::new(StaticCatalog),
    };
    let count = args.questions.unwrap_or(config.catalog.question_count);
    Ok(catalog::load(source.as_ref(), count)?)
}

/// Flags first; prompt for whatever is missing when attached to a terminal.
fn resolve_profile(args: &StartArgs) -> anyhow::Result<InterviewProfile> {
    let interactive = std::io::stdin().is_terminal();

    let role = match (&args.role, interactive) {
        (Some(role), _) => role.clone(),
        (None, true) => inquire::Text::new("Job role:")
            .with_help_message("e.g. Frontend engineer")
            .prompt()
            .map_err(|_| anyhow::anyhow!("Input cancelled"))?,
        (None, false) => "Software engineer".to_string(),
    };
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("{role} mock interview"));

    let experience = match (&args.experience, interactive) {
        (Some(e), _) => e.clone(),
        (None, true) => inquire::Select::new("Years of experience:", EXPERIENCE_OPTIONS.to_vec())
            .prompt()
            .map_err(|_| anyhow::anyhow!("Selection cancelled"))?
            .to_string(),
        (None, false) => EXPERIENCE_OPTIONS[0].to_string(),
    };

    let reason = match (&args.reason, interactive) {
        (Some(r), _) => r.clone(),
        (None, true) => {
            let labels: Vec<&str> = REASON_OPTIONS.iter().map(|(_, label)| *label).collect();
            let choice = inquire::Select::new("Reason for the interview:", labels)
                .prompt()
                .map_err(|_| anyhow::anyhow!("Selection cancelled"))?;
            REASON_OPTIONS
                .iter()
                .find(|(_, label)| *label == choice)
                .map(|(value, _)| value.to_string())
                .unwrap_or_else(|| REASON_OPTIONS[1].0.to_string())
        }
        (None, false) => REASON_OPTIONS[1].0.to_string(),
    };

    let profile = InterviewProfile::new(title, role)
        .with_experience(experience)
        .with_reason(reason);
    profile.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(profile)
}

fn show_question(controller: &SessionController) {
    let state = controller.state();
    let q = state.current_question();
    let bar: String = question_progress(state.current_index(), state.question_count())
        .iter()
        .map(|fill| match fill {
            100 => '#',
            50 => '>',
            _ => '.',
        })
        .collect();

    println!();
    println!(
        "[{}] Question {} of {}  ({}, {})",
        bar,
        state.current_index() + 1,
        state.question_count(),
        q.category,
        q.difficulty
    );
    println!("  {}", q.prompt);
    println!("  Key points: {}", q.key_points.join(", "));

    match state.current_answer() {
        Some(record) => {
            println!("  Answered, score {}. `reset` to answer again.", record.evaluation.score);
        }
        None => {
            if !state.draft().is_empty() {
                println!("  Draft:\n    {}", state.draft().replace('\n', "\n    "));
            }
            println!("  {} per answer. Type `start` to begin.", format_time(state.time_limit()));
        }
    }
}

fn report_outcome(controller: &SessionController) {
    let state = controller.state();
    if let Some(record) = state.current_answer() {
        let eval = &record.evaluation;
        println!();
        println!("Score: {}", eval.score);
        println!("  {}", eval.feedback);
        if !eval.key_points_covered.is_empty() {
            println!("  Covered: {}", eval.key_points_covered.join(", "));
        }
        if !eval.missing_points.is_empty() {
            println!("  Missing: {}", eval.missing_points.join(", "));
        }
        for s in &eval.strengths {
            println!("  + {s}");
        }
        for i in &eval.improvements {
            println!("  - {i}");
        }
        if state.is_last_question() {
            println!("Type `next` to finish the interview.");
        } else {
            println!("Type `next` for the next question.");
        }
    } else if state.evaluation_failed() {
        if let Some(message) = controller.last_error() {
            eprintln!("{message}");
        }
    }
}

fn show_status(controller: &SessionController) {
    let state = controller.state();
    let devices = state.devices();
    println!(
        "phase={} question={}/{} time={} answered={} overall={} camera={} mic={} chunks={} \
         evaluator={}",
        state.phase(),
        state.current_index() + 1,
        state.question_count(),
        format_time(state.time_remaining()),
        state.answers().len(),
        state.overall_score(),
        if devices.video { "on" } else { "off" },
        if devices.audio { "on" } else { "off" },
        controller.captured_chunks(),
        controller.evaluator_name(),
    );
}

fn print_help() {
    println!(
        "Commands: start, stop, next, prev, reset, camera, mic, retry, discard, model, status, \
         help, quit"
    );
    println!("Any other line is added to your answer.");
}
