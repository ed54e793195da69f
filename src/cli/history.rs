// src/cli/history.rs — Past interviews and dashboard stats

use crate::core::progress::ScoreBand;
use crate::infra::config::Config;
use crate::memory;
use crate::memory::history::{dashboard_stats, filter_history, read_history};

pub fn show_history(config: &Config, search: Option<&str>) -> anyhow::Result<()> {
    let store = memory::open_store(&config.storage)?;
    let history = {
        let guard = store
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        read_history(&*guard)
    };

    if history.is_empty() {
        println!("No interviews yet.");
        return Ok(());
    }

    let stats = dashboard_stats(&history);
    println!(
        "{} interview(s), average score {}, best {}",
        stats.total_interviews, stats.average_score, stats.best_score
    );
    println!();

    let shown = filter_history(&history, search.unwrap_or(""));
    if shown.is_empty() {
        println!("No interviews match.");
        return Ok(());
    }

    // Newest first
    for entry in shown.into_iter().rev() {
        println!(
            "  {}  {:>3} {:<11} {}/{} answered  {}{}",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.score,
            format!("({})", ScoreBand::from_score(entry.score)),
            entry.answers.len(),
            entry.questions.len(),
            entry.title.as_deref().unwrap_or("-"),
            entry
                .role
                .as_deref()
                .map(|role| format!(" ({role})"))
                .unwrap_or_default(),
        );
    }
    Ok(())
}
