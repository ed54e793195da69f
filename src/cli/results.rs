// src/cli/results.rs — Results view for the last completed session

use std::path::Path;

use crate::core::report::ResultsReport;
use crate::infra::config::Config;
use crate::memory;

/// Print the report; optionally export it as JSON.
pub fn show_results(config: &Config, export: Option<&Path>) -> anyhow::Result<()> {
    let store = memory::open_store(&config.storage)?;
    let report = {
        let guard = store
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        ResultsReport::load(&*guard)?
    };

    if report.is_empty() {
        println!("No completed interview yet. Run `mockprep start` to take one.");
        return Ok(());
    }

    print!("{}", render(&report));

    if let Some(path) = export {
        report.write_json(path)?;
        println!();
        println!("Report written to {}", path.display());
    }
    Ok(())
}

/// Plain-text rendering of a non-empty report.
pub fn render(report: &ResultsReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Overall score: {} ({})\n",
        report.overall_score,
        report.band()
    ));
    out.push_str(&format!(
        "Answered {} of {} question(s)\n\n",
        report.answered(),
        report.questions.len()
    ));

    for row in &report.rows {
        let score = row
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "skipped".into());
        out.push_str(&format!(
            "  Q{} [{}] {}  ({}, {})\n",
            row.index + 1,
            score,
            row.prompt,
            row.category,
            row.difficulty
        ));
        if let Some(ref feedback) = row.feedback {
            out.push_str(&format!("       {feedback}\n"));
        }
    }

    if !report.feedback.is_empty() {
        out.push_str("\nFeedback\n");
        for f in &report.feedback {
            out.push_str(&format!("  {} ({}): {}\n", f.category, f.score, f.feedback));
            for item in &f.improvements {
                out.push_str(&format!("    - {item}\n"));
            }
        }
    }

    out.push_str("\nRecommended resources\n");
    for r in &report.resources {
        out.push_str(&format!("  {} <{}>\n", r.title, r.url));
    }

    out.push_str(&format!("\nShare: {}\n", report.share_text()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_questions;
    use crate::core::types::{AnswerMap, AnswerRecord, Evaluation};
    use crate::memory::bridge::PersistedSession;

    #[test]
    fn test_render_marks_skipped_and_shares_score() {
        let mut answers = AnswerMap::new();
        answers.insert(
            0,
            AnswerRecord {
                answer_text: "text".into(),
                evaluation: Evaluation {
                    score: 93,
                    feedback: "Strong answer".into(),
                    strengths: vec![],
                    improvements: vec!["Go deeper".into()],
                    key_points_covered: vec![],
                    missing_points: vec![],
                },
            },
        );
        let report = ResultsReport::from_session(&PersistedSession {
            questions: builtin_questions()[..2].to_vec(),
            answers,
            overall_score: 93,
        });

        let text = render(&report);
        assert!(text.starts_with("Overall score: 93 (excellent)"));
        assert!(text.contains("Q1 [93]"));
        assert!(text.contains("Q2 [skipped]"));
        assert!(text.contains("    - Go deeper"));
        assert!(text.contains("scored 93%"));
    }
}
