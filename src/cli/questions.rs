// src/cli/questions.rs — Print the question catalog

use std::path::Path;

use crate::catalog::{filter_questions, FileCatalog, QuestionSource, StaticCatalog};
use crate::core::types::Category;
use crate::infra::config::Config;

pub fn list_questions(
    config: &Config,
    catalog: Option<&Path>,
    category: Option<&str>,
    search: Option<&str>,
) -> anyhow::Result<()> {
    let category = category
        .map(str::parse::<Category>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let path = catalog.map(Path::to_path_buf).or_else(|| config.catalog.path.clone());
    let questions = match path {
        Some(path) => FileCatalog::new(path).questions()?,
        None => StaticCatalog.questions()?,
    };

    let hits = filter_questions(&questions, category, search);
    if hits.is_empty() {
        println!("No questions match.");
        return Ok(());
    }

    for (i, q) in &hits {
        println!("{}. [{} / {}] {}", i + 1, q.category, q.difficulty, q.prompt);
        println!("   Key points: {}", q.key_points.join(", "));
    }
    println!();
    if hits.len() < questions.len() {
        println!("{} of {} question(s) shown.", hits.len(), questions.len());
    }
    println!(
        "{} question(s); sessions use the first {}.",
        questions.len(),
        config.catalog.question_count.max(1).min(questions.len())
    );
    Ok(())
}
