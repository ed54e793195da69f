// src/catalog.rs — Question catalog sources

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::types::{Category, Difficulty, Question};
use crate::infra::errors::PrepError;

/// Supplies the fixed, ordered question list at session start.
pub trait QuestionSource {
    fn questions(&self) -> Result<Vec<Question>, PrepError>;
}

/// The built-in question set.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCatalog;

impl QuestionSource for StaticCatalog {
    fn questions(&self) -> Result<Vec<Question>, PrepError> {
        Ok(builtin_questions())
    }
}

/// Questions loaded from a TOML (`[[questions]]`) or JSON (array) file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

#[derive(Deserialize)]
struct CatalogFile {
    questions: Vec<Question>,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuestionSource for FileCatalog {
    fn questions(&self) -> Result<Vec<Question>, PrepError> {
        let content = std::fs::read_to_string(&self.path)?;
        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let questions = if is_json {
            serde_json::from_str::<Vec<Question>>(&content)?
        } else {
            toml::from_str::<CatalogFile>(&content)
                .map_err(|e| PrepError::Catalog(format!("{}: {e}", self.path.display())))?
                .questions
        };

        if questions.is_empty() {
            return Err(PrepError::Catalog(format!(
                "{} contains no questions",
                self.path.display()
            )));
        }
        tracing::debug!(
            "Loaded {} question(s) from {}",
            questions.len(),
            self.path.display()
        );
        Ok(questions)
    }
}

/// Load a catalog and keep the first `count` questions (at least one).
pub fn load(source: &dyn QuestionSource, count: usize) -> Result<Vec<Question>, PrepError> {
    let mut questions = source.questions()?;
    if questions.is_empty() {
        return Err(PrepError::Catalog("catalog is empty".into()));
    }
    questions.truncate(count.max(1));
    Ok(questions)
}

/// Questions matching `category` (any when `None`) whose prompt or key points
/// contain `query`, ignoring case. Each hit keeps its catalog position.
pub fn filter_questions<'a>(
    questions: &'a [Question],
    category: Option<Category>,
    query: Option<&str>,
) -> Vec<(usize, &'a Question)> {
    let query = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    questions
        .iter()
        .enumerate()
        .filter(|(_, q)| category.map_or(true, |c| q.category == c))
        .filter(|(_, q)| {
            query.is_empty()
                || q.prompt.to_lowercase().contains(&query)
                || q.key_points.iter().any(|p| p.to_lowercase().contains(&query))
        })
        .collect()
}

fn question(
    prompt: &str,
    key_points: [&str; 4],
    expected_answer: &str,
    difficulty: Difficulty,
    category: Category,
) -> Question {
    Question {
        prompt: prompt.into(),
        key_points: key_points.iter().map(|p| p.to_string()).collect(),
        expected_answer: expected_answer.into(),
        difficulty,
        category,
    }
}

pub fn builtin_questions() -> Vec<Question> {
    vec![
        question(
            "Can you explain the concept of React hooks and give examples of commonly used hooks?",
            ["useState", "useEffect", "Custom Hooks", "Rules of Hooks"],
            "React hooks are functions that allow you to use state and other React features in \
             functional components. Common hooks include useState for managing state, useEffect \
             for side effects, useContext for context API, and useRef for mutable references. \
             Custom hooks can be created to reuse stateful logic across components.",
            Difficulty::Medium,
            Category::Technical,
        ),
        question(
            "Describe a challenging project you worked on and how you overcame obstacles.",
            [
                "Problem Solving",
                "Team Collaboration",
                "Technical Challenges",
                "Results",
            ],
            "A good answer should include: specific project details, challenges faced, actions \
             taken to resolve issues, collaboration with team members, and measurable results or \
             outcomes achieved.",
            Difficulty::Hard,
            Category::Behavioral,
        ),
        question(
            "How do you handle state management in large React applications?",
            ["Redux", "Context API", "State Architecture", "Performance"],
            "For large applications, consider using Redux or Context API based on needs. Redux is \
             suitable for complex state with many updates, while Context works well for simpler \
             cases. Important to structure state properly and consider performance implications.",
            Difficulty::Hard,
            Category::Technical,
        ),
        question(
            "What's your approach to writing clean and maintainable code?",
            ["Code Standards", "Documentation", "Testing", "Code Review"],
            "Focus on: consistent coding standards, clear documentation, comprehensive testing, \
             regular code reviews, modular architecture, and following SOLID principles. Examples \
             of refactoring and improving code quality are valuable.",
            Difficulty::Medium,
            Category::Technical,
        ),
        question(
            "How do you stay updated with the latest technology trends?",
            [
                "Learning Resources",
                "Practice",
                "Community",
                "Time Management",
            ],
            "Discuss: reading tech blogs, participating in communities, working on side projects, \
             attending conferences/meetups, following industry leaders, and balancing learning \
             with practical application.",
            Difficulty::Easy,
            Category::Behavioral,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn positions(hits: &[(usize, &Question)]) -> Vec<usize> {
        hits.iter().map(|(i, _)| *i).collect()
    }

    #[test]
    fn test_filter_questions() {
        let qs = builtin_questions();
        assert_eq!(filter_questions(&qs, None, None).len(), 5);
        assert_eq!(
            positions(&filter_questions(&qs, Some(Category::Technical), None)),
            vec![0, 2, 3]
        );
        assert_eq!(positions(&filter_questions(&qs, None, Some("REACT"))), vec![0, 2]);
        // Key points are searched too
        assert_eq!(positions(&filter_questions(&qs, None, Some("testing"))), vec![3]);
        assert_eq!(
            positions(&filter_questions(&qs, Some(Category::Behavioral), Some("community"))),
            vec![4]
        );
        assert!(filter_questions(&qs, Some(Category::Behavioral), Some("redux")).is_empty());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Technical".parse::<Category>(), Ok(Category::Technical));
        assert_eq!(" behavioral ".parse::<Category>(), Ok(Category::Behavioral));
        assert!("system-design".parse::<Category>().is_err());
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let qs = StaticCatalog.questions().unwrap();
        assert_eq!(qs.len(), 5);
        assert!(qs.iter().all(|q| q.key_points.len() == 4));
        assert_eq!(qs[1].category, Category::Behavioral);
        assert_eq!(qs[4].difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_load_truncates_to_count() {
        let qs = load(&StaticCatalog, 2).unwrap();
        assert_eq!(qs.len(), 2);
        // Zero is bumped to one question.
        assert_eq!(load(&StaticCatalog, 0).unwrap().len(), 1);
        assert_eq!(load(&StaticCatalog, 50).unwrap().len(), 5);
    }

    #[test]
    fn test_file_catalog_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.toml");
        std::fs::write(
            &path,
            r#"
[[questions]]
prompt = "What is ownership?"
keyPoints = ["moves", "borrows"]
expectedAnswer = "Each value has one owner."
difficulty = "easy"
category = "technical"
"#,
        )
        .unwrap();

        let qs = FileCatalog::new(&path).questions().unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].key_points, vec!["moves", "borrows"]);
    }

    #[test]
    fn test_file_catalog_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("questions.json");
        let json = serde_json::to_string(&builtin_questions()[..2]).unwrap();
        std::fs::write(&path, json).unwrap();

        let qs = FileCatalog::new(&path).questions().unwrap();
        assert_eq!(qs, builtin_questions()[..2].to_vec());
    }

    #[test]
    fn test_file_catalog_empty_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            FileCatalog::new(&path).questions(),
            Err(PrepError::Catalog(_))
        ));
    }
}
