// src/evaluator/feedback.rs — Canned feedback text for simulated evaluations

pub const FEEDBACK: &str = "Your answer demonstrated good understanding of the core concepts.";

pub const STRENGTHS: &[&str] = &[
    "Clear communication",
    "Good technical depth",
    "Logical flow of ideas",
];

pub const IMPROVEMENTS: &[&str] = &[
    "Provide more specific examples",
    "Structure your answer more clearly",
    "Cover all key points systematically",
];

pub fn strengths() -> Vec<String> {
    STRENGTHS.iter().map(|s| s.to_string()).collect()
}

pub fn improvements() -> Vec<String> {
    IMPROVEMENTS.iter().map(|s| s.to_string()).collect()
}
