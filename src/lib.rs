// src/lib.rs — Library root for mockprep

pub mod catalog;
pub mod cli;
pub mod core;
pub mod evaluator;
pub mod infra;
pub mod memory;
