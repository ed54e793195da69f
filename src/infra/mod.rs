// src/infra/mod.rs — Config, paths, errors and logging

pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
