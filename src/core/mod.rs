// src/core/mod.rs — Interview session engine

pub mod auth;
pub mod controller;
pub mod progress;
pub mod recording;
pub mod report;
pub mod session;
pub mod timer;
pub mod types;
