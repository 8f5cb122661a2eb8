//! Workplace wellbeing (PERMA+V) survey dashboard.
//!
//! [`data`] is the UI-free pipeline: load the survey, derive dimension
//! scores, filter respondents and aggregate. The remaining modules are the
//! egui shell that renders its outputs.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
