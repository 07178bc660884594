//! Stress ML - классификатор Growing Stress по анкете о ментальном здоровье

pub mod api;
pub mod config;
pub mod error;
pub mod types;
pub mod models;
pub mod pipeline;
pub mod preprocessing;

pub use error::{Result, StressError};
pub use types::*;
pub use models::*;
pub use preprocessing::*;

// Re-export для удобства
pub use crate::config::AppConfig;
pub use crate::pipeline::StressPipeline;
