//! Pipeline orchestrator
//!
//! Composes the three stages in strict sequence for one request:
//! Prompt Interpreter → SVG Patcher → Validator. Data flows one way:
//! text → structured edit plan → patched document → pass/fail report.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sample;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::GradientPipeline;
pub use report::{EditOutcome, PipelineOutcome};
pub use sample::SAMPLE_SVG;
