//! SVG Patcher and Validator
//!
//! The document side of the pipeline:
//! - Owned mutable element tree parsed from SVG text
//! - Selector resolution (id, class, tag)
//! - Gradient synthesis and fill/stroke rewiring
//! - Structural validation of the patched output

pub mod document;
pub mod error;
pub mod patcher;
pub mod selector;
pub mod validator;

pub use document::{Element, SvgDocument, XmlNode};
pub use error::SvgError;
pub use patcher::{GradientPatcher, PatchSummary};
pub use validator::{validate, ValidationReport};
