//! Error types for document parsing and patching

/// Errors produced while parsing or patching an SVG document.
#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    /// Input text is not a well-formed SVG document. Raised before any
    /// mutation is attempted; there are no partial writes.
    #[error("malformed svg document: {0}")]
    MalformedDocument(String),

    /// The selector matched zero elements.
    #[error("selector \"{selector}\" matched no elements")]
    TargetNotFound {
        /// The selector in CSS notation
        selector: String,
    },
}
