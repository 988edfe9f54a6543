//! Error types for template analysis.
//!
//! Structural failures (no resolvable theme, a theme without color or font
//! schemes, a corrupt container) abort the analysis; no meaningful profile
//! exists without them. Per-element anomalies never surface here, extractors
//! absorb them locally with field defaults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// No theme part could be resolved by any strategy. Fatal.
    #[error("no theme part found in {0}")]
    MissingTheme(String),

    /// A theme part was found but lacks a required scheme element. Fatal.
    #[error("theme is missing its {0} element")]
    MalformedScheme(&'static str),

    /// Container-layer failure (corrupt archive, missing part, IO).
    #[error("package error: {0}")]
    Opc(#[from] crate::opc::OpcError),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for AnalyzerError {
    fn from(err: quick_xml::Error) -> Self {
        AnalyzerError::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
