//! Deckprofile - A Rust library for extracting design profiles from
//! PowerPoint templates
//!
//! This library analyzes PPTX presentations and POTX templates and distills
//! their design system into a structured, serializable profile: theme colors
//! and fonts, a classified catalog of slide layouts, decorative master
//! shapes, and an optional icon library harvested from a companion toolkit
//! deck.
//!
//! # Features
//!
//! - **Theme extraction**: The 12-slot color scheme and major/minor fonts
//! - **Layout classification**: Slide layouts sorted into content categories
//!   by bilingual name heuristics and placeholder composition
//! - **Template patching**: POTX packages are converted to presentation form
//!   in memory, byte-identical except for the manifest
//! - **Icon harvesting**: Reusable vector shapes captured as self-contained
//!   XML snippets with searchable keywords
//! - **Profile caching**: Advisory on-disk cache keyed by source mtimes
//!
//! # Example - Profiling a template
//!
//! ```no_run
//! use deckprofile::{AnalyzeOptions, analyze};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = analyze("corporate.potx", &AnalyzeOptions::default())?;
//!
//! println!("accent 1: {}", profile.colors.accent1);
//! println!("heading font: {}", profile.fonts.major);
//! for layout in &profile.layouts {
//!     println!("{} -> {:?}", layout.name, layout.content_category);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Caching across runs
//!
//! ```no_run
//! use deckprofile::{AnalyzeOptions, ProfileCache, analyze};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = AnalyzeOptions {
//!     toolkit_path: Some("toolkit.pptx".into()),
//!     cache: Some(ProfileCache::new(".profile-cache")),
//! };
//! let profile = analyze("corporate.potx", &options)?;
//! println!("{} icons available", profile.icons.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod opc;
pub mod profile;

pub use analyzer::{AnalyzeOptions, AnalyzerError, ProfileCache, Result, analyze};
pub use profile::DesignProfile;
