//! Open Packaging Conventions container layer.
//!
//! PresentationML packages are zip archives of XML parts. This module provides
//! the pieces of OPC that design-profile extraction needs: an in-memory
//! zip-backed package reader, part-name URIs with relative-reference
//! resolution, read-side relationship manifests, and the content-type patch
//! that lets a template-role package be opened in presentation role.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod rel;

pub use error::{OpcError, Result};
pub use package::{PptxPackage, is_template_path, patch_template_to_presentation};
pub use packuri::PackURI;
pub use rel::{Relationship, Relationships};
