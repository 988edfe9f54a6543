//! Provides the PackURI value type for part names within an OPC package.
//!
//! PackURIs always begin with a forward slash and use forward slashes as path
//! separators, following the OPC specification. Relative references found in
//! relationship manifests (like `../theme/theme2.xml`) are resolved against a
//! base URI to produce an absolute part name.

use crate::opc::error::{OpcError, Result};

/// A part name within an OPC package, e.g. `/ppt/theme/theme1.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string beginning with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(OpcError::InvalidPackUri(format!(
                "PackURI must begin with slash, got '{uri}'"
            )));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relative reference against a base URI.
    ///
    /// Translates a reference like `../theme/theme2.xml` onto a base URI like
    /// `/ppt/slideMasters` to produce `/ppt/theme/theme2.xml`. A reference
    /// without parent-directory markers resolves directly under the base.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        let joined = Self::join_paths(base_uri, relative_ref);
        Self::new(Self::normalize_path(&joined))
    }

    /// The directory portion, e.g. `/ppt/slideMasters` for
    /// `/ppt/slideMasters/slideMaster1.xml`.
    pub fn base_uri(&self) -> &str {
        if self.uri == "/" {
            return "/";
        }
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// The filename portion, e.g. `slideMaster1.xml`.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// The partname index for tuple partnames, or None for singletons.
    ///
    /// Returns 21 for `/ppt/slides/slide21.xml` and None for
    /// `/ppt/presentation.xml`.
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        let stem = match filename.rfind('.') {
            Some(pos) => &filename[..pos],
            None => filename,
        };
        let digits_at = stem.find(|c: char| c.is_ascii_digit())?;
        if digits_at == 0 || !stem[digits_at..].bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem[digits_at..].parse().ok()
    }

    /// The zip membername for this part (URI with the leading slash stripped).
    pub fn membername(&self) -> &str {
        if self.uri == "/" { "" } else { &self.uri[1..] }
    }

    /// The PackURI of the `.rels` part for this part, e.g.
    /// `/ppt/slideMasters/_rels/slideMaster1.xml.rels`.
    pub fn rels_uri(&self) -> Result<PackURI> {
        let base = self.base_uri();
        let rels = if base == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base, self.filename())
        };
        Self::new(rels)
    }

    /// The full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    fn join_paths(base: &str, rel: &str) -> String {
        if base.ends_with('/') {
            format!("{base}{rel}")
        } else {
            format!("{base}/{rel}")
        }
    }

    /// Resolve `..` and `.` segments without touching the filesystem.
    fn normalize_path(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {
                    if parts.is_empty() {
                        parts.push("");
                    }
                },
                ".." => {
                    if parts.len() > 1 {
                        parts.pop();
                    }
                },
                _ => parts.push(part),
            }
        }
        if parts.is_empty() || (parts.len() == 1 && parts[0].is_empty()) {
            return "/".to_string();
        }
        parts.join("/")
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
