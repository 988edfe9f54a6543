//! Zip-backed access to a PresentationML package.
//!
//! A package is read fully into memory and addressed by membername. The
//! template→presentation patch also lives here: it rewrites the content-type
//! manifest of a `.potx` archive in-memory so the package can be opened in
//! presentation role, copying every other entry untouched and in order.

use crate::opc::constants::{content_type as ct, part_path};
use crate::opc::error::{OpcError, Result};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

/// An opened PresentationML package.
///
/// Wraps a zip archive held in memory. Reads decompress on demand; the
/// archive handle lives only as long as this value, so every exit path of a
/// caller releases it.
pub struct PptxPackage {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl PptxPackage {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Open a package from in-memory archive bytes.
    ///
    /// Fails with a zip error if the bytes are not a readable archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Open a package for analysis, patching template-role files first.
    ///
    /// `.potx` inputs are rewritten in-memory to presentation role; anything
    /// else is opened as-is.
    pub fn open_for_analysis<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        if is_template_path(path) {
            Self::from_bytes(patch_template_to_presentation(&bytes)?)
        } else {
            Self::from_bytes(bytes)
        }
    }

    /// All member names in the archive.
    pub fn member_names(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    /// Member names with the given prefix and suffix, lexicographically
    /// sorted.
    pub fn members_matching(&self, prefix: &str, suffix: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|n| n.starts_with(prefix) && n.ends_with(suffix))
            .map(String::from)
            .collect();
        names.sort();
        names
    }

    /// Check whether a member exists.
    pub fn contains(&self, membername: &str) -> bool {
        self.archive.index_for_name(membername).is_some()
    }

    /// Read a member's decompressed bytes.
    pub fn read(&mut self, membername: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(membername)
            .map_err(|_| OpcError::PartNotFound(membername.to_string()))?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read a member's bytes, or None if the member does not exist.
    pub fn read_optional(&mut self, membername: &str) -> Result<Option<Vec<u8>>> {
        if !self.contains(membername) {
            return Ok(None);
        }
        self.read(membername).map(Some)
    }
}

/// Whether a path denotes a template-role package by extension.
pub fn is_template_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("potx"))
}

/// Rewrite a template-role archive into presentation role, in memory.
///
/// Only the `[Content_Types].xml` entry changes: the template MIME string is
/// substring-replaced with the presentation MIME string. Every other entry is
/// copied byte-for-byte in original order. There is no partial-success state;
/// a corrupt archive propagates the underlying zip error.
pub fn patch_template_to_presentation(data: &[u8]) -> Result<Vec<u8>> {
    let mut zin = ZipArchive::new(Cursor::new(data))?;
    let mut zout = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for i in 0..zin.len() {
        let mut entry = zin.by_index(i)?;
        let name = entry.name().to_string();

        if entry.is_dir() {
            zout.add_directory(name, options)?;
            continue;
        }

        let mut content = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut content)?;

        if name == part_path::CONTENT_TYPES {
            let manifest = String::from_utf8(content).map_err(|_| {
                OpcError::Xml("content-type manifest is not valid UTF-8".to_string())
            })?;
            content = manifest
                .replace(ct::PML_TEMPLATE_MAIN, ct::PML_PRESENTATION_MAIN)
                .into_bytes();
        }

        zout.start_file(name, options)?;
        zout.write_all(&content)?;
    }

    Ok(zout.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn template_manifest() -> String {
        format!(
            r#"<?xml version="1.0"?><Types><Override PartName="/ppt/presentation.xml" ContentType="{}"/></Types>"#,
            ct::PML_TEMPLATE_MAIN
        )
    }

    #[test]
    fn test_read_and_contains() {
        let data = build_archive(&[("ppt/presentation.xml", b"<presentation/>")]);
        let mut pkg = PptxPackage::from_bytes(data).unwrap();
        assert!(pkg.contains("ppt/presentation.xml"));
        assert!(!pkg.contains("ppt/missing.xml"));
        assert_eq!(pkg.read("ppt/presentation.xml").unwrap(), b"<presentation/>");
        assert!(matches!(
            pkg.read("ppt/missing.xml"),
            Err(OpcError::PartNotFound(_))
        ));
        assert!(pkg.read_optional("ppt/missing.xml").unwrap().is_none());
    }

    #[test]
    fn test_members_matching_sorted() {
        let data = build_archive(&[
            ("ppt/theme/theme2.xml", b"<b/>"),
            ("ppt/theme/theme1.xml", b"<a/>"),
            ("ppt/theme/thumbnail.png", b"x"),
        ]);
        let pkg = PptxPackage::from_bytes(data).unwrap();
        assert_eq!(
            pkg.members_matching("ppt/theme/theme", ".xml"),
            ["ppt/theme/theme1.xml", "ppt/theme/theme2.xml"]
        );
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            PptxPackage::from_bytes(b"not a zip archive".to_vec()),
            Err(OpcError::Zip(_))
        ));
    }

    #[test]
    fn test_is_template_path() {
        assert!(is_template_path(Path::new("deck.potx")));
        assert!(is_template_path(Path::new("deck.POTX")));
        assert!(!is_template_path(Path::new("deck.pptx")));
        assert!(!is_template_path(Path::new("deck")));
    }

    #[test]
    fn test_patch_rewrites_only_the_manifest() {
        let manifest = template_manifest();
        let other_entries: [(&str, &[u8]); 2] = [
            ("ppt/presentation.xml", b"<p:presentation/>"),
            ("ppt/theme/theme1.xml", b"<a:theme/>"),
        ];
        let data = build_archive(&[
            (part_path::CONTENT_TYPES, manifest.as_bytes()),
            other_entries[0],
            other_entries[1],
        ]);

        let patched = patch_template_to_presentation(&data).unwrap();
        let mut pkg = PptxPackage::from_bytes(patched).unwrap();

        let new_manifest = String::from_utf8(pkg.read(part_path::CONTENT_TYPES).unwrap()).unwrap();
        assert!(new_manifest.contains(ct::PML_PRESENTATION_MAIN));
        assert!(!new_manifest.contains(ct::PML_TEMPLATE_MAIN));

        // Every other entry is byte-identical.
        for (name, bytes) in other_entries {
            assert_eq!(pkg.read(name).unwrap(), bytes);
        }
    }

    #[test]
    fn test_patch_preserves_entry_order() {
        let manifest = template_manifest();
        let data = build_archive(&[
            ("ppt/zfirst.xml", b"<z/>"),
            (part_path::CONTENT_TYPES, manifest.as_bytes()),
            ("ppt/alast.xml", b"<a/>"),
        ]);
        let patched = patch_template_to_presentation(&data).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(patched)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            ["ppt/zfirst.xml", part_path::CONTENT_TYPES, "ppt/alast.xml"]
        );
    }

    #[test]
    fn test_patch_propagates_corrupt_archive() {
        assert!(patch_template_to_presentation(b"garbage").is_err());
    }
}
