//! Template analysis: distills a PPTX or POTX package into a [`DesignProfile`].
//!
//! The pipeline reads the package once, resolves its theme on the raw bytes,
//! patches POTX manifests in memory so the parts read as a presentation,
//! then runs the extractors: layout catalog, master shapes and, when a
//! toolkit deck is supplied, the icon library. Results can be cached on
//! disk keyed by source mtimes.

pub mod cache;
pub mod error;
pub mod icons;
pub mod layout;
pub mod shapes;
pub mod theme;
mod xmlutil;

pub use cache::ProfileCache;
pub use error::{AnalyzerError, Result};

use crate::opc::constants::part_path;
use crate::opc::package::{PptxPackage, is_template_path, patch_template_to_presentation};
use crate::profile::{DesignProfile, SlideSize, TextStyle};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Knobs for a single analysis run.
#[derive(Default)]
pub struct AnalyzeOptions {
    /// Companion deck whose slides are harvested for reusable icons.
    pub toolkit_path: Option<PathBuf>,
    /// Advisory profile cache. `None` analyzes from scratch every time.
    pub cache: Option<ProfileCache>,
}

/// Analyze a template package into a complete design profile.
///
/// POTX templates are patched to presentation form in memory first; the
/// file on disk is never modified. Theme resolution runs on the unpatched
/// bytes since it only touches parts the patch leaves alone.
pub fn analyze<P: AsRef<Path>>(template_path: P, options: &AnalyzeOptions) -> Result<DesignProfile> {
    let template_path = template_path.as_ref();

    let key = match &options.cache {
        Some(cache) => {
            let key = ProfileCache::fingerprint(template_path, options.toolkit_path.as_deref())?;
            if let Some(profile) = cache.load(&key) {
                info!(path = %template_path.display(), "reusing cached design profile");
                return Ok(profile);
            }
            Some(key)
        },
        None => None,
    };

    info!(path = %template_path.display(), "analyzing template");
    let raw = fs::read(template_path).map_err(|_| {
        crate::opc::OpcError::PackageNotFound(template_path.display().to_string())
    })?;

    // Theme first, on the raw archive.
    let source = template_path.display().to_string();
    let mut theme_pkg = PptxPackage::from_bytes(raw.clone())?;
    let theme_xml = theme::theme_xml(&mut theme_pkg, &source)?;
    let colors = theme::extract_color_scheme(&theme_xml)?;
    let fonts = theme::extract_font_scheme(&theme_xml)?;

    let bytes = if is_template_path(template_path) {
        debug!("patching template manifest to presentation form");
        patch_template_to_presentation(&raw)?
    } else {
        raw
    };
    let mut pkg = PptxPackage::from_bytes(bytes)?;

    let slide_size = read_slide_size(&mut pkg)?;
    let layouts = layout::extract_layouts(&mut pkg)?;
    let background_shapes = shapes::extract_shapes(&mut pkg)?;
    let num_sample_slides = pkg.members_matching(part_path::SLIDE_PREFIX, ".xml").len();
    let icons = icons::extract_icons(options.toolkit_path.as_deref())?;

    let title_style = TextStyle {
        font_family: fonts.major.clone(),
        font_size_pt: 48.0,
        bold: true,
        color: colors.dk2.clone(),
        ..TextStyle::default()
    };
    let body_style = TextStyle {
        font_family: fonts.minor.clone(),
        font_size_pt: 20.0,
        color: colors.dk2.clone(),
        ..TextStyle::default()
    };

    let profile = DesignProfile {
        template_name: template_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        template_path: source,
        slide_size,
        colors,
        fonts,
        title_style,
        body_style,
        layouts,
        icons,
        num_sample_slides,
        background_shapes,
    };
    info!(
        layouts = profile.layouts.len(),
        shapes = profile.background_shapes.len(),
        icons = profile.icons.len(),
        "design profile assembled"
    );

    if let (Some(cache), Some(key)) = (&options.cache, &key) {
        cache.store(key, &profile);
    }
    Ok(profile)
}

/// Slide dimensions from `p:sldSz` in the presentation part.
///
/// Absent part or attributes fall back to the standard 16:9 canvas.
fn read_slide_size(pkg: &mut PptxPackage) -> Result<SlideSize> {
    let Some(xml) = pkg.read_optional(part_path::PRESENTATION)? else {
        return Ok(SlideSize::default());
    };

    let mut reader = Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"sldSz" =>
            {
                let default = SlideSize::default();
                let cx = xmlutil::attr(e, b"cx").and_then(|v| v.parse().ok());
                let cy = xmlutil::attr(e, b"cy").and_then(|v| v.parse().ok());
                return Ok(SlideSize {
                    width: cx.unwrap_or(default.width),
                    height: cy.unwrap_or(default.height),
                });
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }
    Ok(SlideSize::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::constants::content_type;
    use crate::profile::ContentCategory;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const THEME_XML: &[u8] = br#"<?xml version="1.0"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Orbit">
  <a:themeElements>
    <a:clrScheme name="Orbit">
      <a:dk1><a:sysClr val="windowText" lastClr="1A1A2E"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="16213E"/></a:dk2>
      <a:lt2><a:srgbClr val="E8E8F0"/></a:lt2>
      <a:accent1><a:srgbClr val="0F3460"/></a:accent1>
      <a:accent2><a:srgbClr val="E94560"/></a:accent2>
      <a:accent3><a:srgbClr val="533483"/></a:accent3>
      <a:accent4><a:srgbClr val="F7931E"/></a:accent4>
      <a:accent5><a:srgbClr val="2ECC71"/></a:accent5>
      <a:accent6><a:srgbClr val="3498DB"/></a:accent6>
      <a:hlink><a:srgbClr val="0F3460"/></a:hlink>
      <a:folHlink><a:srgbClr val="533483"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="Orbit">
      <a:majorFont><a:latin typeface="Montserrat"/></a:majorFont>
      <a:minorFont><a:latin typeface="Open Sans"/></a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;

    const PRESENTATION_XML: &[u8] = br#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#;

    const MASTER_XML: &[u8] = br#"<p:sldMaster xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Brand Bar"/><p:nvPr/></p:nvSpPr><p:spPr><a:solidFill><a:srgbClr val="E94560"/></a:solidFill></p:spPr></p:sp></p:spTree></p:cSld></p:sldMaster>"#;

    const TITLE_LAYOUT: &[u8] = br#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><p:cSld name="Title Slide"><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr></p:sp></p:spTree></p:cSld></p:sldLayout>"#;

    const CONTENT_LAYOUT: &[u8] = br#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><p:cSld name="Unnamed Layout"><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Content 1"/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr></p:sp></p:spTree></p:cSld></p:sldLayout>"#;

    fn content_types(main_mime: &str) -> String {
        format!(
            r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{main_mime}"/></Types>"#
        )
    }

    fn build_deck(dir: &TempDir, filename: &str, main_mime: &str) -> PathBuf {
        let entries: &[(&str, &[u8])] = &[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/theme/theme1.xml", THEME_XML),
            ("ppt/slideMasters/slideMaster1.xml", MASTER_XML),
            ("ppt/slideLayouts/slideLayout1.xml", TITLE_LAYOUT),
            ("ppt/slideLayouts/slideLayout2.xml", CONTENT_LAYOUT),
            ("ppt/slides/slide1.xml", b"<p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"/>"),
        ];
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(content_types(main_mime).as_bytes())
            .unwrap();
        for (name, data) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        let path = dir.path().join(filename);
        fs::write(&path, writer.finish().unwrap().into_inner()).unwrap();
        path
    }

    #[test]
    fn test_analyze_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = build_deck(&dir, "orbit.pptx", content_type::PML_PRESENTATION_MAIN);
        let profile = analyze(&path, &AnalyzeOptions::default()).unwrap();

        assert_eq!(profile.template_name, "orbit");
        assert_eq!(profile.slide_size.width, 9_144_000);
        assert_eq!(profile.colors.dk1, "#1A1A2E");
        assert_eq!(profile.colors.accent2, "#E94560");
        assert_eq!(profile.fonts.major, "Montserrat");
        assert_eq!(profile.title_style.font_family, "Montserrat");
        assert!(profile.title_style.bold);
        assert_eq!(profile.title_style.color, "#16213E");
        assert_eq!(profile.body_style.font_family, "Open Sans");

        assert_eq!(profile.layouts.len(), 2);
        assert_eq!(profile.layouts[0].name, "Title Slide");
        assert_eq!(profile.layouts[0].content_category, ContentCategory::Title);
        assert_eq!(profile.layouts[1].content_category, ContentCategory::ContentText);

        assert_eq!(profile.background_shapes.len(), 1);
        assert_eq!(profile.background_shapes[0].name, "Brand Bar");
        assert_eq!(profile.num_sample_slides, 1);
        assert!(profile.icons.is_empty());
    }

    #[test]
    fn test_analyze_patches_potx_in_memory() {
        let dir = TempDir::new().unwrap();
        let path = build_deck(&dir, "orbit.potx", content_type::PML_TEMPLATE_MAIN);
        let before = fs::read(&path).unwrap();

        let profile = analyze(&path, &AnalyzeOptions::default()).unwrap();
        assert_eq!(profile.layouts.len(), 2);
        assert_eq!(profile.colors.accent4, "#F7931E");

        // The file on disk is untouched.
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_analyze_reuses_cache() {
        let dir = TempDir::new().unwrap();
        let path = build_deck(&dir, "orbit.pptx", content_type::PML_PRESENTATION_MAIN);
        let options = AnalyzeOptions {
            toolkit_path: None,
            cache: Some(ProfileCache::new(dir.path().join("cache"))),
        };

        let first = analyze(&path, &options).unwrap();
        let key = ProfileCache::fingerprint(&path, None).unwrap();
        assert!(dir.path().join("cache").join(format!("{key}.json")).exists());

        let second = analyze(&path, &options).unwrap();
        assert_eq!(second.template_name, first.template_name);
        assert_eq!(second.colors, first.colors);
        assert_eq!(second.layouts.len(), first.layouts.len());
    }

    #[test]
    fn test_analyze_missing_file() {
        let err = analyze("/nonexistent/deck.pptx", &AnalyzeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Opc(crate::opc::OpcError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_analyze_without_theme_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        let path = dir.path().join("bare.pptx");
        fs::write(&path, writer.finish().unwrap().into_inner()).unwrap();

        let err = analyze(&path, &AnalyzeOptions::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingTheme(_)));
    }

    #[test]
    fn test_slide_size_defaults_without_sld_sz() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("ppt/presentation.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<p:presentation xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"/>").unwrap();
        let mut pkg = PptxPackage::from_bytes(writer.finish().unwrap().into_inner()).unwrap();
        assert_eq!(read_slide_size(&mut pkg).unwrap(), SlideSize::default());
    }
}
