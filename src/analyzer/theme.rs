//! Theme resolution and color/font scheme extraction.
//!
//! The theme that matters is the one wired to the primary slide master via
//! its relationship manifest, not simply the first `theme*.xml` found by
//! name. Resolution therefore starts at the master's `.rels` part and only
//! falls back to conventional locations when that link is absent.
//!
//! Runs against the raw, unpatched archive so it works on template-role
//! files as well.

use crate::analyzer::error::{AnalyzerError, Result};
use crate::analyzer::xmlutil;
use crate::opc::constants::part_path;
use crate::opc::packuri::PackURI;
use crate::opc::rel::Relationships;
use crate::opc::package::PptxPackage;
use crate::profile::{COLOR_SLOTS, ColorScheme, FontScheme};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

/// Resolve and read the theme XML wired to the primary slide master.
///
/// Resolution order, each step a fallback of the previous:
/// 1. the master-linked theme from `slideMaster1.xml.rels`;
/// 2. the conventional `ppt/theme/theme1.xml`;
/// 3. the lexicographically first `ppt/theme/theme*.xml`;
/// 4. fatal [`AnalyzerError::MissingTheme`].
pub fn theme_xml(pkg: &mut PptxPackage, source: &str) -> Result<Vec<u8>> {
    if let Some(rels_xml) = pkg.read_optional(part_path::MASTER1_RELS)?
        && let Ok(rels) = Relationships::parse(&rels_xml)
        && let Some(rel) =
            rels.first_target_matching(|t| t.contains("theme") && t.ends_with(".xml"))
        && let Ok(uri) = PackURI::from_rel_ref("/ppt/slideMasters", rel.target_ref())
        && pkg.contains(uri.membername())
    {
        debug!(theme = %uri, "resolved master-linked theme");
        return Ok(pkg.read(uri.membername())?);
    }

    if pkg.contains(part_path::THEME1) {
        debug!(theme = part_path::THEME1, "using conventional theme path");
        return Ok(pkg.read(part_path::THEME1)?);
    }

    if let Some(name) = pkg.members_matching(part_path::THEME_PREFIX, ".xml").first() {
        debug!(theme = %name, "using first theme part found");
        return Ok(pkg.read(name)?);
    }

    Err(AnalyzerError::MissingTheme(source.to_string()))
}

/// Extract the 12-slot color scheme from theme XML.
///
/// Slots absent from the source keep the `#000000` default; a direct
/// `srgbClr` value is preferred over a system color's recorded `lastClr`.
/// Hex case is preserved as found. A theme without any `clrScheme` element
/// is fatally malformed.
pub fn extract_color_scheme(xml: &[u8]) -> Result<ColorScheme> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut scheme = ColorScheme::default();
    let mut scheme_found = false;
    let mut in_clr_scheme = false;
    let mut current_slot: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"clrScheme" => {
                        scheme_found = true;
                        in_clr_scheme = true;
                    },
                    b"srgbClr" if in_clr_scheme => {
                        if let Some(slot) = current_slot.take() {
                            let val = xmlutil::attr(e, b"val").unwrap_or_default();
                            scheme.set_slot(slot, format!("#{val}"));
                        }
                    },
                    b"sysClr" if in_clr_scheme => {
                        if let Some(slot) = current_slot.take() {
                            let val = xmlutil::attr(e, b"lastClr")
                                .or_else(|| xmlutil::attr(e, b"val"))
                                .unwrap_or_else(|| "000000".to_string());
                            scheme.set_slot(slot, format!("#{val}"));
                        }
                    },
                    name if in_clr_scheme => {
                        current_slot = COLOR_SLOTS
                            .iter()
                            .find(|slot| slot.as_bytes() == name)
                            .copied();
                    },
                    _ => {},
                }
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"clrScheme" {
                    in_clr_scheme = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    if !scheme_found {
        return Err(AnalyzerError::MalformedScheme("clrScheme"));
    }
    Ok(scheme)
}

/// Extract the major/minor latin typefaces from theme XML.
///
/// A missing `latin` node is non-fatal and yields an empty name; a theme
/// without any `fontScheme` element is fatally malformed.
pub fn extract_font_scheme(xml: &[u8]) -> Result<FontScheme> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut fonts = FontScheme::default();
    let mut scheme_found = false;
    let mut in_major = false;
    let mut in_minor = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"fontScheme" => scheme_found = true,
                b"majorFont" => in_major = true,
                b"minorFont" => in_minor = true,
                b"latin" if in_major || in_minor => {
                    let typeface = xmlutil::attr(e, b"typeface").unwrap_or_default();
                    if in_major {
                        fonts.major = typeface;
                    } else {
                        fonts.minor = typeface;
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"majorFont" => in_major = false,
                b"minorFont" => in_minor = false,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    if !scheme_found {
        return Err(AnalyzerError::MalformedScheme("fontScheme"));
    }
    Ok(fonts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const FULL_THEME: &[u8] = br#"<?xml version="1.0"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="1A1A2E"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="16213E"/></a:dk2>
      <a:lt2><a:srgbClr val="E8E8E8"/></a:lt2>
      <a:accent1><a:srgbClr val="FF6B35"/></a:accent1>
      <a:accent2><a:srgbClr val="f7931e"/></a:accent2>
      <a:accent3><a:srgbClr val="4ECDC4"/></a:accent3>
      <a:accent4><a:srgbClr val="556270"/></a:accent4>
      <a:accent5><a:srgbClr val="C7F464"/></a:accent5>
      <a:accent6><a:srgbClr val="C44D58"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="Office">
      <a:majorFont><a:latin typeface="Bitter"/></a:majorFont>
      <a:minorFont><a:latin typeface="Rubik"/></a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;

    fn build_package(entries: &[(&str, &[u8])]) -> PptxPackage {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        PptxPackage::from_bytes(writer.finish().unwrap().into_inner()).unwrap()
    }

    #[test]
    fn test_extract_all_twelve_colors_case_preserved() {
        let scheme = extract_color_scheme(FULL_THEME).unwrap();
        assert_eq!(scheme.dk1, "#1A1A2E");
        assert_eq!(scheme.lt1, "#FFFFFF");
        assert_eq!(scheme.dk2, "#16213E");
        assert_eq!(scheme.accent1, "#FF6B35");
        // Lowercase source hex stays lowercase.
        assert_eq!(scheme.accent2, "#f7931e");
        assert_eq!(scheme.hlink, "#0563C1");
        assert_eq!(scheme.fol_hlink, "#954F72");
    }

    #[test]
    fn test_missing_slots_default_to_black() {
        let xml = br#"<a:theme xmlns:a="x"><a:themeElements><a:clrScheme>
            <a:accent1><a:srgbClr val="FF6B35"/></a:accent1>
        </a:clrScheme></a:themeElements></a:theme>"#;
        let scheme = extract_color_scheme(xml).unwrap();
        assert_eq!(scheme.accent1, "#FF6B35");
        assert_eq!(scheme.dk1, "#000000");
        assert_eq!(scheme.accent6, "#000000");
        assert_eq!(scheme.fol_hlink, "#000000");
    }

    #[test]
    fn test_sys_clr_falls_back_to_val() {
        let xml = br#"<a:theme xmlns:a="x"><a:clrScheme>
            <a:dk1><a:sysClr val="windowText"/></a:dk1>
        </a:clrScheme></a:theme>"#;
        let scheme = extract_color_scheme(xml).unwrap();
        assert_eq!(scheme.dk1, "#windowText");
    }

    #[test]
    fn test_no_clr_scheme_is_malformed() {
        let xml = br#"<a:theme xmlns:a="x"><a:themeElements/></a:theme>"#;
        assert!(matches!(
            extract_color_scheme(xml),
            Err(AnalyzerError::MalformedScheme("clrScheme"))
        ));
    }

    #[test]
    fn test_extract_fonts() {
        let fonts = extract_font_scheme(FULL_THEME).unwrap();
        assert_eq!(fonts.major, "Bitter");
        assert_eq!(fonts.minor, "Rubik");
    }

    #[test]
    fn test_missing_latin_is_empty_not_fatal() {
        let xml = br#"<a:theme xmlns:a="x"><a:fontScheme name="x">
            <a:majorFont><a:latin typeface="Bitter"/></a:majorFont>
            <a:minorFont/>
        </a:fontScheme></a:theme>"#;
        let fonts = extract_font_scheme(xml).unwrap();
        assert_eq!(fonts.major, "Bitter");
        assert_eq!(fonts.minor, "");
    }

    #[test]
    fn test_no_font_scheme_is_malformed() {
        let xml = br#"<a:theme xmlns:a="x"><a:themeElements/></a:theme>"#;
        assert!(matches!(
            extract_font_scheme(xml),
            Err(AnalyzerError::MalformedScheme("fontScheme"))
        ));
    }

    #[test]
    fn test_resolution_prefers_master_linked_theme() {
        let rels = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type=".../theme" Target="../theme/theme2.xml"/>
        </Relationships>"#;
        let mut pkg = build_package(&[
            ("ppt/slideMasters/_rels/slideMaster1.xml.rels", rels),
            ("ppt/theme/theme1.xml", b"<decoy/>"),
            ("ppt/theme/theme2.xml", b"<linked/>"),
        ]);
        assert_eq!(theme_xml(&mut pkg, "deck.pptx").unwrap(), b"<linked/>");
    }

    #[test]
    fn test_resolution_falls_back_to_theme1() {
        let mut pkg = build_package(&[
            ("ppt/theme/theme1.xml", b"<one/>"),
            ("ppt/theme/theme2.xml", b"<two/>"),
        ]);
        assert_eq!(theme_xml(&mut pkg, "deck.pptx").unwrap(), b"<one/>");
    }

    #[test]
    fn test_resolution_falls_back_to_first_theme_part() {
        let mut pkg = build_package(&[
            ("ppt/theme/theme3.xml", b"<three/>"),
            ("ppt/theme/theme10.xml", b"<ten/>"),
        ]);
        // Lexicographic, not numeric: theme10 sorts before theme3.
        assert_eq!(theme_xml(&mut pkg, "deck.pptx").unwrap(), b"<ten/>");
    }

    #[test]
    fn test_resolution_ignores_dangling_rel_target() {
        let rels = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type=".../theme" Target="../theme/theme9.xml"/>
        </Relationships>"#;
        let mut pkg = build_package(&[
            ("ppt/slideMasters/_rels/slideMaster1.xml.rels", rels),
            ("ppt/theme/theme1.xml", b"<fallback/>"),
        ]);
        assert_eq!(theme_xml(&mut pkg, "deck.pptx").unwrap(), b"<fallback/>");
    }

    #[test]
    fn test_no_theme_is_fatal() {
        let mut pkg = build_package(&[("ppt/presentation.xml", b"<p/>")]);
        assert!(matches!(
            theme_xml(&mut pkg, "deck.pptx"),
            Err(AnalyzerError::MissingTheme(_))
        ));
    }
}
