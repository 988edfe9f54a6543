//! Decorative shape extraction from the slide master.
//!
//! Templates park recurring visual furniture (logos, color bars, grouped
//! ornaments) directly on the slide master's shape tree. Those shapes are
//! captured as descriptors so composition can reproduce the template's
//! backdrop. Placeholder-bound shapes belong to the layout catalog and are
//! skipped here.

use crate::analyzer::error::Result;
use crate::analyzer::xmlutil;
use crate::opc::constants::part_path;
use crate::opc::package::PptxPackage;
use crate::profile::{FillKind, ShapeDescriptor, ShapeKind};
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

/// Extract non-placeholder shapes from the primary slide master.
///
/// Walks the direct children of the master's `p:spTree`. A master without a
/// shape tree yields an empty list; individual shapes missing names or
/// transforms get field defaults, never errors.
pub fn extract_shapes(pkg: &mut PptxPackage) -> Result<Vec<ShapeDescriptor>> {
    let Some(xml) = master_xml(pkg)? else {
        return Ok(Vec::new());
    };

    let mut reader = Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);

    let mut shapes = Vec::new();
    let mut in_sp_tree = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"spTree" => in_sp_tree = true,
                b"sp" if in_sp_tree => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, false)?;
                    if let Some(descriptor) = parse_shape(&snippet) {
                        shapes.push(descriptor);
                    }
                },
                b"grpSp" if in_sp_tree => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, false)?;
                    shapes.push(parse_group(&snippet));
                },
                b"pic" if in_sp_tree => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, false)?;
                    shapes.push(parse_picture(&snippet));
                },
                // Tables, charts and connectors are not decorative furniture.
                b"graphicFrame" | b"cxnSp" if in_sp_tree => {
                    reader.read_to_end(e.name())?;
                },
                _ => {},
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"spTree" {
                    in_sp_tree = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    debug!(count = shapes.len(), "extracted master shapes");
    Ok(shapes)
}

/// The primary slide master's XML, if the package has one.
fn master_xml(pkg: &mut PptxPackage) -> Result<Option<Vec<u8>>> {
    if pkg.contains(part_path::MASTER1) {
        return Ok(Some(pkg.read(part_path::MASTER1)?));
    }
    match pkg.members_matching(part_path::MASTER_PREFIX, ".xml").first() {
        Some(name) => Ok(Some(pkg.read(name)?)),
        None => Ok(None),
    }
}

/// Parse a plain shape; placeholder-bound shapes yield `None`.
fn parse_shape(snippet: &[u8]) -> Option<ShapeDescriptor> {
    if xmlutil::contains_element(snippet, b"ph") {
        return None;
    }

    let fill = if xmlutil::contains_element(snippet, b"solidFill") {
        FillKind::Solid
    } else {
        FillKind::None
    };

    Some(ShapeDescriptor {
        kind: ShapeKind::Shape,
        source: "master".to_string(),
        name: xmlutil::first_attr_of(snippet, b"cNvPr", b"name").unwrap_or_default(),
        position: xmlutil::parse_xfrm(snippet),
        fill,
        child_count: 0,
    })
}

/// Parse a group shape: name and direct child count, no child styling.
fn parse_group(snippet: &[u8]) -> ShapeDescriptor {
    ShapeDescriptor {
        kind: ShapeKind::Group,
        source: "master".to_string(),
        name: xmlutil::first_attr_of(snippet, b"cNvPr", b"name").unwrap_or_default(),
        position: xmlutil::parse_xfrm(snippet),
        fill: FillKind::None,
        child_count: direct_child_shapes(snippet),
    }
}

/// Parse a picture element (logos and similar).
fn parse_picture(snippet: &[u8]) -> ShapeDescriptor {
    ShapeDescriptor {
        kind: ShapeKind::Picture,
        source: "master".to_string(),
        name: xmlutil::first_attr_of(snippet, b"cNvPr", b"name").unwrap_or_default(),
        position: xmlutil::parse_xfrm(snippet),
        fill: FillKind::None,
        child_count: 0,
    }
}

/// Count the `sp` elements that are direct children of a captured group.
///
/// Nested groups keep their own children; only the first level counts.
fn direct_child_shapes(snippet: &[u8]) -> usize {
    let mut reader = Reader::from_reader(snippet);
    reader.config_mut().trim_text(true);

    let mut count = 0;
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                // depth 0 is the group element itself.
                if depth == 1 && e.local_name().as_ref() == b"sp" {
                    count += 1;
                }
                depth += 1;
            },
            Ok(Event::Empty(e)) => {
                if depth == 1 && e.local_name().as_ref() == b"sp" {
                    count += 1;
                }
            },
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) | Err(_) => break,
            _ => {},
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const MASTER_XML: &[u8] = br#"<?xml version="1.0"?>
<p:sldMaster xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <p:cSld>
    <p:spTree>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="2" name="Title Placeholder"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="3" name="Accent Bar"/><p:nvPr/></p:nvSpPr>
        <p:spPr>
          <a:xfrm><a:off x="0" y="0"/><a:ext cx="12192000" cy="152400"/></a:xfrm>
          <a:solidFill><a:srgbClr val="FF6B35"/></a:solidFill>
        </p:spPr>
      </p:sp>
      <p:grpSp>
        <p:nvGrpSpPr><p:cNvPr id="4" name="Corner Ornament"/></p:nvGrpSpPr>
        <p:sp><p:spPr/></p:sp>
        <p:sp><p:spPr/></p:sp>
        <p:grpSp><p:sp/></p:grpSp>
      </p:grpSp>
      <p:pic>
        <p:nvPicPr><p:cNvPr id="5" name="Logo"/></p:nvPicPr>
        <p:spPr><a:xfrm><a:off x="11000000" y="6000000"/><a:ext cx="900000" cy="600000"/></a:xfrm></p:spPr>
      </p:pic>
    </p:spTree>
  </p:cSld>
</p:sldMaster>"#;

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
    fn test_extract_master_shapes() {
        let mut pkg = build_package(&[("ppt/slideMasters/slideMaster1.xml", MASTER_XML)]);
        let shapes = extract_shapes(&mut pkg).unwrap();

        // The title placeholder is skipped; bar, group and logo survive.
        assert_eq!(shapes.len(), 3);

        let bar = &shapes[0];
        assert_eq!(bar.kind, ShapeKind::Shape);
        assert_eq!(bar.source, "master");
        assert_eq!(bar.name, "Accent Bar");
        assert_eq!(bar.fill, FillKind::Solid);
        let pos = bar.position.unwrap();
        assert_eq!((pos.width, pos.height), (12_192_000, 152_400));

        let group = &shapes[1];
        assert_eq!(group.kind, ShapeKind::Group);
        assert_eq!(group.name, "Corner Ornament");
        // Two direct children; the nested group's shape does not count.
        assert_eq!(group.child_count, 2);

        let logo = &shapes[2];
        assert_eq!(logo.kind, ShapeKind::Picture);
        assert_eq!(logo.name, "Logo");
        assert!(logo.position.is_some());
    }

    #[test]
    fn test_shape_without_transform_has_no_position() {
        let snippet = br#"<p:sp><p:nvSpPr><p:cNvPr id="9" name="Free"/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>"#;
        let shape = parse_shape(snippet).unwrap();
        assert!(shape.position.is_none());
        assert_eq!(shape.fill, FillKind::None);
    }

    #[test]
    fn test_shape_without_name_defaults_empty() {
        let snippet = br#"<p:sp><p:spPr/></p:sp>"#;
        let shape = parse_shape(snippet).unwrap();
        assert_eq!(shape.name, "");
    }

    #[test]
    fn test_no_master_yields_empty() {
        let mut pkg = build_package(&[("ppt/presentation.xml", b"<p/>")]);
        assert!(extract_shapes(&mut pkg).unwrap().is_empty());
    }
}
