//! Icon harvesting from a companion toolkit deck.
//!
//! Design systems often ship a second deck whose slides are galleries of
//! reusable vector art, one themed gallery per slide. Each non-placeholder
//! shape on those slides is captured verbatim as a self-contained XML
//! snippet, tagged with searchable keywords, and indexed by the slide's
//! caption. The toolkit is optional: a missing or unreadable deck yields an
//! empty library, never an error.

use crate::analyzer::error::Result;
use crate::analyzer::layout::part_index;
use crate::analyzer::xmlutil;
use crate::opc::constants::part_path;
use crate::opc::package::PptxPackage;
use crate::profile::IconInfo;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Captions longer than this are running text, not gallery labels.
const MAX_CATEGORY_LEN: usize = 50;

/// Harvest the icon library from a toolkit deck, if one is available.
pub fn extract_icons(toolkit_path: Option<&Path>) -> Result<Vec<IconInfo>> {
    let Some(path) = toolkit_path else {
        return Ok(Vec::new());
    };
    if !path.exists() {
        debug!(path = %path.display(), "no toolkit deck, skipping icon harvest");
        return Ok(Vec::new());
    }

    let mut pkg = match PptxPackage::open_for_analysis(path) {
        Ok(pkg) => pkg,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "toolkit deck unreadable, skipping icon harvest");
            return Ok(Vec::new());
        },
    };

    let mut slides = pkg.members_matching(part_path::SLIDE_PREFIX, ".xml");
    slides.sort_by_key(|name| part_index(name));

    let mut icons = Vec::new();
    for (pos, member) in slides.iter().enumerate() {
        let slide_num = pos + 1;
        let xml = match pkg.read(member) {
            Ok(xml) => xml,
            Err(err) => {
                warn!(member, error = %err, "skipping unreadable toolkit slide");
                continue;
            },
        };
        if let Err(err) = harvest_slide(&xml, slide_num, &mut icons) {
            warn!(member, error = %err, "skipping malformed toolkit slide");
        }
    }

    debug!(count = icons.len(), "harvested toolkit icons");
    Ok(icons)
}

/// Capture the qualifying shapes of one gallery slide.
fn harvest_slide(xml: &[u8], slide_num: usize, icons: &mut Vec<IconInfo>) -> Result<()> {
    let category = slide_category(xml, slide_num)?;

    // Untrimmed: captured snippets must keep run text byte-faithful.
    let mut reader = Reader::from_reader(xml);

    let mut in_sp_tree = false;
    let mut shape_index = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"spTree" => in_sp_tree = true,
                b"sp" | b"grpSp" | b"cxnSp" if in_sp_tree => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, true)?;
                    if !xmlutil::contains_element(&snippet, b"ph") {
                        icons.push(build_icon(&snippet, slide_num, shape_index, &category));
                        shape_index += 1;
                    }
                },
                b"pic" | b"graphicFrame" if in_sp_tree => {
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
    Ok(())
}

fn build_icon(snippet: &[u8], slide_num: usize, shape_index: usize, category: &str) -> IconInfo {
    let name = xmlutil::first_nonempty_attr_of(snippet, b"cNvPr", b"name")
        .unwrap_or_else(|| format!("icon_{slide_num}_{shape_index}"));
    let rect = xmlutil::parse_xfrm(snippet);
    IconInfo {
        keywords: keywords_for(&name, category),
        name,
        source_slide: slide_num,
        shape_index,
        category: category.to_string(),
        xml_snippet: String::from_utf8_lossy(snippet).into_owned(),
        width: rect.map(|r| r.width).unwrap_or(0),
        height: rect.map(|r| r.height).unwrap_or(0),
    }
}

/// The gallery caption: text of the first shape with a short non-empty run.
///
/// Falls back to a positional label when the slide carries no usable text.
fn slide_category(xml: &[u8], slide_num: usize) -> Result<String> {
    let mut reader = Reader::from_reader(xml);

    let mut in_sp_tree = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"spTree" => in_sp_tree = true,
                b"sp" if in_sp_tree => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, false)?;
                    let text = xmlutil::collect_text(&snippet);
                    let text = text.trim();
                    if !text.is_empty() && text.len() < MAX_CATEGORY_LEN {
                        return Ok(text.to_lowercase());
                    }
                },
                // Only top-level shapes carry the gallery caption; a short
                // label inside grouped art must not hijack it.
                b"grpSp" | b"graphicFrame" | b"pic" | b"cxnSp" if in_sp_tree => {
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
    Ok(format!("slide_{slide_num}"))
}

/// Searchable keywords from a shape name and its gallery caption.
///
/// Splits on non-alphabetic characters, keeps words longer than two
/// characters, lowercases and deduplicates them in sorted order.
fn keywords_for(name: &str, category: &str) -> Vec<String> {
    let mut words = BTreeSet::new();
    for source in [name, category] {
        for word in source.split(|c: char| !c.is_alphabetic()) {
            if word.len() > 2 {
                words.insert(word.to_lowercase());
            }
        }
    }
    words.into_iter().collect()
}
