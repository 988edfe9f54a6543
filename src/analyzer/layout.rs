//! Slide layout cataloging and classification.
//!
//! Every layout is assigned exactly one [`ContentCategory`] by an ordered,
//! first-match rule list over its (bilingual, free-text) name and its
//! placeholder composition. Rule order is a hard contract: later rules never
//! override an earlier match, even when both would fire. Classification never
//! fails: a layout matching nothing resolves through the composition
//! fallback, ultimately to `Utility`.

use crate::analyzer::error::Result;
use crate::analyzer::xmlutil;
use crate::opc::constants::part_path;
use crate::opc::package::PptxPackage;
use crate::opc::packuri::PackURI;
use crate::profile::{ContentCategory, LayoutInfo, PlaceholderInfo, PlaceholderKind};
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::warn;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).unwrap());
    };
}

pattern!(TITLE, r"\btitle\s*[123]?\b");
pattern!(TITLE_EXCLUDE, r"only|solo|imagen|text|vertical");
pattern!(THANK_YOU, r"thank\s*you");
pattern!(DIVIDER, r"divider|encabezado\s*de\s*secci");
pattern!(MISSION_VISION, r"mission.*vision");
pattern!(FULL_IMAGE, r"full\s*image");
pattern!(PROFILE, r"profile|multiple.*profile");
pattern!(DEVICE, r"laptop|device|phone|tablet");
pattern!(BLANK, r"\bblank\b|en\s*blanco");
pattern!(TITLE_ONLY, r"(title|titulo)\s*(only|solo)|solo\s*el\s*titulo");
pattern!(COLUMNS_4, r"4\s*column");
pattern!(COLUMNS_3, r"3\s*column");
pattern!(COLUMNS_2, r"half.*column|dos\s*objetos|comparacion|two\s*level");
pattern!(IMAGE_RIGHT, r"image\s*right|imagen.*right");
pattern!(IMAGE_LEFT, r"image\s*left|half\s*image|imagen.*left");
pattern!(TEXT_ONLY, r"text\s*only|contenido|picture.*caption|titulo.*texto");

/// Placeholder composition of a layout, ignoring page chrome
/// (footer/date/slide-number slots).
#[derive(Debug, Default, Clone, Copy)]
struct Composition {
    content: usize,
    body: usize,
    pic: usize,
    generic: usize,
}

impl Composition {
    fn of(placeholders: &[PlaceholderInfo]) -> Self {
        let mut comp = Self::default();
        for ph in placeholders {
            if ph.kind.is_chrome() {
                continue;
            }
            comp.content += 1;
            match ph.kind {
                PlaceholderKind::Body => comp.body += 1,
                PlaceholderKind::Picture => comp.pic += 1,
                PlaceholderKind::Generic => comp.generic += 1,
                _ => {},
            }
        }
        comp
    }
}

type RulePredicate = fn(&str, &Composition) -> bool;

/// The classification rules, evaluated left-to-right, first match wins.
///
/// Kept as an ordered sequence of (predicate, category) pairs rather than a
/// lookup table: match order is semantically load-bearing.
static RULES: &[(RulePredicate, ContentCategory)] = &[
    (
        |n, c| TITLE.is_match(n) && !TITLE_EXCLUDE.is_match(n) && c.content <= 3 && c.body <= 1,
        ContentCategory::Title,
    ),
    (|n, _| THANK_YOU.is_match(n), ContentCategory::ThankYou),
    (|n, _| DIVIDER.is_match(n), ContentCategory::Divider),
    (|n, _| MISSION_VISION.is_match(n), ContentCategory::MissionVision),
    (|n, _| n.contains("hexagon"), ContentCategory::Hexagon),
    (|n, _| FULL_IMAGE.is_match(n), ContentCategory::FullImage),
    (|n, _| PROFILE.is_match(n), ContentCategory::ProfileGrid),
    (|n, _| DEVICE.is_match(n), ContentCategory::DeviceMockup),
    (|n, _| BLANK.is_match(n), ContentCategory::BlankCanvas),
    (|n, _| TITLE_ONLY.is_match(n), ContentCategory::BlankCanvas),
    (
        |n, c| COLUMNS_4.is_match(n) || c.pic >= 4,
        ContentCategory::MultiColumn4,
    ),
    (
        |n, c| COLUMNS_3.is_match(n) || (c.pic == 3 && c.body >= 3),
        ContentCategory::MultiColumn3,
    ),
    (|n, _| COLUMNS_2.is_match(n), ContentCategory::MultiColumn2),
    (|n, _| IMAGE_RIGHT.is_match(n), ContentCategory::ContentImageRight),
    (|n, _| IMAGE_LEFT.is_match(n), ContentCategory::ContentImageLeft),
    (|n, _| TEXT_ONLY.is_match(n), ContentCategory::ContentText),
];

/// Classify a layout by name and placeholder composition.
pub fn classify(name: &str, placeholders: &[PlaceholderInfo]) -> ContentCategory {
    let name = name.to_lowercase();
    let comp = Composition::of(placeholders);

    for (predicate, category) in RULES {
        if predicate(&name, &comp) {
            return *category;
        }
    }

    // No name rule matched: fall back to composition alone.
    if comp.pic >= 1 && comp.body >= 1 {
        ContentCategory::ContentImageRight
    } else if comp.body >= 2 || comp.generic >= 2 {
        ContentCategory::MultiColumn2
    } else if comp.body == 1 || comp.generic == 1 {
        ContentCategory::ContentText
    } else {
        ContentCategory::Utility
    }
}

/// Map the `p:ph@type` attribute to the coarse placeholder taxonomy.
///
/// The explicit attribute always wins when present; any unrecognized value
/// (obj, chart, tbl, media, ...) and an absent attribute both land on
/// `Generic`, preserving the body-versus-generic distinction the classifier
/// fallback relies on.
fn placeholder_kind(type_attr: Option<&str>) -> PlaceholderKind {
    match type_attr {
        Some("title") | Some("ctrTitle") => PlaceholderKind::Title,
        Some("body") | Some("subTitle") => PlaceholderKind::Body,
        Some("pic") => PlaceholderKind::Picture,
        Some("ftr") => PlaceholderKind::Footer,
        Some("dt") => PlaceholderKind::Date,
        Some("sldNum") => PlaceholderKind::SlideNumber,
        _ => PlaceholderKind::Generic,
    }
}

/// Parse a captured `p:sp` snippet into a placeholder, if it carries one.
fn parse_placeholder(snippet: &[u8]) -> Option<PlaceholderInfo> {
    if !xmlutil::contains_element(snippet, b"ph") {
        return None;
    }

    let type_attr = xmlutil::first_attr_of(snippet, b"ph", b"type");
    let idx = xmlutil::first_attr_of(snippet, b"ph", b"idx")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let name = xmlutil::first_attr_of(snippet, b"cNvPr", b"name").unwrap_or_default();
    let rect = xmlutil::parse_xfrm(snippet).unwrap_or(crate::profile::EmuRect {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    });
    let is_vertical = xmlutil::first_attr_of(snippet, b"bodyPr", b"vert")
        .is_some_and(|v| matches!(v.as_str(), "vert" | "vert270" | "wordArtVert"));

    Some(PlaceholderInfo {
        idx,
        kind: placeholder_kind(type_attr.as_deref()),
        name,
        left: rect.left,
        top: rect.top,
        width: rect.width,
        height: rect.height,
        is_vertical,
    })
}

/// Extracted per-layout raw facts before classification.
struct LayoutParts {
    name: Option<String>,
    placeholders: Vec<PlaceholderInfo>,
    background_color: Option<String>,
}

/// Single pass over a layout part: name, placeholder shapes, background.
fn parse_layout_xml(xml: &[u8]) -> Result<LayoutParts> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut name = None;
    let mut placeholders = Vec::new();
    let mut background_color = None;
    let mut in_sp_tree = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"cSld" => {
                    if name.is_none() {
                        name = xmlutil::attr(e, b"name");
                    }
                },
                b"bg" => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, false)?;
                    background_color = xmlutil::first_attr_of(&snippet, b"srgbClr", b"val");
                },
                b"spTree" => in_sp_tree = true,
                b"sp" if in_sp_tree => {
                    let snippet = xmlutil::capture_element(&mut reader, e, false, false)?;
                    if let Some(ph) = parse_placeholder(&snippet) {
                        placeholders.push(ph);
                    }
                },
                // Placeholders never live inside groups or frames; skip them
                // so their nested shapes don't read as top-level.
                b"grpSp" | b"graphicFrame" | b"pic" | b"cxnSp" if in_sp_tree => {
                    reader.read_to_end(e.name())?;
                },
                _ => {},
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"cSld" && name.is_none() {
                    name = xmlutil::attr(e, b"name");
                }
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

    Ok(LayoutParts {
        name,
        placeholders,
        background_color,
    })
}

/// Enumerate and classify every slide layout in the package.
///
/// Layout parts are visited in ascending numeric order; a layout that fails
/// to parse is cataloged with defaults rather than aborting the analysis.
pub fn extract_layouts(pkg: &mut PptxPackage) -> Result<Vec<LayoutInfo>> {
    let mut names = pkg.members_matching(part_path::LAYOUT_PREFIX, ".xml");
    names.sort_by_key(|n| part_index(n));

    let mut layouts = Vec::with_capacity(names.len());
    for (index, member) in names.iter().enumerate() {
        let xml = pkg.read(member)?;
        let parts = match parse_layout_xml(&xml) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(layout = %member, %err, "skipping malformed layout part");
                LayoutParts {
                    name: None,
                    placeholders: Vec::new(),
                    background_color: None,
                }
            },
        };

        let name = parts
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Layout {index}"));
        let content_category = classify(&name, &parts.placeholders);

        layouts.push(LayoutInfo {
            index,
            name,
            content_category,
            placeholders: parts.placeholders,
            has_background_fill: parts.background_color.is_some(),
            background_color: parts
                .background_color
                .map(|c| format!("#{c}"))
                .unwrap_or_default(),
        });
    }

    Ok(layouts)
}

/// Numeric part index for ordering, e.g. 12 for `.../slideLayout12.xml`.
pub(crate) fn part_index(membername: &str) -> u32 {
    PackURI::new(format!("/{membername}"))
        .ok()
        .and_then(|uri| uri.idx())
        .unwrap_or(u32::MAX)
}
