//! Shared quick-xml helpers for the extractors.
//!
//! All extractors work the same way: stream over a part's events, capture the
//! subtree of an interesting element verbatim, then run small scans over the
//! captured snippet. Capturing keeps the outer loops simple and, for icons,
//! doubles as the serialization that downstream consumers clone into other
//! packages.

use crate::analyzer::error::{AnalyzerError, Result};
use crate::opc::constants::namespace as ns;
use crate::profile::EmuRect;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Get an attribute value by local name, e.g. `b"type"` matches both
/// `type="body"` and a prefixed variant.
pub fn attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name {
            return std::str::from_utf8(&attr.value).ok().map(String::from);
        }
    }
    None
}

/// Capture an element subtree verbatim, including the already-consumed start
/// tag with its attributes.
///
/// `empty` marks a self-closing start event. When `inject_ns` is set, the
/// standard `p:`/`a:`/`r:` namespace declarations are added to the root tag
/// if absent, so the captured snippet stays self-contained when cloned into
/// another document.
pub fn capture_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    empty: bool,
    inject_ns: bool,
) -> Result<Vec<u8>> {
    let mut xml = Vec::new();
    write_start_tag(&mut xml, start, inject_ns);

    if empty {
        // Replace the closing '>' with a self-closing marker.
        xml.pop();
        xml.extend_from_slice(b"/>");
        return Ok(xml);
    }

    let mut depth = 1usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                write_start_tag(&mut xml, &e, false);
            },
            Ok(Event::Empty(e)) => {
                write_start_tag(&mut xml, &e, false);
                xml.pop();
                xml.extend_from_slice(b"/>");
            },
            Ok(Event::End(e)) => {
                xml.extend_from_slice(b"</");
                xml.extend_from_slice(e.name().as_ref());
                xml.push(b'>');
                depth -= 1;
                if depth == 0 {
                    return Ok(xml);
                }
            },
            Ok(Event::Text(e)) => {
                xml.extend_from_slice(e.as_ref());
            },
            Ok(Event::CData(e)) => {
                xml.extend_from_slice(b"<![CDATA[");
                xml.extend_from_slice(e.as_ref());
                xml.extend_from_slice(b"]]>");
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
    }

    Err(AnalyzerError::Xml(
        "unexpected end of element subtree".to_string(),
    ))
}

fn write_start_tag(xml: &mut Vec<u8>, e: &BytesStart, inject_ns: bool) {
    xml.push(b'<');
    xml.extend_from_slice(e.name().as_ref());

    let mut has_p = false;
    let mut has_a = false;
    let mut has_r = false;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"xmlns:p" => has_p = true,
            b"xmlns:a" => has_a = true,
            b"xmlns:r" => has_r = true,
            _ => {},
        }
        xml.push(b' ');
        xml.extend_from_slice(attr.key.as_ref());
        xml.extend_from_slice(b"=\"");
        xml.extend_from_slice(&attr.value);
        xml.push(b'"');
    }

    if inject_ns {
        for (present, prefix, uri) in [
            (has_p, &b"xmlns:p"[..], ns::PRESENTATIONML),
            (has_a, &b"xmlns:a"[..], ns::DRAWINGML),
            (has_r, &b"xmlns:r"[..], ns::OFC_RELATIONSHIPS),
        ] {
            if !present {
                xml.push(b' ');
                xml.extend_from_slice(prefix);
                xml.extend_from_slice(b"=\"");
                xml.extend_from_slice(uri.as_bytes());
                xml.push(b'"');
            }
        }
    }

    xml.push(b'>');
}

/// Whether the snippet contains an element with the given local name.
pub fn contains_element(xml: &[u8], local: &[u8]) -> bool {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == local {
                    return true;
                }
            },
            Ok(Event::Eof) | Err(_) => return false,
            _ => {},
        }
    }
}

/// First value of `attr_name` on an element with the given local name.
pub fn first_attr_of(xml: &[u8], local: &[u8], attr_name: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == local {
                    return attr(&e, attr_name);
                }
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {},
        }
    }
}

/// First non-empty value of `attr_name` across every element with the given
/// local name.
pub fn first_nonempty_attr_of(xml: &[u8], local: &[u8], attr_name: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == local
                    && let Some(value) = attr(&e, attr_name)
                    && !value.is_empty()
                {
                    return Some(value);
                }
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {},
        }
    }
}

/// Parse the first transform (`a:xfrm`) in the snippet.
///
/// Position comes from `a:off`, extent from `a:ext`; a half missing from the
/// transform defaults to zero. Returns `None` when the snippet carries no
/// transform at all.
pub fn parse_xfrm(xml: &[u8]) -> Option<EmuRect> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut in_xfrm = false;
    let mut found = false;
    let mut rect = EmuRect {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"xfrm" if !found => {
                    in_xfrm = true;
                    found = true;
                },
                b"off" if in_xfrm => {
                    rect.left = attr_i64(&e, b"x");
                    rect.top = attr_i64(&e, b"y");
                },
                b"ext" if in_xfrm => {
                    rect.width = attr_i64(&e, b"cx");
                    rect.height = attr_i64(&e, b"cy");
                },
                _ => {},
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"xfrm" {
                    break;
                }
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {},
        }
    }

    found.then_some(rect)
}

/// Concatenated text runs (`a:t`) of the snippet, in document order.
///
/// Run content is taken untrimmed; inter-run whitespace is significant.
pub fn collect_text(xml: &[u8]) -> String {
    let mut reader = Reader::from_reader(xml);

    let mut text = String::new();
    let mut in_run = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_run = true;
                }
            },
            Ok(Event::Text(e)) if in_run => {
                if let Ok(t) = std::str::from_utf8(e.as_ref()) {
                    text.push_str(t);
                }
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_run = false;
                }
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {},
        }
    }
    text
}

fn attr_i64(e: &BytesStart, name: &[u8]) -> i64 {
    attr(e, name)
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}
