//! Relationship manifests for OPC packages.
//!
//! Every part may carry a `.rels` manifest linking it to other parts (or to
//! external resources). This module parses those manifests read-only and
//! preserves document order, which matters: theme resolution picks the first
//! theme-looking target the master's manifest declares.

use crate::opc::error::Result;
use crate::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference: a part reference relative to the source's base
    /// URI, or an absolute URL for external relationships
    target_ref: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Resolve the target to an absolute part name against the given base.
    ///
    /// Only meaningful for internal relationships.
    pub fn target_partname(&self, base_uri: &str) -> Result<PackURI> {
        PackURI::from_rel_ref(base_uri, &self.target_ref)
    }
}

/// The relationships of a single source part, in document order.
#[derive(Debug, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Parse a `.rels` manifest.
    ///
    /// Unknown elements are skipped; `Relationship` elements missing an Id or
    /// Target are ignored rather than treated as errors.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() != b"Relationship" {
                        continue;
                    }
                    let mut r_id = String::new();
                    let mut reltype = String::new();
                    let mut target_ref = String::new();
                    let mut is_external = false;
                    for attr in e.attributes().flatten() {
                        let value = std::str::from_utf8(&attr.value)?.to_string();
                        match attr.key.as_ref() {
                            b"Id" => r_id = value,
                            b"Type" => reltype = value,
                            b"Target" => target_ref = value,
                            b"TargetMode" => is_external = value == "External",
                            _ => {},
                        }
                    }
                    if !r_id.is_empty() && !target_ref.is_empty() {
                        rels.push(Relationship {
                            r_id,
                            reltype,
                            target_ref,
                            is_external,
                        });
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {},
            }
        }

        Ok(Self { rels })
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id() == r_id)
    }

    /// The first internal relationship whose target satisfies `pred`,
    /// in document order.
    pub fn first_target_matching(&self, pred: impl Fn(&str) -> bool) -> Option<&Relationship> {
        self.rels
            .iter()
            .find(|rel| !rel.is_external() && pred(rel.target_ref()))
    }

    /// Iterate over all relationships in document order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Number of relationships in the manifest.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the manifest is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}
