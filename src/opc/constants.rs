//! Constant values related to the Open Packaging Convention.
//!
//! Content type URIs (like MIME-types) that specify a part's format, XML
//! namespaces, and the well-known part paths of a PresentationML package.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    /// Main part of a presentation-role package (.pptx).
    pub const PML_PRESENTATION_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    /// Main part of a template-role package (.potx).
    pub const PML_TEMPLATE_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";
    pub const PML_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const PML_SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const PML_SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const OFC_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
}

/// XML namespace URIs used in PresentationML parts
pub mod namespace {
    /// DrawingML main namespace (`a:` prefix)
    pub const DRAWINGML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// PresentationML main namespace (`p:` prefix)
    pub const PRESENTATIONML: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// Office relationships namespace (`r:` prefix)
    pub const OFC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// OPC relationships namespace (the `.rels` document namespace)
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";
}

/// Well-known member names within a PresentationML package
pub mod part_path {
    /// The package-level content-type manifest.
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";

    /// The main presentation part.
    pub const PRESENTATION: &str = "ppt/presentation.xml";

    /// Relationship manifest of the primary slide master.
    pub const MASTER1_RELS: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";

    /// The primary slide master.
    pub const MASTER1: &str = "ppt/slideMasters/slideMaster1.xml";

    /// Conventional location of the default theme part.
    pub const THEME1: &str = "ppt/theme/theme1.xml";

    /// Prefix shared by all theme parts.
    pub const THEME_PREFIX: &str = "ppt/theme/theme";

    /// Prefix shared by all slide master parts.
    pub const MASTER_PREFIX: &str = "ppt/slideMasters/slideMaster";

    /// Prefix shared by all slide layout parts.
    pub const LAYOUT_PREFIX: &str = "ppt/slideLayouts/slideLayout";

    /// Prefix shared by all slide parts.
    pub const SLIDE_PREFIX: &str = "ppt/slides/slide";
}
