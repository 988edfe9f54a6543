//! The design profile data model.
//!
//! A [`DesignProfile`] is the aggregate output of template analysis: the theme
//! color and font schemes, a classified catalog of slide layouts, decorative
//! shapes from the slide master, and an optional icon library. Every type here
//! is serde-serializable because profiles are persisted as JSON cache entries.

use serde::{Deserialize, Serialize};

/// English Metric Units per inch, the linear unit for all on-slide geometry.
pub const EMU_PER_INCH: i64 = 914_400;

/// The 12 theme color slots, in document order.
pub const COLOR_SLOTS: [&str; 12] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

/// The 12-slot color scheme extracted from the theme part.
///
/// Always carries exactly these 12 slots; a slot missing from the source
/// theme defaults to `#000000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub dk1: String,
    pub lt1: String,
    pub dk2: String,
    pub lt2: String,
    pub accent1: String,
    pub accent2: String,
    pub accent3: String,
    pub accent4: String,
    pub accent5: String,
    pub accent6: String,
    pub hlink: String,
    #[serde(rename = "folHlink")]
    pub fol_hlink: String,
}

impl ColorScheme {
    /// Get a slot value by its document-order name, e.g. `"accent1"`.
    pub fn slot(&self, name: &str) -> Option<&str> {
        match name {
            "dk1" => Some(&self.dk1),
            "lt1" => Some(&self.lt1),
            "dk2" => Some(&self.dk2),
            "lt2" => Some(&self.lt2),
            "accent1" => Some(&self.accent1),
            "accent2" => Some(&self.accent2),
            "accent3" => Some(&self.accent3),
            "accent4" => Some(&self.accent4),
            "accent5" => Some(&self.accent5),
            "accent6" => Some(&self.accent6),
            "hlink" => Some(&self.hlink),
            "folHlink" => Some(&self.fol_hlink),
            _ => None,
        }
    }

    /// Set a slot value by name. Unknown names are ignored.
    pub fn set_slot(&mut self, name: &str, value: String) {
        match name {
            "dk1" => self.dk1 = value,
            "lt1" => self.lt1 = value,
            "dk2" => self.dk2 = value,
            "lt2" => self.lt2 = value,
            "accent1" => self.accent1 = value,
            "accent2" => self.accent2 = value,
            "accent3" => self.accent3 = value,
            "accent4" => self.accent4 = value,
            "accent5" => self.accent5 = value,
            "accent6" => self.accent6 = value,
            "hlink" => self.hlink = value,
            "folHlink" => self.fol_hlink = value,
            _ => {},
        }
    }

    /// The six accent colors in order.
    pub fn accent_colors(&self) -> [&str; 6] {
        [
            &self.accent1,
            &self.accent2,
            &self.accent3,
            &self.accent4,
            &self.accent5,
            &self.accent6,
        ]
    }
}

impl Default for ColorScheme {
    /// All 12 slots set to `#000000`.
    fn default() -> Self {
        let black = || "#000000".to_string();
        Self {
            dk1: black(),
            lt1: black(),
            dk2: black(),
            lt2: black(),
            accent1: black(),
            accent2: black(),
            accent3: black(),
            accent4: black(),
            accent5: black(),
            accent6: black(),
            hlink: black(),
            fol_hlink: black(),
        }
    }
}

/// Major (heading) and minor (body) font family names from the theme.
///
/// Either may be empty when the theme omits the latin typeface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontScheme {
    pub major: String,
    pub minor: String,
}

/// A text formatting specification derived from the theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
    pub alignment: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size_pt: 18.0,
            bold: false,
            italic: false,
            color: String::new(),
            alignment: "left".to_string(),
        }
    }
}

/// The coarse placeholder type taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderKind {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "body")]
    Body,
    #[serde(rename = "pic")]
    Picture,
    #[serde(rename = "ftr")]
    Footer,
    #[serde(rename = "dt")]
    Date,
    #[serde(rename = "sldNum")]
    SlideNumber,
    #[serde(rename = "generic")]
    Generic,
}

impl PlaceholderKind {
    /// Footer, date and slide-number slots are page chrome, not content.
    /// The classifier ignores them when deriving a layout's composition.
    #[inline]
    pub fn is_chrome(self) -> bool {
        matches!(self, Self::Footer | Self::Date | Self::SlideNumber)
    }
}

/// A typed, positioned content slot within a slide layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    /// Placeholder index from `p:ph@idx`.
    pub idx: u32,
    pub kind: PlaceholderKind,
    pub name: String,
    /// Left position in EMU.
    pub left: i64,
    /// Top position in EMU.
    pub top: i64,
    /// Width in EMU.
    pub width: i64,
    /// Height in EMU.
    pub height: i64,
    pub is_vertical: bool,
}

/// The closed layout classification taxonomy.
///
/// `Utility` is the fallback for layouts that match no rule and have no
/// classifiable placeholder composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Title,
    ThankYou,
    Divider,
    MissionVision,
    Hexagon,
    FullImage,
    ProfileGrid,
    DeviceMockup,
    BlankCanvas,
    // snake_case puts no underscore before the digit; the wire names carry
    // one, so these three are renamed explicitly.
    #[serde(rename = "multi_column_4")]
    MultiColumn4,
    #[serde(rename = "multi_column_3")]
    MultiColumn3,
    #[serde(rename = "multi_column_2")]
    MultiColumn2,
    ContentImageRight,
    ContentImageLeft,
    ContentText,
    Utility,
}

/// A slide layout with its classification and placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    /// 0-based index in the template.
    pub index: usize,
    /// Human-readable layout name.
    pub name: String,
    /// Classified category used for matching during composition.
    pub content_category: ContentCategory,
    pub placeholders: Vec<PlaceholderInfo>,
    pub has_background_fill: bool,
    /// `#RRGGBB` when a solid background fill exists, else empty.
    pub background_color: String,
}

impl LayoutInfo {
    pub fn title_placeholders(&self) -> impl Iterator<Item = &PlaceholderInfo> {
        self.placeholders
            .iter()
            .filter(|p| p.kind == PlaceholderKind::Title)
    }

    pub fn body_placeholders(&self) -> impl Iterator<Item = &PlaceholderInfo> {
        self.placeholders
            .iter()
            .filter(|p| p.kind == PlaceholderKind::Body)
    }

    pub fn picture_placeholders(&self) -> impl Iterator<Item = &PlaceholderInfo> {
        self.placeholders
            .iter()
            .filter(|p| p.kind == PlaceholderKind::Picture)
    }

    /// Placeholders that can receive generated content (body or generic).
    pub fn content_placeholders(&self) -> impl Iterator<Item = &PlaceholderInfo> {
        self.placeholders
            .iter()
            .filter(|p| matches!(p.kind, PlaceholderKind::Body | PlaceholderKind::Generic))
    }
}

/// An icon captured from a toolkit package.
///
/// The `xml_snippet` is an opaque, self-contained serialization of the shape
/// subtree. Consumers clone it verbatim into other packages and never parse
/// it, so it is deliberately kept as text rather than a structural type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconInfo {
    pub name: String,
    /// 1-based slide number in the toolkit.
    pub source_slide: usize,
    /// 0-based index among the captured shapes of that slide.
    pub shape_index: usize,
    pub category: String,
    /// Sorted, deduplicated lowercase tokens, the sole index for icon search.
    pub keywords: Vec<String>,
    pub xml_snippet: String,
    /// Width in EMU.
    pub width: i64,
    /// Height in EMU.
    pub height: i64,
}

/// Shape kind for decorative master shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Shape,
    Group,
    Picture,
}

/// Fill style of a decorative shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillKind {
    Solid,
    None,
}

/// A geometric box in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmuRect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

/// A non-placeholder decorative shape found on the slide master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    /// Where the shape was found; currently always `"master"`.
    pub source: String,
    pub name: String,
    /// `None` when the shape carries no transform.
    pub position: Option<EmuRect>,
    pub fill: FillKind,
    /// Direct child shape count; only meaningful for groups.
    pub child_count: usize,
}

/// Presentation slide dimensions in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: i64,
    pub height: i64,
}

impl Default for SlideSize {
    /// 13.333 x 7.5 inches, the standard 16:9 deck.
    fn default() -> Self {
        Self {
            width: 12_192_000,
            height: 6_858_000,
        }
    }
}

impl SlideSize {
    #[inline]
    pub fn width_inches(&self) -> f64 {
        self.width as f64 / EMU_PER_INCH as f64
    }

    #[inline]
    pub fn height_inches(&self) -> f64 {
        self.height as f64 / EMU_PER_INCH as f64
    }
}

/// The complete design profile extracted from a template.
///
/// Created fresh per analysis and immutable once returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignProfile {
    pub template_name: String,
    pub template_path: String,
    pub slide_size: SlideSize,
    pub colors: ColorScheme,
    pub fonts: FontScheme,
    pub title_style: TextStyle,
    pub body_style: TextStyle,
    pub layouts: Vec<LayoutInfo>,
    pub icons: Vec<IconInfo>,
    pub num_sample_slides: usize,
    pub background_shapes: Vec<ShapeDescriptor>,
}

impl DesignProfile {
    /// All layouts classified into the given category, in template order.
    pub fn layouts_in_category(&self, category: ContentCategory) -> Vec<&LayoutInfo> {
        self.layouts
            .iter()
            .filter(|l| l.content_category == category)
            .collect()
    }
}
