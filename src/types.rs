use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    error::EpubError,
    utils::{decode_data_url, extension_from_mime},
};

/// Order in which the pages of the book are traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadingDirection {
    /// Left-to-right, suits standard prose
    Ltr,

    /// Right-to-left, suits reversed-binding content such as manga
    #[default]
    Rtl,
}

impl ReadingDirection {
    /// The value used by `page-progression-direction`
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingDirection::Ltr => "ltr",
            ReadingDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for ReadingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role a page plays in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageType {
    Cover,
    Toc,
    #[default]
    Content,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Cover => "cover",
            PageType::Toc => "toc",
            PageType::Content => "content",
        }
    }
}

/// Layout flags of a single content image
///
/// One `PageLayout` exists per content image, keyed by position. Layout arrays
/// are rebuilt wholesale whenever images are reordered or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageLayout {
    pub page_type: PageType,

    /// Whether the page wants to be shown as half of a two-page spread
    pub spread: bool,

    pub reading_direction: ReadingDirection,
}

impl PageLayout {
    /// Creates a content page layout
    pub fn new(spread: bool) -> Self {
        Self {
            page_type: PageType::Content,
            spread,
            reading_direction: ReadingDirection::default(),
        }
    }

    pub fn with_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn with_direction(mut self, direction: ReadingDirection) -> Self {
        self.reading_direction = direction;
        self
    }
}

/// A decoded image handed over by the intake
///
/// Assets are immutable once created. The payload is reference counted, so
/// cloning an asset or handing it to the builder never copies the image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Identifier, unique and stable across the session
    pub id: String,

    /// Original file name
    pub name: String,

    /// Mime type, e.g. `image/jpeg`
    pub mime: String,

    /// Raw image bytes
    pub data: Arc<[u8]>,

    /// Position in upload order
    pub position: usize,
}

impl ImageAsset {
    /// Creates an asset from raw bytes and an already known mime type
    pub fn new(id: &str, name: &str, mime: &str, data: impl Into<Arc<[u8]>>, position: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            mime: mime.to_string(),
            data: data.into(),
            position,
        }
    }

    /// Creates an asset from raw bytes, inferring the mime type from the content
    ///
    /// # Return
    /// - `Ok(ImageAsset)`: The payload was recognized as an image
    /// - `Err(EpubError)`: The payload is empty, unrecognized, or not an image
    pub fn from_bytes(id: &str, name: &str, data: Vec<u8>, position: usize) -> Result<Self, EpubError> {
        if data.is_empty() {
            return Err(EpubError::EmptyDataError);
        }

        let kind = infer::get(&data).ok_or_else(|| EpubError::UnknownFileFormat {
            name: name.to_string(),
        })?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(EpubError::UnsupportedImageType {
                name: name.to_string(),
                mime: kind.mime_type().to_string(),
            });
        }

        Ok(Self::new(id, name, kind.mime_type(), data, position))
    }

    /// Creates an asset from a `data:<mime>;base64,<payload>` URL
    ///
    /// The transport prefix is stripped and the payload decoded; the mime type
    /// is taken from the prefix.
    pub fn from_data_url(id: &str, name: &str, url: &str, position: usize) -> Result<Self, EpubError> {
        let (mime, data) = decode_data_url(name, url)?;
        if data.is_empty() {
            return Err(EpubError::EmptyDataError);
        }

        Ok(Self::new(id, name, &mime, data, position))
    }

    /// Size of the payload in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File extension derived from the mime subtype
    pub fn extension(&self) -> &str {
        extension_from_mime(&self.mime)
    }

    /// Encodes the payload back into a data URL, the form previews consume
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

/// A chapter entry of the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub title: String,

    /// Zero-based index into the content image array
    ///
    /// This is not the package page number: covers are not counted.
    pub page_index: usize,
}

impl Chapter {
    pub fn new(id: &str, title: &str, page_index: usize) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            page_index,
        }
    }

    /// Human-readable page number, `page_index + 1`
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }
}

/// Target page dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub const MIN_EDGE: u32 = 100;
    pub const MAX_EDGE: u32 = 2000;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether both edges lie within the accepted range
    pub fn is_sane(&self) -> bool {
        let range = Self::MIN_EDGE..=Self::MAX_EDGE;
        range.contains(&self.width) && range.contains(&self.height)
    }
}

/// Device presets for the target page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookSize {
    #[default]
    KindleStandard,
    KindleLarge,
    KindlePaperwhite,
    IpadStandard,
    MobileFriendly,
    Custom(PageSize),
}

impl BookSize {
    pub fn dimensions(&self) -> PageSize {
        match self {
            BookSize::KindleStandard => PageSize::new(600, 800),
            BookSize::KindleLarge | BookSize::KindlePaperwhite => PageSize::new(758, 1024),
            BookSize::IpadStandard => PageSize::new(768, 1024),
            BookSize::MobileFriendly => PageSize::new(480, 640),
            BookSize::Custom(size) => *size,
        }
    }
}

/// Bibliographic data and layout settings of one synthesis call
///
/// The builder treats this record as a read-only snapshot; every edit happens
/// in the surrounding application before the snapshot is handed over.
#[derive(Debug, Clone, PartialEq)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub description: String,
    pub publisher: String,

    /// Language code, e.g. `ja` or `en`
    pub language: String,

    /// Governs the progression of the whole package
    pub page_direction: ReadingDirection,

    pub book_size: BookSize,

    pub front_cover: Option<ImageAsset>,
    pub back_cover: Option<ImageAsset>,

    /// Whether the chapter index page is emitted
    pub enable_toc: bool,

    /// Chapters, sorted ascending by page index
    pub chapters: Vec<Chapter>,

    /// One layout per content image
    pub page_layouts: Vec<PageLayout>,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            title: "My Image Book".to_string(),
            author: "Unknown Author".to_string(),
            description: "A book created from images".to_string(),
            publisher: "Image to EPUB Converter".to_string(),
            language: "ja".to_string(),
            page_direction: ReadingDirection::Rtl,
            book_size: BookSize::default(),
            front_cover: None,
            back_cover: None,
            enable_toc: false,
            chapters: vec![],
            page_layouts: vec![],
        }
    }
}

impl BookMetadata {
    /// Whether the chapter index page and its navigation entries are emitted
    pub fn has_chapter_index(&self) -> bool {
        self.enable_toc && !self.chapters.is_empty()
    }
}

/// Kind of a preview group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadKind {
    /// A page shown on its own
    Single,

    /// Two pages shown side by side
    Spread,

    /// A spread-flagged page without a partner
    SpreadSingle,
}

/// A group of pages shown together in the preview
///
/// Always derived from the layout array, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadPair {
    pub kind: SpreadKind,

    /// One or two content page indices, in visual slot order
    pub pages: Vec<usize>,
}

impl SpreadPair {
    pub fn is_spread(&self) -> bool {
        self.kind != SpreadKind::Single
    }
}

/// Left/right attribute of a spread page in the exported package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadRole {
    Left,
    Right,
}

impl SpreadRole {
    /// The spine item property naming this role
    pub fn property(&self) -> &'static str {
        match self {
            SpreadRole::Left => "page-spread-left",
            SpreadRole::Right => "page-spread-right",
        }
    }
}

/// A page of the package, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageManifestEntry {
    /// Manifest id of the image
    pub id: String,

    /// Image path relative to the package document, e.g. `images/image_0002.png`
    pub href: String,

    pub mime: String,

    /// 1-based package page number
    pub page_number: usize,

    pub is_cover: bool,
    pub is_back_cover: bool,
    pub spread: bool,
    pub page_type: PageType,

    /// Index into the content image array, `None` for covers
    pub original_index: Option<usize>,
}

impl PageManifestEntry {
    /// Name of the content document showing this page
    pub fn document_name(&self) -> String {
        if self.is_cover {
            "cover.xhtml".to_string()
        } else if self.is_back_cover {
            "back_cover.xhtml".to_string()
        } else {
            crate::utils::page_file_name(self.page_number)
        }
    }

    /// Manifest id of the content document showing this page
    pub fn document_id(&self) -> String {
        if self.is_cover {
            "cover-page".to_string()
        } else if self.is_back_cover {
            "back-cover-page".to_string()
        } else {
            format!("page{}", self.page_number)
        }
    }

    pub fn is_content(&self) -> bool {
        !self.is_cover && !self.is_back_cover
    }
}

/// Represents a navigation point of the legacy navigation map
#[derive(Debug, Eq, Clone)]
pub struct NavPoint {
    /// Identifier suffix, the point is written as `navpoint-{id}`
    pub id: String,

    /// The display label of this navigation point
    pub label: String,

    /// The content document this navigation point references
    pub content: String,

    /// The 1-based reading order position of this navigation point
    pub play_order: usize,
}

impl Ord for NavPoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.play_order.cmp(&other.play_order)
    }
}

impl PartialOrd for NavPoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NavPoint {
    fn eq(&self, other: &Self) -> bool {
        self.play_order == other.play_order
    }
}
