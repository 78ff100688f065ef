//! Epub Builder
//!
//! This module turns an ordered list of images and a metadata snapshot into a
//! finished fixed-layout EPUB package. The `EpubBuilder` structure carries the
//! packaging configuration; a synthesis run walks through fixed phases
//! (validate, embed images, emit documents, finalize) and reports its progress
//! through a callback.
//!
//! ## Usage
//!
//! ```rust, no_run
//! # async fn run() -> Result<(), image_epub::error::EpubError> {
//! use image_epub::{
//!     builder::EpubBuilder,
//!     layout::default_page_layouts,
//!     types::{BookMetadata, ImageAsset, ReadingDirection},
//! };
//!
//! let images = vec![ImageAsset::from_bytes("p1", "p1.png", std::fs::read("p1.png")?, 0)?];
//! let metadata = BookMetadata {
//!     title: "Test Book".to_string(),
//!     page_direction: ReadingDirection::Rtl,
//!     page_layouts: default_page_layouts(images.len(), ReadingDirection::Rtl),
//!     ..Default::default()
//! };
//!
//! let mut builder = EpubBuilder::new();
//! builder.set_compression_level(9).set_strict(true);
//! builder
//!     .make(&images, &metadata, "output.epub", |value| println!("{value:.0}%"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Notes
//!
//! - The package is assembled in memory; nothing touches the file system
//!   unless `make` is used.
//! - Every run is independent: identifiers and timestamps are generated per
//!   call unless fixed through the setters.

pub mod archive;
pub mod content;
pub mod package;
pub mod style;

use std::{fs, io::Cursor, path::Path};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tokio::task::yield_now;
use uuid::Uuid;

use crate::{
    builder::{
        archive::ArchiveWriter,
        content::{make_navigation_document, make_page_document, make_toc_document},
        package::{PACKAGE_PATH, make_container_xml, make_ncx, make_opf},
        style::make_stylesheet,
    },
    error::{EpubBuilderError, EpubError},
    navigation::{NavLabels, build_navigation},
    pagination::assign_pages,
    types::{BookMetadata, ImageAsset},
    utils::escape_xml,
};

pub(crate) type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Directory holding every content file inside the container
const CONTENT_DIR: &str = "OEBPS";

const MAX_COMPRESSION_LEVEL: i64 = 9;

/// Creates an indenting writer with the XML declaration already written
pub(crate) fn new_writer() -> Result<XmlWriter, EpubError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    Ok(writer)
}

/// Writes `<tag attributes>text</tag>`, escaping the text
pub(crate) fn write_text_element<'a>(
    writer: &mut XmlWriter,
    tag: &str,
    attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    text: &str,
) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new(tag).with_attributes(attributes)))?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_xml(text))))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;

    Ok(())
}

pub(crate) fn into_document(writer: XmlWriter) -> Result<String, EpubError> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// Progress reporter
///
/// Clamps every value to `[0, 100]` and never reports less than before.
struct Progress<F: FnMut(f32)> {
    callback: F,
    last: f32,
}

impl<F: FnMut(f32)> Progress<F> {
    fn new(callback: F) -> Self {
        Self { callback, last: 0.0 }
    }

    fn report(&mut self, value: f32) {
        let value = value.clamp(0.0, 100.0).max(self.last);
        self.last = value;

        (self.callback)(value);
    }
}

/// EPUB Builder
///
/// Packaging configuration shared by any number of synthesis runs. The builder
/// holds no state between runs, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct EpubBuilder {
    /// Deflate level of every entry but `mimetype`
    compression_level: i64,

    /// Fixed package identifier, a fresh `urn:uuid:` is used when unset
    identifier: Option<String>,

    /// Fixed modification timestamp, the current time is used when unset
    modified: Option<DateTime<Utc>>,

    /// Fixed navigation labels, chosen from the book language when unset
    nav_labels: Option<NavLabels>,

    /// Whether the input snapshot is validated before packaging
    strict: bool,
}

impl Default for EpubBuilder {
    fn default() -> Self {
        Self {
            compression_level: MAX_COMPRESSION_LEVEL,
            identifier: None,
            modified: None,
            nav_labels: None,
            strict: true,
        }
    }
}

impl EpubBuilder {
    /// Create a new `EpubBuilder` instance with maximum compression and
    /// validation enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deflate level, from 0 (fastest) to 9 (smallest)
    pub fn set_compression_level(&mut self, level: i64) -> &mut Self {
        self.compression_level = level;

        self
    }

    /// Set a fixed package identifier
    pub fn set_identifier(&mut self, identifier: &str) -> &mut Self {
        self.identifier = Some(identifier.to_string());

        self
    }

    /// Set a fixed modification timestamp
    pub fn set_modified(&mut self, modified: DateTime<Utc>) -> &mut Self {
        self.modified = Some(modified);

        self
    }

    /// Set the labels used by navigation entries and page titles
    pub fn set_nav_labels(&mut self, labels: NavLabels) -> &mut Self {
        self.nav_labels = Some(labels);

        self
    }

    /// Enable or disable validation of the input snapshot
    ///
    /// Without validation, chapters may point past the last page and custom
    /// page sizes are taken as given.
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;

        self
    }

    /// Checks that the snapshot describes a book that can be packaged
    ///
    /// # Error conditions
    /// - No content image
    /// - A chapter pointing outside the content images
    /// - Page dimensions outside `100..=2000` pixels
    /// - A compression level outside `0..=9`
    pub fn validate(&self, images: &[ImageAsset], metadata: &BookMetadata) -> Result<(), EpubError> {
        if images.is_empty() {
            return Err(EpubBuilderError::EmptyImageList.into());
        }

        if let Some(chapter) = metadata
            .chapters
            .iter()
            .find(|chapter| chapter.page_index >= images.len())
        {
            return Err(EpubBuilderError::ChapterOutOfRange {
                title: chapter.title.clone(),
                page_index: chapter.page_index,
                page_count: images.len(),
            }
            .into());
        }

        let page_size = metadata.book_size.dimensions();
        if !page_size.is_sane() {
            return Err(EpubBuilderError::InvalidPageSize {
                width: page_size.width,
                height: page_size.height,
            }
            .into());
        }

        if !(0..=MAX_COMPRESSION_LEVEL).contains(&self.compression_level) {
            return Err(EpubBuilderError::InvalidCompressionLevel {
                level: self.compression_level,
            }
            .into());
        }

        Ok(())
    }

    /// Builds the package in memory
    ///
    /// Progress is reported from 5 to 100. On failure no partial output is
    /// returned.
    ///
    /// # Parameters
    /// - `images`: Content images, in reading order
    /// - `metadata`: Snapshot of the book settings
    /// - `on_progress`: Receives the completion percentage
    ///
    /// # Return
    /// - `Ok(Vec<u8>)`: The finished EPUB container
    /// - `Err(EpubError)`: Validation or packaging failed
    pub async fn generate<F: FnMut(f32)>(
        &self,
        images: &[ImageAsset],
        metadata: &BookMetadata,
        on_progress: F,
    ) -> Result<Vec<u8>, EpubError> {
        let mut progress = Progress::new(on_progress);
        progress.report(5.0);

        if self.strict {
            self.validate(images, metadata)?;
        }
        check_layouts(images, metadata);

        let identifier = match &self.identifier {
            Some(identifier) => identifier.clone(),
            None => format!("urn:uuid:{}", Uuid::new_v4()),
        };
        let modified = self.modified.unwrap_or_else(Utc::now);
        let labels = match &self.nav_labels {
            Some(labels) => labels.clone(),
            None => NavLabels::for_language(&metadata.language),
        };
        let page_size = metadata.book_size.dimensions();

        info!(
            "Packaging '{}': {} images, {}, {}x{}",
            metadata.title,
            images.len(),
            metadata.page_direction,
            page_size.width,
            page_size.height
        );

        let entries = assign_pages(
            images,
            metadata.front_cover.as_ref(),
            metadata.back_cover.as_ref(),
            &metadata.page_layouts,
        );

        let mut archive = ArchiveWriter::new(self.compression_level)?;
        archive.add_file("META-INF/container.xml", make_container_xml()?.as_bytes())?;
        progress.report(10.0);
        yield_now().await;

        // Same order as the page manifest: front cover, content, back cover.
        let assets = metadata
            .front_cover
            .iter()
            .chain(images)
            .chain(metadata.back_cover.iter());
        let total = entries.len();
        for (done, (entry, asset)) in entries.iter().zip(assets).enumerate() {
            if asset.data.is_empty() {
                warn!("Image '{}' has no data", asset.name);
                return Err(EpubError::EmptyDataError);
            }

            archive.add_file(&content_path(&entry.href), &asset.data)?;
            progress.report(10.0 + 40.0 * (done + 1) as f32 / total as f32);
            yield_now().await;
        }
        progress.report(50.0);
        debug!("Embedded {} images", total);

        for entry in &entries {
            let document = make_page_document(entry, page_size, &labels, &metadata.language)?;
            archive.add_file(&content_path(&entry.document_name()), document.as_bytes())?;
        }

        let navigation = build_navigation(metadata, &entries, &labels);
        if let Some(links) = &navigation.chapter_index {
            let document = make_toc_document(metadata, links, &labels)?;
            archive.add_file(&content_path("toc.xhtml"), document.as_bytes())?;
        }
        progress.report(70.0);
        debug!("Emitted {} page documents", entries.len());
        yield_now().await;

        let nav_document = make_navigation_document(metadata, &navigation, &labels)?;
        archive
            .add_file(&content_path("nav.xhtml"), nav_document.as_bytes())?
            .add_file(&content_path("styles/style.css"), make_stylesheet(page_size).as_bytes())?
            .add_file(
                PACKAGE_PATH,
                make_opf(metadata, &entries, &identifier, &modified)?.as_bytes(),
            )?
            .add_file(
                &content_path("toc.ncx"),
                make_ncx(metadata, &navigation, &identifier)?.as_bytes(),
            )?;
        progress.report(90.0);
        debug!("Emitted package documents for {}", identifier);
        yield_now().await;

        let entry_count = archive.entry_count();
        let bytes = archive.finish()?;
        progress.report(100.0);

        info!(
            "Packaged {} pages into {} entries, {} bytes",
            entries.len(),
            entry_count,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Builds the package and saves it to the specified path
    ///
    /// Missing parent directories are created.
    ///
    /// # Parameters
    /// - `output_path`: Output file path
    pub async fn make<P: AsRef<Path>, F: FnMut(f32)>(
        &self,
        images: &[ImageAsset],
        metadata: &BookMetadata,
        output_path: P,
        on_progress: F,
    ) -> Result<(), EpubError> {
        let bytes = self.generate(images, metadata, on_progress).await?;

        if let Some(parent) = output_path.as_ref().parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&output_path, bytes)?;
        info!("Saved package to {}", output_path.as_ref().display());

        Ok(())
    }
}

/// Builds a package with the default configuration
pub async fn generate_epub<F: FnMut(f32)>(
    images: &[ImageAsset],
    metadata: &BookMetadata,
    on_progress: F,
) -> Result<Vec<u8>, EpubError> {
    EpubBuilder::new()
        .generate(images, metadata, on_progress)
        .await
}

fn content_path(href: &str) -> String {
    format!("{}/{}", CONTENT_DIR, href)
}

/// Logs layout arrays that do not match the image list or the book direction
fn check_layouts(images: &[ImageAsset], metadata: &BookMetadata) {
    if metadata.page_layouts.len() > images.len() {
        warn!(
            "{} page layouts for {} images, extra layouts are ignored",
            metadata.page_layouts.len(),
            images.len()
        );
    }

    let mismatched = metadata
        .page_layouts
        .iter()
        .take(images.len())
        .filter(|layout| layout.reading_direction != metadata.page_direction)
        .count();
    if mismatched > 0 {
        warn!(
            "{} page layouts disagree with the book direction {}",
            mismatched, metadata.page_direction
        );
    }
}
