//! Image EPUB library
//!
//! A Rust library for assembling ordered image sequences (comics, manga,
//! photo books) into fixed-layout EPUB 3 packages.
//!
//! The library decides which pages are shown as two-page spreads, numbers the
//! pages of the package, builds the navigation map and serializes every
//! document into a zip container that conforming readers accept.
//!
//! ## Features
//!
//! - Spread grouping for previews and left/right spread roles for the package.
//! - Front and back covers, a chapter index page and localized navigation labels.
//! - Legacy NCX navigation next to the EPUB 3 navigation document.
//! - Asynchronous packaging with monotonic progress reporting.
//!
//! ## Quick Start
//!
//! ```rust, ignore
//! # use image_epub::{generate_epub, layout::default_page_layouts, types::*};
//! # async fn run(pages: Vec<Vec<u8>>) -> Result<(), Box<dyn std::error::Error>> {
//! let images = pages
//!     .into_iter()
//!     .enumerate()
//!     .map(|(index, data)| ImageAsset::from_bytes(&index.to_string(), "page", data, index))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let metadata = BookMetadata {
//!     title: "My Manga".to_string(),
//!     page_layouts: default_page_layouts(images.len(), ReadingDirection::Rtl),
//!     ..Default::default()
//! };
//!
//! let epub = generate_epub(&images, &metadata, |value| println!("{value:.0}%")).await?;
//! std::fs::write(image_epub::utils::suggested_file_name(&metadata.title), epub)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod layout;
pub mod navigation;
pub mod pagination;
pub mod types;
pub mod utils;

pub use builder::{EpubBuilder, generate_epub};
