//! Package page numbering
//!
//! Assigns every page of the book its final package page number, manifest id
//! and image path. The front cover, when present, is page 1; content images
//! follow in array order; the back cover, when present, is the last page.

use crate::{
    layout::layout_at,
    types::{ImageAsset, PageLayout, PageManifestEntry, PageType},
    utils::image_file_name,
};

/// Directory holding the images, relative to the package document
pub const IMAGE_DIR: &str = "images";

/// Builds the flat page manifest
///
/// Numbers are contiguous from 1 and follow emission order. Content image file
/// names derive from the package page number, not from the original index.
/// Missing layouts fall back to a non-spread content page.
///
/// ## Parameters
/// - `images`: Content images, in reading order
/// - `front_cover`: Optional front cover image
/// - `back_cover`: Optional back cover image
/// - `layouts`: One layout per content image
pub fn assign_pages(
    images: &[ImageAsset],
    front_cover: Option<&ImageAsset>,
    back_cover: Option<&ImageAsset>,
    layouts: &[PageLayout],
) -> Vec<PageManifestEntry> {
    let mut entries = Vec::with_capacity(images.len() + 2);
    let mut page_number = 0;

    if let Some(cover) = front_cover {
        page_number += 1;
        entries.push(PageManifestEntry {
            id: "cover".to_string(),
            href: format!("{}/cover.{}", IMAGE_DIR, cover.extension()),
            mime: cover.mime.clone(),
            page_number,
            is_cover: true,
            is_back_cover: false,
            spread: false,
            page_type: PageType::Cover,
            original_index: None,
        });
    }

    for (index, image) in images.iter().enumerate() {
        let layout = layout_at(layouts, index);
        page_number += 1;

        entries.push(PageManifestEntry {
            id: format!("img{}", page_number),
            href: format!(
                "{}/{}",
                IMAGE_DIR,
                image_file_name(page_number, image.extension())
            ),
            mime: image.mime.clone(),
            page_number,
            is_cover: false,
            is_back_cover: false,
            spread: layout.spread,
            page_type: layout.page_type,
            original_index: Some(index),
        });
    }

    if let Some(cover) = back_cover {
        page_number += 1;
        entries.push(PageManifestEntry {
            id: "back-cover".to_string(),
            href: format!("{}/back_cover.{}", IMAGE_DIR, cover.extension()),
            mime: cover.mime.clone(),
            page_number,
            is_cover: false,
            is_back_cover: true,
            spread: false,
            page_type: PageType::Cover,
            original_index: None,
        });
    }

    entries
}
