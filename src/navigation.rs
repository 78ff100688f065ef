//! Navigation model
//!
//! Computes the legacy navigation map and the linear chapter index from the
//! chapter list and the page manifest, plus the pure editing helpers used to
//! maintain the chapter list.
//!
//! A chapter's `page_index` counts content images only. When a front cover is
//! present it occupies package page 1, so every chapter target moves forward by
//! one page. The back cover comes after all chapter targets and needs no shift.

use crate::{
    types::{BookMetadata, Chapter, NavPoint, PageManifestEntry},
    utils::page_file_name,
};

/// Localized labels used in navigation documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLabels {
    pub cover: String,
    pub contents: String,
    pub back_cover: String,

    /// Prefix of the per-page labels, e.g. `Page` in `Page 3`
    pub page: String,

    /// Prefix placed before the author on the chapter index page
    pub author: String,
}

impl NavLabels {
    /// Picks the label set for a language code
    ///
    /// Japanese books get Japanese labels; every other language falls back to English.
    pub fn for_language(language: &str) -> Self {
        if language == "ja" || language.starts_with("ja-") {
            Self {
                cover: "表紙".to_string(),
                contents: "目次".to_string(),
                back_cover: "裏表紙".to_string(),
                page: "Page".to_string(),
                author: "著者: ".to_string(),
            }
        } else {
            Self::default()
        }
    }
}

impl Default for NavLabels {
    fn default() -> Self {
        Self {
            cover: "Cover".to_string(),
            contents: "Table of Contents".to_string(),
            back_cover: "Back Cover".to_string(),
            page: "Page".to_string(),
            author: "Author: ".to_string(),
        }
    }
}

/// A line of the chapter index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterLink {
    pub title: String,

    /// Content document the chapter starts at
    pub href: String,

    /// Human-readable page number shown next to the title
    pub page_number: usize,
}

/// Everything the navigation documents are rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationModel {
    /// Navigation map entries in package page order, play order starting at 1
    pub nav_points: Vec<NavPoint>,

    /// Chapter index page content, `None` when the page is not emitted
    pub chapter_index: Option<Vec<ChapterLink>>,
}

/// Package page number a chapter points at
///
/// `page_index + 1`, plus one more when a front cover takes page 1.
pub fn chapter_target_page(page_index: usize, has_front_cover: bool) -> usize {
    page_index + 1 + usize::from(has_front_cover)
}

/// Builds the navigation model of a book
///
/// The map lists the cover, then either the chapter index page and every
/// chapter (when the index is enabled and chapters exist) or every content
/// page, then the back cover. Chapter page indices are not checked here.
pub fn build_navigation(
    metadata: &BookMetadata,
    entries: &[PageManifestEntry],
    labels: &NavLabels,
) -> NavigationModel {
    let has_front_cover = entries.iter().any(|entry| entry.is_cover);
    let mut nav_points = Vec::new();
    let mut play_order = 0;

    let mut push = |id: String, label: String, content: String| {
        play_order += 1;
        nav_points.push(NavPoint {
            id,
            label,
            content,
            play_order,
        });
    };

    if has_front_cover {
        push(
            "cover".to_string(),
            labels.cover.clone(),
            "cover.xhtml".to_string(),
        );
    }

    let chapter_index = if metadata.has_chapter_index() {
        push(
            "toc".to_string(),
            labels.contents.clone(),
            "toc.xhtml".to_string(),
        );

        let links: Vec<ChapterLink> = metadata
            .chapters
            .iter()
            .map(|chapter| ChapterLink {
                title: chapter.title.clone(),
                href: page_file_name(chapter_target_page(chapter.page_index, has_front_cover)),
                page_number: chapter.page_number(),
            })
            .collect();

        for (chapter, link) in metadata.chapters.iter().zip(&links) {
            push(chapter.id.clone(), chapter.title.clone(), link.href.clone());
        }

        Some(links)
    } else {
        for entry in entries.iter().filter(|entry| entry.is_content()) {
            push(
                entry.page_number.to_string(),
                format!("{} {}", labels.page, entry.page_number),
                entry.document_name(),
            );
        }

        None
    };

    if entries.iter().any(|entry| entry.is_back_cover) {
        push(
            "back-cover".to_string(),
            labels.back_cover.clone(),
            "back_cover.xhtml".to_string(),
        );
    }

    NavigationModel {
        nav_points,
        chapter_index,
    }
}

/// Adds a chapter, keeping the list sorted by page index
///
/// A blank title becomes `Chapter N`, N being the new chapter count. Chapters
/// sharing a page index keep their insertion order.
pub fn insert_chapter(chapters: &[Chapter], id: &str, title: &str, page_index: usize) -> Vec<Chapter> {
    let title = match title.trim() {
        "" => format!("Chapter {}", chapters.len() + 1),
        trimmed => trimmed.to_string(),
    };

    let mut result = chapters.to_vec();
    result.push(Chapter::new(id, &title, page_index));
    result.sort_by_key(|chapter| chapter.page_index);
    result
}

/// Removes the chapter with the given id
pub fn remove_chapter(chapters: &[Chapter], id: &str) -> Vec<Chapter> {
    chapters
        .iter()
        .filter(|chapter| chapter.id != id)
        .cloned()
        .collect()
}

/// Renames the chapter with the given id
pub fn rename_chapter(chapters: &[Chapter], id: &str, title: &str) -> Vec<Chapter> {
    chapters
        .iter()
        .map(|chapter| {
            if chapter.id == id {
                Chapter {
                    title: title.to_string(),
                    ..chapter.clone()
                }
            } else {
                chapter.clone()
            }
        })
        .collect()
}

/// Spreads chapters evenly over the book
///
/// One chapter per ten images, at most ten chapters; chapter `i` starts at
/// `floor(image_count / count * i)`.
pub fn auto_generate_chapters<F>(image_count: usize, title: F) -> Vec<Chapter>
where
    F: Fn(usize) -> String,
{
    let count = image_count.div_ceil(10).min(10);

    (0..count)
        .map(|index| {
            Chapter::new(
                &format!("chapter-{}", index + 1),
                &title(index + 1),
                image_count * index / count,
            )
        })
        .collect()
}
