//! Content documents
//!
//! Serializes one XHTML document per package page, the optional chapter index
//! page and the navigation document.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::{
    builder::{XmlWriter, into_document, new_writer, write_text_element},
    error::EpubError,
    navigation::{ChapterLink, NavLabels, NavigationModel},
    types::{BookMetadata, PageManifestEntry, PageSize},
};

const STYLESHEET_HREF: &str = "styles/style.css";

/// Marker class added to every element of a spread page
const SPREAD_CLASS: &str = "spread-page";

/// Creates the document showing a single page image
///
/// Cover, back cover and content pages differ only in their classes and labels.
/// Content pages flagged for spread display carry the `spread-page` class.
pub fn make_page_document(
    entry: &PageManifestEntry,
    page_size: PageSize,
    labels: &NavLabels,
    language: &str,
) -> Result<String, EpubError> {
    let page_label = format!("{} {}", labels.page, entry.page_number);
    let (title, body_class, image_class) = if entry.is_cover {
        (labels.cover.as_str(), "cover-page".to_string(), "cover-image".to_string())
    } else if entry.is_back_cover {
        (
            labels.back_cover.as_str(),
            "back-cover-page".to_string(),
            "back-cover-image".to_string(),
        )
    } else {
        (
            page_label.as_str(),
            with_spread_class("content-page", entry.spread),
            with_spread_class("page-image", entry.spread),
        )
    };
    let container_class = if entry.is_content() {
        with_spread_class("page-container", entry.spread)
    } else {
        "page-container".to_string()
    };

    let mut writer = new_writer()?;
    make_head(&mut writer, title, language, Some(page_size))?;

    writer.write_event(Event::Start(
        BytesStart::new("body").with_attributes([("class", body_class.as_str())]),
    ))?;
    writer.write_event(Event::Start(
        BytesStart::new("div").with_attributes([("class", container_class.as_str())]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("img").with_attributes([
        ("src", entry.href.as_str()),
        ("alt", title),
        ("class", image_class.as_str()),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("div")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    into_document(writer)
}

/// Creates the linear chapter index page
pub fn make_toc_document(
    metadata: &BookMetadata,
    links: &[ChapterLink],
    labels: &NavLabels,
) -> Result<String, EpubError> {
    let mut writer = new_writer()?;
    make_head(&mut writer, &labels.contents, &metadata.language, None)?;

    writer.write_event(Event::Start(
        BytesStart::new("body").with_attributes([("class", "toc-page")]),
    ))?;
    open_div(&mut writer, "toc-container")?;
    open_div(&mut writer, "toc-nav")?;

    open_div(&mut writer, "toc-header")?;
    write_text_element(&mut writer, "h1", [("class", "toc-title-main")], &metadata.title)?;
    write_text_element(&mut writer, "div", [("class", "toc-subtitle")], &labels.contents)?;
    write_text_element(&mut writer, "div", [("class", "toc-decoration")], "")?;
    close_div(&mut writer)?;

    writer.write_event(Event::Start(
        BytesStart::new("ol").with_attributes([("class", "toc-list")]),
    ))?;
    for link in links {
        let page_number = link.page_number.to_string();

        writer.write_event(Event::Start(
            BytesStart::new("li").with_attributes([("class", "toc-item")]),
        ))?;
        writer.write_event(Event::Start(BytesStart::new("a").with_attributes([
            ("href", link.href.as_str()),
            ("class", "toc-link"),
        ])))?;
        write_text_element(&mut writer, "span", [("class", "toc-title")], &link.title)?;
        write_text_element(&mut writer, "span", [("class", "toc-dots")], "")?;
        write_text_element(&mut writer, "span", [("class", "toc-number")], &page_number)?;
        writer.write_event(Event::End(BytesEnd::new("a")))?;
        writer.write_event(Event::End(BytesEnd::new("li")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ol")))?;

    open_div(&mut writer, "toc-footer")?;
    write_text_element(
        &mut writer,
        "div",
        [("class", "toc-author")],
        &format!("{}{}", labels.author, metadata.author),
    )?;
    write_text_element(&mut writer, "div", [("class", "toc-publisher")], &metadata.publisher)?;
    close_div(&mut writer)?;

    close_div(&mut writer)?;
    close_div(&mut writer)?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    into_document(writer)
}

/// Creates the `nav.xhtml` navigation document
///
/// Mirrors the NCX navigation map as a flat `toc` list, so that reading
/// systems that ignore the legacy map still find a table of contents.
pub fn make_navigation_document(
    metadata: &BookMetadata,
    navigation: &NavigationModel,
    labels: &NavLabels,
) -> Result<String, EpubError> {
    let mut writer = new_writer()?;
    make_head(&mut writer, &metadata.title, &metadata.language, None)?;

    writer.write_event(Event::Start(BytesStart::new("body")))?;
    writer.write_event(Event::Start(
        BytesStart::new("nav").with_attributes([("epub:type", "toc"), ("id", "toc")]),
    ))?;
    write_text_element(&mut writer, "h1", [], &labels.contents)?;

    writer.write_event(Event::Start(BytesStart::new("ol")))?;
    for nav in &navigation.nav_points {
        writer.write_event(Event::Start(BytesStart::new("li")))?;
        write_text_element(&mut writer, "a", [("href", nav.content.as_str())], &nav.label)?;
        writer.write_event(Event::End(BytesEnd::new("li")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("ol")))?;

    writer.write_event(Event::End(BytesEnd::new("nav")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;

    into_document(writer)
}

/// Writes the doctype, the `html` start tag and the complete `head` element
///
/// Fixed-layout pages pass their page size to get a viewport declaration.
fn make_head(
    writer: &mut XmlWriter,
    title: &str,
    language: &str,
    viewport: Option<PageSize>,
) -> Result<(), EpubError> {
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    writer.write_event(Event::Start(BytesStart::new("html").with_attributes([
        ("xmlns", "http://www.w3.org/1999/xhtml"),
        ("xmlns:epub", "http://www.idpf.org/2007/ops"),
        ("xml:lang", language),
        ("lang", language),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "UTF-8")]),
    ))?;
    write_text_element(writer, "title", [], title)?;
    writer.write_event(Event::Empty(BytesStart::new("link").with_attributes([
        ("rel", "stylesheet"),
        ("type", "text/css"),
        ("href", STYLESHEET_HREF),
    ])))?;

    if let Some(size) = viewport {
        let content = format!("width={},height={}", size.width, size.height);
        writer.write_event(Event::Empty(BytesStart::new("meta").with_attributes([
            ("name", "viewport"),
            ("content", content.as_str()),
        ])))?;
    }

    writer.write_event(Event::End(BytesEnd::new("head")))?;

    Ok(())
}

fn open_div(writer: &mut XmlWriter, class: &str) -> Result<(), EpubError> {
    writer.write_event(Event::Start(
        BytesStart::new("div").with_attributes([("class", class)]),
    ))?;
    Ok(())
}

fn close_div(writer: &mut XmlWriter) -> Result<(), EpubError> {
    writer.write_event(Event::End(BytesEnd::new("div")))?;
    Ok(())
}

fn with_spread_class(class: &str, spread: bool) -> String {
    if spread {
        format!("{} {}", class, SPREAD_CLASS)
    } else {
        class.to_string()
    }
}
