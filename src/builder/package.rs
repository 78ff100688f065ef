//! Package documents
//!
//! Serializes the container pointer, the package document (metadata, manifest
//! and spine) and the legacy NCX navigation map.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{
    builder::{XmlWriter, into_document, new_writer, write_text_element},
    error::EpubError,
    layout::spread_role,
    navigation::NavigationModel,
    types::{BookMetadata, PageManifestEntry},
    utils::{modified_timestamp, publication_date},
};

/// Path of the package document inside the container
pub const PACKAGE_PATH: &str = "OEBPS/content.opf";

/// Fixed-layout rendition hints written into every package
const RENDITION_HINTS: [(&str, &str); 3] = [
    ("rendition:layout", "pre-paginated"),
    ("rendition:orientation", "auto"),
    ("rendition:spread", "auto"),
];

/// Creates `META-INF/container.xml`
pub fn make_container_xml() -> Result<String, EpubError> {
    let mut writer = new_writer()?;

    writer.write_event(Event::Start(BytesStart::new("container").with_attributes([
        ("version", "1.0"),
        ("xmlns", "urn:oasis:names:tc:opendocument:xmlns:container"),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("rootfiles")))?;
    writer.write_event(Event::Empty(BytesStart::new("rootfile").with_attributes([
        ("full-path", PACKAGE_PATH),
        ("media-type", "application/oebps-package+xml"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("rootfiles")))?;
    writer.write_event(Event::End(BytesEnd::new("container")))?;

    into_document(writer)
}

/// Creates the package document
///
/// ## Parameters
/// - `metadata`: Bibliographic data of the book
/// - `entries`: Page manifest, in emission order
/// - `identifier`: Unique identifier of this package
/// - `modified`: Timestamp for `dc:date` and `dcterms:modified`
pub fn make_opf(
    metadata: &BookMetadata,
    entries: &[PageManifestEntry],
    identifier: &str,
    modified: &DateTime<Utc>,
) -> Result<String, EpubError> {
    let mut writer = new_writer()?;

    writer.write_event(Event::Start(BytesStart::new("package").with_attributes([
        ("xmlns", "http://www.idpf.org/2007/opf"),
        ("unique-identifier", "BookId"),
        ("version", "3.0"),
        ("prefix", "rendition: http://www.idpf.org/vocab/rendition/#"),
    ])))?;

    make_opf_metadata(&mut writer, metadata, entries, identifier, modified)?;
    make_opf_manifest(&mut writer, metadata, entries)?;
    make_opf_spine(&mut writer, metadata, entries)?;

    writer.write_event(Event::End(BytesEnd::new("package")))?;

    into_document(writer)
}

fn make_opf_metadata(
    writer: &mut XmlWriter,
    metadata: &BookMetadata,
    entries: &[PageManifestEntry],
    identifier: &str,
    modified: &DateTime<Utc>,
) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("metadata").with_attributes([
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ("xmlns:opf", "http://www.idpf.org/2007/opf"),
    ])))?;

    write_text_element(writer, "dc:identifier", [("id", "BookId")], identifier)?;
    write_text_element(writer, "dc:title", [], &metadata.title)?;
    write_text_element(writer, "dc:creator", [], &metadata.author)?;
    write_text_element(writer, "dc:language", [], &metadata.language)?;
    write_text_element(writer, "dc:publisher", [], &metadata.publisher)?;
    write_text_element(writer, "dc:description", [], &metadata.description)?;
    write_text_element(writer, "dc:date", [], &publication_date(modified))?;
    write_text_element(
        writer,
        "meta",
        [("property", "dcterms:modified")],
        &modified_timestamp(modified),
    )?;

    // Without a front cover the first content image stands in as cover image.
    if let Some(cover) = entries.iter().find(|entry| !entry.is_back_cover) {
        writer.write_event(Event::Empty(
            BytesStart::new("meta").with_attributes([("name", "cover"), ("content", cover.id.as_str())]),
        ))?;
    }

    for (property, value) in RENDITION_HINTS {
        write_text_element(writer, "meta", [("property", property)], value)?;
    }

    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    Ok(())
}

fn make_opf_manifest(
    writer: &mut XmlWriter,
    metadata: &BookMetadata,
    entries: &[PageManifestEntry],
) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("manifest")))?;

    write_manifest_item(writer, "ncx", "toc.ncx", "application/x-dtbncx+xml", None)?;
    write_manifest_item(writer, "nav", "nav.xhtml", "application/xhtml+xml", Some("nav"))?;
    write_manifest_item(writer, "css", "styles/style.css", "text/css", None)?;

    if metadata.has_chapter_index() {
        write_manifest_item(writer, "toc-page", "toc.xhtml", "application/xhtml+xml", None)?;
    }

    for entry in entries {
        let properties = entry.is_cover.then_some("cover-image");
        write_manifest_item(writer, &entry.id, &entry.href, &entry.mime, properties)?;
    }

    for entry in entries {
        write_manifest_item(
            writer,
            &entry.document_id(),
            &entry.document_name(),
            "application/xhtml+xml",
            None,
        )?;
    }

    writer.write_event(Event::End(BytesEnd::new("manifest")))?;

    Ok(())
}

fn make_opf_spine(
    writer: &mut XmlWriter,
    metadata: &BookMetadata,
    entries: &[PageManifestEntry],
) -> Result<(), EpubError> {
    writer.write_event(Event::Start(BytesStart::new("spine").with_attributes([
        ("toc", "ncx"),
        ("page-progression-direction", metadata.page_direction.as_str()),
    ])))?;

    let (covers, pages): (Vec<&PageManifestEntry>, Vec<&PageManifestEntry>) =
        entries.iter().partition(|entry| entry.is_cover);

    for entry in covers {
        write_spine_item(writer, &entry.document_id(), None)?;
    }

    if metadata.has_chapter_index() {
        write_spine_item(writer, "toc-page", None)?;
    }

    for entry in pages {
        let role = match entry.original_index {
            Some(index) if entry.spread => Some(spread_role(index, metadata.page_direction)),
            _ => None,
        };

        write_spine_item(writer, &entry.document_id(), role.map(|role| role.property()))?;
    }

    writer.write_event(Event::End(BytesEnd::new("spine")))?;

    Ok(())
}

fn write_manifest_item(
    writer: &mut XmlWriter,
    id: &str,
    href: &str,
    mime: &str,
    properties: Option<&str>,
) -> Result<(), EpubError> {
    let mut item =
        BytesStart::new("item").with_attributes([("id", id), ("href", href), ("media-type", mime)]);
    if let Some(properties) = properties {
        item.push_attribute(("properties", properties));
    }

    writer.write_event(Event::Empty(item))?;
    Ok(())
}

fn write_spine_item(
    writer: &mut XmlWriter,
    idref: &str,
    properties: Option<&str>,
) -> Result<(), EpubError> {
    let mut item = BytesStart::new("itemref").with_attributes([("idref", idref)]);
    if let Some(properties) = properties {
        item.push_attribute(("properties", properties));
    }

    writer.write_event(Event::Empty(item))?;
    Ok(())
}

/// Creates the legacy NCX navigation map
pub fn make_ncx(
    metadata: &BookMetadata,
    navigation: &NavigationModel,
    identifier: &str,
) -> Result<String, EpubError> {
    let mut writer = new_writer()?;

    writer.write_event(Event::Start(BytesStart::new("ncx").with_attributes([
        ("xmlns", "http://www.daisy.org/z3986/2005/ncx/"),
        ("version", "2005-1"),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    for (name, content) in [
        ("dtb:uid", identifier),
        ("dtb:depth", "1"),
        ("dtb:totalPageCount", "0"),
        ("dtb:maxPageNumber", "0"),
    ] {
        writer.write_event(Event::Empty(
            BytesStart::new("meta").with_attributes([("name", name), ("content", content)]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(BytesStart::new("docTitle")))?;
    write_text_element(&mut writer, "text", [], &metadata.title)?;
    writer.write_event(Event::End(BytesEnd::new("docTitle")))?;

    writer.write_event(Event::Start(BytesStart::new("navMap")))?;
    for nav in &navigation.nav_points {
        let id = format!("navpoint-{}", nav.id);
        let play_order = nav.play_order.to_string();

        writer.write_event(Event::Start(BytesStart::new("navPoint").with_attributes([
            ("id", id.as_str()),
            ("playOrder", play_order.as_str()),
        ])))?;
        writer.write_event(Event::Start(BytesStart::new("navLabel")))?;
        write_text_element(&mut writer, "text", [], &nav.label)?;
        writer.write_event(Event::End(BytesEnd::new("navLabel")))?;
        writer.write_event(Event::Empty(
            BytesStart::new("content").with_attributes([("src", nav.content.as_str())]),
        ))?;
        writer.write_event(Event::End(BytesEnd::new("navPoint")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("navMap")))?;

    writer.write_event(Event::End(BytesEnd::new("ncx")))?;

    into_document(writer)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{
        builder::package::{make_container_xml, make_ncx, make_opf},
        navigation::{NavLabels, build_navigation},
        pagination::assign_pages,
        types::{BookMetadata, Chapter, ImageAsset, PageLayout, ReadingDirection},
    };

    fn image(index: usize) -> ImageAsset {
        ImageAsset::new(&index.to_string(), "i.png", "image/png", vec![1], index)
    }

    fn opf(metadata: &BookMetadata, count: usize) -> String {
        let images: Vec<ImageAsset> = (0..count).map(image).collect();
        let entries = assign_pages(
            &images,
            metadata.front_cover.as_ref(),
            metadata.back_cover.as_ref(),
            &metadata.page_layouts,
        );
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        make_opf(metadata, &entries, "urn:uuid:test", &time).unwrap()
    }

    #[test]
    fn test_container_points_at_package() {
        let container = make_container_xml().unwrap();

        assert!(container.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(container.contains(r#"full-path="OEBPS/content.opf""#));
        assert!(container.contains(r#"media-type="application/oebps-package+xml""#));
    }

    #[test]
    fn test_opf_metadata() {
        let metadata = BookMetadata {
            title: "Title".to_string(),
            page_direction: ReadingDirection::Ltr,
            page_layouts: vec![PageLayout::default(); 2],
            ..Default::default()
        };
        let opf = opf(&metadata, 2);

        assert!(opf.contains(r#"<dc:identifier id="BookId">urn:uuid:test</dc:identifier>"#));
        assert!(opf.contains("<dc:title>Title</dc:title>"));
        assert!(opf.contains("<dc:date>2024-01-02</dc:date>"));
        assert!(opf.contains(r#"<meta property="dcterms:modified">2024-01-02T03:04:05Z</meta>"#));
        assert!(opf.contains(r#"<meta property="rendition:layout">pre-paginated</meta>"#));
        assert!(opf.contains(r#"<meta property="rendition:spread">auto</meta>"#));
        assert!(opf.contains(r#"<meta name="cover" content="img1"/>"#));
        assert!(opf.contains(r#"page-progression-direction="ltr""#));
        assert!(opf.contains(r#"<item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#));
        assert!(!opf.contains("toc-page"));
    }

    #[test]
    fn test_opf_escapes_user_text() {
        let metadata = BookMetadata {
            title: r#"Tom & "Jerry's" <Book>"#.to_string(),
            author: "A<B".to_string(),
            page_layouts: vec![PageLayout::default()],
            ..Default::default()
        };
        let opf = opf(&metadata, 1);

        assert!(opf.contains(
            "<dc:title>Tom &amp; &quot;Jerry&apos;s&quot; &lt;Book&gt;</dc:title>"
        ));
        assert!(opf.contains("<dc:creator>A&lt;B</dc:creator>"));
    }

    #[test]
    fn test_opf_spine_order_with_covers_and_index() {
        let metadata = BookMetadata {
            front_cover: Some(image(100)),
            back_cover: Some(image(101)),
            enable_toc: true,
            chapters: vec![Chapter::new("c1", "One", 0)],
            page_layouts: vec![PageLayout::default(); 2],
            ..Default::default()
        };
        let opf = opf(&metadata, 2);

        let spine = &opf[opf.find("<spine").unwrap()..];
        let idrefs: Vec<&str> = spine
            .split("idref=\"")
            .skip(1)
            .map(|rest| &rest[..rest.find('"').unwrap()])
            .collect();

        assert_eq!(
            idrefs,
            vec!["cover-page", "toc-page", "page2", "page3", "back-cover-page"]
        );
        assert!(opf.contains(r#"<item id="cover" href="images/cover.png" media-type="image/png" properties="cover-image"/>"#));
        assert!(opf.contains(r#"<meta name="cover" content="cover"/>"#));
        assert!(opf.contains(r#"<item id="toc-page" href="toc.xhtml""#));
    }

    #[test]
    fn test_opf_spread_properties_follow_parity() {
        let metadata = BookMetadata {
            page_direction: ReadingDirection::Rtl,
            page_layouts: vec![
                PageLayout::new(false),
                PageLayout::new(true),
                PageLayout::new(true),
                PageLayout::new(false),
            ],
            ..Default::default()
        };
        let opf = opf(&metadata, 4);

        assert!(opf.contains(r#"<itemref idref="page1"/>"#));
        assert!(opf.contains(r#"<itemref idref="page2" properties="page-spread-left"/>"#));
        assert!(opf.contains(r#"<itemref idref="page3" properties="page-spread-right"/>"#));
        assert!(opf.contains(r#"<itemref idref="page4"/>"#));
    }

    #[test]
    fn test_ncx_points() {
        let metadata = BookMetadata {
            title: "A & B".to_string(),
            front_cover: Some(image(100)),
            enable_toc: true,
            chapters: vec![Chapter::new("c1", "<One>", 1)],
            page_layouts: vec![PageLayout::default(); 2],
            ..Default::default()
        };
        let images: Vec<ImageAsset> = (0..2).map(image).collect();
        let entries = assign_pages(&images, metadata.front_cover.as_ref(), None, &metadata.page_layouts);
        let navigation = build_navigation(&metadata, &entries, &NavLabels::default());

        let ncx = make_ncx(&metadata, &navigation, "urn:uuid:test").unwrap();

        assert!(ncx.contains(r#"<meta name="dtb:uid" content="urn:uuid:test"/>"#));
        assert!(ncx.contains("<text>A &amp; B</text>"));
        assert!(ncx.contains(r#"<navPoint id="navpoint-cover" playOrder="1">"#));
        assert!(ncx.contains(r#"<navPoint id="navpoint-toc" playOrder="2">"#));
        assert!(ncx.contains(r#"<navPoint id="navpoint-c1" playOrder="3">"#));
        assert!(ncx.contains("<text>&lt;One&gt;</text>"));
        assert!(ncx.contains(r#"<content src="page_0003.xhtml"/>"#));
    }
}
