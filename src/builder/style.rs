//! Stylesheet
//!
//! One stylesheet serves every document of the package: full-bleed, centered,
//! aspect-preserving images for single and spread pages, the chapter index
//! layout, and fallbacks for Kindle, print and older readers.

use crate::types::PageSize;

const BASE_RULES: &str = r#"* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

html, body {
  margin: 0;
  padding: 0;
  font-family: serif;
  font-size: 1em;
  line-height: 1.4;
  color: #000;
  background: #fff;
  width: 100%;
  height: 100%;
}
"#;

const PAGE_RULES: &str = r#".page-container {
  width: 100%;
  height: 100vh;
  display: flex;
  align-items: center;
  justify-content: center;
  margin: 0;
  padding: 0;
}

.page-image,
.cover-image,
.back-cover-image {
  max-width: 100%;
  max-height: 100%;
  width: auto;
  height: auto;
  object-fit: contain;
}

.spread-page .page-container,
.page-container.spread-page {
  width: 100%;
  height: 100vh;
}

.cover-page .page-container,
.back-cover-page .page-container {
  text-align: center;
}
"#;

const TOC_RULES: &str = r#".toc-page {
  padding: 2em 1em;
  line-height: 1.6;
}

.toc-container {
  max-width: 100%;
  margin: 0 auto;
}

.toc-nav {
  width: 100%;
}

.toc-header {
  text-align: center;
  margin-bottom: 2em;
  padding-bottom: 1em;
  border-bottom: 2px solid #333;
}

.toc-title-main {
  font-size: 1.8em;
  font-weight: bold;
  margin: 0 0 0.5em 0;
}

.toc-subtitle {
  font-size: 1.2em;
  color: #666;
  margin-bottom: 1em;
}

.toc-decoration {
  width: 60px;
  height: 2px;
  background: #333;
  margin: 0 auto;
}

.toc-list {
  list-style: none;
}

.toc-item {
  margin: 1em 0;
  page-break-inside: avoid;
}

.toc-link {
  display: block;
  text-decoration: none;
  color: #000;
  padding: 0.8em 1em;
  border: 1px solid #ddd;
  background: #f9f9f9;
}

.toc-title {
  font-weight: bold;
}

.toc-dots {
  display: none;
}

.toc-number {
  float: right;
  font-size: 0.9em;
  color: #666;
  background: #e0e0e0;
  padding: 0.2em 0.5em;
  border-radius: 3px;
}

.toc-footer {
  margin-top: 2em;
  text-align: center;
  padding-top: 1em;
  border-top: 1px solid #ddd;
}

.toc-author {
  color: #333;
  margin-bottom: 0.5em;
  font-weight: bold;
}

.toc-publisher {
  font-size: 0.9em;
  color: #666;
  font-style: italic;
}
"#;

const DEVICE_RULES: &str = r#"@media amzn-kf8 {
  .page-image, .cover-image, .back-cover-image {
    width: 100%;
    height: auto;
    max-width: 100%;
  }

  .page-container {
    display: flex;
    height: 100vh;
  }

  .toc-number {
    float: none;
    display: inline;
    margin-left: 1em;
  }
}

@media amzn-mobi {
  img {
    max-width: 100%;
    height: auto;
  }

  .toc-title-main {
    font-size: 1.5em;
  }

  .toc-link {
    padding: 0.5em;
  }
}

@media print {
  .page-image, .cover-image, .back-cover-image {
    max-width: 100%;
    height: auto;
    page-break-inside: avoid;
  }

  .toc-item {
    page-break-inside: avoid;
  }
}
"#;

const LEGACY_RULES: &str = r#"img {
  border: none;
  outline: none;
}

a {
  color: #000;
}

div, p, h1, h2, h3, ol, li {
  margin: 0;
  padding: 0;
}

.toc-list li {
  list-style-type: none;
}
"#;

/// Creates `styles/style.css` for the given target page size
pub fn make_stylesheet(page_size: PageSize) -> String {
    let page_rule = format!(
        "@page {{\n  size: {}px {}px;\n  margin: 0;\n}}\n",
        page_size.width, page_size.height
    );

    [
        page_rule.as_str(),
        BASE_RULES,
        PAGE_RULES,
        TOC_RULES,
        DEVICE_RULES,
        LEGACY_RULES,
    ]
    .join("\n")
}
