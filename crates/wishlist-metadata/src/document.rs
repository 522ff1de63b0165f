// SPDX-FileCopyrightText: 2026 Wishlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal query surface over a parsed HTML page.
//!
//! Wraps `scraper::Html`, which is lenient: malformed markup still parses
//! into a tree, so every query returns `Option` rather than an error.

use scraper::{Html, Selector};

/// A parsed page. Not `Send`; parse and query on one thread.
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Text content of the first `tag` element, trimmed, if non-empty.
    pub fn first_element_text(&self, tag: &str) -> Option<String> {
        let selector = Selector::parse(tag).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// `content` of the first `<meta>` whose `property` or `name` equals `key`.
    ///
    /// Open Graph uses `property`, Twitter cards and most others use `name`,
    /// and plenty of sites mix them up, so both are checked in document order.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        let selector =
            Selector::parse(&format!(r#"meta[property="{key}"], meta[name="{key}"]"#)).ok()?;
        self.html
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .find(|content| !content.trim().is_empty())
            .map(str::to_string)
    }

    /// `href` of the first `<link>` whose `rel` list contains `rel`.
    pub fn link_href(&self, rel: &str) -> Option<String> {
        let selector = Selector::parse(&format!(r#"link[rel~="{rel}"]"#)).ok()?;
        self.html
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
            .map(str::to_string)
    }

    /// `src` of the first `<img>` with a non-empty source.
    pub fn first_image_src(&self) -> Option<String> {
        let selector = Selector::parse("img[src]").ok()?;
        self.html
            .select(&selector)
            .filter_map(|el| el.value().attr("src"))
            .map(str::trim)
            .find(|src| !src.is_empty())
            .map(str::to_string)
    }
}
