//! The URL editor: parse once, index every url() token, edit in place,
//! reprint on demand.

use std::convert::Infallible;

use camino::Utf8Path;
use indexmap::IndexSet;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::values::url::Url;
use lightningcss::visitor::{Visit, VisitTypes, Visitor};
use regex::Regex;
use tracing::debug;

use crate::matcher::UrlMatcher;
use crate::rebase::rebase;
use crate::{Error, Result};

/// Editor over the `url(...)` references of one stylesheet.
///
/// Parsing happens once at construction, together with a single visitor
/// pass that indexes every url() token in document order, duplicates
/// included. Queries read the index; mutations write through to the
/// underlying stylesheet, so [`rebuild`](Self::rebuild) always reflects
/// the latest edits.
///
/// The editor borrows the source text for its lifetime.
pub struct UrlEditor<'c> {
    stylesheet: StyleSheet<'c>,
    /// Current value of every url() token, in visit order. Mutations keep
    /// this in lockstep with the stylesheet; entries are never added or
    /// removed after construction.
    urls: Vec<String>,
}

impl<'c> UrlEditor<'c> {
    /// Parse `css` and index its url() tokens.
    pub fn new(css: &'c str) -> Result<Self> {
        let mut stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| Error::Parse(format!("{e:?}")))?;

        let mut collector = CollectUrls { urls: Vec::new() };
        if let Err(never) = stylesheet.visit(&mut collector) {
            match never {}
        }

        Ok(Self {
            stylesheet,
            urls: collector.urls,
        })
    }

    /// Distinct URL values, in first-occurrence order.
    pub fn urls(&self) -> Vec<String> {
        self.distinct().into_iter().collect()
    }

    /// Distinct URL values matching `mask`, in first-occurrence order.
    pub fn urls_matching(&self, mask: &Regex) -> Vec<String> {
        self.distinct()
            .into_iter()
            .filter(|value| mask.is_match(value))
            .collect()
    }

    fn distinct(&self) -> IndexSet<String> {
        self.urls.iter().cloned().collect()
    }

    /// Rewrite every relative URL so it stays correct after the stylesheet
    /// moves from the directory `from` to the directory `to`.
    ///
    /// Protocol, `data` and root-absolute URLs keep their meaning when the
    /// stylesheet moves and are left untouched. Resolution is lexical: `.`
    /// and `..` segments are folded out without touching the filesystem.
    pub fn change_css_root(&mut self, from: impl AsRef<Utf8Path>, to: impl AsRef<Utf8Path>) {
        let (from, to) = (from.as_ref(), to.as_ref());
        let edits: Vec<Option<String>> = self
            .urls
            .iter()
            .map(|value| is_relative(value).then(|| rebase(value, from, to)))
            .collect();
        let count = self.apply(edits);
        debug!(count, %from, %to, "rebased relative urls");
    }

    /// Replace the first occurrence of `from` inside every matching URL
    /// value with `to`.
    ///
    /// `from` is anything that converts to a [`UrlMatcher`]: a compiled
    /// [`Regex`] (whose capture groups `to` may reference as `$1`, `$2`,
    /// ...) or a plain substring. Only the first match within each value
    /// is rewritten. A matcher that selects nothing is a no-op, not an
    /// error.
    pub fn change_url_content(&mut self, from: impl Into<UrlMatcher>, to: &str) {
        let matcher = from.into();
        let edits: Vec<Option<String>> = self
            .urls
            .iter()
            .map(|value| matcher.is_match(value).then(|| matcher.replace_first(value, to)))
            .collect();
        let count = self.apply(edits);
        debug!(count, "rewrote url contents");
    }

    /// Serialize the stylesheet back to CSS text, reflecting all edits so
    /// far. May be called repeatedly.
    pub fn rebuild(&self) -> Result<String> {
        self.print(PrinterOptions::default())
    }

    /// Serialize the stylesheet with minification enabled.
    pub fn rebuild_minified(&self) -> Result<String> {
        self.print(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
    }

    fn print(&self, options: PrinterOptions) -> Result<String> {
        let output = self
            .stylesheet
            .to_css(options)
            .map_err(|e| Error::Print(format!("{e:?}")))?;
        Ok(output.code)
    }

    /// Write an ordinal-keyed edit set through to the stylesheet, then fold
    /// it into the index. Returns the number of edited tokens.
    ///
    /// Callers compute the complete edit set before this runs, so a pass
    /// either applies in full or not at all. Edits never add or remove
    /// url() tokens, which keeps ordinals stable across passes.
    fn apply(&mut self, edits: Vec<Option<String>>) -> usize {
        let mut writer = ApplyEdits {
            edits: &edits,
            next: 0,
        };
        if let Err(never) = self.stylesheet.visit(&mut writer) {
            match never {}
        }

        let mut count = 0;
        for (slot, edit) in self.urls.iter_mut().zip(edits) {
            if let Some(value) = edit {
                *slot = value;
                count += 1;
            }
        }
        count
    }
}

/// A URL participates in rebasing only when it is relative; protocol,
/// `data` and root-absolute references are location-independent.
fn is_relative(value: &str) -> bool {
    !(value.starts_with("http") || value.starts_with("data") || value.starts_with('/'))
}

/// Collects every url() value, in visit order.
struct CollectUrls {
    urls: Vec<String>,
}

impl<'i> Visitor<'i> for CollectUrls {
    type Error = Infallible;

    fn visit_types(&self) -> VisitTypes {
        lightningcss::visit_types!(URLS)
    }

    fn visit_url(&mut self, url: &mut Url<'i>) -> std::result::Result<(), Self::Error> {
        self.urls.push(url.url.as_ref().to_string());
        Ok(())
    }
}

/// Writes precomputed values into url() tokens, keyed by visit order.
struct ApplyEdits<'e> {
    edits: &'e [Option<String>],
    next: usize,
}

impl<'i> Visitor<'i> for ApplyEdits<'_> {
    type Error = Infallible;

    fn visit_types(&self) -> VisitTypes {
        lightningcss::visit_types!(URLS)
    }

    fn visit_url(&mut self, url: &mut Url<'i>) -> std::result::Result<(), Self::Error> {
        if let Some(Some(value)) = self.edits.get(self.next) {
            url.url = value.clone().into();
        }
        self.next += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = r#"
        .logo { background: url('images/image.jpeg'); }
        .icon { background-image: url("image.jpg"); }
        .hero { background-image: url(../images/image.gif); }
        .remote { background-image: url('http://yandex.ru/images/image.gif'); }
        .inline { background-image: url('data:image/gif;base64,R0lGODlhAQABAAAAACw='); }
        .pinned { background-image: url('/static/images/image.png'); }
        .footer { background: url('images/image.jpeg'); }
    "#;

    #[test]
    fn urls_dedup_keeps_first_occurrence() {
        let editor = UrlEditor::new(CSS).unwrap();
        let urls = editor.urls();

        // 7 occurrences, one value repeated
        assert_eq!(urls.len(), 6);
        assert_eq!(urls[0], "images/image.jpeg");
    }

    #[test]
    fn urls_is_idempotent() {
        let editor = UrlEditor::new(CSS).unwrap();
        assert_eq!(editor.urls(), editor.urls());
    }

    #[test]
    fn urls_matching_filters_values() {
        let editor = UrlEditor::new(CSS).unwrap();
        let mask = Regex::new("^data:").unwrap();

        let data_urls = editor.urls_matching(&mask);
        assert_eq!(data_urls.len(), 1);
        assert!(data_urls[0].starts_with("data:image/gif"));
    }

    #[test]
    fn change_css_root_rebases_relative_urls() {
        let mut editor = UrlEditor::new(CSS).unwrap();
        editor.change_css_root("/project/css/", "/project/css/images/");

        let urls = editor.urls();
        assert!(urls.contains(&"image.jpeg".to_string()));
        assert!(urls.contains(&"../image.jpg".to_string()));
        assert!(urls.contains(&"../../images/image.gif".to_string()));
    }

    #[test]
    fn change_css_root_leaves_external_urls_alone() {
        let mut editor = UrlEditor::new(CSS).unwrap();
        editor.change_css_root("/project/css/", "/project/");

        let urls = editor.urls();
        assert!(urls.contains(&"http://yandex.ru/images/image.gif".to_string()));
        assert!(urls.contains(&"/static/images/image.png".to_string()));
        assert!(urls.iter().any(|value| value.starts_with("data:")));
    }

    #[test]
    fn change_url_content_expands_capture_groups() {
        let mut editor = UrlEditor::new(CSS).unwrap();
        let pattern = Regex::new(r"http://yandex\.ru/(.*)").unwrap();
        editor.change_url_content(pattern, "http://google.com/$1");

        let urls = editor.urls();
        assert!(urls.contains(&"http://google.com/images/image.gif".to_string()));
        assert!(!urls.iter().any(|value| value.contains("yandex")));
    }

    #[test]
    fn change_url_content_replaces_first_match_only() {
        let css = ".a { background: url('images/images/a.png'); }";
        let mut editor = UrlEditor::new(css).unwrap();
        editor.change_url_content("images", "img");

        assert_eq!(editor.urls(), ["img/images/a.png"]);
    }

    #[test]
    fn change_url_content_without_match_is_noop() {
        let mut editor = UrlEditor::new(CSS).unwrap();
        let before = editor.urls();
        editor.change_url_content("abc", "http://google.com/$1");

        assert_eq!(editor.urls(), before);
    }

    #[test]
    fn rebuild_reflects_edits() {
        let mut editor = UrlEditor::new(CSS).unwrap();
        editor.change_url_content("image.jpg", "photo.jpg");

        let output = editor.rebuild().unwrap();
        assert!(output.contains("photo.jpg"));
        assert!(!output.contains("url(\"image.jpg\")"));
        assert!(!output.contains("url('image.jpg')"));
        assert!(!output.contains("url(image.jpg)"));
    }

    #[test]
    fn rebuild_without_edits_preserves_url_values() {
        let editor = UrlEditor::new(CSS).unwrap();
        let output = editor.rebuild().unwrap();

        let reparsed = UrlEditor::new(&output).unwrap();
        assert_eq!(reparsed.urls(), editor.urls());
    }

    #[test]
    fn invalid_css_is_a_parse_error() {
        let result = UrlEditor::new("..logo { color: red }");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
