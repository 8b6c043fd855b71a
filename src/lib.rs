//! # css-url-edit
//!
//! Programmatic editing of `url(...)` references in CSS source text.
//!
//! A [`UrlEditor`] parses a stylesheet once, indexes every url() token in
//! document order, and exposes a small set of operations over them:
//! - **Enumeration**: [`UrlEditor::urls`] lists distinct URL values, with
//!   pattern filtering via [`UrlEditor::urls_matching`]
//! - **Rebasing**: [`UrlEditor::change_css_root`] keeps relative URLs
//!   correct when the stylesheet moves to a different directory
//! - **Rewriting**: [`UrlEditor::change_url_content`] search-and-replaces
//!   within matching URL values
//! - **Printing**: [`UrlEditor::rebuild`] serializes the edited stylesheet
//!   back to CSS text
//!
//! Parsing and serialization are delegated to lightningcss; this crate only
//! walks and patches URL nodes. No file I/O happens anywhere: callers hand
//! in source text and get output text back.
//!
//! ## Example
//!
//! ```
//! use css_url_edit::UrlEditor;
//!
//! let css = ".logo { background: url('images/logo.png'); }";
//! let mut editor = UrlEditor::new(css)?;
//!
//! assert_eq!(editor.urls(), ["images/logo.png"]);
//!
//! // The stylesheet moves up one directory; its URLs follow.
//! editor.change_css_root("/site/css", "/site");
//! assert!(editor.rebuild()?.contains("css/images/logo.png"));
//! # Ok::<(), css_url_edit::Error>(())
//! ```

mod editor;
mod matcher;
mod rebase;

pub use editor::UrlEditor;
pub use matcher::UrlMatcher;

/// Error type for css-url-edit operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source text was rejected by the CSS parser
    #[error("css parse error: {0}")]
    Parse(String),

    /// Serializing the stylesheet back to CSS text failed
    #[error("css print error: {0}")]
    Print(String),

    /// A textual URL pattern failed to compile
    #[error("invalid url pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for css-url-edit operations.
pub type Result<T> = std::result::Result<T, Error>;
