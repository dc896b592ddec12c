//! SVG fragment building.
//!
//! Turns a standalone SVG file into the drawable content that goes inside an
//! inline `<svg>` tag:
//!
//! 1. parse the bytes as XML (not HTML),
//! 2. detach every `<title>` and `<desc>` element, at any depth,
//! 3. serialize the children of the outermost `<svg>` element, without the
//!    wrapper itself.
//!
//! The template supplies its own `<title>`/`<desc>` with ids that match
//! `aria-labelledby`, which is why the source file's copies are removed.
//!
//! # Example
//!
//! ```
//! use svg_icon_system::svg::extract_content;
//!
//! let content = extract_content(b"<svg><title>T</title><desc>D</desc><rect/></svg>").unwrap();
//! assert_eq!(content, "<rect/>");
//! ```

mod entity;
#[cfg(feature = "preview")]
pub mod raster;
mod tree;

use std::fs;
use std::path::Path;

use log::trace;

use crate::error::{IconError, Result};
use tree::XmlTree;

/// Tags stripped from the source document.
pub const STRIPPED_TAGS: [&str; 2] = ["title", "desc"];

/// The wrapper element whose children make up the content.
pub const WRAPPER_TAG: &str = "svg";

/// Reads an SVG asset from disk.
pub fn load_asset(path: &Path) -> Result<Vec<u8>> {
    trace!("reading SVG asset {}", path.display());
    fs::read(path).map_err(|source| IconError::IconFileNotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts the inner drawable content of an SVG document.
///
/// Returns an empty string when the document has no `svg` element. Nested
/// `<svg>` elements inside the outermost one are kept as content.
pub fn extract_content(bytes: &[u8]) -> Result<String> {
    let source = std::str::from_utf8(bytes).map_err(|e| IconError::MalformedSvg(e.to_string()))?;
    let mut tree = XmlTree::parse(source)?;

    let removed = tree.remove_elements(&STRIPPED_TAGS);
    trace!("removed {removed} title/desc element(s)");

    match tree.find_first(WRAPPER_TAG) {
        Some(svg) => svg.inner_xml(),
        None => Ok(String::new()),
    }
}

/// Loads an SVG asset and extracts its content.
pub fn content_from_file(path: &Path) -> Result<String> {
    let bytes = load_asset(path)?;
    extract_content(&bytes)
}

// ============================================================================
// Tests
// ============================================================================
