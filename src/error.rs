//! Error types for icon resolution and rendering.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving or rendering an icon.
///
/// Every failure is surfaced to the caller. Whether a page shows a
/// placeholder, a blank space, or an error is up to the host.
#[derive(Error, Debug)]
pub enum IconError {
    /// The requested identifier has no entry in the registry.
    #[error("the icon ID '{icon_id}' does not exist in the icon registry")]
    UnknownIcon { icon_id: String },

    /// The icon definition does not name an SVG file.
    #[error("no SVG icon filename is defined for '{icon_id}'")]
    MissingFilename { icon_id: String },

    /// Neither `width` nor `viewbox_width` is set.
    #[error("a 'width' or 'viewbox_width' must be declared for '{icon_id}'")]
    MissingWidth { icon_id: String },

    /// Neither `height` nor `viewbox_height` is set.
    #[error("a 'height' or 'viewbox_height' must be declared for '{icon_id}'")]
    MissingHeight { icon_id: String },

    /// The SVG asset is missing or unreadable.
    #[error("SVG icon file {} could not be read: {source}", path.display())]
    IconFileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The SVG asset is not well-formed XML.
    #[error("malformed SVG: {0}")]
    MalformedSvg(String),

    /// The registry document could not be parsed.
    #[error("invalid icon registry: {0}")]
    Registry(String),

    /// I/O error while reading the registry.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<quick_xml::Error> for IconError {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedSvg(err.to_string())
    }
}

impl From<serde_json::Error> for IconError {
    fn from(err: serde_json::Error) -> Self {
        Self::Registry(err.to_string())
    }
}

/// Result type for icon operations.
pub type Result<T> = std::result::Result<T, IconError>;
