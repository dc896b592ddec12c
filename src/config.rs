//! Icon registry configuration.
//!
//! An [`IconRegistry`] maps icon identifiers to [`IconDefinition`]s and
//! names the folder that holds the SVG assets. It is loaded once and only
//! read afterwards.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "icon_folder_path": "assets/icons/",
//!   "icons": {
//!     "menu": {
//!       "filename": "icon_menu",
//!       "title": "Menu icon",
//!       "desc": "Three stacked horizontal bars",
//!       "viewbox_width": "20",
//!       "viewbox_height": "16"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// IconDefinition
// ============================================================================

/// Static configuration for a single icon.
///
/// Every field is optional so that a field left out of the registry can be
/// told apart from one that was explicitly set to an empty string. Only the
/// former is filled in by [`IconDefinition::merge_defaults`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct IconDefinition {
    /// SVG file name without the `.svg` extension. Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Accessible title. Strongly recommended for standalone icons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Accessible description, only used when a title is present.
    #[serde(alias = "description", skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewbox_x: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewbox_y: Option<String>,

    /// Falls back to `width` when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewbox_width: Option<String>,

    /// Falls back to `height` when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewbox_height: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_aspect_ratio: Option<String>,

    /// Inline `style` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Extra CSS classes appended after `icon icon-{id}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl IconDefinition {
    /// Creates a definition that only names its SVG file.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    /// The complete default record: empty strings everywhere except the
    /// viewbox origin, which defaults to `"0"`.
    pub fn defaults() -> Self {
        let empty = || Some(String::new());
        Self {
            filename: empty(),
            title: empty(),
            desc: empty(),
            viewbox_x: Some("0".into()),
            viewbox_y: Some("0".into()),
            viewbox_width: empty(),
            viewbox_height: empty(),
            width: empty(),
            height: empty(),
            preserve_aspect_ratio: empty(),
            style: empty(),
            class: empty(),
        }
    }

    /// Fills every absent field from `defaults`.
    ///
    /// Fields present in `self` win even when they are empty strings.
    pub fn merge_defaults(self, defaults: IconDefinition) -> Self {
        Self {
            filename: self.filename.or(defaults.filename),
            title: self.title.or(defaults.title),
            desc: self.desc.or(defaults.desc),
            viewbox_x: self.viewbox_x.or(defaults.viewbox_x),
            viewbox_y: self.viewbox_y.or(defaults.viewbox_y),
            viewbox_width: self.viewbox_width.or(defaults.viewbox_width),
            viewbox_height: self.viewbox_height.or(defaults.viewbox_height),
            width: self.width.or(defaults.width),
            height: self.height.or(defaults.height),
            preserve_aspect_ratio: self.preserve_aspect_ratio.or(defaults.preserve_aspect_ratio),
            style: self.style.or(defaults.style),
            class: self.class.or(defaults.class),
        }
    }

    /// Sets the accessible title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the accessible description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Sets the viewbox width and height.
    pub fn with_viewbox_size(
        mut self,
        width: impl Into<String>,
        height: impl Into<String>,
    ) -> Self {
        self.viewbox_width = Some(width.into());
        self.viewbox_height = Some(height.into());
        self
    }

    /// Sets the rendered width and height.
    pub fn with_size(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }

    /// Sets the extra CSS classes.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

// ============================================================================
// IconRegistry
// ============================================================================

/// Every known icon plus the folder its SVG files live in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconRegistry {
    /// Prefix for asset paths: `{icon_folder_path}{filename}.svg`.
    ///
    /// This is joined by plain concatenation, so it normally ends with a
    /// path separator.
    #[serde(default)]
    pub icon_folder_path: String,

    /// Icon definitions keyed by icon identifier.
    #[serde(default)]
    pub icons: BTreeMap<String, IconDefinition>,
}

impl IconRegistry {
    /// Creates an empty registry reading assets from `icon_folder_path`.
    pub fn new(icon_folder_path: impl Into<String>) -> Self {
        Self {
            icon_folder_path: icon_folder_path.into(),
            icons: BTreeMap::new(),
        }
    }

    /// Adds or replaces an icon definition.
    pub fn with_icon(mut self, icon_id: impl Into<String>, definition: IconDefinition) -> Self {
        self.icons.insert(icon_id.into(), definition);
        self
    }

    /// Looks up an icon definition.
    pub fn get(&self, icon_id: &str) -> Option<&IconDefinition> {
        self.icons.get(icon_id)
    }

    /// Returns `true` if the identifier is registered.
    pub fn contains(&self, icon_id: &str) -> bool {
        self.icons.contains_key(icon_id)
    }

    /// Iterates over the registered identifiers in sorted order.
    pub fn icon_ids(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Builds the on-disk path of an SVG asset.
    pub fn asset_path(&self, filename: &str) -> PathBuf {
        PathBuf::from(format!("{}{}.svg", self.icon_folder_path, filename))
    }

    /// Deserializes a registry from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(json)?;
        debug!(
            "loaded icon registry with {} icon(s) from {:?}",
            registry.len(),
            registry.icon_folder_path
        );
        Ok(registry)
    }

    /// Reads a registry from a JSON file.
    ///
    /// A relative `icon_folder_path` is resolved against the directory that
    /// contains the registry file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut registry = Self::from_json(&json)?;

        let base = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(base) = base {
            if Path::new(&registry.icon_folder_path).is_relative() {
                registry.icon_folder_path = format!(
                    "{}{}{}",
                    base.to_string_lossy(),
                    MAIN_SEPARATOR,
                    registry.icon_folder_path
                );
            }
        }

        Ok(registry)
    }

    /// Serializes the registry to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;

    #[test]
    fn merge_fills_absent_fields() {
        let merged = IconDefinition::new("check").merge_defaults(IconDefinition::defaults());

        assert_eq!(merged.filename.as_deref(), Some("check"));
        assert_eq!(merged.title.as_deref(), Some(""));
        assert_eq!(merged.viewbox_x.as_deref(), Some("0"));
        assert_eq!(merged.viewbox_y.as_deref(), Some("0"));
        assert_eq!(merged.class.as_deref(), Some(""));
    }

    #[test]
    fn merge_keeps_explicit_empty_values() {
        let definition = IconDefinition {
            viewbox_x: Some(String::new()),
            ..IconDefinition::new("check")
        };
        let merged = definition.merge_defaults(IconDefinition::defaults());

        // First defined wins, even if empty
        assert_eq!(merged.viewbox_x.as_deref(), Some(""));
        assert_eq!(merged.viewbox_y.as_deref(), Some("0"));
    }

    #[test]
    fn registry_from_json() {
        let json = r#"{
            "icon_folder_path": "/srv/icons/",
            "icons": {
                "menu": {
                    "filename": "icon_menu",
                    "title": "Menu icon",
                    "description": "Three bars",
                    "viewbox_width": "20",
                    "viewbox_height": "16",
                    "unused_key": "ignored"
                }
            }
        }"#;

        let registry = IconRegistry::from_json(json).unwrap();
        let menu = registry.get("menu").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(menu.filename.as_deref(), Some("icon_menu"));
        assert_eq!(menu.desc.as_deref(), Some("Three bars"));
        assert!(menu.width.is_none());
        assert_eq!(
            registry.asset_path("icon_menu"),
            PathBuf::from("/srv/icons/icon_menu.svg")
        );
    }

    #[test]
    fn registry_json_keeps_absent_fields_absent() {
        let registry = IconRegistry::new("icons/")
            .with_icon("check", IconDefinition::new("check").with_title("Check"));

        let json = registry.to_json_pretty().unwrap();
        assert!(json.contains("\"title\": \"Check\""));
        assert!(!json.contains("\"desc\""));

        let restored = IconRegistry::from_json(&json).unwrap();
        assert_eq!(restored, registry);
    }

    #[test]
    fn registry_from_invalid_json() {
        let err = IconRegistry::from_json("{ not json").unwrap_err();
        assert!(matches!(err, IconError::Registry(_)));
    }

    #[test]
    fn registry_from_path_resolves_relative_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.json");
        fs::write(&path, r#"{ "icon_folder_path": "svg/", "icons": {} }"#).unwrap();

        let registry = IconRegistry::from_path(&path).unwrap();
        assert_eq!(
            registry.asset_path("check"),
            dir.path().join("svg").join("check.svg")
        );
    }

    #[test]
    fn registry_from_missing_path() {
        let err = IconRegistry::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, IconError::Io(_)));
    }
}
