//! Icon configuration resolution.
//!
//! This module turns a static [`IconDefinition`] into a
//! [`ResolvedIconConfig`]: defaults merged in, geometry validated, ARIA
//! linkage generated, and the SVG content loaded.

use serde::Serialize;

use crate::config::{IconDefinition, IconRegistry};
use crate::error::{IconError, Result};
use crate::svg;
use crate::unique_id::{self, DEFAULT_ID_LENGTH};

/// `aria-hidden` form used when the icon has no title.
pub const ARIA_HIDDEN: &str = r#"aria-hidden="true""#;

// ============================================================================
// ResolvedIconConfig
// ============================================================================

/// A fully defaulted icon configuration, created fresh for every render.
///
/// Never cached: each resolution gets its own [`unique_id`](Self::unique_id)
/// so that several copies of one icon on a page don't share element ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResolvedIconConfig {
    pub filename: String,
    pub title: String,
    pub desc: String,
    pub viewbox_x: String,
    pub viewbox_y: String,
    pub viewbox_width: String,
    pub viewbox_height: String,
    pub width: String,
    pub height: String,
    pub preserve_aspect_ratio: String,
    pub style: String,
    pub class: String,

    /// The ARIA attribute for the outer tag, e.g. `aria-hidden="true"` or
    /// `aria-labelledby="title-{uid} desc-{uid}"`.
    pub aria: String,

    /// Present only when the title is non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,

    /// Inner XML of the source SVG with `title`/`desc` removed.
    pub content: String,
}

impl ResolvedIconConfig {
    /// Builds the defaulted configuration from a definition that has already
    /// been merged with [`IconDefinition::defaults`].
    fn from_merged(merged: IconDefinition) -> Self {
        Self {
            filename: merged.filename.unwrap_or_default(),
            title: merged.title.unwrap_or_default(),
            desc: merged.desc.unwrap_or_default(),
            viewbox_x: merged.viewbox_x.unwrap_or_default(),
            viewbox_y: merged.viewbox_y.unwrap_or_default(),
            viewbox_width: merged.viewbox_width.unwrap_or_default(),
            viewbox_height: merged.viewbox_height.unwrap_or_default(),
            width: merged.width.unwrap_or_default(),
            height: merged.height.unwrap_or_default(),
            preserve_aspect_ratio: merged.preserve_aspect_ratio.unwrap_or_default(),
            style: merged.style.unwrap_or_default(),
            class: merged.class.unwrap_or_default(),
            aria: ARIA_HIDDEN.to_string(),
            unique_id: None,
            content: String::new(),
        }
    }

    /// Returns `true` if the icon carries an accessible title.
    pub fn is_labelled(&self) -> bool {
        self.unique_id.is_some()
    }

    /// Generates the ARIA linkage id and upgrades `aria` when a title is set.
    fn apply_accessibility(&mut self, id_length: usize) {
        self.aria = ARIA_HIDDEN.to_string();
        if self.title.is_empty() {
            return;
        }

        let uid = unique_id::generate(id_length);
        self.aria = if self.desc.is_empty() {
            format!(r#"aria-labelledby="title-{uid}""#)
        } else {
            format!(r#"aria-labelledby="title-{uid} desc-{uid}""#)
        };
        self.unique_id = Some(uid);
    }

    /// Fills in the viewbox origin and copies `width`/`height` into an empty
    /// viewbox size.
    fn apply_geometry(&mut self, icon_id: &str) -> Result<()> {
        if self.viewbox_x.is_empty() {
            self.viewbox_x = "0".into();
        }
        if self.viewbox_y.is_empty() {
            self.viewbox_y = "0".into();
        }

        if self.viewbox_width.is_empty() {
            if self.width.is_empty() {
                return Err(IconError::MissingWidth {
                    icon_id: icon_id.to_string(),
                });
            }
            self.viewbox_width = self.width.clone();
        }

        if self.viewbox_height.is_empty() {
            if self.height.is_empty() {
                return Err(IconError::MissingHeight {
                    icon_id: icon_id.to_string(),
                });
            }
            self.viewbox_height = self.height.clone();
        }

        Ok(())
    }
}

// ============================================================================
// IconConfigResolver
// ============================================================================

/// Resolves icon identifiers against a registry.
#[derive(Debug, Clone, Copy)]
pub struct IconConfigResolver {
    id_length: usize,
}

impl Default for IconConfigResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IconConfigResolver {
    /// Creates a resolver generating ARIA ids of at least `id_length`
    /// characters.
    pub fn new(id_length: usize) -> Self {
        Self { id_length }
    }

    pub fn id_length(&self) -> usize {
        self.id_length
    }

    /// Validates and defaults the configuration of `icon_id` without
    /// touching the filesystem. `content` is left empty.
    ///
    /// # Errors
    ///
    /// - [`IconError::UnknownIcon`] if `icon_id` is not registered; checked
    ///   before anything else.
    /// - [`IconError::MissingFilename`] if no filename is defined.
    /// - [`IconError::MissingWidth`] / [`IconError::MissingHeight`] if
    ///   neither the viewbox size nor the rendered size is set.
    pub fn resolve_definition(
        &self,
        icon_id: &str,
        registry: &IconRegistry,
    ) -> Result<ResolvedIconConfig> {
        let definition = registry.get(icon_id).ok_or_else(|| IconError::UnknownIcon {
            icon_id: icon_id.to_string(),
        })?;

        if definition.filename.as_deref().is_none_or(str::is_empty) {
            return Err(IconError::MissingFilename {
                icon_id: icon_id.to_string(),
            });
        }

        let merged = definition.clone().merge_defaults(IconDefinition::defaults());
        let mut config = ResolvedIconConfig::from_merged(merged);
        config.apply_accessibility(self.id_length);
        config.apply_geometry(icon_id)?;

        Ok(config)
    }

    /// Fully resolves `icon_id`, including the SVG content read from
    /// `{icon_folder_path}{filename}.svg`.
    ///
    /// # Errors
    ///
    /// Everything [`resolve_definition`](Self::resolve_definition) returns,
    /// plus [`IconError::IconFileNotFound`] and [`IconError::MalformedSvg`]
    /// for the asset.
    pub fn resolve(&self, icon_id: &str, registry: &IconRegistry) -> Result<ResolvedIconConfig> {
        let mut config = self.resolve_definition(icon_id, registry)?;
        let path = registry.asset_path(&config.filename);
        config.content = svg::content_from_file(&path)?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
