//! The inbound rendering surface.

use log::debug;

use crate::config::IconRegistry;
use crate::error::Result;
use crate::icon::{IconConfigResolver, ResolvedIconConfig};
use crate::template::{IconTemplate, SvgIconTemplate};

/// Renders registered icons as inline, accessible `<svg>` markup.
///
/// The registry is read-only after construction, so a renderer can be shared
/// between threads (e.g. in an `Arc`) and used concurrently. Each call
/// resolves the icon from scratch and generates a fresh ARIA id.
///
/// # Example
///
/// ```no_run
/// use svg_icon_system::{IconRegistry, IconRenderer};
///
/// let registry = IconRegistry::from_path("config/svg-icons.json")?;
/// let renderer = IconRenderer::new(registry);
///
/// let markup = renderer.render_icon("menu")?;
/// assert!(markup.contains(r#"role="img""#));
/// # Ok::<(), svg_icon_system::IconError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IconRenderer<T = SvgIconTemplate> {
    registry: IconRegistry,
    resolver: IconConfigResolver,
    template: T,
}

impl IconRenderer<SvgIconTemplate> {
    /// Creates a renderer using the default template.
    pub fn new(registry: IconRegistry) -> Self {
        Self {
            registry,
            resolver: IconConfigResolver::default(),
            template: SvgIconTemplate,
        }
    }
}

impl<T: IconTemplate> IconRenderer<T> {
    /// Replaces the template used by [`render_icon`](Self::render_icon).
    pub fn with_template<U: IconTemplate>(self, template: U) -> IconRenderer<U> {
        IconRenderer {
            registry: self.registry,
            resolver: self.resolver,
            template,
        }
    }

    /// Sets the minimum length of generated ARIA ids.
    pub fn with_id_length(mut self, id_length: usize) -> Self {
        self.resolver = IconConfigResolver::new(id_length);
        self
    }

    pub fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    pub fn template(&self) -> &T {
        &self.template
    }

    /// Resolves an icon's configuration and content without rendering it.
    pub fn resolve(&self, icon_id: &str) -> Result<ResolvedIconConfig> {
        self.resolver.resolve(icon_id, &self.registry)
    }

    /// Renders `icon_id` to a complete `<svg>...</svg>` string.
    ///
    /// # Errors
    ///
    /// Returns every [`IconError`](crate::IconError) raised during
    /// resolution. No fallback markup is produced.
    pub fn render_icon(&self, icon_id: &str) -> Result<String> {
        let config = self.resolve(icon_id)?;
        debug!(
            "rendering icon '{}' from {}.svg (labelled: {})",
            icon_id,
            config.filename,
            config.is_labelled()
        );
        Ok(self.template.render(icon_id, &config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IconDefinition;
    use crate::error::IconError;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, IconRenderer) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("box.svg"), "<svg><title>old</title><rect/></svg>").unwrap();

        let folder = format!("{}/", dir.path().display());
        let registry = IconRegistry::new(folder)
            .with_icon("box", IconDefinition::new("box").with_viewbox_size("10", "10"))
            .with_icon(
                "labelled",
                IconDefinition::new("box").with_title("Box").with_size("10", "10"),
            );
        (dir, IconRenderer::new(registry))
    }

    #[test]
    fn renders_hidden_icon() {
        let (_dir, renderer) = fixture();
        assert_eq!(
            renderer.render_icon("box").unwrap(),
            r#"<svg class="icon icon-box" aria-hidden="true" viewBox="0 0 10 10" role="img"><rect/></svg>"#
        );
    }

    #[test]
    fn renders_labelled_icon() {
        let (_dir, renderer) = fixture();
        let markup = renderer.render_icon("labelled").unwrap();

        assert!(markup.contains(r#"width="10" height="10" viewBox="0 0 10 10""#));
        assert!(markup.contains(">Box</title><rect/></svg>"));
        assert!(!markup.contains("old"));
    }

    #[test]
    fn unknown_icon_is_an_error() {
        let (_dir, renderer) = fixture();
        assert!(matches!(renderer.render_icon("missing"), Err(IconError::UnknownIcon { .. })));
    }

    #[test]
    fn custom_template() {
        let (_dir, renderer) = fixture();
        let renderer = renderer.with_template(|icon_id: &str, config: &ResolvedIconConfig| {
            format!("[{icon_id}] {}", config.content)
        });

        assert_eq!(renderer.render_icon("box").unwrap(), "[box] <rect/>");
    }

    #[test]
    fn renderer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IconRenderer>();
    }
}
