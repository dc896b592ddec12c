//! svg-icon-system: accessible inline SVG icons for server-rendered HTML
//!
//! This crate loads SVG assets named in an icon registry, strips their
//! wrapper and any `<title>`/`<desc>` elements, and emits an inline `<svg>`
//! tag with ARIA attributes and freshly generated `<title>`/`<desc>` ids.
//!
//! # Example
//!
//! ```no_run
//! use svg_icon_system::{IconDefinition, IconRegistry, IconRenderer};
//!
//! let registry = IconRegistry::new("assets/icons/").with_icon(
//!     "check",
//!     IconDefinition::new("check")
//!         .with_title("Check")
//!         .with_viewbox_size("24", "24"),
//! );
//!
//! let renderer = IconRenderer::new(registry);
//! let markup = renderer.render_icon("check")?;
//! // <svg class="icon icon-check" aria-labelledby="title-XXXXX" viewBox="0 0 24 24" role="img">
//! //   <title id="title-XXXXX">Check</title>...</svg>
//! # Ok::<(), svg_icon_system::IconError>(())
//! ```
//!
//! # Registry Files
//!
//! Registries are usually loaded from JSON with [`IconRegistry::from_path`].
//! See the [`config`] module for the format.

pub mod config;
mod error;
mod icon;
mod renderer;
pub mod svg;
mod template;
pub mod unique_id;

pub use config::{IconDefinition, IconRegistry};
pub use error::{IconError, Result};
pub use icon::{ARIA_HIDDEN, IconConfigResolver, ResolvedIconConfig};
pub use renderer::IconRenderer;
pub use template::{IconTemplate, SvgIconTemplate};
