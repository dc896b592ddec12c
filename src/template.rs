//! Final `<svg>` tag assembly.

use quick_xml::escape::escape;

use crate::icon::ResolvedIconConfig;

// ============================================================================
// IconTemplate Trait
// ============================================================================

/// Serializes a resolved icon into markup.
///
/// [`SvgIconTemplate`] is the default. Hosts that need different markup
/// (extra attributes, another wrapper) implement this trait and pass their
/// template to [`IconRenderer::with_template`](crate::IconRenderer::with_template).
pub trait IconTemplate {
    /// Renders the icon `icon_id` from its resolved configuration.
    fn render(&self, icon_id: &str, config: &ResolvedIconConfig) -> String;
}

impl<F> IconTemplate for F
where
    F: Fn(&str, &ResolvedIconConfig) -> String,
{
    fn render(&self, icon_id: &str, config: &ResolvedIconConfig) -> String {
        self(icon_id, config)
    }
}

// ============================================================================
// SvgIconTemplate
// ============================================================================

/// The default inline SVG template.
///
/// Produces:
///
/// ```text
/// <svg class="icon icon-{id} {class}" {aria} [width=".." height=".."]
///     viewBox="{x} {y} {w} {h}" [preserveAspectRatio=".."] [style=".."] role="img">
///   [<title id="title-{uid}">..</title>[<desc id="desc-{uid}">..</desc>]]
///   {content}
/// </svg>
/// ```
///
/// Only the title and description are HTML-escaped. Every other value comes
/// from the registry or the SVG asset and is written verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgIconTemplate;

impl IconTemplate for SvgIconTemplate {
    fn render(&self, icon_id: &str, config: &ResolvedIconConfig) -> String {
        let mut out = String::with_capacity(config.content.len() + 256);

        out.push_str("<svg class=\"icon icon-");
        out.push_str(icon_id);
        if !config.class.is_empty() {
            out.push(' ');
            out.push_str(&config.class);
        }
        out.push_str("\" ");
        out.push_str(&config.aria);

        if !config.width.is_empty() && !config.height.is_empty() {
            out.push_str(&format!(" width=\"{}\" height=\"{}\"", config.width, config.height));
        }

        out.push_str(&format!(
            " viewBox=\"{} {} {} {}\"",
            config.viewbox_x, config.viewbox_y, config.viewbox_width, config.viewbox_height
        ));

        if !config.preserve_aspect_ratio.is_empty() {
            out.push_str(&format!(" preserveAspectRatio=\"{}\"", config.preserve_aspect_ratio));
        }
        if !config.style.is_empty() {
            out.push_str(&format!(" style=\"{}\"", config.style));
        }
        out.push_str(" role=\"img\">");

        let unique_id = config.unique_id.as_deref().filter(|_| !config.title.is_empty());
        if let Some(unique_id) = unique_id {
            out.push_str(&format!(
                "<title id=\"title-{unique_id}\">{}</title>",
                escape(&config.title)
            ));
            if !config.desc.is_empty() {
                out.push_str(&format!(
                    "<desc id=\"desc-{unique_id}\">{}</desc>",
                    escape(&config.desc)
                ));
            }
        }

        out.push_str(&config.content);
        out.push_str("</svg>");
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
