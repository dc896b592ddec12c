//! Raster previews of rendered icons using resvg/usvg.
//!
//! Inline HTML does not need namespace declarations on `<svg>`, but a
//! standalone SVG document does, so fragments are patched before they are
//! handed to usvg.
//!
//! Available with the `preview` feature.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Turns an inline `<svg>` fragment into a standalone SVG document.
///
/// Adds `xmlns` (and `xmlns:xlink` when the content uses `xlink:`) to the
/// opening tag unless already declared. Anything that does not start with
/// `<svg` is returned unchanged.
pub fn standalone_document(fragment: &str) -> String {
    let trimmed = fragment.trim_start();
    let Some(rest) = trimmed.strip_prefix("<svg") else {
        return fragment.to_string();
    };
    let open_tag_end = rest.find('>').unwrap_or(rest.len());
    let open_tag = &rest[..open_tag_end];

    let mut declarations = String::new();
    if !open_tag.contains("xmlns=") {
        declarations.push_str(&format!(" xmlns=\"{SVG_NS}\""));
    }
    if rest.contains("xlink:") && !open_tag.contains("xmlns:xlink=") {
        declarations.push_str(&format!(" xmlns:xlink=\"{XLINK_NS}\""));
    }

    format!("<svg{declarations}{rest}")
}

/// Rasterizes a rendered icon fragment to an RGBA image.
///
/// The icon is scaled to fit within `size x size` pixels while preserving
/// aspect ratio (the larger dimension will be `size`).
///
/// Returns `None` if the SVG cannot be parsed or rendered.
pub fn rasterize(fragment: &str, size: u32) -> Option<RgbaImage> {
    let document = standalone_document(fragment);

    let opts = Options::default();
    let tree = Tree::from_str(&document, &opts).ok()?;

    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();

    RgbaImage::from_fn(width, height, |x, y| match pixmap.pixel(x, y) {
        // tiny_skia stores premultiplied alpha
        Some(pixel) => Rgba(unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha())),
        None => Rgba([0, 0, 0, 0]),
    })
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a_f = a as f32 / 255.0;
    let channel = |c: u8| (c as f32 / a_f).round().min(255.0) as u8;
    [channel(r), channel(g), channel(b), a]
}
