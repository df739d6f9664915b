/// Treemap rendering to a standalone SVG document.
///
/// Layout comes from [`dirmap_core::treemap::squarify`]; this module only
/// decides geometry around it (title band, frame, per-cell padding) and
/// paint.
use dirmap_core::model::size::format_size;
use dirmap_core::treemap::{layout_buckets, Bucket, Rect};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write};

pub const DEFAULT_WIDTH: u32 = 1400;
pub const DEFAULT_HEIGHT: u32 = 900;

const MARGIN: f64 = 14.0;
const HEADER_HEIGHT: f64 = 52.0;
const CELL_PADDING: f64 = 1.0;
const BACKGROUND: &str = "#0b1020";
const FRAME: &str = "#2b3350";
const TITLE_FILL: &str = "#e6e6e6";
const FONT: &str = "Segoe UI, Arial";

/// Smallest padded cell that still gets a text label.
pub const LABEL_MIN_WIDTH: f64 = 120.0;
pub const LABEL_MIN_HEIGHT: f64 = 26.0;

/// Deterministic fill for a label: the first three SHA-256 bytes, each
/// mapped into `64..224` so dark label text stays legible.
pub fn stable_color_hex(label: &str) -> String {
    let digest = Sha256::digest(label.as_bytes());
    let channel = |b: u8| 64 + (b % 160);
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(digest[0]),
        channel(digest[1]),
        channel(digest[2])
    )
}

/// Escape text for use in XML content and attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Area available to the cells once the title band and margins are taken.
pub fn plot_area(width: u32, height: u32) -> Rect {
    let (w, h) = (f64::from(width), f64::from(height));
    let y = MARGIN + HEADER_HEIGHT;
    Rect::new(
        MARGIN,
        y,
        (w - 2.0 * MARGIN).max(1.0),
        (h - y - MARGIN).max(1.0),
    )
}

/// Render `buckets` (largest first) as an SVG document.
pub fn render_treemap_svg(buckets: &[Bucket], title: &str, width: u32, height: u32) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_treemap_svg(&mut out, buckets, title, width, height);
    out
}

pub fn write_treemap_svg<W: Write>(
    out: &mut W,
    buckets: &[Bucket],
    title: &str,
    width: u32,
    height: u32,
) -> fmt::Result {
    if buckets.is_empty() {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="200">"#
        )?;
        writeln!(
            out,
            r#"<text x="16" y="40" font-family="{FONT}" font-size="18">No items to render.</text>"#
        )?;
        return writeln!(out, "</svg>");
    }

    let plot = plot_area(width, height);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
    )?;
    writeln!(
        out,
        r#"<rect x="0" y="0" width="100%" height="100%" fill="{BACKGROUND}"/>"#
    )?;
    writeln!(
        out,
        r#"<text x="{MARGIN}" y="{}" fill="{TITLE_FILL}" font-family="{FONT}" font-size="22" font-weight="600">{}</text>"#,
        MARGIN + 28.0,
        xml_escape(title)
    )?;
    writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{FRAME}" stroke-width="1"/>"#,
        plot.x, plot.y, plot.w, plot.h
    )?;

    for (bucket, rect) in layout_buckets(buckets, plot) {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            continue;
        }
        let cell = rect.inset(CELL_PADDING);
        let human = format_size(bucket.size);
        writeln!(
            out,
            r#"<g><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" opacity="0.92" stroke="{BACKGROUND}" stroke-width="1"><title>{}</title></rect></g>"#,
            cell.x,
            cell.y,
            cell.w,
            cell.h,
            stable_color_hex(&bucket.label),
            xml_escape(&format!("{}\n{human}", bucket.label)),
        )?;

        if cell.w >= LABEL_MIN_WIDTH && cell.h >= LABEL_MIN_HEIGHT {
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" fill="{BACKGROUND}" font-family="{FONT}" font-size="14" font-weight="600">{}</text>"#,
                cell.x + 6.0,
                cell.y + 18.0,
                xml_escape(&format!("{} ({human})", bucket.label)),
            )?;
        }
    }

    writeln!(out, "</svg>")
}
