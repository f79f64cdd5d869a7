//! Code 39 barcode rendering to SVG
//!
//! Turns an identifier into a scannable image. The symbology is Code 39:
//! every character is nine elements (five bars, four spaces), three of them
//! wide, framed by `*` start/stop characters.

use std::fmt::Write;

use thiserror::Error;

/// Wide element width, in narrow modules
const WIDE_RATIO: u32 = 3;

/// Start/stop character pattern
const START_STOP: &str = "010010100";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("Nothing to render")]
    Empty,

    #[error("Character '{0}' cannot be encoded in Code 39")]
    UnsupportedCharacter(char),
}

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Narrow module width in pixels
    pub module_width: u32,
    /// Bar height in pixels
    pub height: u32,
    /// Quiet zone on each side, in narrow modules
    pub quiet_zone: u32,
    /// Print the identifier under the bars
    pub caption: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_width: 2,
            height: 80,
            quiet_zone: 10,
            caption: true,
        }
    }
}

/// Element pattern for a character, `1` marking a wide element.
/// Elements alternate bar/space starting with a bar.
fn pattern(c: char) -> Option<&'static str> {
    let p = match c {
        '0' => "000110100",
        '1' => "100100001",
        '2' => "001100001",
        '3' => "101100000",
        '4' => "000110001",
        '5' => "100110000",
        '6' => "001110000",
        '7' => "000100101",
        '8' => "100100100",
        '9' => "001100100",
        'A' => "100001001",
        'B' => "001001001",
        'C' => "101001000",
        'D' => "000011001",
        'E' => "100011000",
        'F' => "001011000",
        'G' => "000001101",
        'H' => "100001100",
        'I' => "001001100",
        'J' => "000011100",
        'K' => "100000011",
        'L' => "001000011",
        'M' => "101000010",
        'N' => "000010011",
        'O' => "100010010",
        'P' => "001010010",
        'Q' => "000000111",
        'R' => "100000110",
        'S' => "001000110",
        'T' => "000010110",
        'U' => "110000001",
        'V' => "011000001",
        'W' => "111000000",
        'X' => "010010001",
        'Y' => "110010000",
        'Z' => "011010000",
        '-' => "010000101",
        '.' => "110000100",
        ' ' => "011000100",
        '$' => "010101000",
        '/' => "010100010",
        '+' => "010001010",
        '%' => "000101010",
        _ => return None,
    };
    Some(p)
}

/// Render `identifier` as a Code 39 SVG document.
///
/// Only the 43-character Code 39 set is accepted. Lowercase letters are
/// rejected rather than folded, since the printed label must scan back to the
/// exact identifier. `*` is reserved for start/stop.
pub fn render_svg(identifier: &str, options: &RenderOptions) -> Result<String, RenderError> {
    if identifier.is_empty() {
        return Err(RenderError::Empty);
    }

    let mut patterns = Vec::with_capacity(identifier.len() + 2);
    patterns.push(START_STOP);
    for c in identifier.chars() {
        patterns.push(pattern(c).ok_or(RenderError::UnsupportedCharacter(c))?);
    }
    patterns.push(START_STOP);

    let unit = options.module_width.max(1);
    let mut bars = Vec::new();
    let mut x = options.quiet_zone * unit;

    for (index, p) in patterns.iter().enumerate() {
        if index > 0 {
            // inter-character gap, one narrow space
            x += unit;
        }
        for (element, wide) in p.bytes().enumerate() {
            let width = if wide == b'1' { unit * WIDE_RATIO } else { unit };
            if element % 2 == 0 {
                bars.push((x, width));
            }
            x += width;
        }
    }

    let width = x + options.quiet_zone * unit;
    let caption_height = if options.caption { 20 } else { 0 };
    let height = options.height + caption_height;

    let mut svg = String::new();
    // writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    svg.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);
    for (bar_x, bar_width) in bars {
        let _ = write!(
            svg,
            r##"<rect x="{}" y="0" width="{}" height="{}" fill="#000000"/>"##,
            bar_x, bar_width, options.height
        );
    }
    if options.caption {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="monospace" font-size="14" text-anchor="middle">{}</text>"#,
            width / 2,
            options.height + 16,
            identifier
        );
    }
    svg.push_str("</svg>");

    Ok(svg)
}
