//! 3x5 bitmap font.
//!
//! Each glyph is fifteen bits, read row by row from the top with the most
//! significant bit of a row on the left. Lowercase letters render as capitals.

use crate::pixels::{PixelBuf, Rgb, SHADOW};

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;
/// Horizontal distance between glyph origins.
pub const ADVANCE: i32 = GLYPH_W + 1;
/// Vertical distance between lines of outlined text.
pub const LINE_HEIGHT: i32 = GLYPH_H + 2;

#[rustfmt::skip]
fn glyph(ch: char) -> u16 {
    match ch.to_ascii_uppercase() {
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_011_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_010_010_010,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        'A' => 0b010_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b011_100_100_100_011,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_110_100_111,
        'F' => 0b111_100_110_100_100,
        'G' => 0b011_100_101_101_011,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_010,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_111_101_101,
        'N' => 0b110_101_101_101_101,
        'O' => 0b010_101_101_101_010,
        'P' => 0b110_101_110_100_100,
        'Q' => 0b010_101_101_110_011,
        'R' => 0b110_101_110_101_101,
        'S' => 0b011_100_010_001_110,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_101_010,
        'W' => 0b101_101_111_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        'Z' => 0b111_001_010_100_111,
        '.' => 0b000_000_000_000_010,
        ',' => 0b000_000_000_010_100,
        '!' => 0b010_010_010_000_010,
        '\'' => 0b010_010_000_000_000,
        '-' => 0b000_000_111_000_000,
        ':' => 0b000_010_000_010_000,
        '/' => 0b001_001_010_100_100,
        ' ' => 0,
        _ => 0b111_001_010_000_010, // ?
    }
}

fn glyph_pixels(ch: char) -> impl Iterator<Item = (i32, i32)> {
    let bits = glyph(ch);
    (0..GLYPH_H).flat_map(move |row| {
        (0..GLYPH_W).filter_map(move |col| {
            let bit = 14 - (row * GLYPH_W + col);
            ((bits >> bit) & 1 == 1).then_some((col, row))
        })
    })
}

/// Rendered width of `text` in pixels, without outline.
pub fn text_width(text: &str) -> i32 {
    match text.chars().count() as i32 {
        0 => 0,
        n => n * ADVANCE - 1,
    }
}

/// Rendered width of `text` drawn with [`draw_text_outlined`].
pub fn outlined_width(text: &str) -> i32 {
    if text.is_empty() { 0 } else { text_width(text) + 2 }
}

pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, text: &str, fg: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        let gx = x + i as i32 * ADVANCE;
        for (dx, dy) in glyph_pixels(ch) {
            buf.set(gx + dx, y + dy, fg);
        }
    }
}

/// Draws `text` with a one-pixel outline. The outline box starts at `(x, y)`.
pub fn draw_text_outlined(buf: &mut PixelBuf, x: i32, y: i32, text: &str, fg: Rgb, outline: Rgb) {
    for oy in -1..=1 {
        for ox in -1..=1 {
            if ox != 0 || oy != 0 {
                draw_text(buf, x + 1 + ox, y + 1 + oy, text, outline);
            }
        }
    }
    draw_text(buf, x + 1, y + 1, text, fg);
}

pub fn draw_text_centered(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb, outline: Rgb) {
    draw_text_outlined(buf, cx - outlined_width(text) / 2, y, text, fg, outline);
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, fg: Rgb) {
    let s = n.to_string();
    let start_x = cx - text_width(&s) / 2;
    // Shadow pass
    draw_text(buf, start_x + 1, y + 1, &s, SHADOW);
    draw_text(buf, start_x, y, &s, fg);
}

/// Greedy line fill: a word joins the current line if the result still fits
/// in `max_width`, otherwise it starts a new line. A word too wide on its own
/// gets a line to itself.
pub fn wrap_words(text: &str, max_width: i32, measure: impl Fn(&str) -> i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
