use crate::assets::Sprite;
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba(self.0, self.1, self.2, a)
    }

    /// Source-over compositing of `src` onto this colour.
    pub fn blend(self, src: Rgba) -> Rgb {
        match src.3 {
            0 => self,
            255 => Rgb(src.0, src.1, src.2),
            a => Rgb::lerp(self, Rgb(src.0, src.1, src.2), a as u16 + 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const CLEAR: Rgba = Rgba(0, 0, 0, 0);

    pub const fn opaque(c: Rgb) -> Rgba {
        Rgba(c.0, c.1, c.2, 255)
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const BLACK: Rgb = Rgb(0, 0, 0);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2 when presented
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn blend(&mut self, x: i32, y: i32, c: Rgba) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.px[i] = self.px[i].blend(c);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgba) {
        for dy in 0..h {
            for dx in 0..w {
                self.blend(x + dx, y + dy, c);
            }
        }
    }

    /// One-pixel border just inside the rectangle.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        for dx in 0..w {
            self.set(x + dx, y, c);
            self.set(x + dx, y + h - 1, c);
        }
        for dy in 0..h {
            self.set(x, y + dy, c);
            self.set(x + w - 1, y + dy, c);
        }
    }

    pub fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) {
        for sy in 0..sprite.height() {
            for sx in 0..sprite.width() {
                self.blend(x + sx as i32, y + sy as i32, sprite.get(sx, sy));
            }
        }
    }

    pub fn darken(&mut self) {
        for c in &mut self.px {
            *c = Rgb(c.0 / 2, c.1 / 2, c.2 / 2);
        }
    }

    /// Nearest-neighbour scale of `self` into `dst`, keeping the aspect
    /// ratio and letterboxing the rest with `border`.
    pub fn scale_into(&self, dst: &mut PixelBuf, border: Rgb) {
        dst.clear(border);
        if self.w == 0 || self.h == 0 || dst.w == 0 || dst.h == 0 {
            return;
        }
        let scale = (dst.w as f64 / self.w as f64).min(dst.h as f64 / self.h as f64);
        let out_w = ((self.w as f64 * scale) as usize).clamp(1, dst.w);
        let out_h = ((self.h as f64 * scale) as usize).clamp(1, dst.h);
        let off_x = (dst.w - out_w) / 2;
        let off_y = (dst.h - out_h) / 2;
        for y in 0..out_h {
            let sy = (y * self.h / out_h).min(self.h - 1);
            for x in 0..out_w {
                let sx = (x * self.w / out_w).min(self.w - 1);
                dst.px[(off_y + y) * dst.w + off_x + x] = self.get(sx, sy);
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_respects_alpha_extremes() {
        let base = Rgb(10, 20, 30);
        assert_eq!(base.blend(Rgba::CLEAR), base);
        assert_eq!(base.blend(Rgba(1, 2, 3, 255)), Rgb(1, 2, 3));
        let half = Rgb(0, 0, 0).blend(Rgba(200, 100, 50, 127));
        assert_eq!(half, Rgb(100, 50, 25));
    }

    #[test]
    fn writes_outside_the_buffer_are_ignored() {
        let mut buf = PixelBuf::new(4, 4);
        buf.fill_rect(-2, -2, 10, 10, WHITE);
        buf.set(99, 0, BLACK);
        assert!((0..4).all(|y| (0..4).all(|x| buf.get(x, y) == WHITE)));
    }

    #[test]
    fn stroke_leaves_the_inside_alone() {
        let mut buf = PixelBuf::new(5, 5);
        buf.clear(BLACK);
        buf.stroke_rect(0, 0, 5, 5, WHITE);
        assert_eq!(buf.get(0, 0), WHITE);
        assert_eq!(buf.get(4, 2), WHITE);
        assert_eq!(buf.get(2, 2), BLACK);
    }

    #[test]
    fn scaling_letterboxes_and_samples() {
        let mut src = PixelBuf::new(2, 2);
        src.clear(WHITE);
        src.set(1, 1, BLACK);
        let mut dst = PixelBuf::new(8, 4);
        src.scale_into(&mut dst, SHADOW);
        // 2x2 -> 4x4 centred in an 8 wide target.
        assert_eq!(dst.get(0, 0), SHADOW);
        assert_eq!(dst.get(2, 0), WHITE);
        assert_eq!(dst.get(5, 3), BLACK);
        assert_eq!(dst.get(7, 3), SHADOW);
    }

    #[test]
    fn render_emits_one_line_per_two_pixel_rows() {
        let mut buf = PixelBuf::new(3, 4);
        buf.set(0, 0, WHITE);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(text.contains('\u{2580}'));
    }
}
