//! The sprite set.
//!
//! Everything is drawn procedurally when the session starts: the bird frames
//! from pixel art, the pipe, ground and background from the colour ramps.
//! Collision masks are computed once here and shared by every entity that
//! uses the sprite.

use crate::collision::Mask;
use crate::config::Config;
use crate::pixels::{Rgb, Rgba, SKY_BOT, SKY_TOP};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("sprite `{name}` has no pixels")]
    Empty { name: &'static str },
    #[error("sprite `{name}` row {row} is {len} wide, expected {expected}")]
    RaggedRow {
        name: &'static str,
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("sprite `{name}` uses unknown palette key {key:?}")]
    UnknownKey { name: &'static str, key: char },
}

const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);

const BIRD_PALETTE: &[(char, Rgba)] = &[
    ('.', Rgba::CLEAR),
    ('K', Rgba(50, 35, 25, 255)),
    ('Y', Rgba(245, 200, 66, 255)),
    ('H', Rgba(255, 225, 100, 255)),
    ('w', Rgba(215, 165, 35, 255)),
    ('W', Rgba(255, 255, 255, 255)),
    ('P', Rgba(20, 20, 20, 255)),
    ('o', Rgba(225, 75, 35, 255)),
];

#[rustfmt::skip]
const BIRD_UPFLAP: &[&str] = &[
    "...KKKK...",
    ".KwwKYKWK.",
    "KwwwKYKWPK",
    "KKKKYYYKKK",
    ".KYYYYKooo",
    "..KKYYYKKK",
    "...KKKK...",
];

#[rustfmt::skip]
const BIRD_MIDFLAP: &[&str] = &[
    "...KKKK...",
    "..KHHYKWK.",
    ".KYYYYKWPK",
    "KwwwKYYKKK",
    "KwwwKYKooo",
    ".KKKYYYKKK",
    "...KKKK...",
];

#[rustfmt::skip]
const BIRD_DOWNFLAP: &[&str] = &[
    "...KKKK...",
    "..KHHYKWK.",
    ".KYYYYKWPK",
    "KKKKYYYKKK",
    "KwwwKYKooo",
    "KwwwKYYKKK",
    ".KKKKKK...",
];

/// An RGBA image.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    w: usize,
    h: usize,
    px: Vec<Rgba>,
}

impl Sprite {
    pub fn new(w: usize, h: usize, fill: Rgba) -> Self {
        Self {
            w,
            h,
            px: vec![fill; w * h],
        }
    }

    pub fn from_art(
        name: &'static str,
        rows: &[&str],
        palette: &[(char, Rgba)],
    ) -> Result<Self, AssetError> {
        let expected = rows.first().map_or(0, |r| r.chars().count());
        if expected == 0 {
            return Err(AssetError::Empty { name });
        }
        let mut px = Vec::with_capacity(expected * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != expected {
                return Err(AssetError::RaggedRow {
                    name,
                    row,
                    len,
                    expected,
                });
            }
            for key in line.chars() {
                let c = palette
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, c)| *c)
                    .ok_or(AssetError::UnknownKey { name, key })?;
                px.push(c);
            }
        }
        Ok(Self {
            w: expected,
            h: rows.len(),
            px,
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.px[y * self.w + x]
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgba) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn flipped_vertical(&self) -> Self {
        let px = self
            .px
            .chunks(self.w.max(1))
            .rev()
            .flatten()
            .copied()
            .collect();
        Self { px, ..*self }
    }
}

/// Sprites and their masks, built once per session.
#[derive(Debug, Clone)]
pub struct Assets {
    pub bird: [Sprite; 3],
    pub bird_masks: [Mask; 3],
    pub pipe: Sprite,
    pub pipe_mask: Mask,
    pub pipe_inverted: Sprite,
    pub pipe_inverted_mask: Mask,
    pub ground: Sprite,
    pub ground_mask: Mask,
    pub background: Sprite,
}

impl Assets {
    pub fn build(config: &Config) -> Result<Self, AssetError> {
        let bird = [
            Sprite::from_art("bird-upflap", BIRD_UPFLAP, BIRD_PALETTE)?,
            Sprite::from_art("bird-midflap", BIRD_MIDFLAP, BIRD_PALETTE)?,
            Sprite::from_art("bird-downflap", BIRD_DOWNFLAP, BIRD_PALETTE)?,
        ];
        let bird_masks = [
            Mask::from_sprite(&bird[0]),
            Mask::from_sprite(&bird[1]),
            Mask::from_sprite(&bird[2]),
        ];
        let pipe = pipe_sprite(config.pipes.width as usize, config.pipes.height as usize);
        let pipe_inverted = pipe.flipped_vertical();
        let ground = ground_sprite(config.ground.width as usize, config.ground.height as usize);
        let background = background_sprite(
            config.screen.width as usize,
            config.screen.height as usize,
            config.ground.height as usize,
        );
        Ok(Self {
            bird_masks,
            pipe_mask: Mask::from_sprite(&pipe),
            pipe_inverted_mask: Mask::from_sprite(&pipe_inverted),
            ground_mask: Mask::from_sprite(&ground),
            bird,
            pipe,
            pipe_inverted,
            ground,
            background,
        })
    }

    pub fn bird_size(&self) -> (usize, usize) {
        (self.bird[0].width(), self.bird[0].height())
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// Upright pipe: a full-width cap on top, the body inset by one pixel on
/// each side so the margins stay transparent.
fn pipe_sprite(w: usize, h: usize) -> Sprite {
    let mut s = Sprite::new(w, h, Rgba::CLEAR);
    let (w, h) = (w as i32, h as i32);
    let cap_h = (h / 30).max(2).min(h);
    let inset = if w > 2 { 1 } else { 0 };
    let body_w = w - inset * 2;

    for x in 0..w {
        let c = Rgba::opaque(pipe_shade(x, w));
        for y in 0..cap_h {
            s.set(x, y, c);
        }
        s.set(x, 0, Rgba::opaque(CAP_DARK));
        s.set(x, cap_h - 1, Rgba::opaque(CAP_DARK));
    }
    for x in 0..body_w {
        let c = Rgba::opaque(pipe_shade(x, body_w));
        for y in cap_h..h {
            s.set(inset + x, y, c);
        }
    }
    s
}

fn ground_sprite(w: usize, h: usize) -> Sprite {
    let mut s = Sprite::new(w, h, Rgba::opaque(DIRT));
    let (w, h) = (w as i32, h as i32);
    // Grass strip
    for x in 0..w {
        let alt = (x / 3) % 2 == 0;
        s.set(x, 0, Rgba::opaque(if alt { GRASS } else { GRASS_LIGHT }));
        s.set(x, 1, Rgba::opaque(GRASS));
    }
    // Dirt
    for y in 2..h {
        for x in 0..w {
            let stripe = (x + y * 2) % 12 < 6;
            s.set(x, y, Rgba::opaque(if stripe { DIRT } else { DIRT_DARK }));
        }
    }
    s
}

fn background_sprite(w: usize, h: usize, ground_h: usize) -> Sprite {
    let mut s = Sprite::new(w, h, Rgba::opaque(SKY_BOT));
    let sky_h = h.saturating_sub(ground_h);
    let scale = h as f64 / 96.0;
    for y in 0..sky_h {
        let t = (y * 256 / sky_h.max(1)) as u16;
        let c = Rgba::opaque(Rgb::lerp(SKY_TOP, SKY_BOT, t));
        for x in 0..w {
            s.set(x as i32, y as i32, c);
        }
    }
    let base = sky_h as i32;
    // Far hills
    for x in 0..w as i32 {
        let fx = x as f64 * 0.04;
        let hh = (fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0) * scale;
        let top = base - hh as i32 - (4.0 * scale) as i32;
        for y in top..base {
            s.set(x, y, Rgba::opaque(HILL_FAR));
        }
    }
    // Near hills
    for x in 0..w as i32 {
        let fx = x as f64 * 0.06 + 1.3;
        let hh = (fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0) * scale;
        let top = base - hh as i32 - (2.0 * scale) as i32;
        for y in top..base {
            s.set(x, y, Rgba::opaque(HILL_NEAR));
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_assets_build() {
        let cfg = Config::default();
        let assets = Assets::build(&cfg).unwrap();
        assert_eq!(assets.bird_size(), (10, 7));
        assert_eq!(assets.pipe.width(), cfg.pipes.width as usize);
        assert_eq!(assets.ground.height(), cfg.ground.height as usize);
        assert_eq!(assets.background.width(), cfg.screen.width as usize);
    }

    #[test]
    fn ragged_art_is_rejected() {
        let err = Sprite::from_art("bad", &["..", "..."], BIRD_PALETTE).unwrap_err();
        assert_eq!(
            err,
            AssetError::RaggedRow {
                name: "bad",
                row: 1,
                len: 3,
                expected: 2
            }
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Sprite::from_art("bad", &[".Z"], BIRD_PALETTE).unwrap_err();
        assert_eq!(err, AssetError::UnknownKey { name: "bad", key: 'Z' });
        assert!(matches!(
            Sprite::from_art("none", &[], BIRD_PALETTE),
            Err(AssetError::Empty { .. })
        ));
    }

    #[test]
    fn pipe_margins_are_transparent_below_the_cap() {
        let pipe = pipe_sprite(19, 120);
        assert_eq!(pipe.get(0, 0).3, 255);
        assert_eq!(pipe.get(0, 60).3, 0);
        assert_eq!(pipe.get(18, 60).3, 0);
        assert_eq!(pipe.get(9, 60).3, 255);
    }

    #[test]
    fn flip_mirrors_rows() {
        let pipe = pipe_sprite(19, 120);
        let flipped = pipe.flipped_vertical();
        assert_eq!(flipped.get(0, 119), pipe.get(0, 0));
        assert_eq!(flipped.get(0, 0), pipe.get(0, 119));
    }
}
