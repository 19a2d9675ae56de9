//! Pixel-exact collision on occupancy bitmaps.
//!
//! Sprites have transparent margins that must not register as hits, so each
//! sprite gets a mask of the pixels whose alpha passes [`ALPHA_THRESHOLD`].

use crate::assets::Sprite;

/// Pixels with alpha above this count as solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    w: i32,
    h: i32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_sprite(sprite: &Sprite) -> Self {
        let (w, h) = (sprite.width(), sprite.height());
        let bits = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .map(|(x, y)| sprite.get(x, y).3 > ALPHA_THRESHOLD)
            .collect();
        Self {
            w: w as i32,
            h: h as i32,
            bits,
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.w && y < self.h && self.bits[(y * self.w + x) as usize]
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True when any solid pixel of `self` placed at `at` lies on a solid
    /// pixel of `other` placed at `other_at`.
    pub fn overlaps(&self, at: (i32, i32), other: &Mask, other_at: (i32, i32)) -> bool {
        let left = at.0.max(other_at.0);
        let top = at.1.max(other_at.1);
        let right = (at.0 + self.w).min(other_at.0 + other.w);
        let bottom = (at.1 + self.h).min(other_at.1 + other.h);
        if left >= right || top >= bottom {
            return false;
        }
        (top..bottom).any(|y| {
            (left..right).any(|x| {
                self.is_solid(x - at.0, y - at.1) && other.is_solid(x - other_at.0, y - other_at.1)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgba;

    fn mask(rows: &[&str]) -> Mask {
        let palette = [
            ('.', Rgba::CLEAR),
            ('#', Rgba(0, 0, 0, 255)),
            ('~', Rgba(0, 0, 0, 100)),
        ];
        Mask::from_sprite(&Sprite::from_art("test", rows, &palette).unwrap())
    }

    #[test]
    fn translucent_pixels_are_not_solid() {
        let m = mask(&["#~", ".#"]);
        assert!(m.is_solid(0, 0));
        assert!(!m.is_solid(1, 0));
        assert!(!m.is_solid(0, 1));
        assert_eq!(m.count(), 2);
        assert!(!m.is_solid(-1, 0));
    }

    #[test]
    fn bounding_boxes_touching_is_not_enough() {
        let a = mask(&["#.", ".."]);
        let b = mask(&["..", ".#"]);
        // The boxes overlap completely but the solid pixels do not.
        assert!(!a.overlaps((0, 0), &b, (0, 0)));
        assert!(a.overlaps((1, 1), &b, (0, 0)));
    }

    #[test]
    fn disjoint_boxes_never_overlap() {
        let a = mask(&["##", "##"]);
        assert!(!a.overlaps((0, 0), &a, (2, 0)));
        assert!(!a.overlaps((0, 0), &a, (0, -2)));
        assert!(a.overlaps((0, 0), &a, (1, -1)));
    }
}
