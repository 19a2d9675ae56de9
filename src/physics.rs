//! Entity motion: the bird under gravity and flap impulses, pipes and ground
//! under a uniform leftward scroll.

use crate::config::{BirdConfig, Config, PhysicsConfig, PipeConfig, ScrollPolicy};
use rand::Rng;
use std::time::Duration;

/// Multiplier applied to every per-tick quantity this tick.
pub fn step_scale(physics: &PhysicsConfig, fps: u32, dt_secs: f32) -> f32 {
    match physics.scroll {
        ScrollPolicy::FixedPerTick => 1.0,
        ScrollPolicy::DeltaScaled => (dt_secs * fps as f32).clamp(0.0, physics.max_delta_scale),
    }
}

pub const BIRD_FRAMES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    frame: usize,
    last_anim: Duration,
    anim_interval: Duration,
}

impl Bird {
    pub fn new(config: &BirdConfig, now: Duration) -> Self {
        Self {
            x: config.x,
            y: config.start_y,
            velocity: 0.0,
            frame: 0,
            last_anim: now,
            anim_interval: Duration::from_millis(config.animation_ms),
        }
    }

    /// Replaces whatever vertical velocity the bird had with the upward
    /// flap speed.
    pub fn flap(&mut self, flap_speed: f32) {
        self.velocity = -flap_speed;
    }

    pub fn fall(&mut self, gravity: f32, scale: f32) {
        self.velocity += gravity * scale;
        self.y += self.velocity * scale;
    }

    /// Advances the wing frame on wall-clock time, independent of physics.
    pub fn animate(&mut self, now: Duration) {
        if now.saturating_sub(self.last_anim) >= self.anim_interval {
            self.frame = (self.frame + 1) % BIRD_FRAMES;
            self.last_anim = now;
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// A top (inverted) and bottom pipe sharing one gap.
#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    pub x: f32,
    width: i32,
    pipe_height: i32,
    gap_top: i32,
    gap_bottom: i32,
}

impl PipePair {
    /// `bottom_height` is how much of the bottom pipe shows above the
    /// screen's lower edge.
    pub fn new(x: f32, bottom_height: i32, pipes: &PipeConfig, screen_h: i32) -> Self {
        let gap_bottom = screen_h - bottom_height;
        Self {
            x,
            width: pipes.width,
            pipe_height: pipes.height,
            gap_top: gap_bottom - pipes.gap,
            gap_bottom,
        }
    }

    pub fn random(x: f32, config: &Config, rng: &mut impl Rng) -> Self {
        let p = &config.pipes;
        let size = rng.gen_range(p.min_height..=p.max_height);
        Self::new(x, size, p, config.screen.height)
    }

    pub fn advance(&mut self, step: f32) {
        self.x -= step;
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < -(self.width as f32)
    }

    pub fn left(&self) -> i32 {
        self.x.floor() as i32
    }

    pub fn gap_top(&self) -> i32 {
        self.gap_top
    }

    pub fn gap_bottom(&self) -> i32 {
        self.gap_bottom
    }

    pub fn top_y(&self) -> i32 {
        self.gap_top - self.pipe_height
    }

    pub fn bottom_y(&self) -> i32 {
        self.gap_bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSegment {
    pub x: f32,
}

/// Exactly two tiles; the leading one is moved behind the trailing one once
/// it has scrolled fully off screen. Only the leading tile carries a scroll
/// position, the trailing one always sits `width - overlap` behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ground {
    segments: [GroundSegment; 2],
    width: i32,
    overlap: i32,
    pub y: i32,
}

impl Ground {
    pub fn new(config: &Config) -> Self {
        let mut ground = Self {
            segments: [GroundSegment { x: 0.0 }; 2],
            width: config.ground.width,
            overlap: config.ground.overlap,
            y: config.screen.height - config.ground.height,
        };
        ground.place_trailing();
        ground
    }

    pub fn segments(&self) -> &[GroundSegment; 2] {
        &self.segments
    }

    /// Returns true when the leading tile was recycled.
    pub fn recycle(&mut self) -> bool {
        if self.segments[0].x >= -(self.width as f32) {
            return false;
        }
        self.segments.rotate_left(1);
        self.place_trailing();
        true
    }

    pub fn advance(&mut self, step: f32) {
        self.segments[0].x -= step;
        self.place_trailing();
    }

    fn place_trailing(&mut self) {
        self.segments[1].x = self.segments[0].x + (self.width - self.overlap) as f32;
    }

    /// Whether the tiles span `[0, screen_w)` without a hole.
    pub fn covers(&self, screen_w: i32) -> bool {
        let [a, b] = self.segments;
        let w = self.width as f32;
        a.x <= 0.0 && b.x <= a.x + w && b.x + w >= screen_w as f32
    }
}
