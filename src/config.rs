//! Game tuning, loaded from TOML.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs the
//! keys it wants to change. The defaults are the classic 400x600 playfield
//! scaled by 0.24 so that a whole frame fits in a terminal.

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Longest speech or dialog the coach may be configured with, in seconds.
pub const MAX_AGENT_SECS: f32 = 3600.0;

/// How per-tick displacement relates to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollPolicy {
    /// One fixed step per tick; time is quantised to the frame rate.
    #[default]
    FixedPerTick,
    /// Steps are scaled by `dt * fps`, so motion survives dropped frames.
    DeltaScaled,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub physics: PhysicsConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub ground: GroundConfig,
    pub agent: AgentConfig,
    /// Fixed seed for pipe gaps; entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 96,
            height: 144,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub flap_speed: f32,
    pub game_speed: f32,
    pub scroll: ScrollPolicy,
    /// Upper bound on the delta-scaled step, in ticks.
    pub max_delta_scale: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.12,
            flap_speed: 2.4,
            game_speed: 1.2,
            scroll: ScrollPolicy::FixedPerTick,
            max_delta_scale: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub x: f32,
    pub start_y: f32,
    pub animation_ms: u64,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            x: 16.0,
            start_y: 72.0,
            animation_ms: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: i32,
    pub height: i32,
    pub gap: i32,
    pub min_gap: i32,
    /// Range of the visible bottom pipe height, which fixes the gap offset.
    pub min_height: i32,
    pub max_height: i32,
    pub first_x: f32,
    pub spacing: f32,
    pub respawn_x: f32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: 19,
            height: 120,
            gap: 36,
            min_gap: 24,
            min_height: 24,
            max_height: 72,
            first_x: 192.0,
            spacing: 96.0,
            respawn_x: 192.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub width: i32,
    pub height: i32,
    pub overlap: i32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            width: 192,
            height: 24,
            overlap: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub panel_height: i32,
    pub panel_padding: i32,
    pub beak_interval_ms: u64,
    /// Initial bounce velocity in px/s; negative is up.
    pub bounce_velocity: f32,
    pub bounce_gravity: f32,
    pub intervention_losses: u32,
    pub intervention_ticks: u64,
    pub speech_secs: f32,
    pub speech_label: String,
    pub message: String,
    pub dialog_secs: f32,
    pub dialog_width: i32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            panel_height: 26,
            panel_padding: 2,
            beak_interval_ms: 150,
            bounce_velocity: -53.0,
            bounce_gravity: 216.0,
            intervention_losses: 5,
            intervention_ticks: 1800,
            speech_secs: 2.5,
            speech_label: "NICE RUN!".to_string(),
            message: "Nice run! Breathe, watch the gap and tap gently.".to_string(),
            dialog_secs: 4.0,
            dialog_width: 92,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&data).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml(data: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(data).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Largest horizontal step a single tick may take.
    pub fn max_scroll_step(&self) -> f32 {
        match self.physics.scroll {
            ScrollPolicy::FixedPerTick => self.physics.game_speed,
            ScrollPolicy::DeltaScaled => self.physics.game_speed * self.physics.max_delta_scale,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.screen;
        let p = &self.pipes;
        let g = &self.ground;
        let a = &self.agent;
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if s.width <= 0 || s.height <= 0 {
            return invalid(format!(
                "screen must be non-empty, got {}x{}",
                s.width, s.height
            ));
        }
        if s.fps == 0 {
            return invalid("fps must be > 0".into());
        }
        let floats = [
            ("physics.gravity", self.physics.gravity),
            ("physics.flap_speed", self.physics.flap_speed),
            ("physics.game_speed", self.physics.game_speed),
            ("physics.max_delta_scale", self.physics.max_delta_scale),
            ("bird.x", self.bird.x),
            ("bird.start_y", self.bird.start_y),
            ("pipes.first_x", p.first_x),
            ("pipes.spacing", p.spacing),
            ("pipes.respawn_x", p.respawn_x),
            ("agent.bounce_velocity", a.bounce_velocity),
            ("agent.bounce_gravity", a.bounce_gravity),
            ("agent.speech_secs", a.speech_secs),
            ("agent.dialog_secs", a.dialog_secs),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{name} must be finite, got {value}"));
        }
        if self.physics.gravity < 0.0 || self.physics.flap_speed <= 0.0 {
            return invalid("gravity must be >= 0 and flap_speed > 0".into());
        }
        if self.physics.game_speed < 0.0 || self.physics.max_delta_scale < 1.0 {
            return invalid("game_speed must be >= 0 and max_delta_scale >= 1".into());
        }
        if self.bird.animation_ms == 0 {
            return invalid("bird.animation_ms must be > 0".into());
        }
        if p.width <= 0 || p.height <= 0 {
            return invalid(format!(
                "pipe sprite must be non-empty, got {}x{}",
                p.width, p.height
            ));
        }
        if p.gap < p.min_gap {
            return invalid(format!(
                "pipe gap {} is below the minimum {}",
                p.gap, p.min_gap
            ));
        }
        if p.min_height > p.max_height {
            return invalid(format!(
                "pipe height range is inverted: {}..={}",
                p.min_height, p.max_height
            ));
        }
        if p.max_height + p.gap > s.height {
            return invalid("pipe gap can leave the top of the screen".into());
        }
        if p.min_height < g.height {
            return invalid("pipe gap can sink below the ground".into());
        }
        if p.max_height > p.height || s.height - p.min_height - p.gap > p.height {
            return invalid("pipe sprite is too short to reach the screen edge".into());
        }
        if g.height <= 0 || g.overlap < 0 || g.overlap >= g.width {
            return invalid("ground needs height > 0 and 0 <= overlap < width".into());
        }
        let needed = s.width as f32 + g.overlap as f32 + self.max_scroll_step();
        if (g.width as f32) < needed {
            return invalid(format!(
                "ground width {} cannot cover the screen; need at least {needed}",
                g.width
            ));
        }
        if a.beak_interval_ms == 0 || a.bounce_gravity <= 0.0 || a.bounce_velocity > 0.0 {
            return invalid(
                "agent beak interval and bounce gravity must be > 0, bounce velocity <= 0".into(),
            );
        }
        if a.dialog_width <= 0 || a.dialog_width > s.width {
            return invalid(format!(
                "dialog width {} does not fit the screen",
                a.dialog_width
            ));
        }
        if a.panel_height <= 0 || a.panel_height + 2 * a.panel_padding > s.height {
            return invalid("agent panel does not fit the screen".into());
        }
        let durations = [
            ("speech_secs", a.speech_secs),
            ("dialog_secs", a.dialog_secs),
        ];
        for (name, secs) in durations {
            if !(0.0..=MAX_AGENT_SECS).contains(&secs) {
                return invalid(format!(
                    "agent.{name} must be in 0..={MAX_AGENT_SECS}, got {secs}"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            seed = 7

            [physics]
            scroll = "delta-scaled"

            [agent]
            speech_label = "GO ON"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.physics.scroll, ScrollPolicy::DeltaScaled);
        assert_eq!(cfg.physics.gravity, PhysicsConfig::default().gravity);
        assert_eq!(cfg.agent.speech_label, "GO ON");
        assert_eq!(cfg.pipes, PipeConfig::default());
    }

    #[test]
    fn gap_below_minimum_is_rejected() {
        let mut cfg = Config::default();
        cfg.pipes.gap = cfg.pipes.min_gap - 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn gap_off_the_top_is_rejected() {
        let mut cfg = Config::default();
        cfg.pipes.max_height = cfg.screen.height - cfg.pipes.gap + 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn narrow_ground_is_rejected() {
        let mut cfg = Config::default();
        cfg.ground.width = cfg.screen.width;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_and_oversized_durations_are_rejected() {
        for toml in [
            "[agent]\nspeech_secs = nan",
            "[agent]\ndialog_secs = 1e30",
            "[agent]\nspeech_secs = -1.0",
            "[agent]\nbounce_gravity = inf",
        ] {
            let err = Config::from_toml(toml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{toml}: {err}");
        }
    }

    #[test]
    fn non_finite_physics_is_rejected() {
        for toml in [
            "[physics]\ngravity = nan",
            "[physics]\nflap_speed = inf",
            "[physics]\ngame_speed = nan",
            "[physics]\nmax_delta_scale = inf",
        ] {
            assert!(Config::from_toml(toml).is_err(), "{toml}");
        }
    }

    #[test]
    fn garbage_toml_is_a_parse_error() {
        let err = Config::from_toml("[screen\nwidth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
