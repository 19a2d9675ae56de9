//! The companion bird that sits in the bottom panel.
//!
//! It owns three timers that advance every tick whatever the game is doing:
//! a celebratory bounce, a beak animation while it "speaks", and a dialog box
//! that hides itself after a while. The game never touches this state
//! directly; it hands over [`AgentSignals`] once per tick.

use crate::clock::FrameTime;
use crate::config::AgentConfig;
use crate::font::{outlined_width, wrap_words};
use std::time::Duration;

/// Space between the dialog border and its text.
pub const DIALOG_PADDING: i32 = 2;

/// What the game wants from the agent this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentSignals {
    pub new_high_score: bool,
    pub intervene: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechCommand {
    pub duration: Duration,
    pub text: Option<String>,
}

/// Single inelastic hop. Offsets are in pixels, negative is up.
#[derive(Debug, Clone, PartialEq)]
struct Bounce {
    offset: f32,
    velocity: f32,
    kick: f32,
    gravity: f32,
}

impl Bounce {
    fn trigger(&mut self) {
        if self.offset == 0.0 {
            self.velocity = self.kick;
        }
    }

    fn update(&mut self, dt_secs: f32) {
        if self.velocity == 0.0 && self.offset == 0.0 {
            return;
        }
        self.velocity += self.gravity * dt_secs;
        self.offset += self.velocity * dt_secs;
        if self.offset > 0.0 {
            self.offset = 0.0;
            self.velocity = 0.0;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Speech {
    speaking: bool,
    ends_at: Duration,
    beak_open: bool,
    last_beak_switch: Duration,
    beak_interval: Duration,
    label: Option<String>,
}

impl Speech {
    fn start(&mut self, command: SpeechCommand, now: Duration) {
        self.speaking = true;
        self.ends_at = now + command.duration;
        self.beak_open = true;
        self.last_beak_switch = now;
        self.label = command.text;
    }

    fn stop(&mut self) {
        self.speaking = false;
        self.beak_open = false;
        self.label = None;
    }

    fn update(&mut self, now: Duration) {
        if self.speaking && now >= self.ends_at {
            self.stop();
        }
        if self.speaking && now.saturating_sub(self.last_beak_switch) >= self.beak_interval {
            self.beak_open = !self.beak_open;
            self.last_beak_switch = now;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Dialog {
    width: i32,
    lines: Vec<String>,
    hide_at: Option<Duration>,
}

impl Dialog {
    fn show(&mut self, text: &str, duration: Duration, now: Duration) {
        self.lines = wrap_words(text, self.width - 2 * DIALOG_PADDING, outlined_width);
        self.hide_at = Some(now + duration);
    }

    fn update(&mut self, now: Duration) {
        if self.hide_at.is_some_and(|t| now >= t) {
            self.hide_at = None;
            self.lines.clear();
        }
    }
}

/// Unrepresentable durations (negative, NaN, overflowing) collapse to zero.
fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanionAgent {
    bounce: Bounce,
    speech: Speech,
    dialog: Dialog,
    speech_duration: Duration,
    speech_label: String,
    message: String,
    dialog_duration: Duration,
}

impl CompanionAgent {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            bounce: Bounce {
                offset: 0.0,
                velocity: 0.0,
                kick: config.bounce_velocity,
                gravity: config.bounce_gravity,
            },
            speech: Speech {
                speaking: false,
                ends_at: Duration::ZERO,
                beak_open: false,
                last_beak_switch: Duration::ZERO,
                beak_interval: Duration::from_millis(config.beak_interval_ms),
                label: None,
            },
            dialog: Dialog {
                width: config.dialog_width,
                lines: Vec::new(),
                hide_at: None,
            },
            speech_duration: secs(config.speech_secs),
            speech_label: config.speech_label.clone(),
            message: config.message.clone(),
            dialog_duration: secs(config.dialog_secs),
        }
    }

    /// Short hop to acknowledge a new high score. Ignored while airborne.
    pub fn trigger_high_score_bounce(&mut self) {
        self.bounce.trigger();
    }

    pub fn start_speaking(&mut self, command: SpeechCommand, now: Duration) {
        self.speech.start(command, now);
    }

    pub fn show_dialog(&mut self, text: &str, duration: Duration, now: Duration) {
        self.dialog.show(text, duration, now);
    }

    pub fn react(&mut self, signals: AgentSignals, now: Duration) {
        if signals.new_high_score {
            self.trigger_high_score_bounce();
        }
        if signals.intervene {
            log::info!("coach steps in: {:?}", self.message);
            let command = SpeechCommand {
                duration: self.speech_duration,
                text: Some(self.speech_label.clone()),
            };
            self.start_speaking(command, now);
            let message = self.message.clone();
            self.show_dialog(&message, self.dialog_duration, now);
        }
    }

    pub fn update(&mut self, time: FrameTime) {
        self.speech.update(time.now);
        self.bounce.update(time.dt_secs());
        self.dialog.update(time.now);
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.speaking
    }

    pub fn beak_open(&self) -> bool {
        self.speech.speaking && self.speech.beak_open
    }

    pub fn label(&self) -> Option<&str> {
        self.speech.label.as_deref()
    }

    pub fn bounce_offset(&self) -> f32 {
        self.bounce.offset
    }

    pub fn dialog_visible(&self) -> bool {
        self.dialog.hide_at.is_some()
    }

    pub fn dialog_lines(&self) -> &[String] {
        &self.dialog.lines
    }

    pub fn dialog_width(&self) -> i32 {
        self.dialog.width
    }
}
