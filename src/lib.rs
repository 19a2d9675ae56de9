//! Flappy Bird in the terminal, with a companion bird that cheers you on.
//!
//! The game itself ([`game::Session`]) is a pure state machine driven by
//! [`clock::FrameTime`] and [`game::InputEvent`] values; the terminal, audio
//! device and wall clock only appear in [`app`].

pub mod agent;
pub mod app;
pub mod assets;
pub mod audio;
pub mod clock;
pub mod collision;
pub mod config;
pub mod font;
pub mod game;
pub mod input;
pub mod logging;
pub mod physics;
pub mod pixels;
pub mod render;
pub mod terminal;
pub mod world;
