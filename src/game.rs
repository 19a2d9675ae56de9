//! The session: game state machine, round counters and the hand-off to the
//! companion agent.
//!
//! One call to [`Session::tick`] is one iteration of the loop: drain the
//! input, advance the active state, then advance the agent with whatever the
//! game signalled. Rendering reads the session afterwards.

use crate::agent::{AgentSignals, CompanionAgent};
use crate::assets::Assets;
use crate::audio::{AudioPlayer, Cue};
use crate::clock::FrameTime;
use crate::config::Config;
use crate::physics::step_scale;
use crate::world::World;
use rand::{SeedableRng, rngs::SmallRng};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Waiting for the first flap.
    Begin,
    Playing,
    /// Terminal until a reset.
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Flap,
    Reset,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Counters that live as long as the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub score: u32,
    pub high_score: u32,
    pub loss_count: u32,
    /// Ticks spent alive outside the Begin state, over all rounds.
    pub ticks_played: u64,
}

pub struct Session {
    config: Config,
    assets: Assets,
    rng: SmallRng,
    state: GameState,
    world: World,
    stats: RoundStats,
    agent: CompanionAgent,
    /// Set once the coach has stepped in; never cleared.
    agent_enabled: bool,
}

impl Session {
    pub fn new(config: Config, assets: Assets) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let world = World::new(&config, &mut rng, Duration::ZERO, 0);
        let agent = CompanionAgent::new(&config.agent);
        Self {
            config,
            assets,
            rng,
            state: GameState::Begin,
            world,
            stats: RoundStats::default(),
            agent,
            agent_enabled: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn stats(&self) -> RoundStats {
        self.stats
    }

    pub fn agent(&self) -> &CompanionAgent {
        &self.agent
    }

    pub fn agent_enabled(&self) -> bool {
        self.agent_enabled
    }

    pub fn tick(
        &mut self,
        time: FrameTime,
        events: &[InputEvent],
        audio: &mut dyn AudioPlayer,
    ) -> Flow {
        let serial = self.world.serial();
        for &event in events {
            if self.handle_input(event, time.now, audio) == Flow::Quit {
                return Flow::Quit;
            }
        }
        // A freshly reset world is shown exactly as built for one tick.
        let signals = if self.world.serial() == serial {
            self.update_game(time, audio)
        } else {
            AgentSignals::default()
        };
        self.agent.react(signals, time.now);
        self.agent.update(time);
        Flow::Continue
    }

    fn handle_input(
        &mut self,
        event: InputEvent,
        now: Duration,
        audio: &mut dyn AudioPlayer,
    ) -> Flow {
        match (self.state, event) {
            (_, InputEvent::Quit) => return Flow::Quit,
            (GameState::Begin, InputEvent::Flap) => {
                self.world.flap(&self.config);
                audio.play(Cue::Flap);
                self.stats.score = 0;
                self.state = GameState::Playing;
                log::info!("round {} started", self.world.serial());
            }
            (GameState::Playing, InputEvent::Flap) => {
                self.world.flap(&self.config);
                audio.play(Cue::Flap);
            }
            (GameState::Dead, InputEvent::Reset) => {
                if self.agent.is_speaking() {
                    log::debug!("reset dropped while the coach is speaking");
                } else {
                    self.reset(now);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Swaps in a fresh world; nothing from the old round is reused.
    fn reset(&mut self, now: Duration) {
        let serial = self.world.serial() + 1;
        self.world = World::new(&self.config, &mut self.rng, now, serial);
        self.state = GameState::Begin;
    }

    fn update_game(&mut self, time: FrameTime, audio: &mut dyn AudioPlayer) -> AgentSignals {
        let scale = step_scale(&self.config.physics, self.config.screen.fps, time.dt_secs());
        let mut signals = AgentSignals::default();

        match self.state {
            GameState::Begin => self.world.idle_step(&self.config, scale, time.now),
            GameState::Playing => {
                self.stats.ticks_played += 1;
                let outcome = self.world.play_step(
                    &self.config,
                    &self.assets,
                    &mut self.rng,
                    scale,
                    time.now,
                );
                if outcome.scored {
                    self.stats.score += 1;
                    log::info!(
                        "losses: {} best: {} score: {} time: {:.1}s",
                        self.stats.loss_count,
                        self.stats.high_score,
                        self.stats.score,
                        self.stats.ticks_played as f64 / self.config.screen.fps as f64
                    );
                }
                if outcome.hit {
                    signals.new_high_score = self.die(audio);
                }
            }
            GameState::Dead => {}
        }

        if self.state == GameState::Dead {
            signals.intervene = self.check_intervention();
        }
        signals
    }

    /// Returns whether the round set a new high score.
    fn die(&mut self, audio: &mut dyn AudioPlayer) -> bool {
        audio.play(Cue::Hit);
        self.state = GameState::Dead;
        let new_high = self.stats.score > self.stats.high_score;
        if new_high {
            self.stats.high_score = self.stats.score;
            log::info!("new high score: {}", self.stats.high_score);
        }
        self.stats.loss_count += 1;
        log::info!(
            "died with score {} (loss #{})",
            self.stats.score,
            self.stats.loss_count
        );
        new_high
    }

    fn check_intervention(&mut self) -> bool {
        let rules = &self.config.agent;
        if self.agent_enabled
            || self.stats.loss_count < rules.intervention_losses
            || self.stats.ticks_played < rules.intervention_ticks
        {
            return false;
        }
        self.agent_enabled = true;
        true
    }
}
