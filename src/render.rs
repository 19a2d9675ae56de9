//! Draws one frame of the session into the logical framebuffer.
//!
//! Back to front: background, pipes, ground, bird, the state banner, then the
//! coach panel and its dialog box on top of everything.

use crate::agent::{CompanionAgent, DIALOG_PADDING};
use crate::config::Config;
use crate::font::{
    LINE_HEIGHT, draw_number, draw_text, draw_text_centered, draw_text_outlined, outlined_width,
};
use crate::game::{GameState, Session};
use crate::pixels::{BLACK, PixelBuf, Rgb, Rgba, SHADOW, WHITE};

const PANEL_FILL: Rgba = DIALOG_FILL.with_alpha(210);
const PANEL_BORDER: Rgb = Rgb(240, 234, 161);
const SPRITE_SHADOW: Rgba = Rgba(0, 0, 0, 70);
const DIALOG_FILL: Rgb = Rgb(18, 18, 28);
const CARD_EDGE: Rgb = Rgb(210, 185, 110);
const CARD_FILL: Rgb = Rgb(220, 195, 120);
const GOLD: Rgb = Rgb(245, 200, 66);

const BIRD_INSET: i32 = 5;
const SHADOW_HEIGHT: i32 = 2;

/// A screen-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// The coach panel hugs the bottom edge, inset by the padding on three sides.
pub fn agent_panel_rect(config: &Config) -> Rect {
    let a = &config.agent;
    Rect {
        x: a.panel_padding,
        y: config.screen.height - a.panel_height - a.panel_padding,
        w: config.screen.width - a.panel_padding * 2,
        h: a.panel_height,
    }
}

/// The dialog box sits centred just above the panel, sized to its lines.
pub fn dialog_rect(config: &Config, agent: &CompanionAgent) -> Rect {
    let panel = agent_panel_rect(config);
    let w = agent.dialog_width().min(config.screen.width);
    let h = agent.dialog_lines().len() as i32 * LINE_HEIGHT + DIALOG_PADDING * 2;
    Rect {
        x: (config.screen.width - w) / 2,
        y: panel.y - h - config.agent.panel_padding,
        w,
        h,
    }
}

pub fn draw_frame(buf: &mut PixelBuf, session: &Session) {
    let config = session.config();
    let (w, h) = (config.screen.width as usize, config.screen.height as usize);
    if buf.width() != w || buf.height() != h {
        buf.resize(w, h);
    }

    draw_world(buf, session);

    let mid = config.screen.width / 2;
    match session.state() {
        GameState::Begin => draw_get_ready(buf, config),
        GameState::Playing => draw_number(buf, mid, 6, session.stats().score, WHITE),
        GameState::Dead => draw_game_over(buf, session),
    }

    draw_agent_panel(buf, session);
    if session.agent().dialog_visible() {
        draw_dialog(buf, config, session.agent());
    }
}

fn draw_world(buf: &mut PixelBuf, session: &Session) {
    let assets = session.assets();
    let world = session.world();

    buf.clear(BLACK);
    buf.blit(&assets.background, 0, 0);

    // Pipes wait off screen until the round starts.
    if session.state() != GameState::Begin {
        for pair in world.pipes() {
            buf.blit(&assets.pipe_inverted, pair.left(), pair.top_y());
            buf.blit(&assets.pipe, pair.left(), pair.bottom_y());
        }
    }

    let ground = world.ground();
    for seg in ground.segments() {
        buf.blit(&assets.ground, seg.x.floor() as i32, ground.y);
    }

    let bird = world.bird();
    let (bx, by) = bird.position();
    buf.blit(&assets.bird[bird.frame()], bx, by);
}

fn draw_get_ready(buf: &mut PixelBuf, config: &Config) {
    let cx = config.screen.width / 2;
    let cy = config.screen.height / 4;
    draw_text_centered(buf, cx, cy, "GET READY", GOLD, SHADOW);
    let hint_y = cy + LINE_HEIGHT + 3;
    draw_text_centered(buf, cx, hint_y, "SPACE TO FLAP", WHITE, SHADOW);
}

fn draw_game_over(buf: &mut PixelBuf, session: &Session) {
    let config = session.config();
    let stats = session.stats();
    let cx = config.screen.width / 2;
    let top = config.screen.height / 5;

    buf.darken();
    draw_text_centered(buf, cx, top, "GAME OVER", GOLD, SHADOW);

    // Score card
    let card_w = 44;
    let card_h = 2 * (LINE_HEIGHT * 2 + 1) + 4;
    let card_x = cx - card_w / 2;
    let card_y = top + LINE_HEIGHT + 4;
    buf.fill_rect(card_x - 1, card_y - 1, card_w + 2, card_h + 2, SHADOW);
    buf.fill_rect(card_x, card_y, card_w, card_h, CARD_EDGE);
    buf.fill_rect(card_x + 1, card_y + 1, card_w - 2, card_h - 2, CARD_FILL);

    let mut y = card_y + 2;
    let rows = [
        ("SCORE", stats.score, WHITE),
        ("BEST", stats.high_score, GOLD),
    ];
    for (label, value, colour) in rows {
        draw_text_centered(buf, cx, y, label, SHADOW, CARD_FILL);
        draw_number(buf, cx, y + LINE_HEIGHT, value, colour);
        y += LINE_HEIGHT * 2 + 1;
    }

    let hint_y = card_y + card_h + 4;
    draw_text_centered(buf, cx, hint_y, "PRESS R TO TRY AGAIN", WHITE, SHADOW);
}

fn draw_agent_panel(buf: &mut PixelBuf, session: &Session) {
    let panel = agent_panel_rect(session.config());
    let agent = session.agent();
    let assets = session.assets();

    buf.blend_rect(panel.x, panel.y, panel.w, panel.h, PANEL_FILL);
    buf.stroke_rect(panel.x, panel.y, panel.w, panel.h, PANEL_BORDER);

    // Down-flap reads as an open beak.
    let sprite = if agent.beak_open() { &assets.bird[2] } else { &assets.bird[1] };
    let (sw, sh) = (sprite.width() as i32, sprite.height() as i32);
    let rest_y = panel.y + panel.h / 2 - sh / 2;
    let sprite_x = panel.x + BIRD_INSET;
    let sprite_y = rest_y + agent.bounce_offset() as i32;
    let shadow_y = rest_y + sh - SHADOW_HEIGHT / 2;
    buf.blend_rect(sprite_x + 1, shadow_y, sw, SHADOW_HEIGHT, SPRITE_SHADOW);
    buf.blit(sprite, sprite_x, sprite_y);

    if let Some(label) = agent.label() {
        draw_text(buf, sprite_x + sw + 3, panel.y + 3, label, PANEL_BORDER);
    }

    let status = if agent.is_speaking() { "THINKING..." } else { "READY" };
    let status_x = panel.x + panel.w - outlined_width(status) - 2;
    let status_y = panel.y + panel.h - LINE_HEIGHT - 2;
    draw_text(buf, status_x, status_y, status, PANEL_BORDER);
}

fn draw_dialog(buf: &mut PixelBuf, config: &Config, agent: &CompanionAgent) {
    let rect = dialog_rect(config, agent);
    buf.fill_rect(rect.x, rect.y, rect.w, rect.h, DIALOG_FILL);
    buf.stroke_rect(rect.x, rect.y, rect.w, rect.h, PANEL_BORDER);
    for (i, line) in agent.dialog_lines().iter().enumerate() {
        let y = rect.y + DIALOG_PADDING + i as i32 * LINE_HEIGHT;
        draw_text_outlined(buf, rect.x + DIALOG_PADDING, y, line, WHITE, BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::audio::Silent;
    use crate::clock::FrameTime;
    use crate::game::InputEvent;

    fn session(config: Config) -> Session {
        let assets = Assets::build(&config).unwrap();
        Session::new(config, assets)
    }

    fn seeded() -> Config {
        Config {
            seed: Some(9),
            ..Config::default()
        }
    }

    fn crash(s: &mut Session) -> u64 {
        let mut t = 0;
        s.tick(FrameTime::at_tick(t, 60), &[InputEvent::Flap], &mut Silent);
        while s.state() == GameState::Playing {
            t += 1;
            s.tick(FrameTime::at_tick(t, 60), &[], &mut Silent);
        }
        t
    }

    #[test]
    fn frame_fills_the_logical_screen() {
        let s = session(seeded());
        let mut buf = PixelBuf::new(3, 3);
        draw_frame(&mut buf, &s);
        assert_eq!(buf.width(), s.config().screen.width as usize);
        assert_eq!(buf.height(), s.config().screen.height as usize);
    }

    #[test]
    fn panel_sits_inside_the_screen_with_a_border() {
        let s = session(seeded());
        let panel = agent_panel_rect(s.config());
        assert!(panel.x >= 0 && panel.y >= 0);
        assert!(panel.x + panel.w <= s.config().screen.width);
        let panel_end = panel.y + panel.h + s.config().agent.panel_padding;
        assert_eq!(panel_end, s.config().screen.height);

        let mut buf = PixelBuf::new(0, 0);
        draw_frame(&mut buf, &s);
        assert_eq!(buf.get(panel.x as usize, panel.y as usize), PANEL_BORDER);
        let right = (panel.x + panel.w - 1) as usize;
        let bottom = (panel.y + panel.h - 1) as usize;
        assert_eq!(buf.get(right, bottom), PANEL_BORDER);
    }

    #[test]
    fn game_over_darkens_the_world_but_not_the_panel() {
        let mut live = session(seeded());
        let mut buf = PixelBuf::new(0, 0);
        draw_frame(&mut buf, &live);
        let sky_before = buf.get(1, 1);

        crash(&mut live);
        draw_frame(&mut buf, &live);
        let sky_after = buf.get(1, 1);
        assert!(sky_after.0 < sky_before.0 || sky_after.1 < sky_before.1);

        let panel = agent_panel_rect(live.config());
        assert_eq!(buf.get(panel.x as usize, panel.y as usize), PANEL_BORDER);
    }

    #[test]
    fn dialog_box_appears_above_the_panel_once_the_coach_steps_in() {
        let mut config = seeded();
        config.agent.intervention_losses = 1;
        config.agent.intervention_ticks = 0;
        let mut s = session(config);
        let t = crash(&mut s);
        s.tick(FrameTime::at_tick(t + 1, 60), &[], &mut Silent);
        assert!(s.agent().dialog_visible());

        let rect = dialog_rect(s.config(), s.agent());
        let panel = agent_panel_rect(s.config());
        assert!(rect.y >= 0);
        assert!(rect.y + rect.h <= panel.y);

        let mut buf = PixelBuf::new(0, 0);
        draw_frame(&mut buf, &s);
        assert_eq!(buf.get(rect.x as usize, rect.y as usize), PANEL_BORDER);
        let inner = buf.get((rect.x + 1) as usize, (rect.y + 1) as usize);
        assert!(inner == DIALOG_FILL || inner == BLACK || inner == WHITE);
    }
}
