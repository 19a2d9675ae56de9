use crate::assets::Assets;
use crate::audio::AudioPlayer;
use crate::clock::FrameClock;
use crate::config::Config;
use crate::game::{Flow, Session};
use crate::input;
use crate::pixels::PixelBuf;
use crate::render::draw_frame;
use crate::terminal::Terminal;
use anyhow::{Context, Result};

/// Runs the game until the player quits. Single-threaded: input, update,
/// draw, present, then sleep out the rest of the frame.
pub fn run(config: Config, assets: Assets, audio: &mut dyn AudioPlayer) -> Result<()> {
    let fps = config.screen.fps;
    let mut frame = PixelBuf::new(config.screen.width as usize, config.screen.height as usize);
    let mut session = Session::new(config, assets);
    let mut clock = FrameClock::new(fps);
    let mut term = Terminal::enter().context("failed to set up the terminal")?;
    log::info!("running at {fps} fps");

    loop {
        let time = clock.begin_frame();

        let polled = input::poll().context("failed to read terminal input")?;
        if let Some((cols, rows)) = polled.resized {
            term.resize(cols, rows);
        }

        if session.tick(time, &polled.events, audio) == Flow::Quit {
            break;
        }

        draw_frame(&mut frame, &session);
        term.present(&frame).context("failed to draw frame")?;

        clock.end_frame();
    }

    let stats = session.stats();
    log::info!(
        "quit after {} losses, best score {}",
        stats.loss_count,
        stats.high_score
    );
    Ok(())
}
