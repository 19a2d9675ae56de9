use crate::logging::StderrMute;
use crate::pixels::{BLACK, PixelBuf};
use crossterm::{cursor, execute, terminal};
use std::io::{self, Stdout, Write, stdout};

/// Owns the terminal while the game runs: raw mode, alternate screen, hidden
/// cursor. Everything is restored on drop, including on early return.
pub struct Terminal {
    out: Stdout,
    screen: PixelBuf,
    mute: Option<StderrMute>,
}

impl Terminal {
    pub fn enter() -> io::Result<Self> {
        let mute = StderrMute::new();
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        let (cols, rows) = terminal::size()?;
        let mut term = Self {
            out,
            screen: PixelBuf::new(0, 0),
            mute: Some(mute),
        };
        term.resize(cols, rows);
        Ok(term)
    }

    /// Pixel height = terminal rows * 2.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        log::debug!("terminal is {cols}x{rows}");
        self.screen.resize(cols as usize, rows as usize * 2);
    }

    /// Scales the logical frame onto the whole terminal and draws it.
    pub fn present(&mut self, frame: &PixelBuf) -> io::Result<()> {
        frame.scale_into(&mut self.screen, BLACK);
        self.screen.render(&mut self.out)
    }

    fn restore(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()?;
        self.out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let restored = self.restore();
        self.mute.take();
        if let Err(err) = restored {
            log::error!("failed to restore terminal: {err}");
        }
    }
}
