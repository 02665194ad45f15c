use std::io::{Stdout, stdout};

use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::{AppError, Result};

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switches to raw mode on the alternate screen. A panic restores the
/// terminal before the default hook prints, so the message stays readable.
pub fn setup_terminal() -> Result<AppTerminal> {
    install_panic_hook();
    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)
}

pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().map_err(terminal_error)?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
    terminal.show_cursor().map_err(terminal_error)?;
    Ok(())
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

fn terminal_error(err: std::io::Error) -> AppError {
    AppError::Terminal(err.to_string())
}
