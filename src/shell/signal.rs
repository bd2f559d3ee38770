use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::{mem::MaybeUninit, thread};

use signal_hook::{
    consts::{SIGHUP, SIGTERM},
    iterator::Signals,
};

use crate::error::ShellError;

/// Tracks interrupt and termination requests.
///
/// While the shell waits for input (`idle`) a signal ends the process at
/// once with status 0, after putting the terminal back the way it was found.
/// While a command runs the request is only recorded, and the loop stops
/// after the command has finished.
#[derive(Clone, Default)]
pub struct Interrupts {
    requested: Arc<AtomicBool>,
    idle: Arc<AtomicBool>,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs process-wide handlers. May only succeed once per process.
    /// Must run before the line editor first switches the terminal to raw mode.
    pub fn install(&self) -> Result<(), ShellError> {
        let terminal = SavedTerminal::capture();

        let handler = self.clone();
        ctrlc::set_handler(move || handler.on_signal(&terminal))?;

        let mut signals =
            Signals::new([SIGTERM, SIGHUP]).map_err(|e| ShellError::Signal(e.to_string()))?;
        let handler = self.clone();
        thread::Builder::new()
            .name("minish-signals".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    handler.on_signal(&terminal);
                }
            })?;
        Ok(())
    }

    fn on_signal(&self, terminal: &SavedTerminal) {
        if self.idle.load(Ordering::SeqCst) {
            terminal.restore();
            println!();
            std::process::exit(0);
        }
        self.request();
    }

    pub fn set_idle(&self, idle: bool) {
        self.idle.store(idle, Ordering::SeqCst);
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Returns whether a request arrived since the last call, clearing it.
    pub fn take_requested(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

/// Terminal settings from before the line editor enters raw mode. `None`
/// when stdin is not a terminal.
#[derive(Clone, Copy)]
struct SavedTerminal(Option<libc::termios>);

impl SavedTerminal {
    fn capture() -> Self {
        let mut termios = MaybeUninit::<libc::termios>::uninit();
        unsafe {
            if libc::tcgetattr(libc::STDIN_FILENO, termios.as_mut_ptr()) == 0 {
                SavedTerminal(Some(termios.assume_init()))
            } else {
                SavedTerminal(None)
            }
        }
    }

    fn restore(&self) {
        if let Some(termios) = &self.0 {
            unsafe {
                libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, termios);
            }
        }
    }
}
