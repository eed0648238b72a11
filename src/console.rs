//! The local-terminal transport: the prompt core sees the same
//! byte-at-a-time stream it would get from a serial port or a socket.
//!
//! crossterm puts the tty into raw mode and delivers key events; this
//! adapter flattens them back into bytes, synthesizing the ESC `[`
//! sequences the decoder expects for arrows, Home/End and Delete.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use cmd_prompt::Transport;

use crate::errors::ShellResult;

pub struct ConsoleTransport {
    pending: VecDeque<u8>,
    start: Instant,
    interrupted: bool,
}

impl ConsoleTransport {
    /// Switch the terminal to raw mode; it is restored on drop.
    pub fn new() -> ShellResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self {
            pending: VecDeque::new(),
            start: Instant::now(),
            interrupted: false,
        })
    }

    /// True once the user pressed Ctrl+C (raw mode swallows the signal).
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    fn queue_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                self.interrupted = true;
            }
            return;
        }
        match key.code {
            KeyCode::Char(ch) if ch.is_ascii() => self.pending.push_back(ch as u8),
            KeyCode::Enter => self.pending.push_back(b'\r'),
            KeyCode::Backspace => self.pending.push_back(8),
            KeyCode::Tab => self.pending.push_back(9),
            KeyCode::Esc => self.pending.push_back(27),
            KeyCode::Up => self.pending.extend([27, b'[', b'A']),
            KeyCode::Down => self.pending.extend([27, b'[', b'B']),
            KeyCode::Right => self.pending.extend([27, b'[', b'C']),
            KeyCode::Left => self.pending.extend([27, b'[', b'D']),
            KeyCode::Home => self.pending.extend([27, b'[', b'H']),
            KeyCode::End => self.pending.extend([27, b'[', b'F']),
            KeyCode::Delete => self.pending.extend([27, b'[', b'3', b'~']),
            _ => {}
        }
    }
}

impl Drop for ConsoleTransport {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Transport for ConsoleTransport {
    fn byte_available(&mut self) -> bool {
        if !self.pending.is_empty() {
            return true;
        }
        while matches!(event::poll(Duration::ZERO), Ok(true)) {
            match event::read() {
                Ok(event) => self.queue_event(event),
                Err(_) => break,
            }
            if !self.pending.is_empty() || self.interrupted {
                break;
            }
        }
        !self.pending.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.pending.pop_front().unwrap_or(0)
    }

    fn write_byte(&mut self, byte: u8) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&[byte]);
        let _ = stdout.flush();
    }

    fn millis(&mut self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
