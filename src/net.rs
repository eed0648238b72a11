//! Serving the prompt over TCP: a non-blocking socket transport and the
//! per-connection session loop.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use cmd_prompt::{Prompt, Transport};

use crate::commands;
use crate::config::ShellConfig;
use crate::errors::ShellResult;

/// `Transport` over a non-blocking `TcpStream`. Reads probe with `peek`;
/// writes are best-effort and a dead connection just flips the closed
/// flag, which ends the session loop.
pub struct TelnetTransport {
    stream: TcpStream,
    start: Instant,
    closed: bool,
}

impl TelnetTransport {
    pub fn new(stream: TcpStream) -> ShellResult<Self> {
        stream.set_nonblocking(true)?;
        Ok(Self {
            stream,
            start: Instant::now(),
            closed: false,
        })
    }

    pub fn closed(&self) -> bool {
        self.closed
    }
}

impl Transport for TelnetTransport {
    fn byte_available(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let mut probe = [0u8; 1];
        match self.stream.peek(&mut probe) {
            Ok(0) => {
                self.closed = true;
                false
            }
            Ok(_) => true,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => false,
            Err(_) => {
                self.closed = true;
                false
            }
        }
    }

    fn read_byte(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        match self.stream.read(&mut byte) {
            Ok(1) => byte[0],
            Ok(_) => {
                self.closed = true;
                0
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => 0,
            Err(_) => {
                self.closed = true;
                0
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        if self.closed {
            return;
        }
        if let Err(e) = self.stream.write_all(&[byte]) {
            if e.kind() != std::io::ErrorKind::WouldBlock {
                self.closed = true;
            }
        }
    }

    fn millis(&mut self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// Serve one Telnet connection until the client disconnects, types
/// `Exit`, or the server is shut down.
pub fn run_session(stream: TcpStream, config: &ShellConfig) -> ShellResult<()> {
    let mut io = TelnetTransport::new(stream)?;
    cmd_prompt::send_initial_negotiation(&mut io);

    let mut line_buf = vec![0u8; config.shell.line_buffer_size.max(2)];
    let mut history_buf = vec![0u8; config.shell.history_buffer_size];

    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line_buf);
    if !history_buf.is_empty() {
        prompt.set_history_buffer(&mut history_buf);
    }
    prompt.set_prompt(&config.shell.prompt);

    io.write_str(&format!(
        "{} -- type Help for the command list\r\n",
        config.info.name
    ));
    prompt.draw_prompt(&mut io);

    commands::session_begin();
    while !commands::shutdown_requested() && !commands::close_requested() && !io.closed() {
        prompt.run_cmd_prompt(&mut io, commands::COMMANDS);
        if !io.byte_available() {
            thread::sleep(Duration::from_millis(2));
        }
    }

    Ok(())
}
