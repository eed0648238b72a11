//! # cmd-prompt
//!
//! An embeddable interactive command prompt for programs that only have a
//! character-at-a-time byte stream: a local terminal, a serial port, or a
//! Telnet connection.
//!
//! The core turns raw keystrokes into edited lines (cursor motion,
//! backspace/delete, a timed ESC/CSI decoder, optional password masking),
//! keeps a history of submitted lines in a caller-supplied buffer, and
//! dispatches completed lines against an embedder-provided command table.
//! Commands describe their own arguments through a small emission API,
//! which drives usage/detail help output and tab completion from a single
//! declaration.
//!
//! Design constraints, in the order they shaped the crate:
//! - **No allocation.** Line and history buffers are borrowed from the
//!   caller; everything else lives in the [`Prompt`] value. The crate is
//!   `no_std` outside of its tests.
//! - **No blocking.** [`Prompt::run_cmd_prompt`] reads at most one byte
//!   per call and returns; the embedder owns the loop and may serve
//!   several prompts round-robin from one thread.
//! - **Dumb terminals.** Output is limited to printable bytes, CR/LF,
//!   backspace and space; ANSI sequences are consumed from input, never
//!   emitted.
//!
//! ## Example
//!
//! ```
//! use cmd_prompt::{CmdContext, Command, Prompt, Transport};
//!
//! fn hello(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
//!     if args.is_empty() {
//!         return; // nothing to declare for help
//!     }
//!     ctx.write_str("hi there\r\n");
//! }
//!
//! static COMMANDS: &[Command] = &[Command {
//!     name: "Hello",
//!     help: "Say hello",
//!     exec: hello,
//! }];
//!
//! # struct Scripted(std::collections::VecDeque<u8>, Vec<u8>);
//! # impl Transport for Scripted {
//! #     fn byte_available(&mut self) -> bool { !self.0.is_empty() }
//! #     fn read_byte(&mut self) -> u8 { self.0.pop_front().unwrap_or(0) }
//! #     fn write_byte(&mut self, byte: u8) { self.1.push(byte); }
//! # }
//! # let mut io = Scripted(b"Hello\r".iter().copied().collect(), Vec::new());
//! let mut line_buf = [0u8; 80];
//! let mut prompt = Prompt::new();
//! prompt.set_line_buffer(&mut line_buf);
//! prompt.draw_prompt(&mut io);
//! loop {
//!     prompt.run_cmd_prompt(&mut io, COMMANDS);
//! #     if !io.byte_available() { break; }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod command;
#[cfg(feature = "completion")]
mod complete;
mod editor;
mod help;
#[cfg(feature = "history")]
mod history;
mod pool;
mod prompt;
#[cfg(feature = "telnet")]
pub mod telnet;
mod transport;

pub use command::{display_help, CmdContext, Command, MAX_ARGS};
pub use pool::{PromptHandle, PromptPool};
pub use prompt::Prompt;
#[cfg(feature = "telnet")]
pub use telnet::send_initial_negotiation;
pub use transport::Transport;

/// Length of a NUL-terminated byte string within `bytes` (the whole slice
/// when no terminator is present).
pub(crate) fn cstr_len(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}
