//! The prompt instance and its byte-driven input decoder.
//!
//! [`Prompt`] owns all editing state by value and the line/history buffers
//! by exclusive reference; the transport and command table are handed in
//! at every poll, so one thread can serve several instances round-robin.
//! Each [`Prompt::read_line`] call does a bounded amount of work: one
//! probe, at most one byte, and whatever echo that byte requires.

use crate::command::Command;
#[cfg(feature = "completion")]
use crate::complete::TabState;
use crate::editor::LineEditor;
use crate::help::HelpState;
#[cfg(feature = "history")]
use crate::history::History;
#[cfg(feature = "telnet")]
use crate::telnet::TelnetState;
use crate::transport::Transport;

const ESC: u8 = 27;
const TAB: u8 = 9;
const LF: u8 = 10;
const CR: u8 = b'\r';
const BS: u8 = 8;
const DEL: u8 = 127;

/// How long a lone ESC waits for a follow-up byte before it is taken as a
/// real ESC rather than the start of an ANSI sequence.
const ESC_TIMEOUT_MS: u32 = 250;

/// What the previous keystroke was, as far as history cares: Up and Down
/// drive the direction-reversal skip, everything that edits or submits
/// counts as Other. Plain cursor motion leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LastKey {
    Up,
    Down,
    Other,
}

/// Progress through an ESC `[` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnsiState {
    Idle,
    /// Got ESC, waiting to see whether a `[` follows in time.
    Esc,
    /// Got ESC `[`, waiting for the final byte.
    Csi,
    /// Got a parameter digit whose action already ran; a trailing `~` is
    /// consumed, anything else is reprocessed as a normal key.
    CsiParam,
}

/// One interactive prompt: line editor, history, decoder state.
///
/// Create it (directly or from a [`crate::PromptPool`]), install a line
/// buffer and optionally a history buffer, then call
/// [`Prompt::run_cmd_prompt`] from the embedder's poll loop.
pub struct Prompt<'buf> {
    pub(crate) editor: LineEditor<'buf>,
    #[cfg(feature = "history")]
    pub(crate) history: History<'buf>,
    pub(crate) last_key: LastKey,
    ansi: AnsiState,
    esc_started: u32,
    #[cfg(feature = "telnet")]
    telnet: TelnetState,
    prompt_str: &'buf str,
    /// Index of the command whose handler is on the stack, if any. The
    /// help-emission calls need it to find their own table entry.
    pub(crate) running_cmd: Option<usize>,
    pub(crate) help: HelpState,
    #[cfg(feature = "completion")]
    pub(crate) tab: TabState,
}

impl<'buf> Prompt<'buf> {
    pub fn new() -> Self {
        Self {
            editor: LineEditor::new(),
            #[cfg(feature = "history")]
            history: History::new(),
            last_key: LastKey::Other,
            ansi: AnsiState::Idle,
            esc_started: 0,
            #[cfg(feature = "telnet")]
            telnet: TelnetState::Idle,
            prompt_str: ">",
            running_cmd: None,
            help: HelpState::new(),
            #[cfg(feature = "completion")]
            tab: TabState::new(),
        }
    }

    /// Install the buffer the line is edited in. The prompt never
    /// allocates; capacity (including the NUL terminator) is entirely the
    /// caller's choice, and 2 is the useful minimum.
    pub fn set_line_buffer(&mut self, buf: &'buf mut [u8]) {
        self.editor.install(buf);
    }

    /// Install the buffer previous lines are kept in. Without one, Up and
    /// Down do nothing.
    #[cfg(feature = "history")]
    pub fn set_history_buffer(&mut self, buf: &'buf mut [u8]) {
        self.history.install(buf);
    }

    /// When on, every echoed data byte is rendered as `*`.
    pub fn set_password_mode(&mut self, on: bool) {
        self.editor.set_password(on);
    }

    /// Replace the prompt string (default `">"`).
    pub fn set_prompt(&mut self, prompt: &'buf str) {
        self.prompt_str = prompt;
    }

    pub fn draw_prompt(&self, io: &mut dyn Transport) {
        io.write_str(self.prompt_str);
    }

    /// The current edit line, without its terminator.
    pub fn line(&self) -> &[u8] {
        self.editor.bytes()
    }

    /// Caret index into [`Prompt::line`].
    pub fn caret(&self) -> usize {
        self.editor.caret()
    }

    /// Clear the edit buffer and decoder state for the next line. Screen
    /// output is not touched.
    pub fn reset_input(&mut self) {
        self.editor.reset();
        self.ansi = AnsiState::Idle;
    }

    /// Poll for one byte and feed it through the decoder. Returns true
    /// when a completed line is ready in the buffer (the caller then
    /// dispatches or reads it and calls [`Prompt::reset_input`]).
    pub fn read_line(&mut self, io: &mut dyn Transport, cmds: &[Command]) -> bool {
        #[cfg(not(feature = "completion"))]
        let _ = cmds;

        #[cfg(feature = "telnet")]
        if self.telnet != TelnetState::Idle {
            if io.byte_available() {
                let byte = io.read_byte();
                self.telnet = self.telnet.feed(byte, io);
            }
            return false;
        }

        // A pending ESC that never got its follow-up byte was a real ESC:
        // abandon the line. Mid-sequence stalls just cancel the sequence.
        if self.ansi != AnsiState::Idle
            && io.millis().wrapping_sub(self.esc_started) > ESC_TIMEOUT_MS
        {
            if self.ansi == AnsiState::Esc {
                self.editor.erase_line(io);
                self.reset_input();
            }
            self.ansi = AnsiState::Idle;
            return false;
        }

        if !io.byte_available() {
            return false;
        }
        let byte = io.read_byte();

        match self.ansi {
            AnsiState::Idle => {}
            AnsiState::Esc => {
                if byte == b'[' {
                    self.ansi = AnsiState::Csi;
                    return false;
                }
                if byte == ESC {
                    self.editor.erase_line(io);
                    self.reset_input();
                    return false;
                }
                // Not an ANSI sequence after all; fall through and treat
                // the byte as a normal key.
                self.ansi = AnsiState::Idle;
            }
            AnsiState::Csi => {
                self.handle_csi(io, byte);
                return false;
            }
            AnsiState::CsiParam => {
                self.ansi = AnsiState::Idle;
                if byte == b'~' {
                    return false;
                }
            }
        }

        match byte {
            0 | LF => {}
            TAB => {
                #[cfg(feature = "completion")]
                self.tab_complete(io, cmds);
                self.last_key = LastKey::Other;
            }
            ESC => {
                self.ansi = AnsiState::Esc;
                self.esc_started = io.millis();
            }
            CR => {
                io.write_byte(b'\n');
                io.write_byte(b'\r');
                self.note_submit();
                self.last_key = LastKey::Other;
                self.clear_tab_scan();
                return true;
            }
            BS | DEL => {
                self.clear_tab_scan();
                self.editor.backspace(io);
                self.last_key = LastKey::Other;
            }
            #[cfg(feature = "telnet")]
            255 => {
                self.telnet = TelnetState::Command;
            }
            32..=126 => {
                self.clear_tab_scan();
                self.editor.insert(io, byte);
                self.last_key = LastKey::Other;
            }
            // Everything else is a control byte this prompt has no use
            // for.
            _ => {
                self.last_key = LastKey::Other;
            }
        }
        false
    }

    fn handle_csi(&mut self, io: &mut dyn Transport, byte: u8) {
        self.ansi = AnsiState::Idle;
        self.clear_tab_scan();
        match byte {
            b'C' => self.editor.cursor_right(io),
            b'D' => self.editor.cursor_left(io),
            b'H' => self.editor.cursor_home(io),
            b'F' => self.editor.cursor_end(io),
            b'1' => {
                self.editor.cursor_home(io);
                self.ansi = AnsiState::CsiParam;
            }
            b'4' => {
                self.editor.cursor_end(io);
                self.ansi = AnsiState::CsiParam;
            }
            b'3' => {
                self.editor.delete_at_caret(io);
                self.ansi = AnsiState::CsiParam;
            }
            b'A' => self.history_up(io),
            b'B' => self.history_down(io),
            // Unknown finals end the sequence harmlessly.
            _ => {}
        }
    }

    fn history_up(&mut self, io: &mut dyn Transport) {
        #[cfg(feature = "history")]
        if self.history.has_entries() {
            self.editor.erase_line(io);
            let reversing = self.last_key == LastKey::Down;
            if let Some(record) = self.history.recall_prev(reversing) {
                self.editor.load(io, record);
            }
        }
        #[cfg(not(feature = "history"))]
        let _ = io;
        self.last_key = LastKey::Up;
    }

    fn history_down(&mut self, io: &mut dyn Transport) {
        #[cfg(feature = "history")]
        if self.history.has_entries() {
            self.editor.erase_line(io);
            let reversing = self.last_key == LastKey::Up;
            if let Some(record) = self.history.recall_next(reversing) {
                self.editor.load(io, record);
            }
        }
        #[cfg(not(feature = "history"))]
        let _ = io;
        self.last_key = LastKey::Down;
    }

    /// History bookkeeping for a submitted line: record it, unless it is
    /// empty or was itself just recalled (then only move the cursor so the
    /// next Up starts past it).
    fn note_submit(&mut self) {
        #[cfg(feature = "history")]
        if self.history.enabled() && !self.editor.bytes().is_empty() {
            if self.last_key == LastKey::Other {
                self.history.record(self.editor.bytes());
            } else {
                self.history.seek_to_record_end();
            }
        }
    }

    fn clear_tab_scan(&mut self) {
        #[cfg(feature = "completion")]
        self.tab.reset();
    }
}

impl Default for Prompt<'_> {
    fn default() -> Self {
        Self::new()
    }
}
