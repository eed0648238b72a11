//! Line editing over a caller-supplied byte buffer.
//!
//! The buffer always holds a NUL-terminated line; the caret is an index in
//! `[0, len]`. The editor owns the screen model too: every mutation emits
//! the plain-byte sequences (printables, backspace, space, CR/LF) that
//! keep a dumb terminal's display in sync with the buffer. No cursor
//! addressing is ever emitted.

use crate::cstr_len;
use crate::transport::Transport;

const BS: u8 = 8;

pub(crate) struct LineEditor<'buf> {
    buf: &'buf mut [u8],
    caret: usize,
    password: bool,
}

impl<'buf> LineEditor<'buf> {
    pub(crate) fn new() -> Self {
        Self {
            buf: &mut [],
            caret: 0,
            password: false,
        }
    }

    /// Install the line buffer. Capacity should be at least 2 (one data
    /// byte plus the terminator); the buffer starts out empty.
    pub(crate) fn install(&mut self, buf: &'buf mut [u8]) {
        if let Some(first) = buf.first_mut() {
            *first = 0;
        }
        self.buf = buf;
        self.caret = 0;
    }

    pub(crate) fn set_password(&mut self, on: bool) {
        self.password = on;
    }

    pub(crate) fn len(&self) -> usize {
        cstr_len(self.buf)
    }

    pub(crate) fn caret(&self) -> usize {
        self.caret
    }

    /// The current line, without its terminator.
    pub(crate) fn bytes(&self) -> &[u8] {
        let len = self.len();
        &self.buf[..len]
    }

    pub(crate) fn reset(&mut self) {
        self.caret = 0;
        if let Some(first) = self.buf.first_mut() {
            *first = 0;
        }
    }

    /// Temporarily take the buffer away (for in-place tokenization); pair
    /// with [`LineEditor::restore_buf`].
    pub(crate) fn take_buf(&mut self) -> &'buf mut [u8] {
        core::mem::replace(&mut self.buf, &mut [])
    }

    pub(crate) fn restore_buf(&mut self, buf: &'buf mut [u8]) {
        self.buf = buf;
    }

    fn echo(&self, io: &mut dyn Transport, byte: u8) {
        io.write_byte(if self.password { b'*' } else { byte });
    }

    /// Re-echo the line from the caret up to `new_len`, blank the column
    /// after it (to wipe a deleted character), then back the cursor up to
    /// the caret's column.
    fn echo_tail(&self, io: &mut dyn Transport, new_len: usize) {
        for p in self.caret..new_len {
            self.echo(io, self.buf[p]);
        }
        io.write_byte(b' ');
        for _ in self.caret..new_len + 1 {
            io.write_byte(BS);
        }
    }

    /// Wipe the visible line and leave the cursor in column zero. Buffer
    /// contents are untouched.
    pub(crate) fn erase_line(&mut self, io: &mut dyn Transport) {
        let len = self.len();
        while self.caret > 0 {
            self.caret -= 1;
            io.write_byte(BS);
        }
        for _ in 0..len {
            io.write_byte(b' ');
        }
        for _ in 0..len {
            io.write_byte(BS);
        }
    }

    /// Insert one byte at the caret, if the buffer has room for it and
    /// its terminator.
    pub(crate) fn insert(&mut self, io: &mut dyn Transport, byte: u8) {
        let len = self.len();
        if self.buf.is_empty() || len + 1 >= self.buf.len() {
            return;
        }
        for p in (self.caret..=len).rev() {
            self.buf[p + 1] = self.buf[p];
        }
        self.buf[self.caret] = byte;
        self.echo_tail(io, len + 1);
        self.caret += 1;
        self.echo(io, byte);
    }

    /// Delete the byte before the caret.
    pub(crate) fn backspace(&mut self, io: &mut dyn Transport) {
        if self.caret == 0 {
            return;
        }
        self.caret -= 1;
        let len = self.len();
        for p in self.caret..len {
            self.buf[p] = self.buf[p + 1];
        }
        io.write_byte(BS);
        self.echo_tail(io, len - 1);
    }

    /// Delete the byte under the caret.
    pub(crate) fn delete_at_caret(&mut self, io: &mut dyn Transport) {
        let len = self.len();
        if self.caret >= len {
            return;
        }
        for p in self.caret..len {
            self.buf[p] = self.buf[p + 1];
        }
        self.echo_tail(io, len - 1);
    }

    pub(crate) fn cursor_left(&mut self, io: &mut dyn Transport) {
        if self.caret > 0 {
            self.caret -= 1;
            io.write_byte(BS);
        }
    }

    pub(crate) fn cursor_right(&mut self, io: &mut dyn Transport) {
        if self.caret < self.len() {
            self.echo(io, self.buf[self.caret]);
            self.caret += 1;
        }
    }

    pub(crate) fn cursor_home(&mut self, io: &mut dyn Transport) {
        while self.caret > 0 {
            self.caret -= 1;
            io.write_byte(BS);
        }
    }

    pub(crate) fn cursor_end(&mut self, io: &mut dyn Transport) {
        let len = self.len();
        while self.caret < len {
            self.echo(io, self.buf[self.caret]);
            self.caret += 1;
        }
    }

    /// Replace the line with `bytes` (truncated to capacity) and echo it
    /// from column zero; the caret ends up at the line's length.
    pub(crate) fn load(&mut self, io: &mut dyn Transport, bytes: &[u8]) {
        if self.buf.is_empty() {
            return;
        }
        let n = bytes.len().min(self.buf.len() - 1);
        self.buf[..n].copy_from_slice(&bytes[..n]);
        self.buf[n] = 0;
        self.caret = 0;
        while self.caret < n {
            self.echo(io, self.buf[self.caret]);
            self.caret += 1;
        }
    }

    /// Replace everything from `start` to the end of the line with `text`:
    /// the old tail is wiped on-screen one backspace-space-backspace per
    /// byte, the new text is written and the caret ends after it. Used by
    /// tab completion. A replacement that would not fit is ignored.
    pub(crate) fn replace_tail(&mut self, io: &mut dyn Transport, start: usize, text: &[u8]) {
        let len = self.len();
        if start > len || start + text.len() + 1 > self.buf.len() {
            return;
        }
        for _ in start..len {
            io.write_byte(BS);
            io.write_byte(b' ');
            io.write_byte(BS);
        }
        self.buf[start..start + text.len()].copy_from_slice(text);
        self.buf[start + text.len()] = 0;
        self.caret = start;
        while self.caret < start + text.len() {
            self.echo(io, self.buf[self.caret]);
            self.caret += 1;
        }
    }
}
