//! Tab completion.
//!
//! Level 0 (the command name) cycles through the command table; level 1
//! and up re-invoke the active command's handler in a silent scan mode and
//! cycle through the options it declares for that argument level. The
//! typed prefix is fixed at the first Tab press (the "resume point");
//! every other key clears the scan so the next Tab starts fresh.

use crate::command::{find_command, CmdContext, Command};
use crate::help::HelpMode;
use crate::prompt::Prompt;
use crate::transport::Transport;

pub(crate) struct TabState {
    /// End of the typed prefix, recorded on the first Tab of a cycle.
    resume: Option<usize>,
    /// Next command table index to try (level 0).
    next_cmd: usize,
    /// Next option occurrence to try (level 1 and up).
    next_opt: usize,
}

impl TabState {
    pub(crate) fn new() -> Self {
        Self {
            resume: None,
            next_cmd: 0,
            next_opt: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.resume = None;
    }
}

impl<'buf> Prompt<'buf> {
    pub(crate) fn tab_complete(&mut self, io: &mut dyn Transport, cmds: &[Command]) {
        let len = self.editor.len();
        // Completion only works with the caret at the end of the line.
        if self.editor.caret() != len {
            return;
        }

        let first_press = self.tab.resume.is_none();
        if first_press {
            self.tab.resume = Some(len);
            self.tab.next_cmd = 0;
            self.tab.next_opt = 0;
        }
        let Some(resume) = self.tab.resume else {
            return;
        };

        // The token under completion starts after the last space before
        // the resume point; the spaces before it give the argument level.
        let (level, tok_start) = {
            let line = self.editor.bytes();
            let mut level = 0;
            let mut tok_start = 0;
            for (i, &byte) in line[..resume].iter().enumerate() {
                if byte == b' ' {
                    level += 1;
                    tok_start = i + 1;
                }
            }
            (level, tok_start)
        };

        if level == 0 {
            self.complete_command_name(io, cmds, tok_start, resume, first_press);
        } else {
            self.complete_option(io, cmds, level - 1, tok_start, resume);
        }
    }

    /// Cycle the command table for a name starting with the typed prefix.
    fn complete_command_name(
        &mut self,
        io: &mut dyn Transport,
        cmds: &[Command],
        tok_start: usize,
        resume: usize,
        first_press: bool,
    ) {
        if cmds.is_empty() {
            return;
        }
        let mut found = None;
        for step in 0..cmds.len() {
            let idx = (self.tab.next_cmd + step) % cmds.len();
            let name = cmds[idx].name.as_bytes();
            let line = self.editor.bytes();
            let prefix = &line[tok_start..resume];
            if name.len() < prefix.len() || &name[..prefix.len()] != prefix {
                continue;
            }
            // What the user typed may already be a full command name; on
            // the first press, offer the next one instead of itself.
            if first_press && name == prefix {
                continue;
            }
            found = Some(idx);
            break;
        }
        if let Some(idx) = found {
            self.tab.next_cmd = idx + 1;
            self.editor
                .replace_tail(io, tok_start, cmds[idx].name.as_bytes());
        }
    }

    /// Cycle the options the active command declares at `level`.
    fn complete_option(
        &mut self,
        io: &mut dyn Transport,
        cmds: &[Command],
        level: usize,
        tok_start: usize,
        resume: usize,
    ) {
        let cmd_idx = {
            let line = self.editor.bytes();
            match find_command(cmds, line) {
                Some(idx) => idx,
                None => return,
            }
        };

        let mut opt_idx = self.tab.next_opt;
        let mut wrapped = false;
        let mut found = None;
        loop {
            match self.scan_option(io, cmds, cmd_idx, level as u8, opt_idx) {
                None => {
                    // Ran out of declared options; wrap around once.
                    if wrapped || opt_idx == 0 {
                        break;
                    }
                    wrapped = true;
                    opt_idx = 0;
                }
                Some(option) => {
                    let line = self.editor.bytes();
                    let prefix = &line[tok_start..resume];
                    let candidate = option.as_bytes();
                    if candidate.len() >= prefix.len() && &candidate[..prefix.len()] == prefix {
                        found = Some(option);
                        self.tab.next_opt = opt_idx + 1;
                        break;
                    }
                    opt_idx += 1;
                }
            }
        }
        if let Some(option) = found {
            self.editor.replace_tail(io, tok_start, option.as_bytes());
        }
    }

    /// Run the handler once in completion mode and return the `index`-th
    /// option it declares at `level`, if it declares that many.
    fn scan_option(
        &mut self,
        io: &mut dyn Transport,
        cmds: &[Command],
        cmd_idx: usize,
        level: u8,
        index: usize,
    ) -> Option<&'static str> {
        self.help.mode = HelpMode::Completion;
        self.help.scan.level = level;
        self.help.scan.index = index;
        self.help.scan.counter = 0;
        self.help.scan.found = None;
        self.running_cmd = Some(cmd_idx);

        let exec = cmds[cmd_idx].exec;
        {
            let mut ctx = CmdContext {
                prompt: self,
                io,
                cmds,
            };
            exec(&mut ctx, &[]);
        }

        self.running_cmd = None;
        self.help.mode = HelpMode::Off;
        self.help.scan.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::TestIo;

    fn drive(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
        if args.is_empty() {
            ctx.help_start();
            ctx.help_arg("Disk", "What disk to work on");
            ctx.help_option(0, "df0", "Floppy disk 1");
            ctx.help_option(0, "df1", "Floppy disk 2");
            ctx.help_option(0, "dh0", "Hard drive 1");
            ctx.help_arg("Function", "Disk function");
            ctx.help_option(1, "Read", "Read from the disk");
            ctx.help_option(1, "Write", "Write to the disk");
            ctx.help_end();
        }
    }

    fn noop(_ctx: &mut CmdContext<'_, '_>, _args: &[&str]) {}

    static CMDS: &[Command] = &[
        Command {
            name: "Drive",
            help: "Disk example",
            exec: drive,
        },
        Command {
            name: "Delete",
            help: "Remove something",
            exec: noop,
        },
    ];

    fn typed(prompt: &mut crate::Prompt<'_>, io: &mut TestIo, text: &[u8]) {
        io.feed(text);
        while io.byte_available() {
            prompt.read_line(io, CMDS);
        }
    }

    #[test]
    fn tab_cycles_command_names_and_wraps() {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);

        typed(&mut prompt, &mut io, b"D\t");
        assert_eq!(prompt.line(), b"Drive");
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"Delete");
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"Drive");
    }

    #[test]
    fn tab_cycles_declared_options_and_wraps() {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);

        typed(&mut prompt, &mut io, b"Drive d\t");
        assert_eq!(prompt.line(), b"Drive df0");
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"Drive df1");
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"Drive dh0");
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"Drive df0");
    }

    #[test]
    fn second_level_options_complete_too() {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);

        typed(&mut prompt, &mut io, b"Drive df0 R\t");
        assert_eq!(prompt.line(), b"Drive df0 Read");
    }

    #[test]
    fn an_edit_restarts_the_cycle() {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);

        typed(&mut prompt, &mut io, b"D\t");
        assert_eq!(prompt.line(), b"Drive");
        // typing extends the prefix and ends the old cycle
        typed(&mut prompt, &mut io, b" d\t");
        assert_eq!(prompt.line(), b"Drive df0");
    }

    #[test]
    fn tab_away_from_the_end_of_line_is_ignored() {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);

        typed(&mut prompt, &mut io, b"D");
        typed(&mut prompt, &mut io, &[27, b'[', b'D']); // cursor left
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"D");
    }

    #[test]
    fn exact_name_offers_the_next_match_first() {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);

        typed(&mut prompt, &mut io, b"Drive\t");
        // "Drive" is exact, so the first press skips it; no other name
        // shares the prefix, so the line is left alone.
        assert_eq!(prompt.line(), b"Drive");
        // the second press has no exact-match rule and offers it again
        typed(&mut prompt, &mut io, b"\t");
        assert_eq!(prompt.line(), b"Drive");
    }
}
