//! Command dispatch: matching a submitted line against the command table,
//! splitting it into an argument vector and running the handler.

use crate::cstr_len;
use crate::prompt::Prompt;
use crate::transport::Transport;

/// Upper bound on the argument vector built for one invocation.
pub const MAX_ARGS: usize = 10;

/// One entry of the embedder's command table. The table is scanned in
/// order and the first entry whose name is a prefix of the input, with the
/// byte after the match being the end of line or a space, wins.
pub struct Command {
    pub name: &'static str,
    /// One-line description used by [`display_help`].
    pub help: &'static str,
    /// The handler. Called with `args[0]` as the command name as typed;
    /// an empty `args` is the signal to declare help via the `help_*`
    /// primitives on the context.
    pub exec: fn(&mut CmdContext<'_, '_>, &[&str]),
}

/// Everything a handler may touch while it runs: the prompt it was
/// dispatched from, the transport its output goes to, and the command
/// table it came from.
pub struct CmdContext<'run, 'buf> {
    pub(crate) prompt: &'run mut Prompt<'buf>,
    pub(crate) io: &'run mut dyn Transport,
    pub(crate) cmds: &'run [Command],
}

impl CmdContext<'_, '_> {
    pub fn write_str(&mut self, s: &str) {
        self.io.write_str(s);
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.io.write_byte(byte);
    }

    /// Print the table listing (what a `Help` command calls).
    pub fn display_help(&mut self) {
        display_help(self.io, self.cmds);
    }

    pub fn set_password_mode(&mut self, on: bool) {
        self.prompt.set_password_mode(on);
    }
}

/// List every command, name padded to the longest one (minimum eight
/// columns) plus a space, followed by its one-line help.
pub fn display_help(io: &mut dyn Transport, cmds: &[Command]) {
    let mut width = 8;
    for cmd in cmds {
        if cmd.name.len() > width {
            width = cmd.name.len();
        }
    }
    width += 1;

    for cmd in cmds {
        io.write_str(cmd.name);
        for _ in cmd.name.len()..width {
            io.write_byte(b' ');
        }
        io.write_str(cmd.help);
        io.write_str("\r\n");
    }
}

/// First table entry matching `line` under the prefix rule, if any.
pub(crate) fn find_command(cmds: &[Command], line: &[u8]) -> Option<usize> {
    cmds.iter().position(|cmd| {
        let name = cmd.name.as_bytes();
        line.len() >= name.len()
            && &line[..name.len()] == name
            && (line.len() == name.len() || line[name.len()] == b' ')
    })
}

impl<'buf> Prompt<'buf> {
    /// One step of the command prompt: poll for a byte, and when a full
    /// line has been submitted, dispatch it, reset the input buffer and
    /// redraw the prompt. Non-blocking; call it regularly.
    pub fn run_cmd_prompt(&mut self, io: &mut dyn Transport, cmds: &[Command]) {
        if self.read_line(io, cmds) {
            if !self.dispatch(io, cmds) {
                io.write_str("Command not found.\r\n\r\n");
            }
            self.reset_input();
            self.draw_prompt(io);
        }
    }

    /// Run a raw line as if it had been typed. The buffer is tokenized in
    /// place (separator spaces become NULs). Returns false when no command
    /// matched; an empty line is a successful no-op.
    pub fn run_line(&mut self, io: &mut dyn Transport, cmds: &[Command], line: &mut [u8]) -> bool {
        let len = cstr_len(line);
        if len == 0 {
            return true;
        }
        let Some(idx) = find_command(cmds, &line[..len]) else {
            return false;
        };
        self.exec_command(io, cmds, idx, &mut line[..len]);
        true
    }

    fn dispatch(&mut self, io: &mut dyn Transport, cmds: &[Command]) -> bool {
        let line = self.editor.take_buf();
        let found = self.run_line(io, cmds, line);
        self.editor.restore_buf(line);
        found
    }

    fn exec_command(
        &mut self,
        io: &mut dyn Transport,
        cmds: &[Command],
        idx: usize,
        line: &mut [u8],
    ) {
        for byte in line.iter_mut() {
            if *byte == b' ' {
                *byte = 0;
            }
        }

        let mut argv: [&str; MAX_ARGS] = [""; MAX_ARGS];
        let mut argc = 0;
        for token in line.split(|&b| b == 0) {
            if argc == MAX_ARGS {
                io.write_str("run_line: MAX_ARGS too small.\r\n");
                return;
            }
            let Ok(token) = core::str::from_utf8(token) else {
                return;
            };
            argv[argc] = token;
            argc += 1;
        }

        self.running_cmd = Some(idx);
        let exec = cmds[idx].exec;
        {
            let mut ctx = CmdContext {
                prompt: self,
                io,
                cmds,
            };
            exec(&mut ctx, &argv[..argc]);
        }
        self.running_cmd = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::TestIo;

    fn echo_args(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
        if args.is_empty() {
            return;
        }
        for arg in args {
            ctx.write_byte(b'[');
            ctx.write_str(arg);
            ctx.write_byte(b']');
        }
        ctx.write_str("\r\n");
    }

    static CMDS: &[Command] = &[
        Command {
            name: "Quit",
            help: "Quit the program",
            exec: echo_args,
        },
        Command {
            name: "Q",
            help: "Shadowed by table order for plain Q",
            exec: echo_args,
        },
        Command {
            name: "LongCommandName",
            help: "Pads the listing",
            exec: echo_args,
        },
    ];

    fn run(line: &[u8]) -> (bool, String) {
        let mut io = TestIo::new();
        let mut buf = [0u8; 64];
        let mut prompt = crate::Prompt::new();
        prompt.set_line_buffer(&mut buf);
        let mut scratch = [0u8; 64];
        scratch[..line.len()].copy_from_slice(line);
        let found = prompt.run_line(&mut io, CMDS, &mut scratch);
        (found, String::from_utf8(io.output).unwrap())
    }

    #[test]
    fn dispatch_splits_args_in_place() {
        let (found, out) = run(b"Quit now please");
        assert!(found);
        assert_eq!(out, "[Quit][now][please]\r\n");
    }

    #[test]
    fn a_proper_prefix_earlier_in_the_table_wins() {
        // "Quit" is listed first and matches "Quit x" even though "Q"
        // would too; bare "Q" falls through to the second entry.
        let (_, out) = run(b"Quit x");
        assert_eq!(out, "[Quit][x]\r\n");
        let (_, out) = run(b"Q x");
        assert_eq!(out, "[Q][x]\r\n");
    }

    #[test]
    fn the_match_must_end_at_a_space_or_eol() {
        let (found, _) = run(b"Quitter");
        assert!(!found);
    }

    #[test]
    fn empty_line_is_a_successful_no_op() {
        let (found, out) = run(b"");
        assert!(found);
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_command_reports_not_found() {
        let (found, _) = run(b"Missing");
        assert!(!found);
    }

    #[test]
    fn consecutive_spaces_produce_empty_tokens() {
        let (_, out) = run(b"Quit  x");
        assert_eq!(out, "[Quit][][x]\r\n");
    }

    #[test]
    fn argv_overflow_aborts_before_the_handler_runs() {
        // ten tokens fit exactly; the eleventh is one too many
        let (found, out) = run(b"Quit 1 2 3 4 5 6 7 8 9");
        assert!(found);
        assert_eq!(out, "[Quit][1][2][3][4][5][6][7][8][9]\r\n");
        let (found, out) = run(b"Quit 1 2 3 4 5 6 7 8 9 10");
        assert!(found);
        assert_eq!(out, "run_line: MAX_ARGS too small.\r\n");
    }

    #[test]
    fn display_help_pads_to_the_longest_name() {
        let mut io = TestIo::new();
        display_help(&mut io, CMDS);
        let out = String::from_utf8(io.output).unwrap();
        // "LongCommandName" is 15 wide, so every name column is 16.
        assert!(out.contains("Quit            Quit the program\r\n"));
        assert!(out.contains("LongCommandName Pads the listing\r\n"));
    }
}
