//! The help-emission engine.
//!
//! A command describes its own arguments by being re-invoked with an empty
//! argument list and calling the `help_*` primitives on its context. The
//! same declarations are interpreted in three roles: the one-line usage
//! banner, the indented detail block, and (for tab completion) a silent
//! scan that captures the n-th option of a given argument level. Handlers
//! never see the role directly.

use crate::command::CmdContext;
#[cfg(feature = "cmd-help")]
use crate::transport::Transport;

/// Indent unit for the detail block, in spaces.
#[cfg(feature = "cmd-help")]
const HELP_INDENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HelpMode {
    /// Normal dispatch; the primitives do nothing.
    Off,
    /// Emitting the `USAGE:` line.
    Usage,
    /// Emitting the `WHERE:` detail block.
    Details,
    /// Scanning for a completion candidate; nothing is printed.
    #[cfg(feature = "completion")]
    Completion,
}

pub(crate) struct HelpState {
    pub(crate) mode: HelpMode,
    /// Arguments (and first options) seen so far; drives detail indenting.
    pub(crate) args_output: usize,
    /// True until the current argument's first option is emitted.
    pub(crate) first_option: bool,
    #[cfg(feature = "completion")]
    pub(crate) scan: ScanState,
}

#[cfg(feature = "completion")]
pub(crate) struct ScanState {
    /// Argument level the scan is looking at.
    pub(crate) level: u8,
    /// Zero-based option occurrence to capture.
    pub(crate) index: usize,
    /// Options seen at the current argument so far.
    pub(crate) counter: usize,
    pub(crate) found: Option<&'static str>,
}

impl HelpState {
    pub(crate) fn new() -> Self {
        Self {
            mode: HelpMode::Off,
            args_output: 0,
            first_option: true,
            #[cfg(feature = "completion")]
            scan: ScanState {
                level: 0,
                index: 0,
                counter: 0,
                found: None,
            },
        }
    }
}

impl CmdContext<'_, '_> {
    /// Open a help block. Must come before any other `help_*` call in a
    /// handler's zero-argument path.
    pub fn help_start(&mut self) {
        self.prompt.help.args_output = 0;
        self.prompt.help.first_option = true;
    }

    /// Declare a positional argument.
    pub fn help_arg(&mut self, label: &str, desc: &str) {
        self.prompt.help.args_output += 1;
        self.prompt.help.first_option = true;
        match self.prompt.help.mode {
            #[cfg(feature = "cmd-help")]
            HelpMode::Usage => {
                self.io.write_str(" [");
                self.io.write_str(label);
                self.io.write_str("]");
            }
            #[cfg(feature = "cmd-help")]
            HelpMode::Details => {
                output_help_desc(self.io, 1, label, desc);
            }
            #[cfg(feature = "completion")]
            HelpMode::Completion => {
                self.prompt.help.scan.counter = 0;
            }
            _ => {
                let _ = (label, desc);
            }
        }
    }

    /// Declare a positional that logically follows the option declared
    /// just before it.
    pub fn help_subarg(&mut self, label: &str, desc: &str) {
        match self.prompt.help.mode {
            #[cfg(feature = "cmd-help")]
            HelpMode::Details => {
                let indent = self.prompt.help.args_output + 1;
                output_help_desc(self.io, indent, label, desc);
            }
            // Sub-arguments are not part of the usage line, and a
            // completion scan only looks at options.
            _ => {
                let _ = (label, desc);
            }
        }
    }

    /// Declare one token the user may type for the argument at the given
    /// zero-based `level` (level 0 is `argv[1]`). The option text must be
    /// static so a completion scan can hold on to it.
    pub fn help_option(&mut self, level: u8, option: &'static str, desc: &str) {
        match self.prompt.help.mode {
            #[cfg(feature = "cmd-help")]
            HelpMode::Details => {
                if self.prompt.help.first_option {
                    self.prompt.help.args_output += 1;
                    self.prompt.help.first_option = false;
                }
                output_help_desc(self.io, level as usize + 2, option, desc);
            }
            #[cfg(feature = "completion")]
            HelpMode::Completion => {
                let scan = &mut self.prompt.help.scan;
                scan.counter += 1;
                if level == scan.level && scan.counter == scan.index + 1 {
                    scan.found = Some(option);
                }
            }
            _ => {
                let _ = (level, option, desc);
            }
        }
    }

    /// Mark the command as taking a variadic tail.
    pub fn help_dotdotdot(&mut self) {
        match self.prompt.help.mode {
            #[cfg(feature = "cmd-help")]
            HelpMode::Usage => self.io.write_str(" ..."),
            _ => {}
        }
    }

    /// Close the help block.
    pub fn help_end(&mut self) {
        match self.prompt.help.mode {
            #[cfg(feature = "cmd-help")]
            HelpMode::Usage => self.io.write_str("\r\n"),
            _ => {}
        }
    }

    /// Print the full help for the command currently being run: the usage
    /// line, then the detail block, both produced by re-invoking the
    /// handler with an empty argument list. A no-op outside a handler.
    #[cfg(feature = "cmd-help")]
    pub fn show_cmd_help(&mut self) {
        let Some(idx) = self.prompt.running_cmd else {
            return;
        };
        let cmd = &self.cmds[idx];

        self.prompt.help.mode = HelpMode::Usage;
        self.io.write_str("USAGE:\r\n");
        for _ in 0..HELP_INDENT {
            self.io.write_byte(b' ');
        }
        self.io.write_str(cmd.name);
        (cmd.exec)(self, &[]);

        self.prompt.help.mode = HelpMode::Details;
        self.io.write_str("\r\nWHERE:\r\n");
        (cmd.exec)(self, &[]);

        self.prompt.help.mode = HelpMode::Off;
    }

    /// Reduced build: one line of `<cmd> -- <help>`.
    #[cfg(not(feature = "cmd-help"))]
    pub fn show_cmd_help(&mut self) {
        let Some(idx) = self.prompt.running_cmd else {
            return;
        };
        let cmd = &self.cmds[idx];
        self.io.write_str(cmd.name);
        self.io.write_str(" -- ");
        self.io.write_str(cmd.help);
        self.io.write_str("\r\n");
    }
}

/// `<indent units>label -- desc` and CRLF; an embedded LF in the
/// description gets a CR and re-indents the continuation two units deeper.
#[cfg(feature = "cmd-help")]
fn output_help_desc(io: &mut dyn Transport, indent: usize, label: &str, desc: &str) {
    for _ in 0..HELP_INDENT * indent {
        io.write_byte(b' ');
    }
    io.write_str(label);
    io.write_str(" -- ");
    for byte in desc.bytes() {
        if byte == b'\n' {
            io.write_byte(b'\r');
            io.write_byte(b'\n');
            for _ in 0..HELP_INDENT * (indent + 2) {
                io.write_byte(b' ');
            }
        } else {
            io.write_byte(byte);
        }
    }
    io.write_str("\r\n");
}
