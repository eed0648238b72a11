//! Drives a prompt from a canned keystroke script and prints the
//! transcript, so the editing/help/completion behavior can be inspected
//! without wiring up a terminal.
//!
//! Run with: cargo run --example scripted

use std::collections::VecDeque;

use cmd_prompt::{CmdContext, Command, Prompt, Transport};

struct Scripted {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl Transport for Scripted {
    fn byte_available(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.input.pop_front().unwrap_or(0)
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

fn drive(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        ctx.help_start();
        ctx.help_arg("Disk", "What disk to work on");
        ctx.help_option(0, "df0", "Floppy disk 1");
        ctx.help_option(0, "df1", "Floppy disk 2");
        ctx.help_option(0, "dh0", "Hard drive 1");
        ctx.help_arg("Function", "Perform disk functions");
        ctx.help_option(1, "Read", "Read from the disk");
        ctx.help_subarg("Offset", "The offset into the disk to read");
        ctx.help_subarg("Bytes", "The number of bytes to read");
        ctx.help_option(1, "Format", "Format the disk");
        ctx.help_end();
        return;
    }
    if args.len() < 3 {
        ctx.show_cmd_help();
        return;
    }
    ctx.write_str("ok\r\n");
}

fn help(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        return;
    }
    ctx.display_help();
}

static COMMANDS: &[Command] = &[
    Command {
        name: "Help",
        help: "List the available commands",
        exec: help,
    },
    Command {
        name: "Drive",
        help: "Example of the help / auto complete",
        exec: drive,
    },
];

fn main() {
    let mut io = Scripted {
        input: VecDeque::new(),
        output: Vec::new(),
    };
    // Help, then the Drive usage text, then tab completion of "d".
    io.input.extend(b"Help\r");
    io.input.extend(b"Drive\r");
    io.input.extend(b"Drive d\t\t\r");

    let mut line_buf = [0u8; 100];
    let mut history_buf = [0u8; 1000];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line_buf);
    prompt.set_history_buffer(&mut history_buf);

    prompt.draw_prompt(&mut io);
    while io.byte_available() {
        prompt.run_cmd_prompt(&mut io, COMMANDS);
    }

    print!("{}", String::from_utf8_lossy(&io.output));
    println!();
}
