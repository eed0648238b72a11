//! Tab completion of command names and of options declared through the
//! help-emission protocol.

use cmd_prompt::{CmdContext, Command, Prompt};

mod common;
use common::{pump, MockTransport};

fn drive(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        ctx.help_start();
        ctx.help_arg("Disk", "What disk to work on");
        ctx.help_option(0, "df0", "Floppy disk 1");
        ctx.help_option(0, "df1", "Floppy disk 2");
        ctx.help_option(0, "dh0", "Hard drive 1");
        ctx.help_arg("Function", "Perform disk functions");
        ctx.help_option(1, "Read", "Read from the disk");
        ctx.help_option(1, "Write", "Write to the disk");
        ctx.help_option(1, "Format", "Format the disk");
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
        help: "Remove a file",
        exec: noop,
    },
    Command {
        name: "Help",
        help: "Get help",
        exec: noop,
    },
];

#[test]
fn tab_cycles_matching_command_names() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"D\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive");

    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Delete");

    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive");
}

#[test]
fn tab_cycles_options_for_the_first_argument() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"Drive d\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive df0");

    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive df1");

    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive dh0");

    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive df0");
}

#[test]
fn tab_completes_second_level_options() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"Drive df1 F\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive df1 Format");
}

#[test]
fn replacement_erases_the_old_token_on_screen() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"Drive d");
    pump(&mut prompt, &mut io, CMDS);
    io.take_output();

    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    // one typed byte wiped (backspace, space, backspace), then "df0"
    assert_eq!(
        io.take_output(),
        vec![8, b' ', 8, b'd', b'f', b'0']
    );
}

#[test]
fn an_edit_between_tabs_starts_a_fresh_cycle() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"D\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive");

    io.feed(b" df0 R\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive df0 Read");
}

#[test]
fn tab_with_the_caret_inside_the_line_is_ignored() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"De");
    io.feed(&[27, b'[', b'D']); // cursor left
    io.feed(b"\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"De");
}

#[test]
fn unmatched_prefix_leaves_the_line_alone() {
    let mut line = [0u8; 100];
    let mut prompt = Prompt::new();
    prompt.set_line_buffer(&mut line);
    let mut io = MockTransport::new();

    io.feed(b"Zed\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Zed");

    io.feed(b"\rDrive x\t");
    pump(&mut prompt, &mut io, CMDS);
    assert_eq!(prompt.line(), b"Drive x");
}
