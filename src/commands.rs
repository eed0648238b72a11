//! The built-in command table served by every shellport session.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use cmd_prompt::{CmdContext, Command};

/// Set by `Quit`; stops the whole server (or the local console loop).
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

thread_local! {
    /// Set by `Exit`; closes only the session served by this thread.
    static CLOSE_SESSION: Cell<bool> = const { Cell::new(false) };
}

pub static COMMANDS: &[Command] = &[
    Command {
        name: "Help",
        help: "List the available commands",
        exec: help_cmd,
    },
    Command {
        name: "Quit",
        help: "Shut down the shell server",
        exec: quit_cmd,
    },
    Command {
        name: "Exit",
        help: "Close the current session",
        exec: exit_cmd,
    },
    Command {
        name: "Drive",
        help: "Example of the help / auto complete",
        exec: drive_cmd,
    },
];

pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

pub fn close_requested() -> bool {
    CLOSE_SESSION.with(|flag| flag.get())
}

/// Clear the per-session close flag before serving a connection; threads
/// may be reused by the runtime between sessions in tests.
pub fn session_begin() {
    CLOSE_SESSION.with(|flag| flag.set(false));
}

fn help_cmd(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        return;
    }
    ctx.display_help();
}

fn quit_cmd(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        return;
    }
    ctx.write_str("Shutting down.\r\n");
    SHUTDOWN.store(true, Ordering::Relaxed);
}

fn exit_cmd(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        return;
    }
    ctx.write_str("Goodbye.\r\n");
    CLOSE_SESSION.with(|flag| flag.set(true));
}

/// The canonical help/auto-complete demonstration: a disk, a function,
/// and per-function sub-arguments.
fn drive_cmd(ctx: &mut CmdContext<'_, '_>, args: &[&str]) {
    if args.is_empty() {
        ctx.help_start();

        ctx.help_arg("Disk", "What disk to work on");
        ctx.help_option(0, "df0", "Floppy disk 1");
        ctx.help_option(0, "df1", "Floppy disk 2");
        ctx.help_option(0, "dh0", "Hard drive 1");

        ctx.help_arg("Function", "Perform disk functions");
        // Read fn
        ctx.help_option(1, "Read", "Read from the disk");
        ctx.help_subarg("Offset", "The offset into the disk to read");
        ctx.help_subarg("Bytes", "The number of bytes to read");
        // Write fn
        ctx.help_option(1, "Write", "Write to the disk");
        ctx.help_subarg("Offset", "The offset into the disk to write");
        ctx.help_subarg("Bytes", "The number of bytes to write");
        // Format fn
        ctx.help_option(1, "Format", "Format the disk");

        ctx.help_end();
        return;
    }

    if args.len() < 3 {
        ctx.show_cmd_help();
        return;
    }

    if args[1].eq_ignore_ascii_case("df0") {
        ctx.write_str("Floppy disk 1\r\n");
    } else if args[1].eq_ignore_ascii_case("df1") {
        ctx.write_str("Floppy disk 2\r\n");
    } else if args[1].eq_ignore_ascii_case("dh0") {
        ctx.write_str("Hard drive 1\r\n");
    } else {
        ctx.write_str("Unknown disk\r\n");
        return;
    }

    if args[2].eq_ignore_ascii_case("Read") || args[2].eq_ignore_ascii_case("Write") {
        if args.len() < 5 {
            ctx.write_str("Missing args\r\n");
            return;
        }
        let offset: u32 = args[3].parse().unwrap_or(0);
        let bytes: u32 = args[4].parse().unwrap_or(0);
        if args[2].eq_ignore_ascii_case("Read") {
            ctx.write_str(&format!("Reading {} bytes at offset {}\r\n", bytes, offset));
        } else {
            ctx.write_str(&format!("Writing {} bytes at offset {}\r\n", bytes, offset));
        }
    } else if args[2].eq_ignore_ascii_case("Format") {
        ctx.write_str("Formatting...\r\n");
    } else {
        ctx.write_str("Unknown function\r\n");
    }
}
