//! Shared test plumbing: an in-memory transport and a poll helper.
#![allow(dead_code)] // not every test binary uses every helper

use std::collections::VecDeque;

use cmd_prompt::{Command, Prompt, Transport};

/// Scripted byte transport: input is a queue the test fills, output is
/// captured, and the millisecond clock is advanced by hand.
pub struct MockTransport {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    pub now: u32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            now: 0,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn output_string(&mut self) -> String {
        String::from_utf8_lossy(&self.take_output()).into_owned()
    }
}

impl Transport for MockTransport {
    fn byte_available(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.input.pop_front().unwrap_or(0)
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn millis(&mut self) -> u32 {
        self.now
    }
}

/// Poll the prompt until the scripted input is fully consumed.
pub fn pump(prompt: &mut Prompt<'_>, io: &mut MockTransport, cmds: &[Command]) {
    while io.byte_available() {
        prompt.run_cmd_prompt(io, cmds);
    }
}
