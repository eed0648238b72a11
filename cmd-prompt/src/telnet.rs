//! Telnet option (IAC) sub-stream handling.
//!
//! When the prompt is served over a raw TCP connection, the client will
//! interleave option negotiation with keystrokes (RFC 854 / RFC 855). The
//! decoder hands every byte that follows an IAC (255) to this state
//! machine, which consumes the negotiation and answers with the fixed
//! policy of a character-mode server:
//!
//! - we echo (`IAC WILL ECHO` is asserted, client echo is acknowledged off),
//! - go-ahead is suppressed (RFC 858),
//! - LINEMODE (RFC 1184) is refused, since the prompt wants every
//!   keystroke as it happens,
//! - everything else is declined with `IAC WONT <option>`.
//!
//! Negotiation bytes never reach the line editor and replies are
//! best-effort writes.

use crate::transport::Transport;

/// IAC - Interpret As Command (RFC 854). Introduces every Telnet command.
pub(crate) const IAC: u8 = 255;

/// End of subnegotiation parameters.
const SE: u8 = 240;
/// Go Ahead, the last of the one-byte commands (NOP, DM, BRK, ... GA).
const GA: u8 = 249;
/// Subnegotiation begin: `IAC SB <option> <data...> IAC SE`.
const SB: u8 = 250;
const WILL: u8 = 251;
const WONT: u8 = 252;
const DO: u8 = 253;
const DONT: u8 = 254;

/// Echo option (RFC 857).
const OPT_ECHO: u8 = 1;
/// Suppress Go Ahead (RFC 858).
const OPT_SUPPRESS_GO_AHEAD: u8 = 3;
/// Linemode (RFC 1184).
const OPT_LINEMODE: u8 = 34;

/// Where we are inside an IAC command sequence.
///
/// `Idle` means the stream is plain data; the input decoder switches to
/// `Command` when it sees an IAC byte and feeds everything here until the
/// state returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TelnetState {
    Idle,
    /// Got IAC, expecting the command byte.
    Command,
    /// Got `IAC WILL`, expecting the option byte.
    Will,
    /// Got `IAC WONT`, expecting the option byte.
    Wont,
    /// Got `IAC DO`, expecting the option byte.
    Do,
    /// Got `IAC DONT`, expecting the option byte.
    Dont,
    /// Inside `IAC SB ... IAC SE`; data is discarded until the closing IAC.
    Subnegotiation,
}

impl TelnetState {
    /// Consume one byte of the command sub-stream and emit any required
    /// reply. Returns the next state.
    pub(crate) fn feed(self, byte: u8, io: &mut dyn Transport) -> TelnetState {
        match self {
            TelnetState::Idle => TelnetState::Idle,
            TelnetState::Command => match byte {
                SE..=GA => TelnetState::Idle,
                SB => TelnetState::Subnegotiation,
                WILL => TelnetState::Will,
                WONT => TelnetState::Wont,
                DO => TelnetState::Do,
                DONT => TelnetState::Dont,
                // Includes a doubled IAC: an escaped data byte 255, which
                // the prompt has no use for.
                _ => TelnetState::Idle,
            },
            TelnetState::Will => {
                match byte {
                    OPT_ECHO => reply(io, DO, OPT_ECHO),
                    OPT_SUPPRESS_GO_AHEAD => reply(io, DO, OPT_SUPPRESS_GO_AHEAD),
                    OPT_LINEMODE => {
                        // Refuse line-at-a-time mode and assert that this
                        // side does the echoing.
                        reply(io, WONT, OPT_LINEMODE);
                        reply(io, WILL, OPT_ECHO);
                    }
                    other => reply(io, WONT, other),
                }
                TelnetState::Idle
            }
            TelnetState::Wont => {
                match byte {
                    OPT_ECHO => reply(io, WONT, OPT_ECHO),
                    OPT_SUPPRESS_GO_AHEAD => reply(io, DO, OPT_SUPPRESS_GO_AHEAD),
                    other => reply(io, WONT, other),
                }
                TelnetState::Idle
            }
            TelnetState::Do | TelnetState::Dont => {
                match byte {
                    // Silent accept: we already will echo and suppress
                    // go-ahead.
                    OPT_ECHO | OPT_SUPPRESS_GO_AHEAD => {}
                    other => reply(io, WONT, other),
                }
                TelnetState::Idle
            }
            TelnetState::Subnegotiation => {
                if byte == IAC {
                    TelnetState::Command
                } else {
                    TelnetState::Subnegotiation
                }
            }
        }
    }
}

fn reply(io: &mut dyn Transport, command: u8, option: u8) {
    io.write_byte(IAC);
    io.write_byte(command);
    io.write_byte(option);
}

/// Announce the server's terms on a fresh connection: `IAC DO LINEMODE`,
/// `IAC WILL ECHO`. Most clients answer by dropping into character mode.
pub fn send_initial_negotiation(io: &mut dyn Transport) {
    io.write_byte(IAC);
    io.write_byte(DO);
    io.write_byte(OPT_LINEMODE);
    io.write_byte(IAC);
    io.write_byte(WILL);
    io.write_byte(OPT_ECHO);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::TestIo;

    fn run(bytes: &[u8]) -> (TelnetState, Vec<u8>) {
        let mut io = TestIo::new();
        let mut state = TelnetState::Command;
        for &b in bytes {
            state = state.feed(b, &mut io);
        }
        (state, io.output)
    }

    #[test]
    fn will_echo_is_accepted() {
        let (state, out) = run(&[WILL, OPT_ECHO]);
        assert_eq!(state, TelnetState::Idle);
        assert_eq!(out, vec![255, 253, 1]);
    }

    #[test]
    fn wont_echo_is_acknowledged() {
        let (state, out) = run(&[WONT, OPT_ECHO]);
        assert_eq!(state, TelnetState::Idle);
        assert_eq!(out, vec![255, 252, 1]);
    }

    #[test]
    fn suppress_go_ahead_is_accepted_either_way() {
        let (_, out) = run(&[WILL, OPT_SUPPRESS_GO_AHEAD]);
        assert_eq!(out, vec![255, 253, 3]);
        let (_, out) = run(&[WONT, OPT_SUPPRESS_GO_AHEAD]);
        assert_eq!(out, vec![255, 253, 3]);
    }

    #[test]
    fn will_linemode_is_refused_and_echo_asserted() {
        let (state, out) = run(&[WILL, OPT_LINEMODE]);
        assert_eq!(state, TelnetState::Idle);
        assert_eq!(out, vec![255, 252, 34, 255, 251, 1]);
    }

    #[test]
    fn unknown_will_is_declined() {
        let (_, out) = run(&[WILL, 24]);
        assert_eq!(out, vec![255, 252, 24]);
    }

    #[test]
    fn do_echo_and_suppress_go_ahead_are_silent() {
        let (_, out) = run(&[DO, OPT_ECHO]);
        assert!(out.is_empty());
        let (_, out) = run(&[DO, OPT_SUPPRESS_GO_AHEAD]);
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_do_is_declined() {
        let (_, out) = run(&[DONT, 31]);
        assert_eq!(out, vec![255, 252, 31]);
    }

    #[test]
    fn one_byte_commands_return_to_idle() {
        for cmd in SE..=GA {
            let (state, out) = run(&[cmd]);
            assert_eq!(state, TelnetState::Idle);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn subnegotiation_swallows_data_until_iac_se() {
        // IAC SB already consumed the IAC; feed SB, option, data, IAC, SE.
        let (state, out) = run(&[SB, 24, b'A', b'N', b'S', b'I', IAC, SE]);
        assert_eq!(state, TelnetState::Idle);
        assert!(out.is_empty());
    }

    #[test]
    fn initial_negotiation_bytes() {
        let mut io = TestIo::new();
        send_initial_negotiation(&mut io);
        assert_eq!(io.output, vec![255, 253, 34, 255, 251, 1]);
    }
}
