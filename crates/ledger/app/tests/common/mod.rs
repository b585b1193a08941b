//! Shared helpers for integration tests

#![allow(dead_code, unreachable_pub)]

use std::collections::VecDeque;

use ledger_apdu_core::response::has_accepted_status;
use ledger_apdu_core::{Bytes, Command, DeviceTransport, ErrorCode, TransportError};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber, ignoring a second installation
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One scripted exchange outcome
#[derive(Debug, Clone)]
pub enum Step {
    /// Reply with these bytes, status word included
    Reply(Bytes),
    /// Fail at the transport level
    Fail(TransportError),
}

/// Transport that plays back a script and records every command
///
/// Commands are framed to their wire bytes and parsed back, as a device would
/// see them. Like a USB HID transport it raises [`TransportError::StatusWord`]
/// for any status the caller did not list as accepted.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<Step>,
    /// Wire frames received, in order
    pub frames: Vec<Bytes>,
    /// Commands parsed from those frames, in order
    pub sent: Vec<Command>,
    /// Accepted lists received, in order
    pub accepted: Vec<Vec<ErrorCode>>,
}

impl ScriptedTransport {
    /// Create a transport with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply given as hex, status word included
    pub fn reply(mut self, hex_reply: &str) -> Self {
        let bytes = hex::decode(hex_reply).expect("valid hex in test script");
        self.script.push_back(Step::Reply(Bytes::from(bytes)));
        self
    }

    /// Queue a transport failure
    pub fn fail(mut self, error: TransportError) -> Self {
        self.script.push_back(Step::Fail(error));
        self
    }

    /// Number of steps not yet played
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DeviceTransport for ScriptedTransport {
    fn do_exchange(&mut self, command: &Command, accepted: &[ErrorCode]) -> Result<Bytes, TransportError> {
        let frame = command
            .to_bytes()
            .map_err(|e| TransportError::other(e.to_string()))?;
        let parsed = Command::from_bytes(&frame).map_err(|e| TransportError::other(e.to_string()))?;

        self.frames.push(frame);
        self.sent.push(parsed);
        self.accepted.push(accepted.to_vec());

        match self.script.pop_front() {
            Some(Step::Reply(reply)) => {
                if reply.len() >= 2 && !has_accepted_status(&reply, accepted) {
                    let len = reply.len();
                    return Err(TransportError::status_word_bytes(reply[len - 2], reply[len - 1]));
                }
                Ok(reply)
            }
            Some(Step::Fail(error)) => Err(error),
            None => Err(TransportError::other("script exhausted")),
        }
    }
}
