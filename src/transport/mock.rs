use super::traits::Socket;
use std::collections::VecDeque;
use std::io::{Error, ErrorKind, Result};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    open: Option<(String, u16)>,
    open_count: usize,
    close_count: usize,
    sent: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
}

/// Scripted socket for tests.
///
/// Replies queued with [`MockSocket::push_reply`] are handed out one per
/// `receive`; every `send` is recorded. Clones share state, so a test can
/// keep a clone after moving the socket into a session.
#[derive(Debug, Clone, Default)]
pub struct MockSocket {
    state: Arc<Mutex<MockState>>,
}

impl MockSocket {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // a panicking test thread must not hide the recorded frames
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push_reply(&self, reply: impl Into<Vec<u8>>) {
        self.state().replies.push_back(reply.into());
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state().sent.clone()
    }

    pub fn take_sent(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.state().sent)
    }

    pub fn pending_replies(&self) -> usize {
        self.state().replies.len()
    }

    pub fn is_open(&self) -> bool {
        self.state().open.is_some()
    }

    /// Host and port of the last `open`, while open.
    pub fn peer(&self) -> Option<(String, u16)> {
        self.state().open.clone()
    }

    pub fn open_count(&self) -> usize {
        self.state().open_count
    }

    pub fn close_count(&self) -> usize {
        self.state().close_count
    }
}

impl Socket for MockSocket {
    fn open(&mut self, hostname: &str, port: u16) -> Result<()> {
        let mut state = self.state();
        state.open = Some((hostname.to_string(), port));
        state.open_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state();
        state.open = None;
        state.close_count += 1;
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        self.state().sent.push(data.to_vec());
        Ok(data.len())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let reply = self
            .state()
            .replies
            .pop_front()
            .ok_or_else(|| Error::new(ErrorKind::TimedOut, "no scripted reply left"))?;
        if reply.len() > buffer.len() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "scripted reply exceeds receive buffer",
            ));
        }
        buffer[..reply.len()].copy_from_slice(&reply);
        Ok(reply.len())
    }
}
