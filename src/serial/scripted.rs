//! A scripted serial transport
//!
//! [`ScriptedSerial`] stands in for the RN4020 when testing. Replies are queued either up front
//! with [`push_incoming`](ScriptedSerial::push_incoming) or in response to a command line sent to
//! it (see [`respond_to`](ScriptedSerial::respond_to)). Everything sent is recorded so the command
//! lines can be checked afterwards.
//!
//! ```
//! # use rn4020::serial::{scripted::ScriptedSerial, DelimiterSerial};
//! let mut port = ScriptedSerial::new().respond_to("GN", "TestDevice\r\n");
//!
//! let mut serial = DelimiterSerial::<_, 32>::new(&mut port);
//! let mut buffer = [0u8; 32];
//!
//! serial.send(Some("GN".as_bytes())).unwrap();
//!
//! let len = serial.receive(&mut buffer).unwrap();
//!
//! assert_eq!(b"TestDevice", &buffer[..len]);
//! ```

use super::{Serial, NEW_LINE};
use std::collections::VecDeque;

/// Error returned by a [`ScriptedSerial`] set to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("scripted serial failure")]
pub struct ScriptedError;

/// A fake serial transport
///
/// Each chunk of incoming bytes is returned by one call to `receive` (or several calls if the
/// chunk is larger than the receive buffer). When there are no chunks `receive` returns `Ok(0)`,
/// the same as a read that timed out.
#[derive(Default, Debug)]
pub struct ScriptedSerial {
    incoming: VecDeque<Vec<u8>>,
    rules: Vec<(Vec<u8>, Vec<Vec<u8>>)>,
    fallback: Option<Vec<u8>>,
    line: Vec<u8>,
    sent: Vec<u8>,
    fail_sends: bool,
    fail_receives: bool,
    flushes: usize,
}

impl ScriptedSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `reply` every time the line `line` is sent
    ///
    /// A line matches a rule when it is equal to `line`, or when `line` has no parameters and it
    /// is equal to the command code of the sent line (the text before the first `,`). Exact
    /// matches are preferred.
    pub fn respond_to<R: AsRef<[u8]>>(self, line: &str, reply: R) -> Self {
        self.respond_in_chunks(line, [reply])
    }

    /// Reply with `chunks` every time the line `line` is sent
    ///
    /// Each chunk is returned by a separate raw read.
    pub fn respond_in_chunks<I, R>(mut self, line: &str, chunks: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        let chunks = chunks.into_iter().map(|c| c.as_ref().to_vec()).collect();

        self.rules.push((line.as_bytes().to_vec(), chunks));
        self
    }

    /// Reply with `reply` to any line that no rule matches
    pub fn respond_to_any<R: AsRef<[u8]>>(mut self, reply: R) -> Self {
        self.fallback = Some(reply.as_ref().to_vec());
        self
    }

    /// Queue a chunk of incoming bytes
    pub fn push_incoming<R: AsRef<[u8]>>(&mut self, chunk: R) {
        self.incoming.push_back(chunk.as_ref().to_vec());
    }

    /// Make every send fail
    pub fn fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail
    }

    /// Make every receive fail
    pub fn fail_receives(&mut self, fail: bool) {
        self.fail_receives = fail
    }

    /// All bytes sent
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// The sent bytes split into lines
    pub fn sent_lines(&self) -> Vec<String> {
        self.sent
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line)).into_owned())
            .collect()
    }

    /// The number of incoming chunks not yet received
    pub fn unread(&self) -> usize {
        self.incoming.len()
    }

    /// The number of times the transport was flushed
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn queue_reply(&mut self, line: &[u8]) {
        let code = line.split(|b| *b == b',').next().unwrap_or(line);

        let chunks = self
            .rules
            .iter()
            .find(|(rule, _)| rule == line)
            .or_else(|| self.rules.iter().find(|(rule, _)| rule == code))
            .map(|(_, chunks)| chunks.clone())
            .or_else(|| self.fallback.clone().map(|reply| vec![reply]));

        if let Some(chunks) = chunks {
            self.incoming.extend(chunks);
        }
    }
}

impl Serial for ScriptedSerial {
    type Error = ScriptedError;

    fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_sends {
            return Err(ScriptedError);
        }

        self.sent.extend_from_slice(bytes);
        self.line.extend_from_slice(bytes);

        while let Some(end) = self.line.windows(NEW_LINE.len()).position(|w| w == NEW_LINE) {
            let line: Vec<u8> = self.line.drain(..end + NEW_LINE.len()).take(end).collect();

            self.queue_reply(&line);
        }

        Ok(bytes.len())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_receives {
            return Err(ScriptedError);
        }

        match self.incoming.pop_front() {
            None => Ok(0),
            Some(mut chunk) => {
                if chunk.len() > buffer.len() {
                    let rest = chunk.split_off(buffer.len());

                    self.incoming.push_front(rest);
                }

                buffer[..chunk.len()].copy_from_slice(&chunk);

                Ok(chunk.len())
            }
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
        self.incoming.clear();
    }
}
