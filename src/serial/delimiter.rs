use super::{log_debug, log_warn, CircularBuffer, Error, Serial, NEW_LINE};

/// Line framing over a [`Serial`]
///
/// Messages sent through a `DelimiterSerial` are followed by the delimiter, and messages received
/// are the bytes up to the next delimiter. A raw read may return more than one message, the bytes
/// after the first delimiter are kept in a ring buffer of `LEN` bytes (`LEN` must be a power of
/// two) and are the start of the next receive.
///
/// A `DelimiterSerial` is not safe to share between callers that interleave commands. A command
/// must have its reply received before the next command is sent.
pub struct DelimiterSerial<S, const LEN: usize = 32> {
    serial: S,
    delimiter: &'static [u8],
    ring: CircularBuffer<LEN>,
}

impl<S, const LEN: usize> DelimiterSerial<S, LEN>
where
    S: Serial,
{
    /// Create a new `DelimiterSerial` with the delimiter [`NEW_LINE`]
    pub fn new(serial: S) -> Self {
        DelimiterSerial {
            serial,
            delimiter: NEW_LINE,
            ring: CircularBuffer::new(),
        }
    }

    /// Create a new `DelimiterSerial` with a custom delimiter
    ///
    /// `None` is returned if `delimiter` is empty.
    pub fn with_delimiter(serial: S, delimiter: &'static [u8]) -> Option<Self> {
        if delimiter.is_empty() {
            return None;
        }

        Some(DelimiterSerial {
            serial,
            delimiter,
            ring: CircularBuffer::new(),
        })
    }

    pub fn delimiter(&self) -> &[u8] {
        self.delimiter
    }

    pub fn get_ref(&self) -> &S {
        &self.serial
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn into_inner(self) -> S {
        self.serial
    }

    /// The number of bytes received past the last delimiter that are waiting in the ring buffer
    pub fn pending(&self) -> usize {
        self.ring.count()
    }

    /// Send a message followed by the delimiter
    ///
    /// `payload` is sent only if it is `Some` and not empty, the delimiter is always sent. The
    /// total number of bytes accepted by the transport is returned.
    pub fn send(&mut self, payload: Option<&[u8]>) -> Result<usize, Error<S::Error>> {
        let mut sent = 0;

        if let Some(payload) = payload.filter(|p| !p.is_empty()) {
            sent += self.send_raw(payload)?;
        }

        let delimiter = self.delimiter;

        sent += self.send_raw(delimiter)?;

        Ok(sent)
    }

    /// Send bytes without a delimiter
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<usize, Error<S::Error>> {
        self.serial.send(bytes).map_err(|e| {
            log::error!("(SERIAL) send failed: {}", e);

            Error::Transport(e)
        })
    }

    /// Receive a message
    ///
    /// The bytes up to the next delimiter are copied to the front of `buffer` and the number of
    /// bytes in the message is returned. The delimiter is not part of the message, the first byte
    /// of the delimiter within `buffer` is overwritten with a zero.
    ///
    /// Bytes left over from a previous receive are used before the transport is read. A message
    /// can take multiple reads of the transport to be completed.
    ///
    /// # Errors
    /// * [`Timeout`](Error::Timeout) when the transport's read times out before a delimiter was
    ///   found. The bytes of the incomplete message are kept for the next receive.
    /// * [`BufferOverflow`](Error::BufferOverflow) when `buffer` is filled without containing a
    ///   delimiter, or when the bytes past the delimiter (or those of an incomplete message) cannot
    ///   be held by the ring buffer. The `DelimiterSerial` must be flushed after this.
    /// * [`Transport`](Error::Transport) when the transport fails.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Error<S::Error>> {
        if buffer.is_empty() {
            return Err(Error::BufferOverflow);
        }

        let mut filled = 0;

        loop {
            let read = if self.ring.is_empty() {
                let (partial, to) = buffer.split_at_mut(filled);

                self.read_transport(to, partial)?
            } else {
                self.ring.load(&mut buffer[filled..])
            };

            // a delimiter can be split across two reads
            let search_start = filled.saturating_sub(self.delimiter.len() - 1);

            filled += read;

            if let Some(position) = find(&buffer[search_start..filled], self.delimiter) {
                let end = search_start + position;

                let rest = &buffer[(end + self.delimiter.len())..filled];

                if !rest.is_empty() {
                    if !self.ring.store_front(rest) {
                        log_warn!("{} bytes past the delimiter overflow the ring buffer", rest.len());

                        return Err(Error::BufferOverflow);
                    }

                    log_debug!("stored {} bytes past the delimiter", rest.len());
                }

                buffer[end] = 0;

                return Ok(end);
            }

            if filled == buffer.len() {
                log_warn!("no delimiter within {} bytes", filled);

                return Err(Error::BufferOverflow);
            }
        }
    }

    /// Receive bytes without framing
    ///
    /// Bytes waiting in the ring buffer are returned first, otherwise this is a single read of the
    /// transport. `Ok(0)` means the read timed out.
    pub fn receive_raw(&mut self, buffer: &mut [u8]) -> Result<usize, Error<S::Error>> {
        if self.ring.is_empty() {
            self.serial.receive(buffer).map_err(Error::Transport)
        } else {
            Ok(self.ring.load(buffer))
        }
    }

    /// Discard all received bytes
    ///
    /// This empties the ring buffer and flushes the transport.
    pub fn flush(&mut self) {
        log_debug!("flushing {} buffered bytes and the transport", self.ring.count());

        self.ring.flush();
        self.serial.flush();
    }

    /// Discard the bytes within the ring buffer
    ///
    /// Unlike [`flush`](DelimiterSerial::flush) the transport is not flushed.
    pub fn flush_internal(&mut self) {
        log_debug!("flushing {} buffered bytes", self.ring.count());

        self.ring.flush();
    }

    /// Read the transport into `to`
    ///
    /// On a timeout the incomplete message `partial` is put back into the ring buffer.
    fn read_transport(&mut self, to: &mut [u8], partial: &[u8]) -> Result<usize, Error<S::Error>> {
        match self.serial.receive(to) {
            Ok(0) if partial.is_empty() => Err(Error::Timeout),
            Ok(0) => {
                if self.ring.store_front(partial) {
                    log_debug!("timed out with {} bytes of an incomplete message", partial.len());

                    Err(Error::Timeout)
                } else {
                    log_warn!("incomplete message of {} bytes overflows the ring buffer", partial.len());

                    Err(Error::BufferOverflow)
                }
            }
            Ok(read) => Ok(read),
            Err(e) => {
                log::error!("(SERIAL) receive failed: {}", e);

                Err(Error::Transport(e))
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
