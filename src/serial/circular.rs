//! A statically allocated circular byte buffer

/// A circular buffer of bytes
///
/// Bytes are stored at the head and loaded from the tail. `LEN` must be a power of two, which is
/// checked when the buffer is created. One slot is always left unused so that a full buffer can be
/// told apart from an empty one, the buffer holds at most `LEN - 1` bytes.
///
/// ```
/// # use rn4020::serial::CircularBuffer;
/// let mut buffer = CircularBuffer::<8>::new();
///
/// assert_eq!(7, buffer.store(b"0123456789"));
///
/// let mut out = [0u8; 4];
///
/// assert_eq!(4, buffer.load(&mut out));
/// assert_eq!(b"0123", &out);
/// assert_eq!(3, buffer.count());
/// ```
#[derive(Clone, Debug)]
pub struct CircularBuffer<const LEN: usize> {
    buffer: [u8; LEN],
    head: usize,
    tail: usize,
}

impl<const LEN: usize> CircularBuffer<LEN> {
    const IS_POWER_OF_TWO: () = assert!(LEN.is_power_of_two(), "LEN must be a power of two");

    const MASK: usize = LEN - 1;

    /// The maximum number of bytes held by the buffer
    pub const CAPACITY: usize = LEN - 1;

    pub fn new() -> Self {
        let _ = Self::IS_POWER_OF_TWO;

        CircularBuffer {
            buffer: [0; LEN],
            head: 0,
            tail: 0,
        }
    }

    /// The number of bytes within the buffer
    pub fn count(&self) -> usize {
        self.head.wrapping_sub(self.tail) & Self::MASK
    }

    /// The number of bytes that can still be stored
    pub fn free(&self) -> usize {
        Self::CAPACITY - self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Store bytes at the head
    ///
    /// As many bytes of `bytes` that fit are stored, the number stored is returned.
    pub fn store(&mut self, bytes: &[u8]) -> usize {
        let amount = bytes.len().min(self.free());

        for byte in &bytes[..amount] {
            self.buffer[self.head] = *byte;
            self.head = (self.head + 1) & Self::MASK;
        }

        amount
    }

    /// Put bytes back at the tail
    ///
    /// The bytes are placed before any bytes already within the buffer so they are the next bytes
    /// loaded. Either all of `bytes` are stored or none of them are, false is returned if there is
    /// not enough free space.
    pub fn store_front(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.free() {
            return false;
        }

        for byte in bytes.iter().rev() {
            self.tail = self.tail.wrapping_sub(1) & Self::MASK;
            self.buffer[self.tail] = *byte;
        }

        true
    }

    /// Load bytes from the tail into `out`
    ///
    /// The number of bytes loaded is returned.
    pub fn load(&mut self, out: &mut [u8]) -> usize {
        let amount = out.len().min(self.count());

        for byte in &mut out[..amount] {
            *byte = self.buffer[self.tail];
            self.tail = (self.tail + 1) & Self::MASK;
        }

        amount
    }

    /// Empty the buffer
    pub fn flush(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

impl<const LEN: usize> Default for CircularBuffer<LEN> {
    fn default() -> Self {
        Self::new()
    }
}
