//! Fixed-size RDS text buffers

/// Text assembled from independently received segments
///
/// Unwritten positions hold spaces. The exposed text ends after the highest
/// offset written so far. Bytes outside printable ASCII are stored as spaces,
/// which keeps [`as_str`](Self::as_str) valid UTF-8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> TextBuffer<N> {
    /// Empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [b' '; N],
            len: 0,
        }
    }

    /// Buffer capacity
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Length of the exposed text
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been written
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `data` at `offset`
    ///
    /// Returns false and leaves the buffer untouched if the segment does not fit.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> bool {
        let Some(end) = offset.checked_add(data.len()) else {
            return false;
        };
        if end > N {
            return false;
        }

        for (slot, &byte) in self.bytes[offset..end].iter_mut().zip(data) {
            *slot = printable(byte);
        }
        self.len = self.len.max(end);
        true
    }

    /// Exposed text
    #[must_use]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }

    /// Exposed text without trailing spaces
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.as_str().trim_end_matches(' ')
    }

    /// Exposed bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Forget everything written
    pub fn clear(&mut self) {
        self.bytes = [b' '; N];
        self.len = 0;
    }
}

impl<const N: usize> Default for TextBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn printable(byte: u8) -> u8 {
    if (0x20..=0x7E).contains(&byte) {
        byte
    } else {
        b' '
    }
}
