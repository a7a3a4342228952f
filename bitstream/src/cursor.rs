use crate::DecodeError;
use arrayref::array_ref;

/// A read position over a borrowed configuration stream.
///
/// All reads are 32-bit big-endian.  The position never passes the end of the
/// buffer: a read or advance that would do so fails with
/// [`DecodeError::OutOfBounds`] and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], pos: usize) -> Result<Self, DecodeError> {
        let mut cursor = Self::new(data);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(self.out_of_bounds(pos, 0));
        }
        self.pos = pos;
        Ok(())
    }

    /// Reads a word at an arbitrary byte offset, aligned or not.
    pub fn read_word_at(&self, offset: usize) -> Result<u32, DecodeError> {
        match offset.checked_add(4) {
            Some(end) if end <= self.data.len() => {
                Ok(u32::from_be_bytes(*array_ref!(self.data, offset, 4)))
            }
            _ => Err(self.out_of_bounds(offset, 4)),
        }
    }

    pub fn read_word(&self) -> Result<u32, DecodeError> {
        self.read_word_at(self.pos)
    }

    pub fn advance(&mut self, words: u32) -> Result<(), DecodeError> {
        let bytes = (words as usize).checked_mul(4);
        match bytes.and_then(|bytes| self.pos.checked_add(bytes)) {
            Some(end) if end <= self.data.len() => {
                self.pos = end;
                Ok(())
            }
            _ => Err(self.out_of_bounds(self.pos, bytes.unwrap_or(usize::MAX))),
        }
    }

    pub fn take_word(&mut self) -> Result<u32, DecodeError> {
        let word = self.read_word()?;
        self.pos += 4;
        Ok(word)
    }

    /// Reads `n` consecutive words and advances past them.
    pub fn take_words(&mut self, n: usize) -> Result<Vec<u32>, DecodeError> {
        let end = n
            .checked_mul(4)
            .and_then(|bytes| self.pos.checked_add(bytes))
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(self.pos, n.saturating_mul(4)))?;
        let words = self.data[self.pos..end]
            .chunks_exact(4)
            .map(|chunk| u32::from_be_bytes(*array_ref!(chunk, 0, 4)))
            .collect();
        self.pos = end;
        Ok(words)
    }

    fn out_of_bounds(&self, offset: usize, needed: usize) -> DecodeError {
        DecodeError::OutOfBounds {
            offset,
            needed,
            len: self.data.len(),
        }
    }
}
