use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read or advance would run past the end of the buffer.
    #[error("out of bounds: {needed} bytes at offset 0x{offset:x}, buffer is 0x{len:x} bytes")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },
    #[error("sync word not found in the first {window} bytes")]
    SyncNotFound { window: usize },
    #[error("unknown packet type {word:08x} at offset 0x{offset:x}")]
    UnknownPacketType { offset: usize, word: u32 },
    /// The type 2 region does not divide into whole frames; the leftover words are carried along.
    #[error(
        "type 2 region ends with a partial frame {index} of {n} words at offset 0x{offset:x}",
        n = .words.len()
    )]
    AnomalousFrameRemainder {
        index: usize,
        offset: usize,
        words: Vec<u32>,
    },
    #[error("container too short: {len} bytes, envelope needs {needed}")]
    ContainerTooShort { len: usize, needed: usize },
}

impl DecodeError {
    /// Whether a walk may carry on (or the caller may retry) after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DecodeError::SyncNotFound { .. }
                | DecodeError::UnknownPacketType { .. }
                | DecodeError::AnomalousFrameRemainder { .. }
        )
    }
}
