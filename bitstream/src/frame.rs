use crate::{Cursor, DecodeError, FRAME_WORDS, Type2Region};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub index: usize,
    /// Byte offset of the first word.
    pub offset: usize,
    pub words: [u32; FRAME_WORDS],
}

/// Cuts a type 2 region into frames, one per call.
///
/// Iteration ends at the end of the region.  A trailing partial frame is
/// reported once as [`DecodeError::AnomalousFrameRemainder`], carrying the
/// leftover words; a region running past the buffer ends with
/// [`DecodeError::OutOfBounds`].
#[derive(Debug)]
pub struct FrameDumper<'a> {
    cursor: Cursor<'a>,
    region: Type2Region,
    index: usize,
    done: bool,
}

impl<'a> FrameDumper<'a> {
    pub fn new(cursor: Cursor<'a>, region: Type2Region) -> Self {
        Self {
            cursor,
            region,
            index: 0,
            done: false,
        }
    }

    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    /// Number of whole frames in the region.
    pub fn frame_count(&self) -> usize {
        self.region.words as usize / FRAME_WORDS
    }

    pub fn remainder(&self) -> usize {
        self.region.words as usize % FRAME_WORDS
    }

    fn words_left(&self) -> usize {
        self.region.end().saturating_sub(self.cursor.pos()) / 4
    }

    /// Steps over up to `n` whole frames without reading them; returns how many were skipped.
    pub fn skip_frames(&mut self, n: usize) -> Result<usize, DecodeError> {
        let n = n.min(self.words_left() / FRAME_WORDS);
        self.cursor.advance((n * FRAME_WORDS) as u32)?;
        self.index += n;
        log::info!("skipped {n} frames, new position: 0x{:x}", self.cursor.pos());
        Ok(n)
    }

    pub fn next_frame(&mut self) -> Option<Result<Frame, DecodeError>> {
        if self.done {
            return None;
        }
        let left = self.words_left();
        if left == 0 {
            self.done = true;
            return None;
        }
        let offset = self.cursor.pos();
        let index = self.index;
        if left < FRAME_WORDS {
            self.done = true;
            return Some(match self.cursor.take_words(left) {
                Ok(words) => {
                    log::warn!("partial frame {index}: {left} words at 0x{offset:x}");
                    Err(DecodeError::AnomalousFrameRemainder {
                        index,
                        offset,
                        words,
                    })
                }
                Err(e) => Err(e),
            });
        }
        let words = match self.cursor.take_words(FRAME_WORDS) {
            Ok(words) => words,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        self.index += 1;
        let words = std::array::from_fn(|i| words[i]);
        Some(Ok(Frame {
            index,
            offset,
            words,
        }))
    }
}

impl Iterator for FrameDumper<'_> {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }
}
