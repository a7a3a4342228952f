use crate::packet::{PacketType, classify, decode_one};
use crate::{Cursor, DecodeError, DecodeOptions, Packet};

/// The bulk payload of a type 2 packet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Type2Region {
    /// Byte offset of the first payload word.
    pub start: usize,
    pub words: u32,
}

impl Type2Region {
    pub fn end(&self) -> usize {
        self.start + 4 * self.words as usize
    }
}

fn enter_region(cursor: &mut Cursor, word: u32) -> Type2Region {
    let region = Type2Region {
        start: cursor.pos(),
        words: word & 0x3ffffff,
    };
    log::info!(
        "position 0x{start:x} starts type 2 run of frames of length {words}",
        start = region.start,
        words = region.words
    );
    region
}

/// Steps over command words one at a time until a type 2 header turns up.
///
/// Payloads are not interpreted; the cursor ends up at the first word of the
/// type 2 payload.
pub fn locate_type2(cursor: &mut Cursor) -> Result<Type2Region, DecodeError> {
    loop {
        let word = cursor.take_word()?;
        if classify(word) == PacketType::Type2 {
            return Ok(enter_region(cursor, word));
        }
    }
}

/// Like [`locate_type2`], but decodes every packet on the way and returns them.
///
/// Unknown command words are skipped, or returned as errors when
/// [`DecodeOptions::strict`] is set.
pub fn locate_type2_traced(
    cursor: &mut Cursor,
    options: &DecodeOptions,
) -> Result<(Vec<Packet>, Type2Region), DecodeError> {
    let mut packets = vec![];
    loop {
        let word = cursor.read_word()?;
        if classify(word) == PacketType::Type2 {
            cursor.advance(1)?;
            return Ok((packets, enter_region(cursor, word)));
        }
        match decode_one(cursor) {
            Ok(packet) => packets.push(packet),
            Err(e @ DecodeError::UnknownPacketType { .. }) if !options.strict => {
                log::warn!("{e}, skipped");
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketBody;
    use crate::test_util::words;
    use assert_matches::assert_matches;

    #[test]
    fn finds_first_type2() {
        let data = words(&[0x20000000, 0x30004000, 0x500000ca, 0xaaaaaaaa]);
        let mut cursor = Cursor::new(&data);
        let region = locate_type2(&mut cursor).unwrap();
        assert_eq!(region, Type2Region { start: 12, words: 202 });
        assert_eq!(region.end(), 12 + 808);
        assert_eq!(cursor.pos(), 12);
    }

    #[test]
    fn steps_word_by_word() {
        // The payload word of the FAR write looks like a type 2 header.
        let data = words(&[0x30002001, 0x40000003, 0x50000010]);
        let mut cursor = Cursor::new(&data);
        let region = locate_type2(&mut cursor).unwrap();
        assert_eq!(region, Type2Region { start: 8, words: 3 });

        let mut cursor = Cursor::new(&data);
        let (packets, region) = locate_type2_traced(&mut cursor, &DecodeOptions::new()).unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(region, Type2Region { start: 12, words: 16 });
    }

    #[test]
    fn exhausted() {
        let data = words(&[0x20000000, 0x20000000]);
        let mut cursor = Cursor::new(&data);
        assert_matches!(locate_type2(&mut cursor), Err(DecodeError::OutOfBounds { .. }));
        let mut cursor = Cursor::new(&data);
        assert_matches!(
            locate_type2_traced(&mut cursor, &DecodeOptions::new()),
            Err(DecodeError::OutOfBounds { .. })
        );
    }

    #[test]
    fn traced_records_packets() {
        let data = words(&[
            0x20000000, 0x30008001, 0x00000007, 0x30004000, 0x50000002, 0x1, 0x2,
        ]);
        let mut cursor = Cursor::new(&data);
        let (packets, region) = locate_type2_traced(&mut cursor, &DecodeOptions::new()).unwrap();
        let offsets: Vec<_> = packets.iter().map(|p| p.offset).collect();
        assert_eq!(offsets, [0, 4, 12]);
        assert!(packets.iter().all(|p| matches!(p.body, PacketBody::Type1(_))));
        assert_eq!(region, Type2Region { start: 20, words: 2 });
        assert_eq!(cursor.pos(), 20);
    }

    #[test]
    fn traced_unknown_words() {
        let data = words(&[0x20000000, 0xffffffff, 0x50000000]);
        let mut cursor = Cursor::new(&data);
        let (packets, region) = locate_type2_traced(&mut cursor, &DecodeOptions::new()).unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(region.start, 12);

        let mut cursor = Cursor::new(&data);
        assert_eq!(
            locate_type2_traced(&mut cursor, &DecodeOptions::new().strict()),
            Err(DecodeError::UnknownPacketType {
                offset: 4,
                word: 0xffffffff
            })
        );
    }
}
