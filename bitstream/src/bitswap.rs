/// Reverses the bit order within each big-endian word of `width` bits.
///
/// A width of 0 leaves the data alone.  A trailing partial word is left untouched.
pub fn bitswap(data: &mut [u8], width: BitWidth) {
    let bytes = width.bytes();
    if bytes == 0 {
        return;
    }
    for word in data.chunks_exact_mut(bytes) {
        word.reverse();
        for byte in word {
            *byte = byte.reverse_bits();
        }
    }
}

/// Reverses the bit order of a single 32-bit word at `width`.
pub fn bitswap_word(word: u32, width: BitWidth) -> u32 {
    let mut bytes = word.to_be_bytes();
    bitswap(&mut bytes, width);
    u32::from_be_bytes(bytes)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum BitWidth {
    #[default]
    None,
    W8,
    W16,
    W32,
}

impl BitWidth {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(BitWidth::None),
            8 => Some(BitWidth::W8),
            16 => Some(BitWidth::W16),
            32 => Some(BitWidth::W32),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            BitWidth::None => 0,
            BitWidth::W8 => 1,
            BitWidth::W16 => 2,
            BitWidth::W32 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words() {
        assert_eq!(bitswap_word(0x00000001, BitWidth::W32), 0x80000000);
        assert_eq!(bitswap_word(0x12345678, BitWidth::W32), 0x12345678u32.reverse_bits());
        assert_eq!(bitswap_word(0x0001_0080, BitWidth::W16), 0x8000_0100);
        assert_eq!(bitswap_word(0x01020304, BitWidth::W8), 0x8040c020);
        assert_eq!(bitswap_word(0xdeadbeef, BitWidth::None), 0xdeadbeef);
    }

    #[test]
    fn buffer() {
        let mut data = [0x00, 0x00, 0x00, 0x01, 0xff];
        bitswap(&mut data, BitWidth::W32);
        assert_eq!(data, [0x80, 0x00, 0x00, 0x00, 0xff]);
    }

    #[test]
    fn widths() {
        assert_eq!(BitWidth::from_bits(16), Some(BitWidth::W16));
        assert_eq!(BitWidth::from_bits(24), None);
        assert_eq!(BitWidth::default().bytes(), 0);
    }
}
