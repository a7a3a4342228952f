use crate::reg::{BspiCommand, Opcode, Register, RegisterId};
use crate::{Cursor, DecodeError, TRACE_PAYLOAD_LIMIT};

pub const TYPE_MASK: u32 = 0xe0000000;
pub const TYPE1: u32 = 0x20000000;
pub const TYPE2: u32 = 0x40000000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PacketType {
    Type1,
    Type2,
    Unknown,
}

pub fn classify(word: u32) -> PacketType {
    match word & TYPE_MASK {
        TYPE1 => PacketType::Type1,
        TYPE2 => PacketType::Type2,
        _ => PacketType::Unknown,
    }
}

/// The data words following a packet header.
///
/// Short payloads are kept for the trace; anything of [`TRACE_PAYLOAD_LIMIT`]
/// words or more is stepped over without being read.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Payload {
    Words(Vec<u32>),
    Skipped(u32),
}

impl Payload {
    fn consume(cursor: &mut Cursor, count: u32) -> Result<Self, DecodeError> {
        if count < TRACE_PAYLOAD_LIMIT {
            Ok(Payload::Words(cursor.take_words(count as usize)?))
        } else {
            cursor.advance(count)?;
            Ok(Payload::Skipped(count))
        }
    }

    pub fn words(&self) -> &[u32] {
        match self {
            Payload::Words(words) => words,
            Payload::Skipped(_) => &[],
        }
    }

    /// The last word actually read, if any.
    pub fn last(&self) -> Option<u32> {
        self.words().last().copied()
    }
}

/// Derived facts about a type 1 packet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Note {
    UnknownRegister(u32),
    /// Non-zero bits above the 5-bit register code.
    ReservedRegisterBits(u32),
    /// Words of ciphertext stepped over after the payload.
    CiphertextSkip(u32),
    /// CIPHERTEXT access without a payload word to take the length from.
    CiphertextLengthMissing,
    BspiRead(BspiCommand),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Type1Packet {
    pub opcode: Opcode,
    pub reg: RegisterId,
    // bits 13..=5 of the register field
    pub reserved: u32,
    pub count: u32,
    pub payload: Payload,
    pub notes: Vec<Note>,
}

impl Type1Packet {
    pub fn register_field(&self) -> u32 {
        self.reserved << 5 | self.reg.code()
    }

    pub fn encode(&self) -> u32 {
        TYPE1 | self.opcode.bits() << 27 | self.register_field() << 13 | self.count
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Type2Packet {
    pub count: u32,
    pub payload: Payload,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PacketBody {
    Type1(Type1Packet),
    Type2(Type2Packet),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Packet {
    /// Byte offset of the command word.
    pub offset: usize,
    pub word: u32,
    pub body: PacketBody,
}

/// Decodes the packet at the cursor and leaves the cursor past it.
///
/// An unrecognised command word is consumed and reported as
/// [`DecodeError::UnknownPacketType`].
pub fn decode_one(cursor: &mut Cursor) -> Result<Packet, DecodeError> {
    let offset = cursor.pos();
    let word = cursor.take_word()?;
    let body = match classify(word) {
        PacketType::Type1 => PacketBody::Type1(decode_type1(cursor, word)?),
        PacketType::Type2 => {
            let count = word & 0x3ffffff;
            let payload = Payload::consume(cursor, count)?;
            PacketBody::Type2(Type2Packet { count, payload })
        }
        PacketType::Unknown => return Err(DecodeError::UnknownPacketType { offset, word }),
    };
    log::debug!("0x{offset:x}: {word:08x} {body:?}");
    Ok(Packet { offset, word, body })
}

fn decode_type1(cursor: &mut Cursor, word: u32) -> Result<Type1Packet, DecodeError> {
    let opcode = Opcode::from_bits(word >> 27);
    let field = word >> 13 & 0x3fff;
    let reg = RegisterId::from_code(field);
    let reserved = field >> 5;
    let count = word & 0x7ff;
    let mut notes = vec![];
    if reserved != 0 {
        notes.push(Note::ReservedRegisterBits(reserved));
    }
    let payload = Payload::consume(cursor, count)?;
    if opcode.is_access() {
        match reg {
            RegisterId::Unknown(code) => {
                log::debug!("access to unknown register 0b{code:05b}");
                notes.push(Note::UnknownRegister(code));
            }
            RegisterId::Known(Register::Ciphertext) => match payload.last() {
                Some(len) => {
                    cursor.advance(len)?;
                    notes.push(Note::CiphertextSkip(len));
                }
                None => {
                    log::warn!(
                        "CIPHERTEXT {opcode} of {count} words has no length word, nothing skipped"
                    );
                    notes.push(Note::CiphertextLengthMissing);
                }
            },
            RegisterId::Known(Register::Bspi) => {
                if let Some(cmd) = payload.last().and_then(BspiCommand::from_opcode) {
                    notes.push(Note::BspiRead(cmd));
                }
            }
            RegisterId::Known(_) => (),
        }
    }
    Ok(Type1Packet {
        opcode,
        reg,
        reserved,
        count,
        payload,
        notes,
    })
}

/// Walks packets one after another until the buffer runs out or decoding fails.
#[derive(Debug, Clone)]
pub struct PacketParser<'a> {
    cursor: Cursor<'a>,
    failed: bool,
}

impl<'a> PacketParser<'a> {
    pub fn new(cursor: Cursor<'a>) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }

    pub fn peek(&self) -> Option<Result<Packet, DecodeError>> {
        self.clone().next()
    }

    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }
}

impl Iterator for PacketParser<'_> {
    type Item = Result<Packet, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_exhausted() {
            return None;
        }
        let res = decode_one(&mut self.cursor);
        self.failed = res.is_err();
        Some(res)
    }
}
