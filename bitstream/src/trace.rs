use std::fmt;
use std::io;

use crate::bitswap::{BitWidth, bitswap_word};
use crate::locate::{locate_type2, locate_type2_traced};
use crate::packet::{Note, PacketParser, Payload};
use crate::sync::{SyncStatus, sync};
use crate::{
    Container, Cursor, DecodeError, DecodeOptions, Frame, FrameDumper, Packet, PacketBody,
    Type2Region,
};

/// One decode session over a configuration stream.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    cursor: Cursor<'a>,
    options: DecodeOptions,
    sync: SyncStatus,
}

impl<'a> Session<'a> {
    /// Strips the container envelope and, where the container has one, syncs.
    pub fn open(
        data: &'a [u8],
        container: Container,
        options: DecodeOptions,
    ) -> Result<Self, DecodeError> {
        let stream = container.strip(data)?;
        let mut cursor = Cursor::new(stream);
        let sync = if container.needs_sync() {
            sync(&mut cursor)?
        } else {
            SyncStatus::NotScanned
        };
        Ok(Self {
            cursor,
            options,
            sync,
        })
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync
    }

    /// Finds the bulk type 2 region; with tracing on, the packets before it come along.
    pub fn locate(&mut self) -> Result<(Vec<Packet>, Type2Region), DecodeError> {
        if self.options.trace {
            locate_type2_traced(&mut self.cursor, &self.options)
        } else {
            Ok((vec![], locate_type2(&mut self.cursor)?))
        }
    }

    pub fn frames(self, region: Type2Region) -> FrameDumper<'a> {
        FrameDumper::new(self.cursor, region)
    }

    /// Decodes packets until the stream ends or a packet fails to decode.
    ///
    /// The walk always hands back what it decoded; [`Disassembly::error`]
    /// says whether the stop should fail the caller.
    pub fn disassemble(self) -> Disassembly {
        let mut packets = vec![];
        let mut stopped_at = None;
        for res in PacketParser::new(self.cursor) {
            match res {
                Ok(packet) => packets.push(packet),
                Err(e) => {
                    log::warn!("{e}, stopping");
                    stopped_at = Some(e);
                }
            }
        }
        Disassembly {
            sync: self.sync,
            packets,
            stopped_at,
            strict: self.options.strict,
        }
    }
}

/// The result of a full packet walk.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Disassembly {
    pub sync: SyncStatus,
    pub packets: Vec<Packet>,
    /// The error that ended the walk early, if any.
    pub stopped_at: Option<DecodeError>,
    pub strict: bool,
}

impl Disassembly {
    /// The stop that fails the walk: anything fatal, and in strict mode an unknown packet too.
    pub fn error(&self) -> Option<&DecodeError> {
        self.stopped_at
            .as_ref()
            .filter(|e| self.strict || !e.is_recoverable())
    }

    pub fn dump(&self, o: &mut dyn io::Write) -> io::Result<()> {
        if let SyncStatus::Found(pos) = self.sync {
            writeln!(o, "position: {pos}")?;
        }
        for packet in &self.packets {
            write!(o, "{packet}")?;
        }
        if let Some(ref e @ DecodeError::UnknownPacketType { .. }) = self.stopped_at {
            writeln!(o, "UNKNOWN TYPE ({e})")?;
        }
        Ok(())
    }
}

/// Everything a traced run over the frame data turns up.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Exploration {
    pub sync: SyncStatus,
    /// Packets before the type 2 region; empty unless tracing.
    pub packets: Vec<Packet>,
    pub region: Type2Region,
    pub frames: Vec<Frame>,
    /// The partial frame at the end of the region, if any.
    pub remainder: Option<DecodeError>,
}

/// Syncs, locates the type 2 region and collects its frames.
pub fn explore(
    data: &[u8],
    container: Container,
    options: DecodeOptions,
) -> Result<Exploration, DecodeError> {
    let mut session = Session::open(data, container, options)?;
    let sync = session.sync_status();
    let (packets, region) = session.locate()?;
    let mut frames = vec![];
    let mut remainder = None;
    for res in session.frames(region) {
        match res {
            Ok(frame) => frames.push(frame),
            Err(e @ DecodeError::AnomalousFrameRemainder { .. }) => remainder = Some(e),
            Err(e) => return Err(e),
        }
    }
    Ok(Exploration {
        sync,
        packets,
        region,
        frames,
        remainder,
    })
}

/// Walks every packet from the sync point.  Only opening the container can fail here;
/// a stop partway through is left in the returned [`Disassembly`].
pub fn disassemble(
    data: &[u8],
    container: Container,
    options: DecodeOptions,
) -> Result<Disassembly, DecodeError> {
    Ok(Session::open(data, container, options)?.disassemble())
}

fn write_payload(f: &mut fmt::Formatter<'_>, payload: &Payload) -> fmt::Result {
    match payload {
        Payload::Words(words) => {
            for word in words {
                writeln!(f, "  0x{word:08x}")?;
            }
        }
        Payload::Skipped(n) => writeln!(f, "...skipped {n} words...")?,
    }
    Ok(())
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:08x}", self.word)?;
        match self.body {
            PacketBody::Type1(ref pkt) => {
                if pkt.opcode.is_access() {
                    writeln!(f, "{}: {} len: {}", pkt.opcode, pkt.reg, pkt.count)?;
                } else {
                    writeln!(f, "{}", pkt.opcode)?;
                }
                for note in &pkt.notes {
                    match *note {
                        Note::UnknownRegister(code) => {
                            writeln!(f, "  unknown address: 0b{code:05b}")?
                        }
                        Note::ReservedRegisterBits(bits) => {
                            writeln!(f, "  reserved register bits: 0x{bits:x}")?
                        }
                        _ => (),
                    }
                }
                write_payload(f, &pkt.payload)?;
                for note in &pkt.notes {
                    match *note {
                        Note::CiphertextSkip(n) => {
                            writeln!(f, "...skipping {n} words of ciphertext...")?
                        }
                        Note::CiphertextLengthMissing => {
                            writeln!(f, "...no ciphertext length word, nothing skipped...")?
                        }
                        Note::BspiRead(cmd) => writeln!(f, "  {}", cmd.description())?,
                        _ => (),
                    }
                }
            }
            PacketBody::Type2(ref pkt) => {
                writeln!(f, "Type2")?;
                write_payload(f, &pkt.payload)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Type2Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Position 0x{:x} starts type 2 run of frames of length {}",
            self.start, self.words
        )
    }
}

/// A frame rendered as one comma-separated line, optionally bit-reversed per word.
pub struct FrameLine<'a> {
    pub frame: &'a Frame,
    pub width: BitWidth,
}

impl Frame {
    pub fn line(&self, width: BitWidth) -> FrameLine<'_> {
        FrameLine { frame: self, width }
    }
}

impl fmt::Display for FrameLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x},", self.frame.index)?;
        for &word in &self.frame.words {
            write!(f, " 0x{:08x},", bitswap_word(word, self.width))?;
        }
        Ok(())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line(BitWidth::None))
    }
}
