//! Structural decoder for 7-series configuration bitstreams.
//!
//! The stream is walked with a [`Cursor`]: [`sync::find_sync`] finds the sync
//! word, [`packet::decode_one`] decodes type 1 and type 2 packets,
//! [`locate::locate_type2`] finds the bulk frame data, and [`FrameDumper`]
//! cuts it into frames.  [`Session`] strings these together, and
//! [`explore`] and [`disassemble`] run a whole session in one call.
//!
//! Nothing is validated beyond the packet structure: CRCs are not checked and
//! register writes are not applied anywhere.

pub mod bitswap;
pub mod container;
pub mod cursor;
pub mod error;
pub mod frame;
pub mod locate;
pub mod packet;
pub mod reg;
pub mod sync;
pub mod trace;

pub use container::Container;
pub use cursor::Cursor;
pub use error::DecodeError;
pub use frame::{Frame, FrameDumper};
pub use locate::Type2Region;
pub use packet::{Packet, PacketBody};
pub use trace::{Disassembly, Exploration, Session, disassemble, explore};

pub const SYNC_WORD: u32 = 0xaa995566;
/// Number of byte offsets searched for the sync word.
pub const SYNC_WINDOW: usize = 500;
/// Words per configuration frame.
pub const FRAME_WORDS: usize = 101;
/// Payloads of this many words or more are skipped instead of read.
pub const TRACE_PAYLOAD_LIMIT: u32 = 32;

#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Unknown command words abort the decode instead of ending or being skipped.
    pub strict: bool,
    /// Record the packets preceding the type 2 region.
    pub trace: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(self) -> Self {
        Self {
            strict: true,
            ..self
        }
    }

    pub fn trace(self) -> Self {
        Self {
            trace: true,
            ..self
        }
    }
}
