use crate::DecodeError;

/// The file flavours a configuration stream comes wrapped in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Container {
    /// Bitgen `.bit` file; the header is skipped by the sync scan.
    Bit,
    /// Flash image with a fixed leading header.
    Bin,
    /// Decrypted payload of an encrypted image, starting right at the packet stream.
    Decrypted,
}

impl Container {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "bit" => Some(Container::Bit),
            "bin" => Some(Container::Bin),
            "clr" => Some(Container::Decrypted),
            _ => None,
        }
    }

    pub fn header_len(self) -> usize {
        match self {
            Container::Bit => 0,
            Container::Bin => 0x34,
            Container::Decrypted => 0x40,
        }
    }

    pub fn footer_len(self) -> usize {
        match self {
            Container::Decrypted => 0xa0,
            _ => 0,
        }
    }

    pub fn needs_sync(self) -> bool {
        self != Container::Decrypted
    }

    pub fn strip(self, data: &[u8]) -> Result<&[u8], DecodeError> {
        let needed = self.header_len() + self.footer_len();
        if data.len() < needed {
            return Err(DecodeError::ContainerTooShort {
                len: data.len(),
                needed,
            });
        }
        Ok(&data[self.header_len()..data.len() - self.footer_len()])
    }
}
