use std::fmt;

/// Configuration registers addressable by a type 1 packet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Register {
    Crc,
    Far,
    Fdri,
    Fdro,
    Cmd,
    Ctl0,
    Mask,
    Stat,
    Lout,
    Cor0,
    Mfwr,
    Cbc,
    Idcode,
    Axss,
    Cor1,
    WbStar,
    Timer,
    BootSts,
    Ctl1,
    Ciphertext,
    Bspi,
}

const REGISTERS: [Option<Register>; 32] = {
    let mut table = [None; 32];
    table[0x00] = Some(Register::Crc);
    table[0x01] = Some(Register::Far);
    table[0x02] = Some(Register::Fdri);
    table[0x03] = Some(Register::Fdro);
    table[0x04] = Some(Register::Cmd);
    table[0x05] = Some(Register::Ctl0);
    table[0x06] = Some(Register::Mask);
    table[0x07] = Some(Register::Stat);
    table[0x08] = Some(Register::Lout);
    table[0x09] = Some(Register::Cor0);
    table[0x0a] = Some(Register::Mfwr);
    table[0x0b] = Some(Register::Cbc);
    table[0x0c] = Some(Register::Idcode);
    table[0x0d] = Some(Register::Axss);
    table[0x0e] = Some(Register::Cor1);
    table[0x10] = Some(Register::WbStar);
    table[0x11] = Some(Register::Timer);
    table[0x16] = Some(Register::BootSts);
    table[0x18] = Some(Register::Ctl1);
    table[0x1a] = Some(Register::Ciphertext);
    table[0x1f] = Some(Register::Bspi);
    table
};

impl Register {
    pub fn code(self) -> u32 {
        match self {
            Register::Crc => 0x00,
            Register::Far => 0x01,
            Register::Fdri => 0x02,
            Register::Fdro => 0x03,
            Register::Cmd => 0x04,
            Register::Ctl0 => 0x05,
            Register::Mask => 0x06,
            Register::Stat => 0x07,
            Register::Lout => 0x08,
            Register::Cor0 => 0x09,
            Register::Mfwr => 0x0a,
            Register::Cbc => 0x0b,
            Register::Idcode => 0x0c,
            Register::Axss => 0x0d,
            Register::Cor1 => 0x0e,
            Register::WbStar => 0x10,
            Register::Timer => 0x11,
            Register::BootSts => 0x16,
            Register::Ctl1 => 0x18,
            Register::Ciphertext => 0x1a,
            Register::Bspi => 0x1f,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::Crc => "CRC",
            Register::Far => "FAR",
            Register::Fdri => "FDRI",
            Register::Fdro => "FDRO",
            Register::Cmd => "CMD",
            Register::Ctl0 => "CTL0",
            Register::Mask => "MASK",
            Register::Stat => "STAT",
            Register::Lout => "LOUT",
            Register::Cor0 => "COR0",
            Register::Mfwr => "MFWR",
            Register::Cbc => "CBC",
            Register::Idcode => "IDCODE",
            Register::Axss => "AXSS",
            Register::Cor1 => "COR1",
            Register::WbStar => "WBSTAR",
            Register::Timer => "TIMER",
            Register::BootSts => "BOOTSTS",
            Register::Ctl1 => "CTL1",
            Register::Ciphertext => "CIPHERTEXT",
            Register::Bspi => "BSPI",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 5-bit register code, resolved through the symbol table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RegisterId {
    Known(Register),
    Unknown(u32),
}

impl RegisterId {
    /// Only the low 5 bits of `code` are looked at.
    pub fn from_code(code: u32) -> Self {
        let code = code & 0x1f;
        match REGISTERS[code as usize] {
            Some(reg) => RegisterId::Known(reg),
            None => RegisterId::Unknown(code),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            RegisterId::Known(reg) => reg.code(),
            RegisterId::Unknown(code) => code,
        }
    }

    pub fn is(self, reg: Register) -> bool {
        self == RegisterId::Known(reg)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterId::Known(reg) => write!(f, "{reg}"),
            RegisterId::Unknown(_) => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    Nop,
    Read,
    Write,
    Reserved,
}

impl Opcode {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Opcode::Nop,
            1 => Opcode::Read,
            2 => Opcode::Write,
            _ => Opcode::Reserved,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Opcode::Nop => 0,
            Opcode::Read => 1,
            Opcode::Write => 2,
            Opcode::Reserved => 3,
        }
    }

    pub fn is_access(self) -> bool {
        matches!(self, Opcode::Read | Opcode::Write)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Opcode::Nop => "NOP",
            Opcode::Read => "Read",
            Opcode::Write => "Write",
            Opcode::Reserved => "Reserved",
        })
    }
}

/// SPI flash read commands selectable through the BSPI register.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BspiCommand {
    FastRead,
    DualOutputFastRead,
    QuadOutputFastRead,
    FastRead4B,
    DualOutputFastRead4B,
    QuadOutputFastRead4B,
}

impl BspiCommand {
    pub fn from_opcode(opcode: u32) -> Option<Self> {
        match opcode {
            0x0b => Some(BspiCommand::FastRead),
            0x3b => Some(BspiCommand::DualOutputFastRead),
            0x6b => Some(BspiCommand::QuadOutputFastRead),
            0x0c => Some(BspiCommand::FastRead4B),
            0x3c => Some(BspiCommand::DualOutputFastRead4B),
            0x6c => Some(BspiCommand::QuadOutputFastRead4B),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BspiCommand::FastRead => "Fast read x1",
            BspiCommand::DualOutputFastRead => "Dual output fast read",
            BspiCommand::QuadOutputFastRead => "Quad output fast read",
            BspiCommand::FastRead4B => "Fast read, 32-bit addresses",
            BspiCommand::DualOutputFastRead4B => "Dual output fast read, 32-bit addresses",
            BspiCommand::QuadOutputFastRead4B => "Quad output fast read, 32-bit addresses",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_codes() {
        let mut known = 0;
        for code in 0..32 {
            match RegisterId::from_code(code) {
                RegisterId::Known(reg) => {
                    assert_eq!(reg.code(), code);
                    known += 1;
                }
                RegisterId::Unknown(raw) => assert_eq!(raw, code),
            }
        }
        assert_eq!(known, 21);
    }

    #[test]
    fn names() {
        assert_eq!(RegisterId::from_code(0).to_string(), "CRC");
        assert_eq!(RegisterId::from_code(2).to_string(), "FDRI");
        assert_eq!(RegisterId::from_code(0x1a).to_string(), "CIPHERTEXT");
        assert_eq!(RegisterId::from_code(0x1f).to_string(), "BSPI");
        for code in [15, 18, 19, 20, 21, 23, 25, 27, 28, 29, 30] {
            assert_eq!(RegisterId::from_code(code), RegisterId::Unknown(code));
            assert_eq!(RegisterId::from_code(code).to_string(), "UNKNOWN");
        }
    }

    #[test]
    fn opcodes() {
        assert_eq!(Opcode::from_bits(0), Opcode::Nop);
        assert_eq!(Opcode::from_bits(2), Opcode::Write);
        for bits in 0..4 {
            assert_eq!(Opcode::from_bits(bits).bits(), bits);
        }
        assert!(Opcode::Read.is_access());
        assert!(!Opcode::Reserved.is_access());
    }

    #[test]
    fn bspi_table() {
        assert_eq!(BspiCommand::from_opcode(0x6b), Some(BspiCommand::QuadOutputFastRead));
        assert_eq!(
            BspiCommand::from_opcode(0x0c).map(BspiCommand::description),
            Some("Fast read, 32-bit addresses")
        );
        assert_eq!(BspiCommand::from_opcode(0x03), None);
    }
}
