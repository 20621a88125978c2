use std::fmt;

/// A decoded CHIP-8 instruction.
///
/// `x` and `y` are register indices, `nn` an 8-bit immediate, `nnn` a
/// 12-bit address and `n` the 4-bit sprite height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// (00e0) CLS clear the display
    Cls,
    /// (00ee) RET return from the current sub-routine
    Ret,
    /// (1nnn) JP jump to `nnn`
    Jump { nnn: u16 },
    /// (2nnn) CALL sub-routine at `nnn`
    Call { nnn: u16 },
    /// (3xnn) SE skip if `vx` equals `nn`
    SkipEqImm { x: u8, nn: u8 },
    /// (4xnn) SNE skip if `vx` does not equal `nn`
    SkipNeImm { x: u8, nn: u8 },
    /// (5xy0) SE skip if `vx` equals `vy`
    SkipEqReg { x: u8, y: u8 },
    /// (6xnn) LD `vx` = `nn`
    LoadImm { x: u8, nn: u8 },
    /// (7xnn) ADD `vx` += `nn`, no carry
    AddImm { x: u8, nn: u8 },
    /// (8xy0) LD `vx` = `vy`
    Move { x: u8, y: u8 },
    /// (8xy1) OR
    Or { x: u8, y: u8 },
    /// (8xy2) AND
    And { x: u8, y: u8 },
    /// (8xy3) XOR
    Xor { x: u8, y: u8 },
    /// (8xy4) ADD with carry into `vf`
    AddReg { x: u8, y: u8 },
    /// (8xy5) SUB `vx` - `vy`, `vf` = no borrow
    Sub { x: u8, y: u8 },
    /// (8xy6) SHR, `vf` = shifted-out bit
    ShiftRight { x: u8, y: u8 },
    /// (8xy7) SUBN `vy` - `vx`, `vf` = no borrow
    SubReverse { x: u8, y: u8 },
    /// (8xye) SHL, `vf` = shifted-out bit
    ShiftLeft { x: u8, y: u8 },
    /// (9xy0) SNE skip if `vx` does not equal `vy`
    SkipNeReg { x: u8, y: u8 },
    /// (annn) LD I = `nnn`
    LoadIndex { nnn: u16 },
    /// (bnnn) JP with offset; which register is added depends on quirks
    JumpOffset { x: u8, nnn: u16 },
    /// (cxnn) RND `vx` = random & `nn`
    Random { x: u8, nn: u8 },
    /// (dxyn) DRW `n`-row sprite at (`vx`, `vy`)
    Draw { x: u8, y: u8, n: u8 },
    /// (ex9e) SKP skip if key `vx` is down
    SkipKeyDown { x: u8 },
    /// (exa1) SKNP skip if key `vx` is up
    SkipKeyUp { x: u8 },
    /// (fx07) LD `vx` = delay timer
    ReadDelay { x: u8 },
    /// (fx0a) LD `vx` = key, re-polled until one is down
    WaitKey { x: u8 },
    /// (fx15) LD delay timer = `vx`
    SetDelay { x: u8 },
    /// (fx18) LD sound timer = `vx`
    SetSound { x: u8 },
    /// (fx1e) ADD I += `vx`
    AddIndex { x: u8 },
    /// (fx29) LD I = glyph for the low nibble of `vx`
    FontChar { x: u8 },
    /// (fx33) BCD of `vx` at I..I+3
    Bcd { x: u8 },
    /// (fx55) store `v0..=vx` at I
    Store { x: u8 },
    /// (fx65) load `v0..=vx` from I
    Load { x: u8 },
    /// Anything else; executes as a no-op
    Unknown(u16),
}

impl Opcode {
    pub fn decode(opcode: u16) -> Self {
        // Var, Bit-length, Location,                  Description,
        // n    4           low byte, low nibble       Sprite height
        // x    4           high byte, low nibble      CPU register
        // y    4           low byte, high nibble      CPU register
        // c    4           high byte, high nibble     Opcode group
        // nn   8           low byte, both nibbles     Integer
        // nnn  12          high byte, low nibble      Memory address
        //                and low byte, both nibbles
        let c = ((opcode & 0xF000) >> 12) as u8;
        let x = ((opcode & 0x0F00) >> 8) as u8;
        let y = ((opcode & 0x00F0) >> 4) as u8;
        let n = (opcode & 0x000F) as u8;
        let nn = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;

        match (c, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Opcode::Cls,
            (0x0, 0x0, 0xE, 0xE) => Opcode::Ret,
            (0x1, _, _, _) => Opcode::Jump { nnn },
            (0x2, _, _, _) => Opcode::Call { nnn },
            (0x3, _, _, _) => Opcode::SkipEqImm { x, nn },
            (0x4, _, _, _) => Opcode::SkipNeImm { x, nn },
            (0x5, _, _, _) => Opcode::SkipEqReg { x, y },
            (0x6, _, _, _) => Opcode::LoadImm { x, nn },
            (0x7, _, _, _) => Opcode::AddImm { x, nn },
            (0x8, _, _, 0x0) => Opcode::Move { x, y },
            (0x8, _, _, 0x1) => Opcode::Or { x, y },
            (0x8, _, _, 0x2) => Opcode::And { x, y },
            (0x8, _, _, 0x3) => Opcode::Xor { x, y },
            (0x8, _, _, 0x4) => Opcode::AddReg { x, y },
            (0x8, _, _, 0x5) => Opcode::Sub { x, y },
            (0x8, _, _, 0x6) => Opcode::ShiftRight { x, y },
            (0x8, _, _, 0x7) => Opcode::SubReverse { x, y },
            (0x8, _, _, 0xE) => Opcode::ShiftLeft { x, y },
            (0x9, _, _, _) => Opcode::SkipNeReg { x, y },
            (0xA, _, _, _) => Opcode::LoadIndex { nnn },
            (0xB, _, _, _) => Opcode::JumpOffset { x, nnn },
            (0xC, _, _, _) => Opcode::Random { x, nn },
            (0xD, _, _, _) => Opcode::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Opcode::SkipKeyDown { x },
            (0xE, _, 0xA, 0x1) => Opcode::SkipKeyUp { x },
            (0xF, _, 0x0, 0x7) => Opcode::ReadDelay { x },
            (0xF, _, 0x0, 0xA) => Opcode::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Opcode::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Opcode::SetSound { x },
            (0xF, _, 0x1, 0xE) => Opcode::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Opcode::FontChar { x },
            (0xF, _, 0x3, 0x3) => Opcode::Bcd { x },
            (0xF, _, 0x5, 0x5) => Opcode::Store { x },
            (0xF, _, 0x6, 0x5) => Opcode::Load { x },
            _ => Opcode::Unknown(opcode),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Opcode::Cls => write!(f, "CLS"),
            Opcode::Ret => write!(f, "RET"),
            Opcode::Jump { nnn } => write!(f, "JP {:#05x}", nnn),
            Opcode::Call { nnn } => write!(f, "CALL {:#05x}", nnn),
            Opcode::SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:#04x}", x, nn),
            Opcode::SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:#04x}", x, nn),
            Opcode::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Opcode::LoadImm { x, nn } => write!(f, "LD V{:X}, {:#04x}", x, nn),
            Opcode::AddImm { x, nn } => write!(f, "ADD V{:X}, {:#04x}", x, nn),
            Opcode::Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Opcode::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Opcode::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Opcode::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Opcode::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Opcode::Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Opcode::ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Opcode::SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Opcode::ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Opcode::SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Opcode::LoadIndex { nnn } => write!(f, "LD I, {:#05x}", nnn),
            Opcode::JumpOffset { nnn, .. } => write!(f, "JP V0/VX, {:#05x}", nnn),
            Opcode::Random { x, nn } => write!(f, "RND V{:X}, {:#04x}", x, nn),
            Opcode::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Opcode::SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            Opcode::SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            Opcode::ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Opcode::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Opcode::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Opcode::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Opcode::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Opcode::FontChar { x } => write!(f, "LD F, V{:X}", x),
            Opcode::Bcd { x } => write!(f, "LD B, V{:X}", x),
            Opcode::Store { x } => write!(f, "LD [I], V{:X}", x),
            Opcode::Load { x } => write!(f, "LD V{:X}, [I]", x),
            Opcode::Unknown(word) => write!(f, "??? {:04x}", word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_operand_fields() {
        assert_eq!(Opcode::decode(0x1ABC), Opcode::Jump { nnn: 0xABC });
        assert_eq!(Opcode::decode(0x3A42), Opcode::SkipEqImm { x: 0xA, nn: 0x42 });
        assert_eq!(Opcode::decode(0xD125), Opcode::Draw { x: 1, y: 2, n: 5 });
        assert_eq!(Opcode::decode(0xB3FF), Opcode::JumpOffset { x: 3, nnn: 0x3FF });
        assert_eq!(Opcode::decode(0xF733), Opcode::Bcd { x: 7 });
    }

    #[test]
    fn arithmetic_family_uses_low_nibble() {
        assert_eq!(Opcode::decode(0x8014), Opcode::AddReg { x: 0, y: 1 });
        assert_eq!(Opcode::decode(0x8AB6), Opcode::ShiftRight { x: 0xA, y: 0xB });
        assert_eq!(Opcode::decode(0x812E), Opcode::ShiftLeft { x: 1, y: 2 });
        assert_eq!(Opcode::decode(0x8128), Opcode::Unknown(0x8128));
    }

    #[test]
    fn unlisted_encodings_are_unknown() {
        for word in [0x0000, 0x0123, 0x00E1, 0xE19F, 0xF0FF, 0xF10B] {
            assert_eq!(Opcode::decode(word), Opcode::Unknown(word));
        }
    }

    #[test]
    fn register_compare_ignores_low_nibble() {
        assert_eq!(Opcode::decode(0x5121), Opcode::SkipEqReg { x: 1, y: 2 });
        assert_eq!(Opcode::decode(0x9120), Opcode::SkipNeReg { x: 1, y: 2 });
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Opcode::decode(0x6A0F).to_string(), "LD VA, 0x0f");
        assert_eq!(Opcode::decode(0x00EE).to_string(), "RET");
    }
}
