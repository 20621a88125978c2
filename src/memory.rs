/// How much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// Where programs are loaded
pub const PROGRAM_START: u16 = 0x200;

/// Where the built-in hexadecimal glyphs live
pub const FONT_START: u16 = 0x000;

/// Bytes per glyph
pub const FONT_HEIGHT: u16 = 5;

// CHIP-8 fonts consist of 16 characters, each defined by 5 bytes.
pub const FONT_DATA: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4K address space.
///
/// Addresses are masked to 12 bits on every access, so an index register
/// that has run past the end reads and writes the bottom of memory
/// instead of panicking.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        let mut memory = Self {
            bytes: [0; MEMORY_SIZE],
        };

        memory.write_fonts();

        memory
    }
}

impl Memory {
    fn index(address: u16) -> usize {
        address as usize & (MEMORY_SIZE - 1)
    }

    pub fn read(&self, address: u16) -> u8 {
        self.bytes[Self::index(address)]
    }

    pub fn write(&mut self, address: u16, val: u8) {
        self.bytes[Self::index(address)] = val;
    }

    /// Big-endian instruction word at `address`
    pub fn read_word(&self, address: u16) -> u16 {
        let high = self.read(address) as u16;
        let low = self.read(address.wrapping_add(1)) as u16;

        high << 8 | low
    }

    pub fn clear(&mut self) {
        self.bytes = [0; MEMORY_SIZE];
    }

    pub fn write_fonts(&mut self) {
        let start = FONT_START as usize;
        let end = start + FONT_DATA.len();
        self.bytes[start..end].copy_from_slice(&FONT_DATA);
    }

    /// Copy a program image to 0x200, dropping whatever does not fit.
    /// Returns the number of bytes actually loaded.
    pub fn load_program(&mut self, program: &[u8]) -> usize {
        let start = PROGRAM_START as usize;
        let capacity = MEMORY_SIZE - start;
        let len = program.len().min(capacity);

        if program.len() > capacity {
            log::warn!(
                "program is {} bytes, only {} fit in memory; truncating {} bytes",
                program.len(),
                capacity,
                program.len() - capacity
            );
        }

        self.bytes[start..start + len].copy_from_slice(&program[..len]);
        len
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_data_written_correctly() {
        let memory = Memory::default();

        let start = FONT_START as usize;
        let end = start + FONT_DATA.len();
        assert_eq!(&memory.as_slice()[start..end], &FONT_DATA);
        assert!(memory.as_slice()[end..].iter().all(|&b| b == 0));
    }

    #[test]
    fn program_loads_at_0x200() {
        let mut memory = Memory::default();
        let loaded = memory.load_program(&[0x00, 0xE0, 0x12, 0x00]);

        assert_eq!(loaded, 4);
        assert_eq!(memory.read_word(0x200), 0x00E0);
        assert_eq!(memory.read_word(0x202), 0x1200);
    }

    #[test]
    fn oversized_program_is_clamped() {
        let mut memory = Memory::default();
        let program = vec![0xAB; MEMORY_SIZE];
        let loaded = memory.load_program(&program);

        assert_eq!(loaded, MEMORY_SIZE - PROGRAM_START as usize);
        assert_eq!(memory.read(0xFFF), 0xAB);
        // nothing wrapped around onto the font
        assert_eq!(memory.read(FONT_START), FONT_DATA[0]);
    }

    #[test]
    fn addresses_past_the_end_wrap() {
        let mut memory = Memory::default();
        memory.write(0x1003, 0x42);

        assert_eq!(memory.read(0x003), 0x42);
        assert_eq!(memory.read(0x1003), 0x42);
    }

    #[test]
    fn clear_wipes_fonts_too() {
        let mut memory = Memory::default();
        memory.clear();

        assert!(memory.as_slice().iter().all(|&b| b == 0));
    }
}
