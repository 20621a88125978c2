use crate::display::{Display, HEIGHT, WIDTH};
use crate::error::Error;
use crate::keypad::Keypad;
use crate::memory::{Memory, FONT_HEIGHT, FONT_START, PROGRAM_START};
use crate::opcode::Opcode;
use crate::stack::CallStack;
use crate::timer::Timers;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which of the two historical readings of the ambiguous instructions to use.
///
/// | Opcode    | Legacy                      | Modern             |
/// |-----------|-----------------------------|--------------------|
/// | 8xy6/8xye | `vx = vy` before shifting   | shift `vx` in place|
/// | bnnn      | jump to `nnn + v0`          | jump to `nnn + vx` |
/// | fx1e      | `vf` untouched              | `vf = 1` past 0xfff|
/// | fx55/fx65 | I advances per register     | I unchanged        |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quirks {
    Legacy,
    Modern,
}

impl Quirks {
    pub fn toggled(self) -> Self {
        match self {
            Quirks::Legacy => Quirks::Modern,
            Quirks::Modern => Quirks::Legacy,
        }
    }
}

pub struct Cpu {
    registers: [u8; 16],
    memory: Memory,
    stack: CallStack,
    display: Display,
    keypad: Keypad,
    timers: Timers,
    index_register: u16,
    program_counter: u16,
    quirks: Quirks,
    verbose: bool,
    redraw: bool,
    rng: StdRng,
}

impl Cpu {
    pub fn new(quirks: Quirks, rng: StdRng) -> Self {
        Self {
            registers: [0; 16],
            memory: Memory::default(),
            stack: CallStack::default(),
            display: Display::default(),
            keypad: Keypad::default(),
            timers: Timers::default(),
            index_register: 0,
            program_counter: PROGRAM_START,
            quirks,
            verbose: false,
            redraw: true,
            rng,
        }
    }

    pub fn with_seed(quirks: Quirks, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(quirks, rng)
    }

    /// Zero every piece of machine state, restore the font and load
    /// `program` at 0x200. Quirk and verbose settings survive.
    pub fn reset(&mut self, program: &[u8]) {
        self.memory.clear();
        self.display.clear();
        self.keypad.clear();
        self.stack.clear();
        self.timers.clear();
        self.registers = [0; 16];
        self.program_counter = PROGRAM_START;
        self.index_register = 0;
        self.memory.write_fonts();
        let loaded = self.memory.load_program(program);
        self.redraw = true;

        log::info!("loaded {} byte program at {:#05x}", loaded, PROGRAM_START);
    }

    fn read_opcode(&self) -> u16 {
        self.memory.read_word(self.program_counter)
    }

    /// Fetch, decode and execute exactly one instruction.
    pub fn step(&mut self) -> Result<Opcode, Error> {
        let word = self.read_opcode();
        let opcode = Opcode::decode(word);

        if self.verbose {
            log::info!(
                "pc={:#05x} i={:#05x} v={:02x?} op={:04x} {}",
                self.program_counter,
                self.index_register,
                self.registers,
                word,
                opcode
            );
        }

        self.program_counter = self.program_counter.wrapping_add(2);
        self.execute(opcode)?;

        Ok(opcode)
    }

    fn execute(&mut self, opcode: Opcode) -> Result<(), Error> {
        match opcode {
            Opcode::Cls => self.cls(),
            Opcode::Ret => self.ret()?,
            Opcode::Jump { nnn } => self.program_counter = nnn,
            Opcode::Call { nnn } => self.call(nnn)?,
            Opcode::SkipEqImm { x, nn } => self.skip_if(self.v(x) == nn),
            Opcode::SkipNeImm { x, nn } => self.skip_if(self.v(x) != nn),
            Opcode::SkipEqReg { x, y } => self.skip_if(self.v(x) == self.v(y)),
            Opcode::LoadImm { x, nn } => self.set_v(x, nn),
            Opcode::AddImm { x, nn } => self.set_v(x, self.v(x).wrapping_add(nn)),
            Opcode::Move { x, y } => self.set_v(x, self.v(y)),
            Opcode::Or { x, y } => self.set_v(x, self.v(x) | self.v(y)),
            Opcode::And { x, y } => self.set_v(x, self.v(x) & self.v(y)),
            Opcode::Xor { x, y } => self.set_v(x, self.v(x) ^ self.v(y)),
            Opcode::AddReg { x, y } => self.add_xy(x, y),
            Opcode::Sub { x, y } => self.sub_xy(x, y),
            Opcode::ShiftRight { x, y } => self.shr(x, y),
            Opcode::SubReverse { x, y } => self.subn_xy(x, y),
            Opcode::ShiftLeft { x, y } => self.shl(x, y),
            Opcode::SkipNeReg { x, y } => self.skip_if(self.v(x) != self.v(y)),
            Opcode::LoadIndex { nnn } => self.index_register = nnn,
            Opcode::JumpOffset { x, nnn } => self.jmp_offset(x, nnn),
            Opcode::Random { x, nn } => {
                let byte: u8 = self.rng.gen();
                self.set_v(x, byte & nn);
            }
            Opcode::Draw { x, y, n } => self.drw(x, y, n),
            Opcode::SkipKeyDown { x } => self.skip_if(self.keypad.is_pressed(self.v(x))),
            Opcode::SkipKeyUp { x } => self.skip_if(!self.keypad.is_pressed(self.v(x))),
            Opcode::ReadDelay { x } => self.set_v(x, self.timers.delay),
            Opcode::WaitKey { x } => self.wait_key(x),
            Opcode::SetDelay { x } => self.timers.delay = self.v(x),
            Opcode::SetSound { x } => self.timers.sound = self.v(x),
            Opcode::AddIndex { x } => self.add_index(x),
            Opcode::FontChar { x } => {
                self.index_register = (self.v(x) & 0xF) as u16 * FONT_HEIGHT + FONT_START;
            }
            Opcode::Bcd { x } => self.bcd(x),
            Opcode::Store { x } => self.store(x),
            Opcode::Load { x } => self.load(x),
            Opcode::Unknown(word) => {
                if self.verbose {
                    log::warn!("invalid instruction {:04x}", word);
                } else {
                    log::debug!("invalid instruction {:04x}", word);
                }
            }
        }

        Ok(())
    }

    fn v(&self, x: u8) -> u8 {
        self.registers[x as usize]
    }

    fn set_v(&mut self, x: u8, val: u8) {
        self.registers[x as usize] = val;
    }

    // Flag writes land after the result so vf as a destination keeps the flag.
    fn set_flag(&mut self, flag: bool) {
        self.registers[0xF] = flag as u8;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// (00e0) CLS clear the display
    fn cls(&mut self) {
        if self.verbose {
            log::info!("clearing display");
        }
        self.display.clear();
        self.redraw = true;
    }

    /// (2nnn) CALL sub-routine at `addr`
    fn call(&mut self, addr: u16) -> Result<(), Error> {
        self.stack.push(self.program_counter)?;
        self.program_counter = addr;
        Ok(())
    }

    /// (00ee) RET return from the current sub-routine
    fn ret(&mut self) -> Result<(), Error> {
        self.program_counter = self.stack.pop()?;
        Ok(())
    }

    /// (8xy4) Add one registers contents to another registers contents
    fn add_xy(&mut self, x: u8, y: u8) {
        let (val, overflow) = self.v(x).overflowing_add(self.v(y));
        self.set_v(x, val);
        self.set_flag(overflow);
    }

    /// (8xy5) `vx` - `vy`
    fn sub_xy(&mut self, x: u8, y: u8) {
        let (a, b) = (self.v(x), self.v(y));
        self.set_v(x, a.wrapping_sub(b));
        self.set_flag(a >= b);
    }

    /// (8xy7) `vy` - `vx`
    fn subn_xy(&mut self, x: u8, y: u8) {
        let (a, b) = (self.v(x), self.v(y));
        self.set_v(x, b.wrapping_sub(a));
        self.set_flag(b >= a);
    }

    /// (8xy6)
    fn shr(&mut self, x: u8, y: u8) {
        if self.quirks == Quirks::Legacy {
            self.set_v(x, self.v(y));
        }
        let val = self.v(x);
        self.set_v(x, val >> 1);
        self.set_flag(val & 1 == 1);
    }

    /// (8xye)
    fn shl(&mut self, x: u8, y: u8) {
        if self.quirks == Quirks::Legacy {
            self.set_v(x, self.v(y));
        }
        let val = self.v(x);
        self.set_v(x, val << 1);
        self.set_flag((val >> 7) & 1 == 1);
    }

    /// (bnnn / bxnn)
    fn jmp_offset(&mut self, x: u8, nnn: u16) {
        let offset = match self.quirks {
            Quirks::Legacy => self.v(0),
            Quirks::Modern => self.v(x),
        };
        self.program_counter = nnn + offset as u16;
    }

    /// (dxyn) draw `n` rows of sprite data from I at (`vx`, `vy`)
    fn drw(&mut self, x: u8, y: u8, n: u8) {
        let px = self.v(x) as usize % WIDTH;
        let py = self.v(y) as usize % HEIGHT;

        if self.verbose {
            log::info!("draw {}x{} sprite at ({}, {})", 8, n, px, py);
        }

        let mut sprite = [0u8; 15];
        for (row, byte) in sprite.iter_mut().enumerate().take(n as usize) {
            *byte = self.memory.read(self.index_register.wrapping_add(row as u16));
        }

        let collision = self.display.draw_sprite(px, py, &sprite[..n as usize]);
        self.set_flag(collision);
        self.redraw = true;
    }

    /// (fx0a) busy-poll: without a key down, rewind so this runs again
    fn wait_key(&mut self, x: u8) {
        if self.verbose {
            log::info!("keypad: {:?}", self.keypad);
        }

        match self.keypad.first_pressed() {
            Some(key) => self.set_v(x, key),
            None => self.program_counter = self.program_counter.wrapping_sub(2),
        }
    }

    /// (fx1e)
    fn add_index(&mut self, x: u8) {
        let sum = self.index_register.wrapping_add(self.v(x) as u16);
        if self.quirks == Quirks::Modern && sum > 0xFFF {
            self.registers[0xF] = 1;
        }
        self.index_register = sum;
    }

    /// (fx33) hundreds, tens and ones of `vx` at I, I+1, I+2
    fn bcd(&mut self, x: u8) {
        let val = self.v(x);
        let i = self.index_register;
        self.memory.write(i, val / 100);
        self.memory.write(i.wrapping_add(1), (val / 10) % 10);
        self.memory.write(i.wrapping_add(2), val % 10);
    }

    /// (fx55)
    fn store(&mut self, x: u8) {
        for reg in 0..=x {
            let addr = self.index_register.wrapping_add(reg as u16);
            self.memory.write(addr, self.v(reg));
        }
        if self.quirks == Quirks::Legacy {
            self.index_register = self.index_register.wrapping_add(x as u16 + 1);
        }
    }

    /// (fx65)
    fn load(&mut self, x: u8) {
        for reg in 0..=x {
            let addr = self.index_register.wrapping_add(reg as u16);
            self.set_v(reg, self.memory.read(addr));
        }
        if self.quirks == Quirks::Legacy {
            self.index_register = self.index_register.wrapping_add(x as u16 + 1);
        }
    }

    /// One 60 Hz timer tick
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn timers(&self) -> Timers {
        self.timers
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn set_quirks(&mut self, quirks: Quirks) {
        self.quirks = quirks;
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// True once after the display changed
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }
}

// Host-side inspection used by the unit tests
#[cfg(test)]
impl Cpu {
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn index_register(&self) -> u16 {
        self.index_register
    }

    pub fn read_register(&self, address: u8) -> Option<u8> {
        self.registers.get(address as usize).copied()
    }

    pub fn write_register(&mut self, address: u8, val: u8) -> Result<(), Error> {
        let register = self
            .registers
            .get_mut(address as usize)
            .ok_or(Error::InvalidRegister(address))?;
        *register = val;
        Ok(())
    }

    pub fn read_memory(&self, address: u16) -> u8 {
        self.memory.read(address)
    }

    pub fn write_memory(&mut self, address: u16, val: u8) {
        self.memory.write(address, val);
    }

    /// Write 16-bit instruction words, high byte first
    pub fn write_instructions_batch(&mut self, instructions: &[(u16, u16)]) {
        for &(address, word) in instructions {
            let [high, low] = word.to_be_bytes();
            self.write_memory(address, high);
            self.write_memory(address.wrapping_add(1), low);
        }
    }
}
