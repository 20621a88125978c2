pub const KEY_COUNT: usize = 16;

/// Pressed state of the 16-key hex pad, indexed 0x0..=0xF
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    #[cfg(test)]
    pub fn key_down(&mut self, key: u8) {
        self.keys[key as usize & 0xF] = true;
    }

    #[cfg(test)]
    pub fn key_up(&mut self, key: u8) {
        self.keys[key as usize & 0xF] = false;
    }

    /// Replace the whole state with a fresh snapshot from the input source
    pub fn set_state(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    // Only the low nibble of a register names a key.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[key as usize & 0xF]
    }

    /// Lowest-numbered key currently held
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }

    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pressed_prefers_lowest_key() {
        let mut keypad = Keypad::default();
        assert_eq!(keypad.first_pressed(), None);

        keypad.key_down(0xB);
        keypad.key_down(0x4);
        assert_eq!(keypad.first_pressed(), Some(0x4));

        keypad.key_up(0x4);
        assert_eq!(keypad.first_pressed(), Some(0xB));
    }

    #[test]
    fn register_values_use_low_nibble() {
        let mut keypad = Keypad::default();
        keypad.key_down(0x3);

        assert!(keypad.is_pressed(0x13));
        assert!(!keypad.is_pressed(0x14));
    }
}
