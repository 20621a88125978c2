/// Delay and sound countdown timers, both clocked at 60 Hz
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// One 60 Hz tick. Both counters stop at zero.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_floors_at_zero() {
        let mut timers = Timers { delay: 1, sound: 0 };

        timers.tick();
        assert_eq!(timers.delay, 0);

        timers.tick();
        assert_eq!(timers, Timers::default());
    }

    #[test]
    fn timers_count_independently() {
        let mut timers = Timers { delay: 3, sound: 1 };
        timers.tick();

        assert_eq!(timers.delay, 2);
        assert_eq!(timers.sound, 0);
        assert!(!timers.is_sounding());
    }
}
