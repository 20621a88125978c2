use crate::cpu::Cpu;
use crate::error::Error;
use crate::rom::Rom;
use std::time::{Duration, Instant};

/// Timers count down at this rate regardless of the instruction clock
pub const TIMER_HZ: u32 = 60;

/// Historical instruction rate
pub const DEFAULT_RATE_HZ: u32 = 700;

/// Runtime control commands, applied between loop iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    /// Pause (if running), turn tracing on and execute one instruction
    Step,
    /// Reload the program and reinitialise all machine state
    Reset,
    ToggleQuirks,
    ToggleVerbose,
}

/// What a single call to [`Scheduler::tick`] did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub executed: bool,
    pub timers: bool,
}

/// Drives the instruction clock and the 60 Hz timer clock off one
/// monotonic time source.
pub struct Scheduler {
    instruction_interval: Duration,
    timer_interval: Duration,
    last_instruction: Instant,
    last_timer: Instant,
    paused: bool,
    step: bool,
}

impl Scheduler {
    pub fn new(rate_hz: u32, now: Instant) -> Self {
        Self {
            instruction_interval: Duration::from_secs(1) / rate_hz.max(1),
            timer_interval: Duration::from_secs(1) / TIMER_HZ,
            last_instruction: now,
            last_timer: now,
            paused: false,
            step: false,
        }
    }

    #[cfg(test)]
    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// One loop iteration: at most one instruction, at most one timer tick.
    /// Timers keep running while paused.
    pub fn tick(&mut self, cpu: &mut Cpu, now: Instant) -> Result<Tick, Error> {
        let mut tick = Tick::default();

        if now.duration_since(self.last_instruction) >= self.instruction_interval {
            self.last_instruction = now;

            if !self.paused || self.step {
                cpu.step()?;
                self.step = false;
                tick.executed = true;
            }
        }

        if now.duration_since(self.last_timer) >= self.timer_interval {
            self.last_timer = now;
            cpu.tick_timers();
            tick.timers = true;
        }

        Ok(tick)
    }

    pub fn apply(&mut self, command: Command, cpu: &mut Cpu, rom: &mut Rom) -> Result<(), Error> {
        match command {
            Command::TogglePause => {
                log::info!("paused: {} -> {}", self.paused, !self.paused);
                self.paused = !self.paused;
            }
            Command::Step => {
                cpu.set_verbose(true);
                self.paused = true;
                self.step = true;
            }
            Command::Reset => {
                rom.reload()?;
                cpu.reset(&rom.instructions);
            }
            Command::ToggleQuirks => {
                let quirks = cpu.quirks().toggled();
                log::info!("quirks: {:?} -> {:?}", cpu.quirks(), quirks);
                cpu.set_quirks(quirks);
            }
            Command::ToggleVerbose => {
                log::info!("verbose: {} -> {}", cpu.verbose(), !cpu.verbose());
                cpu.set_verbose(!cpu.verbose());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::Quirks;

    const MS: Duration = Duration::from_millis(1);

    // 6001 7001 7001 ... : V0 counts executed adds
    fn counting_cpu() -> Cpu {
        let mut cpu = Cpu::with_seed(Quirks::Modern, Some(3));
        let mut program = vec![0x60, 0x00];
        for _ in 0..64 {
            program.extend([0x70, 0x01]);
        }
        cpu.reset(&program);
        cpu
    }

    #[test]
    fn nothing_fires_before_an_interval_elapses() -> Result<(), Error> {
        let start = Instant::now();
        let mut cpu = counting_cpu();
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        let tick = scheduler.tick(&mut cpu, start)?;
        assert_eq!(tick, Tick::default());
        assert_eq!(cpu.program_counter(), 0x200);
        Ok(())
    }

    #[test]
    fn one_instruction_per_elapsed_interval() -> Result<(), Error> {
        let start = Instant::now();
        let mut cpu = counting_cpu();
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        // 20 ms late still only runs one instruction
        let tick = scheduler.tick(&mut cpu, start + 20 * MS)?;
        assert!(tick.executed && tick.timers);
        assert_eq!(cpu.program_counter(), 0x202);

        let tick = scheduler.tick(&mut cpu, start + 21 * MS)?;
        assert!(!tick.executed && !tick.timers);

        let tick = scheduler.tick(&mut cpu, start + 22 * MS)?;
        assert!(tick.executed && !tick.timers);
        assert_eq!(cpu.program_counter(), 0x204);
        Ok(())
    }

    #[test]
    fn timers_run_while_paused() -> Result<(), Error> {
        let start = Instant::now();
        let mut cpu = counting_cpu();
        let mut rom = Rom::default();
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        cpu.write_instructions_batch(&[(0x200, 0x6002), (0x202, 0xF015)]);
        scheduler.tick(&mut cpu, start + 20 * MS)?;
        scheduler.tick(&mut cpu, start + 22 * MS)?;
        assert_eq!(cpu.timers().delay, 2);

        scheduler.apply(Command::TogglePause, &mut cpu, &mut rom)?;
        let tick = scheduler.tick(&mut cpu, start + 40 * MS)?;
        assert!(!tick.executed && tick.timers);
        assert_eq!(cpu.timers().delay, 1);
        assert_eq!(cpu.program_counter(), 0x204);

        scheduler.tick(&mut cpu, start + 60 * MS)?;
        scheduler.tick(&mut cpu, start + 80 * MS)?;
        assert_eq!(cpu.timers().delay, 0);
        assert_eq!(cpu.program_counter(), 0x204);
        Ok(())
    }

    #[test]
    fn step_runs_exactly_one_instruction() -> Result<(), Error> {
        let start = Instant::now();
        let mut cpu = counting_cpu();
        let mut rom = Rom::default();
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        scheduler.apply(Command::Step, &mut cpu, &mut rom)?;
        assert!(scheduler.paused());
        assert!(cpu.verbose());

        let tick = scheduler.tick(&mut cpu, start + 2 * MS)?;
        assert!(tick.executed);
        let tick = scheduler.tick(&mut cpu, start + 4 * MS)?;
        assert!(!tick.executed);
        assert_eq!(cpu.program_counter(), 0x202);

        scheduler.apply(Command::TogglePause, &mut cpu, &mut rom)?;
        scheduler.tick(&mut cpu, start + 6 * MS)?;
        assert_eq!(cpu.program_counter(), 0x204);
        Ok(())
    }

    #[test]
    fn reset_reloads_the_program() -> Result<(), Error> {
        let start = Instant::now();
        let mut cpu = Cpu::with_seed(Quirks::Modern, Some(3));
        let mut rom = Rom::from_bytes(vec![0x6A, 0x42, 0x12, 0x02]);
        cpu.reset(&rom.instructions);
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        scheduler.tick(&mut cpu, start + 2 * MS)?;
        assert_eq!(cpu.read_register(0xA), Some(0x42));

        scheduler.apply(Command::Reset, &mut cpu, &mut rom)?;
        assert_eq!(cpu.read_register(0xA), Some(0));
        assert_eq!(cpu.program_counter(), 0x200);
        assert_eq!(cpu.read_memory(0x200), 0x6A);
        Ok(())
    }

    #[test]
    fn toggles_flip_cpu_settings() -> Result<(), Error> {
        let mut cpu = counting_cpu();
        let mut rom = Rom::default();
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, Instant::now());

        scheduler.apply(Command::ToggleQuirks, &mut cpu, &mut rom)?;
        assert_eq!(cpu.quirks(), Quirks::Legacy);
        scheduler.apply(Command::ToggleQuirks, &mut cpu, &mut rom)?;
        assert_eq!(cpu.quirks(), Quirks::Modern);

        scheduler.apply(Command::ToggleVerbose, &mut cpu, &mut rom)?;
        assert!(cpu.verbose());
        Ok(())
    }

    #[test]
    fn key_wait_keeps_timers_running() -> Result<(), Error> {
        let start = Instant::now();
        let mut cpu = Cpu::with_seed(Quirks::Modern, Some(3));
        cpu.reset(&[0x60, 0x05, 0xF0, 0x15, 0xF1, 0x0A]);
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        let mut now = start;
        for _ in 0..12 {
            now += 17 * MS;
            scheduler.tick(&mut cpu, now)?;
        }
        assert_eq!(cpu.program_counter(), 0x204);
        assert_eq!(cpu.timers().delay, 0);

        cpu.keypad_mut().key_down(0xE);
        scheduler.tick(&mut cpu, now + 17 * MS)?;
        assert_eq!(cpu.program_counter(), 0x206);
        assert_eq!(cpu.read_register(1), Some(0xE));
        Ok(())
    }

    #[test]
    fn stack_misuse_propagates() {
        let start = Instant::now();
        let mut cpu = Cpu::with_seed(Quirks::Modern, Some(3));
        cpu.reset(&[0x00, 0xEE]);
        let mut scheduler = Scheduler::new(DEFAULT_RATE_HZ, start);

        assert!(matches!(
            scheduler.tick(&mut cpu, start + 2 * MS),
            Err(Error::StackUnderflow)
        ));
    }
}
