use crate::error::Error;
use crate::keypad::KEY_COUNT;
use crate::scheduler::Command;
use minifb::{Key, KeyRepeat, Window};
use std::sync::{Arc, Mutex};
use tinyaudio::prelude::*;

/// Loudness of the sound timer tone
pub const TONE_VOLUME: f32 = 0.15;

const TONE_HZ: f32 = 440.0;

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
fn keypad_index(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

fn control_command(key: Key) -> Option<Command> {
    match key {
        Key::P => Some(Command::TogglePause),
        Key::N => Some(Command::Step),
        Key::O => Some(Command::Reset),
        Key::M => Some(Command::ToggleQuirks),
        Key::I => Some(Command::ToggleVerbose),
        _ => None,
    }
}

/// Snapshot of which hex keys are held right now
pub fn keypad_state(keys: &[Key]) -> [bool; KEY_COUNT] {
    let mut state = [false; KEY_COUNT];
    for &key in keys {
        if let Some(index) = keypad_index(key) {
            state[index] = true;
        }
    }
    state
}

pub fn read_keypad(window: &Window) -> [bool; KEY_COUNT] {
    keypad_state(&window.get_keys())
}

/// Control keys pressed since the last window update
pub fn read_commands(window: &Window) -> Vec<Command> {
    window
        .get_keys_pressed(KeyRepeat::No)
        .into_iter()
        .filter_map(control_command)
        .collect()
}

pub fn prepare_audio(volume: Arc<Mutex<f32>>) -> Result<OutputDevice, Error> {
    let params = OutputDeviceParameters {
        channels_count: 2,
        sample_rate: 44100,
        channel_sample_count: 4410,
    };

    let device = run_output_device(params, {
        let vol_clone = Arc::clone(&volume);
        let mut clock = 0f32;
        move |data| {
            // a poisoned lock means the emulator thread is gone; stay silent
            let vol = vol_clone.lock().map(|v| *v).unwrap_or(0.0);
            for samples in data.chunks_mut(params.channels_count) {
                clock = (clock + 1.0) % params.sample_rate as f32;
                let value =
                    (clock * TONE_HZ * 2.0 * std::f32::consts::PI / params.sample_rate as f32).sin();
                for sample in samples {
                    *sample = value * vol;
                }
            }
        }
    })
    .map_err(|e| Error::Audio(format!("Audio error: {}", e)))?;

    Ok(device)
}
