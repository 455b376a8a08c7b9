use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

use crate::constants::KEY_COUNT;

/// # Keyboard
/// The pressed status of the 16 keys (0..F) of the hexadecimal keypad.
///
/// Keys are atomic flags so an input thread can press and release keys through a shared
/// handle while the CPU reads them from another thread.
/// Key codes outside of 0..F are never pressed.
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: [AtomicBool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit code of the key that was pressed
    pub fn press(&self, key: u8) {
        self.set(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit code of the key that was released
    pub fn release(&self, key: u8) {
        self.set(key, false);
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys
            .get(key as usize)
            .map_or(false, |k| k.load(Ordering::Relaxed))
    }

    /// Returns the lowest pressed key, if any
    pub fn first_pressed(&self) -> Option<u8> {
        (0..KEY_COUNT as u8).find(|&key| self.is_pressed(key))
    }

    /// Releases every key
    pub fn clear(&self) {
        for key in self.keys.iter() {
            key.store(false, Ordering::Relaxed);
        }
    }

    fn set(&self, key: u8, pressed: bool) {
        match self.keys.get(key as usize) {
            Some(k) => k.store(pressed, Ordering::Relaxed),
            None => warn!("ignoring key code {:#04X} outside of the keypad", key),
        }
    }
}
