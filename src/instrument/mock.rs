// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, sync::Arc};

use midly::num::u7;
use parking_lot::Mutex;
use tracing::info;

/// A call received by the mock instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    NoteOn(u8),
    NoteOff(u8),
    Program(u8),
}

/// A mock instrument. Doesn't actually play anything, it records every call.
#[derive(Clone)]
pub struct Device {
    name: String,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Gets every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Gets the pitches of every note on received so far, in order.
    pub fn note_ons(&self) -> Vec<u8> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::NoteOn(pitch) => Some(*pitch),
                _ => None,
            })
            .collect()
    }

    /// Gets the pitches of every note off received so far, in order.
    pub fn note_offs(&self) -> Vec<u8> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::NoteOff(pitch) => Some(*pitch),
                _ => None,
            })
            .collect()
    }

    /// Forgets every recorded call.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl super::Instrument for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn note_on(&self, pitch: u7) {
        self.calls.lock().push(Call::NoteOn(pitch.as_int()));
    }

    fn note_off(&self, pitch: u7) {
        self.calls.lock().push(Call::NoteOff(pitch.as_int()));
    }

    fn select_program(&self, program: u7) {
        info!(device = self.name, program = program.as_int(), "Selecting program.");
        self.calls.lock().push(Call::Program(program.as_int()));
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
