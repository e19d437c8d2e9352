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
use std::{error::Error, fmt, sync::Arc};

use midly::num::u7;

use crate::config::Settings;

mod midir;
mod mock;

pub use mock::{Call, Device as MockDevice};

/// An instrument that renders notes. Failures are absorbed and logged by the
/// instrument itself; callers never see them.
pub trait Instrument: fmt::Display + std::marker::Send + std::marker::Sync {
    /// Returns the name of the instrument.
    fn name(&self) -> String;

    /// Starts sounding the given pitch at the configured velocity.
    fn note_on(&self, pitch: u7);

    /// Stops sounding the given pitch.
    fn note_off(&self, pitch: u7);

    /// Changes the active program (timbre).
    fn select_program(&self, program: u7);
}

/// Lists the MIDI output ports known to midir.
pub fn list_devices() -> Result<Vec<String>, Box<dyn Error>> {
    midir::list()
}

/// Gets an instrument with the given name. Names starting with "mock" produce
/// a recording instrument that makes no sound.
pub fn get_device(name: &str, settings: &Settings) -> Result<Arc<dyn Instrument>, Box<dyn Error>> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(name)));
    };

    Ok(Arc::new(midir::get(name, settings)?))
}
