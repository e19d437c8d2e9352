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
use std::{error::Error, fmt};

use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use midly::{
    live::LiveEvent,
    num::{u4, u7},
    MidiMessage,
};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::Settings;

/// An instrument behind a MIDI output port, e.g. a hardware or software sampler.
pub struct Device {
    name: String,
    connection: Mutex<MidiOutputConnection>,
    channel: u4,
    velocity: u7,
}

impl Device {
    /// Writes the message to the output port on the configured channel.
    fn send(&self, message: MidiMessage) {
        let event = LiveEvent::Midi {
            channel: self.channel,
            message,
        };

        debug!(
            device = self.name,
            event = format!("{:?}", event),
            "Emitting event."
        );

        // Choosing 8 here because that's what nodi does.
        let mut buf: Vec<u8> = Vec::with_capacity(8);
        if let Err(e) = event.write(&mut buf) {
            error!(err = format!("{:?}", e), "Error encoding MIDI event.");
            return;
        }

        if let Err(e) = self.connection.lock().send(&buf) {
            error!(
                device = self.name,
                err = format!("{:?}", e),
                "Error sending MIDI event."
            );
        }
    }
}

impl super::Instrument for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn note_on(&self, pitch: u7) {
        self.send(MidiMessage::NoteOn {
            key: pitch,
            vel: self.velocity,
        });
    }

    fn note_off(&self, pitch: u7) {
        self.send(MidiMessage::NoteOff {
            key: pitch,
            vel: u7::from(0),
        });
    }

    fn select_program(&self, program: u7) {
        info!(
            device = self.name,
            program = program.as_int(),
            "Selecting program."
        );
        self.send(MidiMessage::ProgramChange { program });
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Output, channel {})", self.name, self.channel.as_int() + 1)
    }
}

/// Lists the names of the MIDI output ports.
pub fn list() -> Result<Vec<String>, Box<dyn Error>> {
    let output = MidiOutput::new("chordpad output listing")?;

    let mut names = output
        .ports()
        .iter()
        .map(|port| output.port_name(port))
        .collect::<Result<Vec<String>, _>>()?;
    names.sort();
    Ok(names)
}

/// Gets the output port whose name contains the given name and connects to it.
pub fn get(name: &str, settings: &Settings) -> Result<Device, Box<dyn Error>> {
    let output = MidiOutput::new("chordpad output")?;

    let mut matches: Vec<(String, MidiOutputPort)> = Vec::new();
    for port in output.ports() {
        let port_name = output.port_name(&port)?;
        if port_name.contains(name) {
            matches.push((port_name, port));
        }
    }

    if matches.is_empty() {
        return Err(format!("no device found with name {}", name).into());
    }
    if matches.len() > 1 {
        return Err(format!(
            "found too many devices that match ({}), use a less ambiguous device name",
            matches
                .iter()
                .map(|(port_name, _)| port_name.clone())
                .collect::<Vec<String>>()
                .join(", ")
        )
        .into());
    }

    // We've verified that there's only one element in the vector, so this should be safe.
    let (port_name, port) = matches.swap_remove(0);
    let connection = output.connect(&port, "chordpad")?;
    info!(device = port_name, "Connected to MIDI output.");

    Ok(Device {
        name: port_name,
        connection: Mutex::new(connection),
        channel: settings.channel(),
        velocity: settings.velocity(),
    })
}
