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
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use chordpad::config;
use chordpad::controller::{keyboard, Controller};
use chordpad::instrument;
use chordpad::pad;
use chordpad::{ChordPad, Resolver};
use clap::{crate_version, Parser, Subcommand};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A chord pad for MIDI samplers."
)]
struct Cli {
    /// A YAML file merged over the default chord pad configuration.
    #[arg[short, long, global = true]]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the pad grid.
    Pads {},
    /// Lists the instrument names by program number.
    Instruments {},
    /// Lists the available MIDI output devices.
    MidiDevices {},
    /// Prints the effective configuration as YAML.
    Config {},
    /// Plays the chord pad through a MIDI output device, reading commands from stdin.
    Play {
        /// The MIDI output device to play through. Names starting with "mock" make no sound.
        device_name: String,
        /// The program to select instead of the configured one.
        #[arg[short, long]]
        program: Option<u8>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Pads {} => {
            let settings = config::load_settings(config_path)?;
            let resolver = Resolver::new(&settings);

            for row in pad::layout(&settings) {
                let labels: Vec<String> = row
                    .iter()
                    .map(|p| {
                        let label = p.label();
                        match resolver.resolve(p.namespace(), &label) {
                            Ok(_) => format!("{:>6}", label),
                            Err(_) => format!("{:>6}", "-"),
                        }
                    })
                    .collect();
                println!("{}", labels.join(""));
            }
        }
        Commands::Instruments {} => {
            let settings = config::load_settings(config_path)?;

            if settings.instruments().is_empty() {
                println!("No instruments configured.");
                return Ok(());
            }

            println!("Instruments:");
            for (program, name) in settings.instruments().iter().enumerate() {
                println!("- {}: {}", program, name);
            }
        }
        Commands::MidiDevices {} => {
            let devices = instrument::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Config {} => {
            let config = config::load_config(config_path)?;
            // Validate before printing so a broken overlay is reported.
            config.clone().into_settings()?;
            print!("{}", serde_yml::to_string(&config)?);
        }
        Commands::Play {
            device_name,
            program,
        } => {
            let settings = config::load_settings(config_path)?;
            let device = instrument::get_device(&device_name, &settings)?;
            let tonics = settings.tonics().to_vec();

            let pad = Arc::new(ChordPad::new(settings, device));
            if let Some(program) = program {
                pad.select_program(program)?;
            }

            Controller::new(pad, Arc::new(keyboard::Driver::new(tonics))).run()?;
        }
    }

    Ok(())
}
