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

//! A chord pad instrument.
//!
//! A grid of chord and bass pads drives an instrument through a polyphonic
//! note tracker, which makes sure every pitch is started at most once and
//! every started pitch is eventually stopped.

pub mod config;
pub mod controller;
pub mod instrument;
pub mod pad;
pub mod resolver;
pub mod tracker;

pub use instrument::Instrument;
pub use pad::{ChordPad, Pad, PadError};
pub use resolver::{Namespace, ResolveError, Resolver};
pub use tracker::{Tracker, TrackerError};
