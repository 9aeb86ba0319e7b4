//! Enigma-class rotor cipher machine simulator.
//!
//! A [`Machine`] passes each symbol through a plugboard, a stack of rotors
//! and a reflector, then back out through the rotors and the plugboard.
//! Rotors step before every symbol, including the double step of the
//! middle rotor, so the same symbol enciphers differently each time.
//!
//! # Architecture
//!
//! ```text
//! Alphabet      (ordered symbols, index <-> symbol)
//!     |
//! Permutation   (cycle notation, precomputed forward/inverse tables)
//!     |
//! Rotor         (Reflector | Fixed | Moving, setting and ring offsets)
//!     |
//! RotorCatalogue (shared, read-only set of available rotors)
//!     |
//! Machine       (slots, pawls, plugboard, stepping, conversion)
//! ```
//!
//! [`config`] reads machine descriptions and settings lines, and
//! [`session`] drives a machine over a line-based message stream.
//!
//! # Examples
//!
//! The army machine with rotors I, II and III under reflector B:
//!
//! ```
//! use enigma_rotor::historical;
//!
//! let mut m = historical::army_config().unwrap().build().unwrap();
//! m.insert_rotors(&["B", "I", "II", "III"]).unwrap();
//! m.set_rotors("AAA").unwrap();
//! assert_eq!(m.convert("AAAAA").unwrap(), "BDZGO");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod historical;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;

pub use alphabet::Alphabet;
pub use catalogue::RotorCatalogue;
pub use config::{ConfigError, MachineConfig, Settings};
pub use error::EnigmaError;
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
pub use session::{format_groups, Session, SessionError};
