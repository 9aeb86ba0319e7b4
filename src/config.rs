//! Machine description files and settings lines.
//!
//! A configuration file is a stream of whitespace-separated tokens:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I     MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! Beta  N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B     R    (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ```
//!
//! The alphabet comes first, then the slot and pawl counts, then any number
//! of rotors. A rotor is a name, a type (`R` reflector, `N` fixed, or `M`
//! followed by its notches) and the cycles of its wiring.
//!
//! A settings line picks the rotors for the next messages:
//!
//! ```text
//! * B Beta III IV I AXLE [RING] (HQ) (EX) (IP) (TR) (BY)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::alphabet::Alphabet;
use crate::catalogue::RotorCatalogue;
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Characters reserved by the file format.
const RESERVED: [char; 3] = ['*', '(', ')'];

/// Errors produced while reading configurations and settings lines.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file truncated")]
    Truncated,

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("bad settings line: {0}")]
    Settings(String),

    #[error("no rotor named {0}")]
    UnknownRotor(String),

    #[error(transparent)]
    Engine(#[from] EnigmaError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything needed to build machines of one kind.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    num_rotors: usize,
    pawls: usize,
    catalogue: Arc<RotorCatalogue>,
}

impl MachineConfig {
    /// Checks that `catalogue` can fill `num_rotors` slots, `pawls` of them
    /// with moving rotors.
    pub fn new(
        num_rotors: usize,
        pawls: usize,
        catalogue: RotorCatalogue,
    ) -> std::result::Result<Self, EnigmaError> {
        if num_rotors == 0 || pawls >= num_rotors {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "cannot fit {pawls} pawls in {num_rotors} slots"
            )));
        }
        if catalogue.len() < num_rotors {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "{num_rotors} slots but only {} rotors",
                catalogue.len()
            )));
        }
        if catalogue.moving_count() < pawls {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "{pawls} pawls but only {} moving rotors",
                catalogue.moving_count()
            )));
        }
        Ok(MachineConfig {
            num_rotors,
            pawls,
            catalogue: Arc::new(catalogue),
        })
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.catalogue.alphabet()
    }

    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    pub fn pawls(&self) -> usize {
        self.pawls
    }

    pub fn catalogue(&self) -> &Arc<RotorCatalogue> {
        &self.catalogue
    }

    /// A fresh machine sharing this configuration's catalogue.
    pub fn build(&self) -> std::result::Result<Machine, EnigmaError> {
        Machine::new(
            self.alphabet().clone(),
            self.num_rotors,
            self.pawls,
            self.catalogue.clone(),
        )
    }
}

impl FromStr for MachineConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let (line, alpha) = tokens.next_token().ok_or(ConfigError::Truncated)?;
        if alpha.contains(RESERVED) {
            return Err(ConfigError::Syntax {
                line,
                message: format!("alphabet {alpha:?} uses a reserved character"),
            });
        }
        let alphabet = Arc::new(Alphabet::new(alpha)?);

        let num_rotors = tokens.count("slot count")?;
        let pawls = tokens.count("pawl count")?;

        let mut catalogue = RotorCatalogue::new(alphabet.clone());
        while let Some((line, name)) = tokens.next_token() {
            let rotor = read_rotor(&mut tokens, line, name, &alphabet)?;
            if catalogue.contains(rotor.name()) {
                return Err(ConfigError::Syntax {
                    line,
                    message: format!("rotor {name} defined twice"),
                });
            }
            if rotor.reflecting() && !rotor.permutation().is_derangement() {
                warn!(rotor = name, "reflector wiring has fixed points");
            }
            catalogue.insert(rotor)?;
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            pawls,
            rotors = catalogue.len(),
            "configuration loaded"
        );
        Ok(MachineConfig::new(num_rotors, pawls, catalogue)?)
    }
}

/// Reads the type and wiring of the rotor called `name`.
fn read_rotor(
    tokens: &mut Tokens<'_>,
    line: usize,
    name: &str,
    alphabet: &Arc<Alphabet>,
) -> Result<Rotor> {
    if name.contains(RESERVED) {
        return Err(ConfigError::Syntax {
            line,
            message: format!("expected a rotor name, found {name:?}"),
        });
    }
    let (line, kind) = tokens.next_token().ok_or(ConfigError::Truncated)?;

    let mut cycles = String::new();
    while let Some(cycle) = tokens.next_cycle() {
        cycles.push_str(cycle);
    }
    let wiring = Permutation::new(&cycles, alphabet.clone())?;

    let mut chars = kind.chars();
    let tag = chars.next();
    let notches = chars.as_str();
    match tag {
        Some('R') if notches.is_empty() => Ok(Rotor::reflector(name, wiring)),
        Some('N') if notches.is_empty() => Ok(Rotor::fixed(name, wiring)),
        Some('M') if !notches.is_empty() => Ok(Rotor::moving(name, wiring, notches)?),
        Some('R') | Some('N') => Err(ConfigError::Syntax {
            line,
            message: format!("rotor {name} cannot have notches"),
        }),
        Some('M') => Err(ConfigError::Syntax {
            line,
            message: format!("moving rotor {name} has no notches"),
        }),
        _ => Err(ConfigError::Syntax {
            line,
            message: format!("unknown rotor type {kind:?} for {name}"),
        }),
    }
}

/// Whitespace-separated tokens tagged with their 1-based line number.
struct Tokens<'a> {
    items: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let items = text
            .lines()
            .enumerate()
            .flat_map(|(n, l)| l.split_whitespace().map(move |t| (n + 1, t)))
            .collect();
        Tokens { items, pos: 0 }
    }

    fn next_token(&mut self) -> Option<(usize, &'a str)> {
        let item = self.items.get(self.pos).copied();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    /// The next token if it opens a cycle.
    fn next_cycle(&mut self) -> Option<&'a str> {
        match self.items.get(self.pos) {
            Some(&(_, t)) if t.starts_with('(') => {
                self.pos += 1;
                Some(t)
            }
            _ => None,
        }
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        let (line, token) = self.next_token().ok_or(ConfigError::Truncated)?;
        token.parse().map_err(|_| ConfigError::Syntax {
            line,
            message: format!("expected {what}, found {token:?}"),
        })
    }
}

/// A parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    rotors: Vec<String>,
    setting: String,
    ring: Option<String>,
    plugboard: Vec<String>,
}

impl Settings {
    /// True iff `line` is a settings line rather than a message.
    pub fn is_settings_line(line: &str) -> bool {
        line.starts_with('*')
    }

    /// Parses `line` for a machine with `num_rotors` slots.
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let body = line
            .strip_prefix('*')
            .ok_or_else(|| ConfigError::Settings("must start with '*'".into()))?;
        let mut tokens = body.split_whitespace().peekable();

        let rotors: Vec<String> = tokens.by_ref().take(num_rotors).map(String::from).collect();
        if rotors.len() != num_rotors {
            return Err(ConfigError::Settings(format!(
                "names {} rotors, expected {num_rotors}",
                rotors.len()
            )));
        }
        // A lone reflector has no window, so its setting is empty.
        let (setting, ring) = if num_rotors == 1 {
            (String::new(), None)
        } else {
            let setting = tokens
                .next()
                .ok_or_else(|| ConfigError::Settings("missing rotor setting".into()))?
                .to_string();
            let ring = tokens
                .next_if(|t| !t.starts_with('('))
                .map(String::from);
            (setting, ring)
        };

        let mut plugboard = Vec::new();
        for t in tokens {
            if !t.starts_with('(') {
                return Err(ConfigError::Settings(format!(
                    "expected a plugboard cycle, found {t:?}"
                )));
            }
            plugboard.push(t.to_string());
        }

        Ok(Settings {
            rotors,
            setting,
            ring,
            plugboard,
        })
    }

    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    pub fn setting(&self) -> &str {
        &self.setting
    }

    pub fn ring(&self) -> Option<&str> {
        self.ring.as_deref()
    }

    pub fn plugboard(&self) -> &[String] {
        &self.plugboard
    }

    /// Installs the rotors, positions and plugboard on `machine`.
    ///
    /// The machine is only changed if every step succeeds. The plugboard
    /// is rebuilt from the line's cycles, replacing any earlier one.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        if let Some(name) = self
            .rotors
            .iter()
            .find(|n| !machine.catalogue().contains(n))
        {
            return Err(ConfigError::UnknownRotor(name.clone()));
        }

        let mut staged = machine.clone();
        staged.insert_rotors(self.rotors.as_slice())?;
        staged.set_rotors(&self.setting)?;
        if let Some(ring) = &self.ring {
            staged.set_rotor_ring(ring)?;
        }
        let mut plugboard = Permutation::identity(staged.alphabet().clone());
        for cycle in &self.plugboard {
            plugboard.add_cycle(cycle)?;
        }
        staged.set_plugboard(plugboard)?;

        *machine = staged;
        Ok(())
    }
}
