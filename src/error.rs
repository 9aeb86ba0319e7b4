//! Error types for the rotor machine core.

use thiserror::Error;

/// Failures raised by the cipher core.
///
/// Every operation that returns one of these leaves the value it was
/// called on unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// A symbol outside the bound alphabet.
    #[error("symbol {0:?} is not in the alphabet")]
    InvalidSymbol(char),

    /// An alphabet listed the same symbol twice.
    #[error("symbol {0:?} appears more than once in the alphabet")]
    DuplicateSymbol(char),

    /// Cycle notation that cannot describe a permutation of the alphabet.
    #[error("malformed cycle: {0}")]
    MalformedCycle(String),

    /// Rotor layout or settings that the machine cannot accept.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, EnigmaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_symbol() {
        let err = EnigmaError::InvalidSymbol('#');
        assert_eq!(format!("{}", err), "symbol '#' is not in the alphabet");
    }

    #[test]
    fn test_display_duplicate_symbol() {
        let err = EnigmaError::DuplicateSymbol('A');
        assert_eq!(
            format!("{}", err),
            "symbol 'A' appears more than once in the alphabet"
        );
    }

    #[test]
    fn test_display_configuration() {
        let err = EnigmaError::InvalidConfiguration("slot 0 must hold a reflector".into());
        assert_eq!(
            format!("{}", err),
            "invalid configuration: slot 0 must hold a reflector"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(EnigmaError::InvalidSymbol('x'), EnigmaError::InvalidSymbol('x'));
        assert_ne!(
            EnigmaError::InvalidSymbol('x'),
            EnigmaError::DuplicateSymbol('x')
        );
    }
}
