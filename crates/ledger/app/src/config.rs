//! Configuration of a Ledger application front end

use ledger_apdu_core::{Error, ErrorDescriptions, Result, command::MAX_DATA_LEN};

use crate::constants::{DEFAULT_CHUNK_SIZE, cla, ins};

/// Instruction codes an application answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instructions {
    /// Instruction of the version query
    pub get_version: u8,
}

impl Default for Instructions {
    fn default() -> Self {
        Self {
            get_version: ins::GET_VERSION,
        }
    }
}

/// P1 values shared by address-style commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P1Values {
    /// Only return the value, do not display it
    pub only_retrieve: u8,
    /// Display the address on the device and wait for confirmation
    pub show_address_in_device: u8,
}

impl Default for P1Values {
    fn default() -> Self {
        Self {
            only_retrieve: 0x00,
            show_address_in_device: 0x01,
        }
    }
}

/// Configuration options for [`BaseApp`](crate::BaseApp)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Class byte of the application's own commands
    pub cla: u8,

    /// Instruction codes
    pub ins: Instructions,

    /// P1 values
    pub p1: P1Values,

    /// Maximum number of message bytes per chunk
    pub chunk_size: usize,

    /// Accepted segment counts for derivation paths, empty to accept any
    pub accepted_path_lengths: Vec<usize>,

    /// Application-specific error descriptions, consulted before the static table
    pub custom_errors: ErrorDescriptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(cla::DASHBOARD)
    }
}

impl AppConfig {
    /// Create a configuration for an application using class byte `cla`
    pub fn new(cla: u8) -> Self {
        Self {
            cla,
            ins: Instructions::default(),
            p1: P1Values::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            accepted_path_lengths: Vec::new(),
            custom_errors: ErrorDescriptions::new(),
        }
    }

    /// Set the class byte
    pub const fn with_cla(mut self, cla: u8) -> Self {
        self.cla = cla;
        self
    }

    /// Set the instruction codes
    pub const fn with_instructions(mut self, ins: Instructions) -> Self {
        self.ins = ins;
        self
    }

    /// Set the P1 values
    pub const fn with_p1_values(mut self, p1: P1Values) -> Self {
        self.p1 = p1;
        self
    }

    /// Set the maximum chunk size
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the accepted derivation path lengths
    pub fn with_accepted_path_lengths(mut self, lengths: impl Into<Vec<usize>>) -> Self {
        self.accepted_path_lengths = lengths.into();
        self
    }

    /// Set the application-specific error descriptions
    pub fn with_custom_errors(mut self, errors: ErrorDescriptions) -> Self {
        self.custom_errors = errors;
        self
    }

    /// Check the configuration can drive an exchange
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if `chunk_size` is zero or does not
    /// fit a single short APDU.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be greater than zero"));
        }
        if self.chunk_size > MAX_DATA_LEN {
            return Err(Error::InvalidConfig("chunk size exceeds the APDU data limit"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ledger_apdu_core::ErrorCode;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new(0x06);
        assert_eq!(config.cla, 0x06);
        assert_eq!(config.ins.get_version, 0x00);
        assert_eq!(config.p1.show_address_in_device, 0x01);
        assert_eq!(config.chunk_size, 250);
        assert!(config.accepted_path_lengths.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let mut errors = ErrorDescriptions::new();
        errors.insert(ErrorCode(0x6A8B), "Account not found".to_string());

        let config = AppConfig::default()
            .with_cla(0x55)
            .with_chunk_size(200)
            .with_accepted_path_lengths([3, 5])
            .with_custom_errors(errors.clone());

        assert_eq!(config.cla, 0x55);
        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.accepted_path_lengths, vec![3, 5]);
        assert_eq!(config.custom_errors, errors);
    }

    #[test]
    fn test_validate_chunk_size() {
        assert!(matches!(
            AppConfig::default().with_chunk_size(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AppConfig::default().with_chunk_size(256).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(AppConfig::default().with_chunk_size(255).validate().is_ok());
    }
}
