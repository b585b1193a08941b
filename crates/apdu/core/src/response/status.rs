//! Return codes reported by the device and their descriptions
//!
//! Every reply ends in a two-byte status word. Most values follow ISO/IEC 7816-4,
//! others are device lifecycle states, legacy U2F codes or sentinels used for
//! failures that never reached the device.

use std::collections::HashMap;
use std::fmt;

use tracing::Level;

/// Caller-supplied descriptions that take precedence over the built-in table
pub type ErrorDescriptions = HashMap<ErrorCode, String>;

/// Numeric return code of a device exchange
///
/// Device status words are 16 bits wide. The type is 32 bits wide so that the
/// [`ErrorCode::GENERIC_ERROR`] sentinel fits alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    /// U2F: Unknown
    pub const U2F_UNKNOWN: Self = Self(1);
    /// U2F: Bad request
    pub const U2F_BAD_REQUEST: Self = Self(2);
    /// U2F: Configuration unsupported
    pub const U2F_CONFIGURATION_UNSUPPORTED: Self = Self(3);
    /// U2F: Device ineligible
    pub const U2F_DEVICE_INELIGIBLE: Self = Self(4);
    /// U2F: Timeout
    pub const U2F_TIMEOUT: Self = Self(5);
    /// Timeout
    pub const TIMEOUT: Self = Self(14);
    /// GlobalPlatform authentication failed
    pub const GP_AUTH_FAILED: Self = Self(0x6300);
    /// PIN remaining attempts
    pub const PIN_REMAINING_ATTEMPTS: Self = Self(0x63C0);
    /// Execution error
    pub const EXECUTION_ERROR: Self = Self(0x6400);
    /// Wrong length
    pub const WRONG_LENGTH: Self = Self(0x6700);
    /// Alias of [`Self::WRONG_LENGTH`]
    pub const INCORRECT_LENGTH: Self = Self::WRONG_LENGTH;
    /// Missing critical parameter
    pub const MISSING_CRITICAL_PARAMETER: Self = Self(0x6800);
    /// Error deriving keys
    pub const ERROR_DERIVING_KEYS: Self = Self(0x6802);
    /// Empty buffer
    pub const EMPTY_BUFFER: Self = Self(0x6982);
    /// Alias of [`Self::EMPTY_BUFFER`]
    pub const SECURITY_STATUS_NOT_SATISFIED: Self = Self::EMPTY_BUFFER;
    /// Output buffer too small
    pub const OUTPUT_BUFFER_TOO_SMALL: Self = Self(0x6983);
    /// Data is invalid
    pub const DATA_IS_INVALID: Self = Self(0x6984);
    /// Conditions of use not satisfied
    pub const CONDITIONS_OF_USE_NOT_SATISFIED: Self = Self(0x6985);
    /// Command incompatible with file structure
    pub const COMMAND_INCOMPATIBLE_FILE_STRUCTURE: Self = Self(0x6981);
    /// Transaction rejected
    pub const TRANSACTION_REJECTED: Self = Self(0x6986);
    /// Bad key handle
    pub const BAD_KEY_HANDLE: Self = Self(0x6A80);
    /// Alias of [`Self::BAD_KEY_HANDLE`]
    pub const INCORRECT_DATA: Self = Self::BAD_KEY_HANDLE;
    /// Referenced data not found
    pub const REFERENCED_DATA_NOT_FOUND: Self = Self(0x6A88);
    /// Not enough memory space
    pub const NOT_ENOUGH_MEMORY_SPACE: Self = Self(0x6A84);
    /// File already exists
    pub const FILE_ALREADY_EXISTS: Self = Self(0x6A89);
    /// Invalid P1/P2
    pub const INVALID_P1P2: Self = Self(0x6B00);
    /// Alias of [`Self::INVALID_P1P2`]
    pub const INCORRECT_P1P2: Self = Self::INVALID_P1P2;
    /// Instruction not supported
    pub const INSTRUCTION_NOT_SUPPORTED: Self = Self(0x6D00);
    /// Alias of [`Self::INSTRUCTION_NOT_SUPPORTED`]
    pub const INS_NOT_SUPPORTED: Self = Self::INSTRUCTION_NOT_SUPPORTED;
    /// Unknown APDU
    pub const UNKNOWN_APDU: Self = Self(0x6D02);
    /// Device not onboarded
    pub const DEVICE_NOT_ONBOARDED: Self = Self(0x6D07);
    /// Device not onboarded (secondary code)
    pub const DEVICE_NOT_ONBOARDED_2: Self = Self(0x6611);
    /// Custom image bootloader error
    pub const CUSTOM_IMAGE_BOOTLOADER: Self = Self(0x662F);
    /// Custom image empty
    pub const CUSTOM_IMAGE_EMPTY: Self = Self(0x662E);
    /// App does not seem to be open
    pub const APP_DOES_NOT_SEEM_TO_BE_OPEN: Self = Self(0x6E01);
    /// CLA not supported, returned by dashboard-only commands outside the dashboard
    pub const CLA_NOT_SUPPORTED: Self = Self(0x6E00);
    /// Licensing error
    pub const LICENSING: Self = Self(0x6F42);
    /// Unknown error
    pub const UNKNOWN_ERROR: Self = Self(0x6F00);
    /// Alias of [`Self::UNKNOWN_ERROR`], used for malformed replies
    pub const TECHNICAL_PROBLEM: Self = Self::UNKNOWN_ERROR;
    /// Sign/verify error
    pub const SIGN_VERIFY_ERROR: Self = Self(0x6F01);
    /// Device halted
    pub const HALTED: Self = Self(0x6FAA);
    /// Success
    pub const NO_ERRORS: Self = Self(0x9000);
    /// Device is busy
    pub const DEVICE_IS_BUSY: Self = Self(0x9001);
    /// Transport failure that carried no device status
    pub const UNKNOWN_TRANSPORT_ERROR: Self = Self(0xFFFF);
    /// Access condition not fulfilled
    pub const ACCESS_CONDITION_NOT_FULFILLED: Self = Self(0x9804);
    /// Algorithm not supported
    pub const ALGORITHM_NOT_SUPPORTED: Self = Self(0x9484);
    /// Code blocked
    pub const CODE_BLOCKED: Self = Self(0x9840);
    /// Code not initialized
    pub const CODE_NOT_INITIALIZED: Self = Self(0x9802);
    /// Contradiction invalidation
    pub const CONTRADICTION_INVALIDATION: Self = Self(0x9810);
    /// Contradiction with secret code status
    pub const CONTRADICTION_SECRET_CODE_STATUS: Self = Self(0x9808);
    /// Invalid KCV
    pub const INVALID_KCV: Self = Self(0x9485);
    /// Invalid offset
    pub const INVALID_OFFSET: Self = Self(0x9402);
    /// Device locked
    pub const LOCKED_DEVICE: Self = Self(0x5515);
    /// Maximum value reached
    pub const MAX_VALUE_REACHED: Self = Self(0x9850);
    /// Memory problem
    pub const MEMORY_PROBLEM: Self = Self(0x9240);
    /// No EF selected
    pub const NO_EF_SELECTED: Self = Self(0x9400);
    /// Inconsistent file
    pub const INCONSISTENT_FILE: Self = Self(0x9408);
    /// File not found
    pub const FILE_NOT_FOUND: Self = Self(0x9404);
    /// User refused on device
    pub const USER_REFUSED_ON_DEVICE: Self = Self(0x5501);
    /// Not enough space
    pub const NOT_ENOUGH_SPACE: Self = Self(0x5102);
    /// Failure raised by this library before or outside any exchange
    pub const GENERIC_ERROR: Self = Self(0xFFFF_FFFF);

    /// Create a code from a two-byte status word
    pub const fn from_status_word(sw: u16) -> Self {
        Self(sw as u32)
    }

    /// Create a code from the SW1 and SW2 bytes of a reply
    pub const fn from_bytes(sw1: u8, sw2: u8) -> Self {
        Self(((sw1 as u32) << 8) | (sw2 as u32))
    }

    /// Get the raw numeric value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Check if this code signals success
    pub const fn is_success(&self) -> bool {
        self.0 == Self::NO_ERRORS.0
    }

    /// Get the appropriate tracing level for this code
    pub const fn tracing_level(&self) -> Level {
        if self.is_success() {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }

    /// Look the code up in the built-in description table
    pub const fn description(&self) -> Option<&'static str> {
        let description = match self.0 {
            1 => "U2F: Unknown",
            2 => "U2F: Bad request",
            3 => "U2F: Configuration unsupported",
            4 => "U2F: Device Ineligible",
            5 => "U2F: Timeout",
            14 => "Timeout",
            0x9000 => "No errors",
            0x9001 => "Device is busy",
            0x6802 => "Error deriving keys",
            0x6400 => "Execution Error",
            0x6700 => "Wrong Length",
            0x6982 => "Empty Buffer",
            0x6983 => "Output buffer too small",
            0x6984 => "Data is invalid",
            0x6986 => "Transaction rejected",
            0x6A80 => "Bad key handle",
            0x6B00 => "Invalid P1/P2",
            0x6D00 => "Instruction not supported",
            0x6E01 => "App does not seem to be open",
            0x6F00 => "Unknown error",
            0x6F01 => "Sign/verify error",
            0xFFFF => "Unknown transport error",
            0x6300 => "GP Authentication Failed",
            0x63C0 => "PIN Remaining Attempts",
            0x6800 => "Missing Critical Parameter",
            0x6985 => "Conditions of Use Not Satisfied",
            0x6981 => "Command Incompatible with File Structure",
            0x6A88 => "Referenced Data Not Found",
            0x6A84 => "Not Enough Memory Space",
            0x6A89 => "File Already Exists",
            0x6D02 => "Unknown APDU",
            0x6D07 => "Device Not Onboarded",
            0x6611 => "Device Not Onboarded (Secondary)",
            0x662F => "Custom Image Bootloader Error",
            0x662E => "Custom Image Empty",
            0x6E00 => "CLA Not Supported",
            0x6F42 => "Licensing Error",
            0x6FAA => "Device Halted",
            0x9804 => "Access Condition Not Fulfilled",
            0x9484 => "Algorithm Not Supported",
            0x9840 => "Code Blocked",
            0x9802 => "Code Not Initialized",
            0x9810 => "Contradiction Invalidation",
            0x9808 => "Contradiction with Secret Code Status",
            0x9485 => "Invalid KCV",
            0x9402 => "Invalid Offset",
            0x5515 => "Device Locked",
            0x9850 => "Maximum Value Reached",
            0x9240 => "Memory Problem",
            0x9400 => "No EF Selected",
            0x9408 => "Inconsistent File",
            0x9404 => "File Not Found",
            0x5501 => "User Refused on Device",
            0x5102 => "Not Enough Space",
            0xFFFF_FFFF => "Generic Error",
            _ => return None,
        };
        Some(description)
    }
}

/// Resolve a human-readable description for `code`
///
/// Lookup order is `overrides`, then the built-in table, then a generated
/// `Unknown Return Code: 0x..` string. Never fails.
pub fn describe(code: ErrorCode, overrides: Option<&ErrorDescriptions>) -> String {
    if let Some(custom) = overrides.and_then(|o| o.get(&code)) {
        return custom.clone();
    }

    match code.description() {
        Some(description) => description.to_string(),
        None => format!("Unknown Return Code: {code}"),
    }
}

impl From<u16> for ErrorCode {
    fn from(sw: u16) -> Self {
        Self::from_status_word(sw)
    }
}

impl From<(u8, u8)> for ErrorCode {
    fn from(tuple: (u8, u8)) -> Self {
        Self::from_bytes(tuple.0, tuple.1)
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_bytes() {
        let code = ErrorCode::from_bytes(0x6A, 0x80);
        assert_eq!(code, ErrorCode::BAD_KEY_HANDLE);
        assert_eq!(code, ErrorCode::INCORRECT_DATA);
        assert_eq!(ErrorCode::from(0x9000u16), ErrorCode::NO_ERRORS);
        assert!(ErrorCode::NO_ERRORS.is_success());
        assert!(!ErrorCode::DEVICE_IS_BUSY.is_success());
    }

    #[test]
    fn test_describe_known_codes() {
        assert_eq!(describe(ErrorCode::NO_ERRORS, None), "No errors");
        assert_eq!(describe(ErrorCode::BAD_KEY_HANDLE, None), "Bad key handle");
        assert_eq!(
            describe(ErrorCode::UNKNOWN_TRANSPORT_ERROR, None),
            "Unknown transport error"
        );
        assert_eq!(describe(ErrorCode::GENERIC_ERROR, None), "Generic Error");
    }

    #[test]
    fn test_describe_unknown_code() {
        assert_eq!(
            describe(ErrorCode(0x6A8B), None),
            "Unknown Return Code: 0x6A8B"
        );
    }

    #[test]
    fn test_describe_overrides() {
        let mut overrides = ErrorDescriptions::new();
        overrides.insert(ErrorCode::BAD_KEY_HANDLE, "Wrong account".to_string());
        overrides.insert(ErrorCode(0x6A8B), "Custom app failure".to_string());

        assert_eq!(
            describe(ErrorCode::BAD_KEY_HANDLE, Some(&overrides)),
            "Wrong account"
        );
        assert_eq!(
            describe(ErrorCode(0x6A8B), Some(&overrides)),
            "Custom app failure"
        );
        // codes missing from the overrides still resolve through the table
        assert_eq!(
            describe(ErrorCode::DATA_IS_INVALID, Some(&overrides)),
            "Data is invalid"
        );
    }

    #[test]
    fn test_tracing_level() {
        assert_eq!(ErrorCode::NO_ERRORS.tracing_level(), Level::DEBUG);
        assert_eq!(ErrorCode::TRANSACTION_REJECTED.tracing_level(), Level::WARN);
    }
}
