//! Constants shared by every Ledger application
//!
//! Class and instruction bytes for the commands every app and the dashboard
//! answer, plus the derivation path flag.

use ledger_apdu_core::ErrorCode;

/// Bit 31 of a path word, set for hardened indices
pub const HARDENED: u32 = 0x8000_0000;

/// Default maximum chunk size for multi-round commands
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// Command classes
pub mod cla {
    /// Class of the app-info command answered by the OS
    pub const APP_INFO: u8 = 0xB0;
    /// Class of the device-info command answered by the dashboard
    pub const DASHBOARD: u8 = 0xE0;
}

/// Instruction codes
pub mod ins {
    /// GET VERSION, the same for every app
    pub const GET_VERSION: u8 = 0x00;
    /// GET APP INFO
    pub const APP_INFO: u8 = 0x01;
    /// GET DEVICE INFO
    pub const DEVICE_INFO: u8 = 0x01;
}

/// Status words a chunk exchange hands back instead of raising in the transport
pub const CHUNK_ACCEPTED_CODES: [ErrorCode; 3] = [
    ErrorCode::NO_ERRORS,
    ErrorCode::DATA_IS_INVALID,
    ErrorCode::BAD_KEY_HANDLE,
];

/// Status words the device-info command hands back
pub const DEVICE_INFO_ACCEPTED_CODES: [ErrorCode; 2] =
    [ErrorCode::NO_ERRORS, ErrorCode::CLA_NOT_SUPPORTED];

/// Message reported when device info is requested from inside an app
pub const DASHBOARD_ONLY_MESSAGE: &str = "This command is only available in the Dashboard";

/// Format identifier of the app-info reply
pub const APP_INFO_FORMAT_ID: u8 = 1;
