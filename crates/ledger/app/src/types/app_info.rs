use ledger_apdu_core::response::ascii_lossy;
use ledger_apdu_core::{Error, ResponsePayload, Result};

use crate::constants::APP_INFO_FORMAT_ID;

const FLAG_RECOVERY: u8 = 0x01;
const FLAG_SIGNED_MCU_CODE: u8 = 0x02;
const FLAG_ONBOARDED: u8 = 0x04;
const FLAG_PIN_VALIDATED: u8 = 0x80;

/// Name, version and state flags of the running application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// Application name
    pub app_name: String,
    /// Application version string
    pub app_version: String,
    /// Length of the flags field as reported by the device
    pub flags_len: u8,
    /// Raw flags byte, zero when the field is empty
    pub flags_value: u8,
    /// Device is in recovery mode
    pub flag_recovery: bool,
    /// MCU code is signed
    pub flag_signed_mcu_code: bool,
    /// Device is onboarded
    pub flag_onboarded: bool,
    /// PIN has been validated
    pub flag_pin_validated: bool,
}

impl TryFrom<&[u8]> for AppInfo {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        let mut payload = ResponsePayload::new(data);

        if payload.read_u8()? != APP_INFO_FORMAT_ID {
            return Err(Error::technical_problem("Format ID not recognized"));
        }

        let app_name = ascii_lossy(payload.read_length_prefixed()?);
        let app_version = ascii_lossy(payload.read_length_prefixed()?);

        let flags = payload.read_length_prefixed()?;
        let flags_len = flags.len() as u8;
        let flags_value = flags.first().copied().unwrap_or_default();

        Ok(Self {
            app_name,
            app_version,
            flags_len,
            flags_value,
            flag_recovery: flags_value & FLAG_RECOVERY != 0,
            flag_signed_mcu_code: flags_value & FLAG_SIGNED_MCU_CODE != 0,
            flag_onboarded: flags_value & FLAG_ONBOARDED != 0,
            flag_pin_validated: flags_value & FLAG_PIN_VALIDATED != 0,
        })
    }
}

/// Decode the payload of an app-info reply
///
/// # Errors
/// Fails with a technical problem on an unknown format identifier, or with a
/// buffer underrun if a field runs past the payload.
pub fn decode_app_info(payload: &[u8]) -> Result<AppInfo> {
    AppInfo::try_from(payload)
}
