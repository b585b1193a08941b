use ledger_apdu_core::response::ascii_lossy;
use ledger_apdu_core::{ErrorCode, ErrorDescriptions, ResponsePayload, Result, unwrap_response, utils};

use crate::constants::DASHBOARD_ONLY_MESSAGE;

/// Firmware details reported by the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Target id as 8 lowercase hex digits
    pub target_id: String,
    /// Secure element firmware version
    pub se_version: String,
    /// Device flags as lowercase hex
    pub flag: String,
    /// MCU firmware version
    pub mcu_version: String,
}

/// Outcome of a device-info query
///
/// Asking for device info while an application is open is not a failure;
/// the device simply refuses and the caller gets [`Self::DashboardOnly`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceInfoResponse {
    /// The dashboard answered
    Info(DeviceInfo),
    /// The command is only available while the dashboard is running
    DashboardOnly {
        /// Status word returned by the device
        return_code: ErrorCode,
        /// Human readable explanation
        message: String,
    },
}

impl DeviceInfoResponse {
    /// The device info, if the dashboard answered
    pub const fn info(&self) -> Option<&DeviceInfo> {
        match self {
            Self::Info(info) => Some(info),
            Self::DashboardOnly { .. } => None,
        }
    }

    /// Check if the command was refused outside the dashboard
    pub const fn is_dashboard_only(&self) -> bool {
        matches!(self, Self::DashboardOnly { .. })
    }

    /// Interpret a raw device-info reply, status word included
    ///
    /// # Errors
    /// Any status other than success and [`ErrorCode::CLA_NOT_SUPPORTED`]
    /// fails as a device error. A malformed payload fails as a buffer underrun.
    pub fn from_reply(raw: &[u8], overrides: Option<&ErrorDescriptions>) -> Result<Self> {
        let (code, _) = utils::extract_status_and_payload(raw)?;
        if code == ErrorCode::CLA_NOT_SUPPORTED {
            return Ok(Self::DashboardOnly {
                return_code: code,
                message: DASHBOARD_ONLY_MESSAGE.to_string(),
            });
        }

        let payload = unwrap_response(raw, overrides)?;
        decode_device_info(&payload.complete_buffer()).map(Self::Info)
    }
}

impl TryFrom<&[u8]> for DeviceInfo {
    type Error = ledger_apdu_core::Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        let mut payload = ResponsePayload::new(data);

        let target_id = hex::encode(payload.read_bytes(4)?);
        let se_version = ascii_lossy(payload.read_length_prefixed()?);
        let flag = hex::encode(payload.read_length_prefixed()?);

        // some firmware pads the MCU version with a trailing NUL
        let mcu = payload.read_length_prefixed()?;
        let mcu = mcu.iter().position(|&b| b == 0).map_or(mcu, |end| &mcu[..end]);
        let mcu_version = ascii_lossy(mcu);

        Ok(Self {
            target_id,
            se_version,
            flag,
            mcu_version,
        })
    }
}

/// Decode the payload of a device-info reply
///
/// # Errors
/// Fails with a buffer underrun if a field runs past the payload.
pub fn decode_device_info(payload: &[u8]) -> Result<DeviceInfo> {
    DeviceInfo::try_from(payload)
}
