use derive_more::Display;
use ledger_apdu_core::{Error, ResponsePayload, Result};

/// Field width of one historical version reply layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldWidth {
    One,
    Two,
    Four,
}

impl FieldWidth {
    /// Pick the layout from the payload length
    const fn for_length(len: usize) -> Option<Self> {
        match len {
            5 | 9 => Some(Self::One),
            8 | 12 => Some(Self::Two),
            14 | 18 => Some(Self::Four),
            _ => None,
        }
    }

    fn read(self, payload: &mut ResponsePayload) -> Result<u32> {
        match self {
            Self::One => payload.read_u8().map(u32::from),
            Self::Two => payload.read_u16_be().map(u32::from),
            Self::Four => payload.read_u32_be(),
        }
    }
}

/// Application version and device state
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}.{}.{}", major, minor, patch)]
pub struct VersionInfo {
    /// The app was built in test mode
    pub test_mode: bool,
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
    /// The device is locked
    pub device_locked: bool,
    /// Target id as 8 lowercase hex digits, empty when the reply has none
    pub target_id: String,
}

impl TryFrom<&[u8]> for VersionInfo {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        let width = FieldWidth::for_length(data.len())
            .ok_or_else(|| Error::technical_problem("Invalid response length"))?;

        let mut payload = ResponsePayload::new(data);
        let test_mode = payload.read_u8()? != 0;
        let major = width.read(&mut payload)?;
        let minor = width.read(&mut payload)?;
        let patch = width.read(&mut payload)?;
        let device_locked = payload.read_u8()? == 1;

        let target_id = if payload.length() >= 4 {
            format!("{:08x}", payload.read_u32_be()?)
        } else {
            String::new()
        };

        Ok(Self {
            test_mode,
            major,
            minor,
            patch,
            device_locked,
            target_id,
        })
    }
}

/// Decode the payload of a version reply
///
/// # Errors
/// Fails with a technical problem if the length matches none of the known
/// layouts.
pub fn decode_version(payload: &[u8]) -> Result<VersionInfo> {
    VersionInfo::try_from(payload)
}
