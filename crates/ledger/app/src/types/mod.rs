//! Decoded replies of the queries every application answers

mod app_info;
mod device_info;
mod version;

pub use app_info::{AppInfo, decode_app_info};
pub use device_info::{DeviceInfo, DeviceInfoResponse, decode_device_info};
pub use version::{VersionInfo, decode_version};
