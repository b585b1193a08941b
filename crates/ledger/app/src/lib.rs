//! Base application layer for Ledger-style devices
//!
//! This crate builds on `ledger-apdu-core` with the pieces every Ledger
//! application shares:
//!
//! - BIP32 path encoding ([`serialize_path`], [`deserialize_path`])
//! - Chunk planning for multi-round commands ([`plan_chunks`], [`PayloadType`])
//! - Decoders for the version, app-info and device-info replies
//! - [`BaseApp`], a front end that drives those queries over any
//!   [`DeviceTransport`](ledger_apdu_core::DeviceTransport)
//!
//! # Example
//!
//! ```no_run
//! use ledger_app::{AppConfig, BaseApp};
//! # fn run<T: ledger_apdu_core::DeviceTransport>(transport: T) -> ledger_app::Result<()> {
//! let mut app = BaseApp::new(transport, AppConfig::new(0x06))?;
//! let version = app.get_version()?;
//! println!("app version {version}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod application;
pub mod chunk;
pub mod config;
pub mod constants;
pub mod path;
pub mod types;

pub use ledger_apdu_core::{Error, Result};

pub use application::BaseApp;
pub use chunk::{Chunk, PayloadType, plan_chunks};
pub use config::{AppConfig, Instructions, P1Values};
pub use constants::HARDENED;
pub use path::{deserialize_path, path_from_indices, serialize_path};
pub use types::{
    AppInfo, DeviceInfo, DeviceInfoResponse, VersionInfo, decode_app_info, decode_device_info,
    decode_version,
};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use ledger_apdu_core::prelude::*;

    pub use crate::{
        AppConfig, AppInfo, BaseApp, Chunk, DeviceInfo, DeviceInfoResponse, PayloadType,
        VersionInfo, deserialize_path, plan_chunks, serialize_path,
    };
}
