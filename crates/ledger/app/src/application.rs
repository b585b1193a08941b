//! Base application front end
//!
//! [`BaseApp`] owns a transport and the application's [`AppConfig`] and
//! provides the queries every Ledger application answers, plus the driver
//! for chunked multi-round commands.

use bytes::Bytes;
use ledger_apdu_core::{
    Command, DeviceTransport, Error, ErrorCode, ResponsePayload, Result, unwrap_response,
};
use tracing::{debug, instrument, trace};

use crate::chunk::{PayloadType, plan_chunks};
use crate::config::AppConfig;
use crate::constants::{CHUNK_ACCEPTED_CODES, DEVICE_INFO_ACCEPTED_CODES, cla, ins};
use crate::types::{AppInfo, DeviceInfoResponse, VersionInfo, decode_app_info, decode_version};

/// Front end shared by every Ledger application
#[derive(Debug)]
pub struct BaseApp<T: DeviceTransport> {
    /// Device transport
    transport: T,
    /// Application configuration
    config: AppConfig,
}

impl<T: DeviceTransport> BaseApp<T> {
    /// Create a new front end over `transport`
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    pub fn new(transport: T, config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    /// Get the application configuration
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the front end and return the transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Serialize `path` with the configured accepted lengths
    pub fn serialize_path(&self, path: &str) -> Result<Bytes> {
        crate::path::serialize_path(path, &self.config.accepted_path_lengths)
    }

    /// Exchange one command and return the raw reply
    ///
    /// Transport failures are collapsed into a structured device error.
    fn exchange(&mut self, command: &Command, accepted: &[ErrorCode]) -> Result<Bytes> {
        self.transport.exchange(command, accepted).map_err(|e| {
            let normalized = e.normalize(Some(&self.config.custom_errors));
            debug!(error = %e, return_code = %normalized.return_code, "Exchange failed");
            Error::Response(normalized)
        })
    }

    /// Exchange one command and validate the reply
    fn exchange_and_unwrap(&mut self, command: &Command, accepted: &[ErrorCode]) -> Result<ResponsePayload> {
        let raw = self.exchange(command, accepted)?;
        unwrap_response(&raw, Some(&self.config.custom_errors))
    }

    /// Query the application version
    #[instrument(level = "trace", skip(self))]
    pub fn get_version(&mut self) -> Result<VersionInfo> {
        let command = Command::new(self.config.cla, self.config.ins.get_version, 0x00, 0x00);
        let payload = self.exchange_and_unwrap(&command, &[ErrorCode::NO_ERRORS])?;
        decode_version(&payload.complete_buffer())
    }

    /// Query the name and version of the running application
    #[instrument(level = "trace", skip(self))]
    pub fn app_info(&mut self) -> Result<AppInfo> {
        let command = Command::new(cla::APP_INFO, ins::APP_INFO, 0x00, 0x00);
        let payload = self.exchange_and_unwrap(&command, &[ErrorCode::NO_ERRORS])?;
        decode_app_info(&payload.complete_buffer())
    }

    /// Query the firmware details reported by the dashboard
    ///
    /// Outside the dashboard this yields [`DeviceInfoResponse::DashboardOnly`]
    /// rather than an error.
    #[instrument(level = "trace", skip(self))]
    pub fn device_info(&mut self) -> Result<DeviceInfoResponse> {
        let command = Command::new(cla::DASHBOARD, ins::DEVICE_INFO, 0x00, 0x00);
        let raw = self.exchange(&command, &DEVICE_INFO_ACCEPTED_CODES)?;
        DeviceInfoResponse::from_reply(&raw, Some(&self.config.custom_errors))
    }

    /// Send chunk `idx` of `total` for a multi-round command
    ///
    /// P1 carries the chunk's [`PayloadType`].
    #[instrument(level = "trace", skip(self, chunk), fields(chunk_len = chunk.len()))]
    pub fn send_chunk(
        &mut self,
        ins: u8,
        p2: u8,
        idx: usize,
        total: usize,
        chunk: &[u8],
    ) -> Result<ResponsePayload> {
        let payload_type = PayloadType::for_position(idx, total);
        trace!(%payload_type, "Sending chunk");

        let command = Command::new_with_data(
            self.config.cla,
            ins,
            payload_type.into(),
            p2,
            Bytes::copy_from_slice(chunk),
        );
        self.exchange_and_unwrap(&command, &CHUNK_ACCEPTED_CODES)
    }

    /// Send `message` under `path` as a chunked multi-round command
    ///
    /// Chunks go out strictly in order and the first failure stops the
    /// sequence. Returns the payload of the final chunk's reply.
    #[instrument(level = "trace", skip(self, message), fields(message_len = message.len()))]
    pub fn sign_chunks(&mut self, ins: u8, p2: u8, path: &str, message: &[u8]) -> Result<ResponsePayload> {
        let chunks = plan_chunks(
            path,
            message,
            self.config.chunk_size,
            &self.config.accepted_path_lengths,
        )?;

        let total = chunks.len();
        let mut last = ResponsePayload::default();
        for (i, chunk) in chunks.iter().enumerate() {
            last = self.send_chunk(ins, p2, i + 1, total, chunk)?;
        }

        debug!(chunks = total, "Chunked command complete");
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use ledger_apdu_core::TransportError;

    use super::*;

    /// Transport replaying fixed replies and recording what it was sent
    #[derive(Debug, Default)]
    struct ReplayTransport {
        replies: Vec<std::result::Result<Bytes, TransportError>>,
        sent: Vec<Command>,
    }

    impl DeviceTransport for ReplayTransport {
        fn do_exchange(
            &mut self,
            command: &Command,
            _accepted: &[ErrorCode],
        ) -> std::result::Result<Bytes, TransportError> {
            self.sent.push(command.clone());
            if self.replies.is_empty() {
                return Err(TransportError::Transmission);
            }
            self.replies.remove(0)
        }
    }

    fn app(replies: Vec<std::result::Result<Bytes, TransportError>>) -> BaseApp<ReplayTransport> {
        let transport = ReplayTransport {
            replies,
            sent: Vec::new(),
        };
        BaseApp::new(transport, AppConfig::new(0x06)).unwrap()
    }

    #[test]
    fn test_new_validates_config() {
        let result = BaseApp::new(ReplayTransport::default(), AppConfig::new(0x06).with_chunk_size(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_serialize_path_uses_accepted_lengths() {
        let config = AppConfig::new(0x06).with_accepted_path_lengths([5]);
        let app = BaseApp::new(ReplayTransport::default(), config).unwrap();

        assert_eq!(app.serialize_path("m/44'/461'/0/0/1").unwrap().len(), 20);
        assert!(matches!(
            app.serialize_path("m/44'/461'"),
            Err(Error::InvalidPathLength { length: 2, .. })
        ));
    }

    #[test]
    fn test_get_version_request() {
        let mut app = app(vec![Ok(Bytes::from_static(&[0, 1, 2, 3, 0, 0x90, 0x00]))]);
        let version = app.get_version().unwrap();
        assert_eq!(version.to_string(), "1.2.3");

        let sent = &app.transport().sent[0];
        assert_eq!((sent.cla, sent.ins, sent.p1, sent.p2), (0x06, 0x00, 0x00, 0x00));
        assert!(sent.data().is_empty());
    }

    #[test]
    fn test_transport_failure_is_normalized() {
        let mut app = app(vec![Err(TransportError::Timeout)]);
        let err = app.get_version().unwrap_err();
        assert_eq!(err.return_code(), ErrorCode::UNKNOWN_TRANSPORT_ERROR);
        assert_eq!(err.as_response().unwrap().error_message, "Unknown transport error");
    }

    #[test]
    fn test_send_chunk_tags_p1() {
        let mut app = app(vec![
            Ok(Bytes::from_static(&[0x90, 0x00])),
            Ok(Bytes::from_static(&[0x90, 0x00])),
            Ok(Bytes::from_static(&[0x90, 0x00])),
        ]);
        app.send_chunk(0x02, 0x00, 1, 3, &[0xAA]).unwrap();
        app.send_chunk(0x02, 0x00, 2, 3, &[0xBB]).unwrap();
        app.send_chunk(0x02, 0x00, 3, 3, &[0xCC]).unwrap();

        let p1: Vec<u8> = app.transport().sent.iter().map(|c| c.p1).collect();
        assert_eq!(p1, vec![0x00, 0x01, 0x02]);
    }
}
