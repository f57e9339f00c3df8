use std::path::PathBuf;
use std::time::Duration;

use speech_domain::DomainError;
use tonic::metadata::{Ascii, MetadataKey, MetadataValue};
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};
use tonic::Request;

#[derive(Debug, Clone)]
pub struct GrpcConnectionSettings {
    /// `host:port`, or a full URI with scheme.
    pub server: String,
    pub use_ssl: bool,
    pub ssl_cert: Option<PathBuf>,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub max_decoding_message_bytes: usize,
    pub max_encoding_message_bytes: usize,
    pub metadata: Vec<(String, String)>,
}

impl GrpcConnectionSettings {
    pub fn tls_enabled(&self) -> bool {
        self.use_ssl || self.ssl_cert.is_some()
    }

    fn uri(&self) -> String {
        if self.server.contains("://") {
            return self.server.clone();
        }
        let scheme = if self.tls_enabled() { "https" } else { "http" };
        format!("{scheme}://{}", self.server)
    }
}

/// Builds a lazily connected channel. Nothing goes over the network until the first RPC.
pub fn connect_channel(settings: &GrpcConnectionSettings) -> Result<Channel, DomainError> {
    let uri = settings.uri();
    let mut endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|err| DomainError::invalid_input(&format!("invalid server address `{uri}`: {err}")))?
        .connect_timeout(settings.connect_timeout);

    if settings.tls_enabled() {
        let mut tls = ClientTlsConfig::new().with_native_roots();
        if let Some(path) = &settings.ssl_cert {
            let pem = std::fs::read(path).map_err(|err| {
                DomainError::invalid_input(&format!(
                    "cannot read SSL certificate `{}`: {err}",
                    path.display()
                ))
            })?;
            tls = tls.ca_certificate(Certificate::from_pem(pem));
        }
        endpoint = endpoint
            .tls_config(tls)
            .map_err(|err| DomainError::invalid_input(&format!("invalid TLS configuration: {err}")))?;
    }

    tracing::debug!(%uri, tls = settings.tls_enabled(), "gRPC channel configured");
    Ok(endpoint.connect_lazy())
}

/// Metadata attached to every outgoing request (API keys, function ids, ...).
#[derive(Debug, Clone, Default)]
pub struct RequestMetadata {
    entries: Vec<(MetadataKey<Ascii>, MetadataValue<Ascii>)>,
}

impl RequestMetadata {
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, DomainError> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let parsed_key = MetadataKey::from_bytes(key.to_ascii_lowercase().as_bytes())
                .map_err(|err| {
                    DomainError::invalid_input(&format!("invalid metadata key `{key}`: {err}"))
                })?;
            let parsed_value = MetadataValue::try_from(value.as_str()).map_err(|err| {
                DomainError::invalid_input(&format!("invalid metadata value for `{key}`: {err}"))
            })?;
            entries.push((parsed_key, parsed_value));
        }
        Ok(Self { entries })
    }

    pub fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        for (key, value) in &self.entries {
            request.metadata_mut().append(key.clone(), value.clone());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(server: &str) -> GrpcConnectionSettings {
        GrpcConnectionSettings {
            server: server.to_string(),
            use_ssl: false,
            ssl_cert: None,
            connect_timeout: Duration::from_secs(5),
            request_timeout: None,
            max_decoding_message_bytes: 4 * 1024 * 1024,
            max_encoding_message_bytes: 4 * 1024 * 1024,
            metadata: Vec::new(),
        }
    }

    #[test]
    fn scheme_follows_tls_settings() {
        assert_eq!(settings("localhost:50051").uri(), "http://localhost:50051");

        let mut secure = settings("grpc.example.com:443");
        secure.use_ssl = true;
        assert_eq!(secure.uri(), "https://grpc.example.com:443");

        let mut with_cert = settings("riva:50051");
        with_cert.ssl_cert = Some(PathBuf::from("ca.pem"));
        assert!(with_cert.tls_enabled());
        assert_eq!(with_cert.uri(), "https://riva:50051");

        assert_eq!(settings("http://10.0.0.2:50051").uri(), "http://10.0.0.2:50051");
    }

    #[tokio::test]
    async fn invalid_server_address_is_rejected_locally() {
        let error = connect_channel(&settings("not a host")).expect_err("address is invalid");
        assert!(matches!(error, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_certificate_is_rejected_locally() {
        let mut with_cert = settings("localhost:50051");
        with_cert.ssl_cert = Some(PathBuf::from("/nonexistent/speech-client-ca.pem"));
        let error = connect_channel(&with_cert).expect_err("certificate is missing");
        assert!(error.to_string().contains("speech-client-ca.pem"));
    }

    #[test]
    fn metadata_is_attached_to_requests() {
        let metadata = RequestMetadata::parse(&[
            ("Authorization".to_string(), "Bearer token".to_string()),
            ("function-id".to_string(), "abc-123".to_string()),
        ])
        .expect("metadata parses");

        let request = metadata.request(());
        assert_eq!(request.metadata().len(), 2);
        assert_eq!(
            request.metadata().get("authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer token")
        );
        assert_eq!(
            request.metadata().get("function-id").and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
    }

    #[test]
    fn invalid_metadata_key_is_rejected() {
        let error = RequestMetadata::parse(&[("bad key".to_string(), "value".to_string())])
            .expect_err("space is not allowed in keys");
        assert!(error.to_string().contains("bad key"));
    }
}
