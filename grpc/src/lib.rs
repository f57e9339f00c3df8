use std::future::Future;
use std::time::Duration;

use speech_domain::DomainError;
use tonic::{Response, Status};

mod asr;
mod channel;
mod nlp;

pub use asr::RivaAsrAdapter;
pub use channel::{connect_channel, GrpcConnectionSettings, RequestMetadata};
pub use nlp::RivaNlpAdapter;

pub mod pb {
    pub mod asr {
        tonic::include_proto!("nvidia.riva.asr");
    }

    pub mod nlp {
        tonic::include_proto!("nvidia.riva.nlp");
    }
}

pub use pb::asr::riva_speech_recognition_client::RivaSpeechRecognitionClient;
pub use pb::asr::riva_speech_recognition_server::RivaSpeechRecognitionServer;
pub use pb::nlp::riva_language_understanding_client::RivaLanguageUnderstandingClient;
pub use pb::nlp::riva_language_understanding_server::RivaLanguageUnderstandingServer;

/// Awaits a single RPC, optionally bounded by a client-side timeout.
async fn await_rpc<T, F>(
    service: &str,
    request_timeout: Option<Duration>,
    rpc: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<Response<T>, Status>>,
{
    let response = match request_timeout {
        Some(timeout) => tokio::time::timeout(timeout, rpc).await.map_err(|_| {
            DomainError::remote_service_error(service, "gRPC request timed out")
        })?,
        None => rpc.await,
    };
    response
        .map(Response::into_inner)
        .map_err(|status| map_status(service, status))
}

fn map_status(service: &str, status: Status) -> DomainError {
    tracing::warn!(service, code = %status.code(), "remote call failed");
    if status.message().is_empty() {
        DomainError::remote_service_error(service, &status.code().to_string())
    } else {
        DomainError::remote_service_error(service, status.message())
    }
}
