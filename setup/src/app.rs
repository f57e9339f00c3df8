use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Error};
use speech_application::{
    to_pretty_json, write_transcript_json, ApplicationError, ClassifyTokensRequest,
    OfflineTranscriptionUseCase, OfflineTranscriptionUseCaseImpl, SpanExtractor,
    TokenClassificationUseCase, TokenClassificationUseCaseImpl, TranscribeFileRequest,
};
use speech_configuration::{load_config, setup_logging, ClientConfig};
use speech_domain::{SpeechRecognitionPort, TokenClassificationPort};
use speech_grpc::{connect_channel, GrpcConnectionSettings, RivaAsrAdapter, RivaNlpAdapter};

use crate::args::{ConnectionArgs, NerArgs, TranscribeFileArgs};

pub async fn run_transcribe_file(args: TranscribeFileArgs) -> Result<ExitCode, Error> {
    let config = init(&args.connection)?;
    let settings = args.connection.settings(&config.connection);

    let input = args.input_path();
    let audio = fs::read(&input)
        .with_context(|| format!("cannot read input file `{}`", input.display()))?;
    tracing::info!(
        input = %input.display(),
        audio_bytes = audio.len(),
        server = %settings.server,
        "transcribing file"
    );

    let app = TranscribeFileApp::connect(&settings)?;
    let request = TranscribeFileRequest {
        audio,
        options: args.recognition.to_options(),
    };
    app.run(request, args.output_json.as_deref(), &mut std::io::stdout().lock())
        .await
}

pub async fn run_ner(args: NerArgs) -> Result<ExitCode, Error> {
    let config = init(&args.connection)?;
    let settings = args.connection.settings(&config.connection);
    tracing::info!(
        model = %args.model,
        query_count = args.query.len(),
        server = %settings.server,
        "classifying tokens"
    );

    let app = NerApp::connect(&settings, SpanExtractor::new(args.background_label.as_str()))?;
    app.run(args.to_request(), &mut std::io::stdout().lock()).await
}

fn init(connection: &ConnectionArgs) -> Result<ClientConfig, Error> {
    let config = load_config(connection.config.as_deref())?;
    setup_logging(&config);
    Ok(config)
}

/// Offline transcription of one audio file.
pub struct TranscribeFileApp {
    usecase: Arc<dyn OfflineTranscriptionUseCase>,
}

impl TranscribeFileApp {
    pub fn new(usecase: Arc<dyn OfflineTranscriptionUseCase>) -> Self {
        Self { usecase }
    }

    pub fn connect(settings: &GrpcConnectionSettings) -> Result<Self, Error> {
        let channel = connect_channel(settings)?;
        let recognition: Arc<dyn SpeechRecognitionPort> =
            Arc::new(RivaAsrAdapter::new(channel, settings)?);
        Ok(Self::new(Arc::new(OfflineTranscriptionUseCaseImpl::new(
            recognition,
        ))))
    }

    /// Writes the transcript to `output_json` when given, otherwise to `out`. A remote
    /// failure is reported on `out` and turns into a failing exit code.
    pub async fn run<W: Write>(
        &self,
        request: TranscribeFileRequest,
        output_json: Option<&Path>,
        out: &mut W,
    ) -> Result<ExitCode, Error> {
        let transcript = match self.usecase.transcribe(request).await {
            Ok(transcript) => transcript,
            Err(error) => return report(error, out),
        };

        match output_json {
            Some(path) => {
                write_transcript_json(&transcript, path)?;
                tracing::info!(path = %path.display(), "transcript saved");
            }
            None => writeln!(out, "{}", to_pretty_json(&transcript)?)?,
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Named entity recognition over a batch of queries.
pub struct NerApp {
    usecase: Arc<dyn TokenClassificationUseCase>,
}

impl NerApp {
    pub fn new(usecase: Arc<dyn TokenClassificationUseCase>) -> Self {
        Self { usecase }
    }

    pub fn connect(settings: &GrpcConnectionSettings, extractor: SpanExtractor) -> Result<Self, Error> {
        let channel = connect_channel(settings)?;
        let classification: Arc<dyn TokenClassificationPort> =
            Arc::new(RivaNlpAdapter::new(channel, settings)?);
        Ok(Self::new(Arc::new(TokenClassificationUseCaseImpl::new(
            classification,
            extractor,
        ))))
    }

    pub async fn run<W: Write>(
        &self,
        request: ClassifyTokensRequest,
        out: &mut W,
    ) -> Result<ExitCode, Error> {
        let output = match self.usecase.classify(request).await {
            Ok(output) => output,
            Err(error) => return report(error, out),
        };
        writeln!(out, "{}", serde_json::to_string(&output)?)?;
        Ok(ExitCode::SUCCESS)
    }
}

fn report<W: Write>(error: ApplicationError, out: &mut W) -> Result<ExitCode, Error> {
    match error.remote_detail() {
        Some(detail) => {
            writeln!(out, "{detail}")?;
            Ok(ExitCode::FAILURE)
        }
        None => Err(error.into()),
    }
}
