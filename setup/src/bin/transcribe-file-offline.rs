use std::process::ExitCode;

use clap::Parser;
use speech_setup::{run_transcribe_file, TranscribeFileArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    run_transcribe_file(TranscribeFileArgs::parse()).await
}
