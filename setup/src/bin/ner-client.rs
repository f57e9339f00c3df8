use std::process::ExitCode;

use clap::Parser;
use speech_setup::{run_ner, NerArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    run_ner(NerArgs::parse()).await
}
