pub mod app;
pub mod args;

pub use app::{run_ner, run_transcribe_file, NerApp, TranscribeFileApp};
pub use args::{AsrConfigArgs, ConnectionArgs, NerArgs, TranscribeFileArgs};
