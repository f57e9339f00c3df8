mod ner;
mod recognition;
mod transcript;

pub use ner::*;
pub use recognition::*;
pub use transcript::*;
