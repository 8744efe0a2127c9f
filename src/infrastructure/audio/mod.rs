pub mod audio_decoder;
mod whisper_engine;

pub use whisper_engine::{WhisperEngine, WhisperModel};
