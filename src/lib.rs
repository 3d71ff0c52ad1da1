pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Fixed voice pipeline stages
pub mod sequencing; // Note names and note sequences
pub mod synth; // Processor, control channel and messages

pub use config::EngineConfig;
pub use error::{ConfigError, ControlError, NoteParseError, RenderFault};
pub use synth::{control_channel, AudioProcessor, BlockParams, ControlHandle, ProcessorState};

/// Largest block the binary host asks for in one callback.
pub const MAX_BLOCK_SIZE: usize = 2048;
