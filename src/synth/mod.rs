// Purpose: the monophonic voice, its control channel and block rendering.
// This layer sits above the DSP stages and owns all of their state.

pub mod control;
pub mod message;
pub mod params;
pub mod processor;

pub use control::{control_channel, ControlHandle, RenderEndpoint};
pub use message::{MessageReceiver, SynthMessage, WaveParams};
pub use params::BlockParams;
pub use processor::{AudioProcessor, ProcessorState};
