//! The fixed voice pipeline.
//!
//! Stages wrap the DSP primitives behind one `process(sample)` contract so the
//! processor can run oscillator output through filter and amp without caring
//! which stages are present.

/// Fluent combinators (`.through()`).
pub mod extensions;
/// Core stage trait.
pub mod node;
/// Serial chaining of two stages (first → second).
pub mod through;

pub use node::Stage;
pub use through::Through;
