/// Core trait for the stages of the voice pipeline.
///
/// A stage takes one sample in and hands one sample out. Stages own their
/// state (filter history, smoothers) and never allocate while processing.
pub trait Stage: Send {
    fn process(&mut self, sample: f32) -> f32;

    /// Process a whole buffer in place.
    fn process_block(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Called once at the start of every block, before any `process` call.
    ///
    /// Default implementation does nothing.
    fn begin_block(&mut self) {}

    /// Clear internal memory (filter history) without touching parameters.
    fn reset(&mut self) {}
}

/// An absent stage passes audio through untouched.
impl<S: Stage> Stage for Option<S> {
    #[inline]
    fn process(&mut self, sample: f32) -> f32 {
        match self {
            Some(stage) => stage.process(sample),
            None => sample,
        }
    }

    fn begin_block(&mut self) {
        if let Some(stage) = self {
            stage.begin_block();
        }
    }

    fn reset(&mut self) {
        if let Some(stage) = self {
            stage.reset();
        }
    }
}

/// Allow boxed stages to be used as stages (for dynamic dispatch)
impl Stage for Box<dyn Stage> {
    fn process(&mut self, sample: f32) -> f32 {
        (**self).process(sample)
    }

    fn process_block(&mut self, block: &mut [f32]) {
        (**self).process_block(block)
    }

    fn begin_block(&mut self) {
        (**self).begin_block()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;

    impl Stage for Double {
        fn process(&mut self, sample: f32) -> f32 {
            sample * 2.0
        }
    }

    #[test]
    fn missing_stage_is_passthrough() {
        let mut stage: Option<Double> = None;
        assert_eq!(stage.process(0.3), 0.3);

        let mut stage = Some(Double);
        assert_eq!(stage.process(0.3), 0.6);
    }

    #[test]
    fn block_processing_matches_per_sample() {
        let mut boxed: Box<dyn Stage> = Box::new(Double);
        let mut block = [0.1, -0.2, 0.4];
        boxed.process_block(&mut block);
        assert_eq!(block, [0.2, -0.4, 0.8]);
    }
}
