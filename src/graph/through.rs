use crate::graph::node::Stage;

/*
Serial Chaining
===============

`Through` runs one stage into the next:

    input ──→ [first] ──→ [second] ──→ output

The voice pipeline is fixed rather than a runtime graph: the oscillator
feeds an optional filter, which feeds the amplifier. Chaining them with
`Through<Option<Filter>, Amp>` makes that order part of the type, and an
absent filter (`None`) simply passes audio on.

Order matters. Filter → Amp is the classic subtractive layout: the filter
always sees a full-level signal and the amp does the final level control.
*/

pub struct Through<A, B> {
    first: A,
    second: B,
}

impl<A, B> Through<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

impl<A: Stage, B: Stage> Stage for Through<A, B> {
    #[inline]
    fn process(&mut self, sample: f32) -> f32 {
        self.second.process(self.first.process(sample))
    }

    fn begin_block(&mut self) {
        self.first.begin_block();
        self.second.begin_block();
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}
