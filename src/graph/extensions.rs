use crate::graph::{node::Stage, through::Through};

pub trait StageExt: Stage + Sized {
    fn through<S: Stage>(self, next: S) -> Through<Self, S> {
        Through::new(self, next)
    }
}

impl<T: Stage> StageExt for T {}
