mod sync;

pub use sync::{LineSource, SourceLine};
