use crate::record::Record;

/// Consumes records one at a time, in stream order.
pub trait Processor {
    fn process(&mut self, record: Record);
}

/// A [`Processor`] that holds state across records and must be told when the
/// stream has ended.
pub trait AggregatingProcessor: Processor {
    fn flush(&mut self);
}

impl<F> Processor for F
where
    F: FnMut(Record),
{
    fn process(&mut self, record: Record) {
        self(record)
    }
}
