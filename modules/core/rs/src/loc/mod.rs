pub use interval::{Interval, IntervalOp};
pub use tagged::TaggedInterval;

mod interval;
mod tagged;
