pub use builder::IntervalSetBuilder;
pub use overlaps::Overlaps;
pub use set::IntervalSet;

mod builder;
mod overlaps;
mod set;
