pub use error::IntervalError;

mod error;
pub mod loc;
pub mod num;
