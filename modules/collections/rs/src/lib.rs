pub mod interval_set;
pub mod join;
