pub use bpkm::{coverage_by_label, Bpkm};
pub use segments::AlignmentSegments;

mod bpkm;
pub mod cigar;
mod segments;
