pub use mapper::{JoinOutput, Mapper};

use covkit_core_rs::loc::TaggedInterval;
use covkit_core_rs::num::PrimInt;

mod mapper;

/// Map fragments onto the index: every overlap between a fragment and an index entry becomes a
/// new interval tagged with the fragment's tags followed by the index entry's tags.
pub fn map_to<Idx: PrimInt, T: Clone>(
    fragments: impl IntoIterator<Item = TaggedInterval<Idx, T>>,
    index: impl IntoIterator<Item = TaggedInterval<Idx, T>>,
) -> Vec<TaggedInterval<Idx, T>> {
    Mapper::new(JoinOutput::Fragments).run(fragments, index)
}

/// Annotate the index with overlapping fragments: each index entry receives tags of all
/// fragments overlapping it, entries without overlaps are returned as is.
pub fn overlap_with<Idx: PrimInt, T: Clone>(
    index: impl IntoIterator<Item = TaggedInterval<Idx, T>>,
    fragments: impl IntoIterator<Item = TaggedInterval<Idx, T>>,
) -> Vec<TaggedInterval<Idx, T>> {
    Mapper::new(JoinOutput::Index).run(fragments, index)
}
