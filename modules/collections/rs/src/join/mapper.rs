use std::collections::VecDeque;

use covkit_core_rs::loc::{Interval, IntervalOp, TaggedInterval};
use covkit_core_rs::num::PrimInt;

/// What a [`Mapper`] returns after the join.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum JoinOutput {
    /// Overlap pieces, each tagged with the fragment's tags followed by the index entry's tags.
    #[default]
    Fragments,
    /// The index itself, each entry annotated with the tags of every overlapping fragment.
    Index,
}

enum Step {
    // Remaining fragments start at or after the end of the current index entry
    Next,
    // No fragments left for any index entry
    Exhausted,
}

/// Streaming join between a collection of fragments (e.g. read blocks) and an index (e.g. exons).
///
/// Neither side is merged: each fragment keeps its own tags and many fragments may overlap a
/// single index entry and vice versa. Both sides are sorted by (start, end), fragments are then
/// consumed from a FIFO queue. A fragment extending past the current index entry leaves its
/// remainder in a carry buffer, which is put back at the front of the queue (in order) before
/// moving to the next index entry. Each spanning fragment is thus replayed once per entry it spans.
///
/// Index entries are expected to be mutually exclusive. A fragment piece consumed by one entry is
/// never offered to an earlier-ending entry that overlaps it.
#[derive(Clone, Debug, Default)]
pub struct Mapper<Idx: PrimInt, T> {
    output: JoinOutput,
    queue: VecDeque<TaggedInterval<Idx, T>>,
    carry: Vec<TaggedInterval<Idx, T>>,
}

impl<Idx: PrimInt, T: Clone> Mapper<Idx, T> {
    pub fn new(output: JoinOutput) -> Self {
        Self {
            output,
            queue: VecDeque::new(),
            carry: Vec::new(),
        }
    }

    pub fn output(&self) -> JoinOutput {
        self.output
    }

    pub fn run(
        &mut self,
        fragments: impl IntoIterator<Item = TaggedInterval<Idx, T>>,
        index: impl IntoIterator<Item = TaggedInterval<Idx, T>>,
    ) -> Vec<TaggedInterval<Idx, T>> {
        self.queue.clear();
        self.carry.clear();

        let mut fragments: Vec<_> = fragments.into_iter().collect();
        fragments.sort_by_key(|x| (x.start(), x.end()));
        let total = fragments.len();
        self.queue.extend(fragments);

        let mut index: Vec<_> = index.into_iter().collect();
        index.sort_by_key(|x| (x.start(), x.end()));

        let mut mapped = Vec::new();
        let mut hits = Vec::new();
        for dex in index.iter_mut() {
            let step = self.sweep(dex, &mut mapped, &mut hits);
            dex.tags_mut().append(&mut hits);

            if let Step::Exhausted = step {
                break;
            }
        }

        log::debug!(
            "Joined {} fragments with {} index entries: {} overlaps",
            total,
            index.len(),
            mapped.len()
        );

        match self.output {
            JoinOutput::Fragments => mapped,
            JoinOutput::Index => index,
        }
    }

    fn sweep(
        &mut self,
        dex: &TaggedInterval<Idx, T>,
        mapped: &mut Vec<TaggedInterval<Idx, T>>,
        hits: &mut Vec<T>,
    ) -> Step {
        loop {
            let fragment = match self.queue.pop_front() {
                Some(fragment) => fragment,
                None if self.carry.is_empty() => return Step::Exhausted,
                None => {
                    self.queue.extend(self.carry.drain(..));
                    continue;
                }
            };

            // This fragment and everything after it belong to later index entries
            if fragment.start() >= dex.end() {
                self.queue.push_front(fragment);
                for carried in self.carry.drain(..).rev() {
                    self.queue.push_front(carried);
                }
                return Step::Next;
            }

            // Ends before the entry starts, no later entry can overlap it either
            if fragment.end() <= dex.start() {
                continue;
            }

            // fragment.start < dex.end && fragment.end > dex.start, zero-width fragments
            // strictly inside the entry included
            match self.output {
                JoinOutput::Fragments => {
                    let start = dex.start().max(fragment.start());
                    let end = dex.end().min(fragment.end());
                    let mut tags = Vec::with_capacity(fragment.tags().len() + dex.tags().len());
                    tags.extend_from_slice(fragment.tags());
                    tags.extend_from_slice(dex.tags());
                    mapped.push(TaggedInterval::new(Interval::ordered(start, end), tags));
                }
                JoinOutput::Index => hits.extend_from_slice(fragment.tags()),
            }

            if let Some(rest) = Interval::nonempty(dex.end(), fragment.end()) {
                let (_, tags) = fragment.dissolve();
                self.carry.push(TaggedInterval::new(rest, tags));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::{map_to, overlap_with};
    use eyre::Result;
    use pretty_assertions::assert_eq;

    type Tagged = TaggedInterval<i64, &'static str>;

    fn tagged(raw: &[(i64, i64, &[&'static str])]) -> Result<Vec<Tagged>> {
        raw.iter()
            .map(|(start, end, tags)| TaggedInterval::try_from((*start, *end, tags.to_vec())))
            .collect()
    }

    #[test]
    fn test_coverage_conservation() -> Result<()> {
        let fragments = tagged(&[(5, 15, &["r1"]), (18, 25, &["r2"])])?;
        let index = tagged(&[(10, 20, &["g"])])?;

        let mapped = map_to(fragments, index);
        assert_eq!(mapped, tagged(&[(10, 15, &["r1", "g"]), (18, 20, &["r2", "g"])])?);
        assert_eq!(mapped.iter().map(|x| x.len()).sum::<i64>(), 7);
        Ok(())
    }

    #[test]
    fn test_carry_buffer() -> Result<()> {
        let fragments = tagged(&[(5, 100, &["r"])])?;
        let index = tagged(&[(10, 20, &["a"]), (30, 40, &["b"])])?;

        assert_eq!(
            map_to(fragments, index),
            tagged(&[(10, 20, &["r", "a"]), (30, 40, &["r", "b"])])?
        );
        Ok(())
    }

    #[test]
    fn test_multiplicity() -> Result<()> {
        // Identical and overlapping fragments are never merged
        let fragments = tagged(&[(12, 18, &["r2"]), (0, 15, &["r1"]), (12, 18, &["r3"])])?;
        let index = tagged(&[(10, 20, &["g"])])?;

        assert_eq!(
            map_to(fragments, index),
            tagged(&[
                (10, 15, &["r1", "g"]),
                (12, 18, &["r2", "g"]),
                (12, 18, &["r3", "g"]),
            ])?
        );
        Ok(())
    }

    #[test]
    fn test_order_follows_index() -> Result<()> {
        let fragments = tagged(&[(25, 45, &["r2"]), (0, 35, &["r1"]), (32, 33, &["r3"])])?;
        let index = tagged(&[(30, 40, &["b"]), (10, 20, &["a"])])?;

        assert_eq!(
            map_to(fragments, index),
            tagged(&[
                (10, 20, &["r1", "a"]),
                (30, 35, &["r1", "b"]),
                (30, 40, &["r2", "b"]),
                (32, 33, &["r3", "b"]),
            ])?
        );
        Ok(())
    }

    #[test]
    fn test_no_overlaps() -> Result<()> {
        let index = tagged(&[(10, 20, &["a"]), (30, 40, &["b"])])?;

        // Touching fragments don't overlap
        let fragments = tagged(&[(0, 10, &["r1"]), (20, 30, &["r2"]), (40, 50, &["r3"])])?;
        assert!(map_to(fragments, index.clone()).is_empty());

        assert!(map_to(Vec::new(), index.clone()).is_empty());
        assert!(map_to(tagged(&[(0, 10, &["r1"])])?, Vec::new()).is_empty());
        Ok(())
    }

    #[test]
    fn test_overlap_with() -> Result<()> {
        let index = tagged(&[(10, 20, &["a"]), (30, 40, &["b"]), (50, 60, &["c"])])?;
        let fragments = tagged(&[(5, 35, &["r1"]), (15, 18, &["r2"])])?;

        assert_eq!(
            overlap_with(index, fragments),
            tagged(&[
                (10, 20, &["a", "r1", "r2"]),
                (30, 40, &["b", "r1"]),
                (50, 60, &["c"]),
            ])?
        );
        Ok(())
    }

    #[test]
    fn test_overlap_with_passthrough() -> Result<()> {
        let index = tagged(&[(30, 40, &["b"]), (10, 20, &["a"])])?;

        // No fragments at all: the sorted index is returned unannotated
        assert_eq!(
            overlap_with(index.clone(), Vec::new()),
            tagged(&[(10, 20, &["a"]), (30, 40, &["b"])])?
        );

        // Fragments run out before the last entry
        let fragments = tagged(&[(0, 5, &["r0"]), (12, 14, &["r1"])])?;
        assert_eq!(
            overlap_with(index, fragments),
            tagged(&[(10, 20, &["a", "r1"]), (30, 40, &["b"])])?
        );
        Ok(())
    }

    #[test]
    fn test_zero_width_fragments() -> Result<()> {
        let index = tagged(&[(10, 20, &["g"])])?;
        // Inside the entry: reported by both outputs. On either edge: no overlap at all.
        let fragments = tagged(&[(15, 15, &["r1"]), (10, 10, &["r2"]), (20, 20, &["r3"])])?;

        let mapped = map_to(fragments.clone(), index.clone());
        assert_eq!(mapped, tagged(&[(15, 15, &["r1", "g"])])?);
        assert_eq!(overlap_with(index, fragments), tagged(&[(10, 20, &["g", "r1"])])?);
        Ok(())
    }

    #[test]
    fn test_mapper_reuse() -> Result<()> {
        let mut mapper = Mapper::new(JoinOutput::Fragments);
        assert_eq!(mapper.output(), JoinOutput::Fragments);

        let first = mapper.run(tagged(&[(0, 100, &["r"])])?, tagged(&[(10, 20, &["a"])])?);
        assert_eq!(first, tagged(&[(10, 20, &["r", "a"])])?);

        // Leftovers of the previous run must not leak into the next one
        let second = mapper.run(tagged(&[(15, 16, &["q"])])?, tagged(&[(50, 60, &["b"])])?);
        assert!(second.is_empty());
        Ok(())
    }
}
