use eyre::Result;

use covkit_core_rs::loc::{Interval, TaggedInterval};
use covkit_core_rs::num::PrimInt;

use crate::cigar;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AlignmentSegments<Idx: PrimInt> {
    /// Reference blocks [start, end) of all reads, many blocks correspond to a single read
    segments: Vec<Interval<Idx>>,
    /// Each i-th read corresponds to segments[alignments[i]..alignments[i + 1]]
    alignments: Vec<usize>,
}

impl<Idx: PrimInt> AlignmentSegments<Idx> {
    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }

    pub fn len(&self) -> usize {
        if self.alignments.is_empty() {
            0
        } else {
            self.alignments.len() - 1
        }
    }

    pub fn push(&mut self, segments: &[Interval<Idx>]) {
        if segments.is_empty() {
            return;
        }

        if self.alignments.is_empty() {
            self.alignments.push(0);
        }
        self.segments.extend_from_slice(segments);
        self.alignments.push(self.segments.len());
    }

    /// Decode a CIGAR alignment starting at `pos` and store its reference blocks as a new read.
    /// Nothing is stored if the CIGAR is invalid.
    pub fn push_cigar(&mut self, pos: Idx, cigar: &str) -> Result<&mut Self> {
        let blocks = cigar::segments(pos, cigar)?;
        self.push(&blocks);
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'_ [Interval<Idx>]> {
        (0..self.len()).map(move |i| self.at(i))
    }

    pub fn at(&self, i: usize) -> &[Interval<Idx>] {
        &self.segments[self.alignments[i]..self.alignments[i + 1]]
    }

    /// Every non-empty block as a separate fragment tagged with the index of its read.
    pub fn fragments(&self) -> impl Iterator<Item = TaggedInterval<Idx, usize>> + '_ {
        self.iter().enumerate().flat_map(|(read, blocks)| {
            blocks
                .iter()
                .filter(|block| !block.is_empty())
                .map(move |block| TaggedInterval::new(*block, vec![read]))
        })
    }
}
