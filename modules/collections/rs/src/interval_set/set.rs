use std::ops::Deref;

use covkit_core_rs::loc::{Interval, IntervalOp, TaggedInterval};
use covkit_core_rs::num::PrimInt;
use itertools::Itertools;

use super::builder::IntervalSetBuilder;
use super::overlaps::Overlaps;

/// Sorted sequence of mutually exclusive tagged intervals.
///
/// Invariants, upheld after construction and after every mutation:
/// - intervals are sorted by (start, end);
/// - consecutive intervals don't overlap (`prev.end <= next.start`). Touching intervals are kept
///   apart, only strictly overlapping intervals are merged;
/// - a merged interval spans all its sources and concatenates their tags in the sorted order.
///
/// Set operations return new sets, `restrict_to` and `restrict_away` update the set in place.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntervalSet<Idx: PrimInt, T> {
    intervals: Vec<TaggedInterval<Idx, T>>,
}

impl<Idx: PrimInt, T> Default for IntervalSet<Idx, T> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }
}

impl<Idx: PrimInt, T> IntervalSet<Idx, T> {
    /// Build a set from arbitrary (unsorted, overlapping) intervals.
    pub fn new(intervals: impl IntoIterator<Item = TaggedInterval<Idx, T>>) -> Self {
        Self {
            intervals: Self::normalize(intervals.into_iter().collect()),
        }
    }

    /// Wrap intervals that are already sorted and mutually exclusive without touching them.
    pub fn raw(intervals: Vec<TaggedInterval<Idx, T>>) -> Self {
        debug_assert!(Self::is_normalized(&intervals));
        Self { intervals }
    }

    pub fn builder() -> IntervalSetBuilder<Idx, T> {
        IntervalSetBuilder::new()
    }

    pub fn intervals(&self) -> &[TaggedInterval<Idx, T>] {
        &self.intervals
    }

    pub fn into_inner(self) -> Vec<TaggedInterval<Idx, T>> {
        self.intervals
    }

    /// Total number of positions covered by the set.
    pub fn covered(&self) -> Idx {
        self.intervals
            .iter()
            .fold(Idx::zero(), |total, x| total + x.len())
    }

    /// The interval from the first start to the last end, if the set isn't empty.
    pub fn bounds(&self) -> Option<Interval<Idx>> {
        match (self.intervals.first(), self.intervals.last()) {
            (Some(first), Some(last)) => Some(first.as_interval().span(&last.as_interval())),
            _ => None,
        }
    }

    pub fn is_normalized(intervals: &[TaggedInterval<Idx, T>]) -> bool {
        intervals
            .iter()
            .tuple_windows()
            .all(|(prev, next)| prev.end() <= next.start() && prev.start() <= next.start())
    }

    /// Sort by (start, end) and merge strictly overlapping intervals in a single sweep.
    /// The sort is stable: intervals with identical coordinates keep their input order.
    pub(super) fn normalize(
        mut intervals: Vec<TaggedInterval<Idx, T>>,
    ) -> Vec<TaggedInterval<Idx, T>> {
        intervals.sort_by_key(|x| (x.start(), x.end()));

        let mut merged: Vec<TaggedInterval<Idx, T>> = Vec::with_capacity(intervals.len());
        for next in intervals {
            match merged.last_mut() {
                Some(last) if last.end() > next.start() => {
                    last.absorb(next);
                }
                _ => merged.push(next),
            }
        }
        merged
    }

    /// Gaps between consecutive intervals, optionally extended to the given bounds.
    ///
    /// `lower` adds `[lower, first.start)` when it lies before the first interval, `upper` adds
    /// `[last.end, upper)` when it lies after the last one. `None` means unbounded on that side.
    /// Resulting intervals carry no tags.
    pub fn complement(&self, lower: Option<Idx>, upper: Option<Idx>) -> Self {
        let (first, last) = match (self.intervals.first(), self.intervals.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                let gap = match (lower, upper) {
                    (Some(lower), Some(upper)) => Interval::nonempty(lower, upper),
                    _ => None,
                };
                return Self::raw(gap.into_iter().map(TaggedInterval::untagged).collect());
            }
        };

        let mut gaps = Vec::with_capacity(self.intervals.len() + 1);
        if let Some(head) = lower.and_then(|lower| Interval::nonempty(lower, first.start())) {
            gaps.push(head);
        }
        for (prev, next) in self.intervals.iter().tuple_windows() {
            if let Some(gap) = Interval::nonempty(prev.end(), next.start()) {
                gaps.push(gap);
            }
        }
        if let Some(tail) = upper.and_then(|upper| Interval::nonempty(last.end(), upper)) {
            gaps.push(tail);
        }

        Self::raw(gaps.into_iter().map(TaggedInterval::untagged).collect())
    }

    /// True if any interval of the set overlaps the query.
    pub fn contains(&self, query: &impl IntervalOp<Idx = Idx>) -> bool {
        let query = [query.as_interval()];
        Overlaps::new(&self.intervals, &query[..]).next().is_some()
    }

    /// True if any interval of the set overlaps any of the query intervals.
    pub fn contains_any(&self, query: impl IntoIterator<Item = Interval<Idx>>) -> bool {
        let query = IntervalSet::<Idx, ()>::new(query.into_iter().map(TaggedInterval::untagged));
        Overlaps::new(&self.intervals, &query.intervals)
            .next()
            .is_some()
    }
}

impl<Idx: PrimInt, T: Clone> IntervalSet<Idx, T> {
    /// Point-set union. Tags of merged intervals are concatenated, self's tags come first for
    /// intervals with identical coordinates.
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut intervals = Vec::with_capacity(self.len() + other.len());
        intervals.extend_from_slice(&self.intervals);
        intervals.extend_from_slice(&other.intervals);
        Self::new(intervals)
    }

    /// Point-set intersection. Each overlap carries tags of both sources: self's, then other's.
    pub fn intersect(&self, other: &Self) -> Self {
        let intervals = Overlaps::new(&self.intervals, &other.intervals)
            .map(|(overlap, a, b)| {
                let mut tags = Vec::with_capacity(a.tags().len() + b.tags().len());
                tags.extend_from_slice(a.tags());
                tags.extend_from_slice(b.tags());
                TaggedInterval::new(overlap, tags)
            })
            .collect();
        Self::raw(intervals)
    }

    /// Point-set difference: parts of self that are not covered by other, with self's tags.
    pub fn difference<U>(&self, other: &IntervalSet<Idx, U>) -> Self {
        let Some(left) = self.bounds() else {
            return Self::default();
        };
        let Some(right) = other.bounds() else {
            return self.clone();
        };

        // Complement is taken within the span of both sets to have well-defined edges
        let span = left.span(&right);
        let gaps = other.complement(Some(span.start()), Some(span.end()));
        Self::raw(self.clipped(&gaps.intervals))
    }

    /// Keep only the parts overlapping other, each retaining its own tags.
    pub fn restrict_to<U>(&mut self, other: &IntervalSet<Idx, U>) {
        self.intervals = self.clipped(&other.intervals);
    }

    /// Drop the parts overlapping other, each remaining part retains its own tags.
    pub fn restrict_away<U>(&mut self, other: &IntervalSet<Idx, U>) {
        *self = self.difference(other);
    }

    fn clipped<U>(&self, other: &[TaggedInterval<Idx, U>]) -> Vec<TaggedInterval<Idx, T>> {
        Overlaps::new(&self.intervals, other)
            .map(|(overlap, a, _)| a.with_interval(overlap))
            .collect()
    }
}

impl<Idx: PrimInt, T> Deref for IntervalSet<Idx, T> {
    type Target = [TaggedInterval<Idx, T>];

    fn deref(&self) -> &Self::Target {
        &self.intervals
    }
}

impl<Idx: PrimInt, T> FromIterator<TaggedInterval<Idx, T>> for IntervalSet<Idx, T> {
    fn from_iter<I: IntoIterator<Item = TaggedInterval<Idx, T>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<Idx: PrimInt, T> From<Vec<TaggedInterval<Idx, T>>> for IntervalSet<Idx, T> {
    fn from(intervals: Vec<TaggedInterval<Idx, T>>) -> Self {
        Self::new(intervals)
    }
}

impl<Idx: PrimInt, T> From<IntervalSet<Idx, T>> for Vec<TaggedInterval<Idx, T>> {
    fn from(set: IntervalSet<Idx, T>) -> Self {
        set.intervals
    }
}

impl<Idx: PrimInt, T> IntoIterator for IntervalSet<Idx, T> {
    type Item = TaggedInterval<Idx, T>;
    type IntoIter = std::vec::IntoIter<TaggedInterval<Idx, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl<'a, Idx: PrimInt, T> IntoIterator for &'a IntervalSet<Idx, T> {
    type Item = &'a TaggedInterval<Idx, T>;
    type IntoIter = std::slice::Iter<'a, TaggedInterval<Idx, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
