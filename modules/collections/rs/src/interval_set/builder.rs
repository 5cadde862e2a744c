use eyre::{ensure, Report, Result};

use covkit_core_rs::loc::{Interval, IntervalOp, TaggedInterval};
use covkit_core_rs::num::{Coordinate, PrimInt};
use covkit_core_rs::IntervalError;

use super::set::IntervalSet;

/// Collects loosely typed intervals and turns them into an [`IntervalSet`].
///
/// Adding never fails: the first invalid element is remembered and reported by `build`, so the
/// whole input is either accepted or rejected.
#[derive(Clone, Debug)]
pub struct IntervalSetBuilder<Idx: PrimInt, T> {
    pending: Vec<(Idx, Idx, Vec<T>)>,
    failure: Option<(usize, IntervalError)>,
    strict: bool,
    raw: bool,
}

impl<Idx: PrimInt, T> Default for IntervalSetBuilder<Idx, T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            failure: None,
            strict: false,
            raw: false,
        }
    }
}

impl<Idx: PrimInt, T> IntervalSetBuilder<Idx, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject intervals with start > end instead of swapping their bounds.
    pub fn set_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Skip sorting and merging, the input must already be sorted and mutually exclusive.
    pub fn set_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn add(mut self, interval: TaggedInterval<Idx, T>) -> Self {
        let (interval, tags) = interval.dissolve();
        self.pending.push((interval.start(), interval.end(), tags));
        self
    }

    pub fn extend(mut self, intervals: impl IntoIterator<Item = TaggedInterval<Idx, T>>) -> Self {
        for interval in intervals {
            self = self.add(interval);
        }
        self
    }

    pub fn add_coerced(
        mut self,
        start: impl Coordinate,
        end: impl Coordinate,
        tags: Vec<T>,
    ) -> Self {
        match Interval::<Idx>::coerce_bounds(&start, &end) {
            Ok((start, end)) => self.pending.push((start, end, tags)),
            Err(err) => self.fail(err),
        }
        self
    }

    /// Add a textual record: start, end and then any number of tags.
    pub fn add_record<S: AsRef<str>>(mut self, fields: &[S]) -> Self
    where
        T: for<'a> From<&'a str>,
    {
        match TaggedInterval::<Idx, T>::split_record(fields) {
            Ok(record) => self.pending.push(record),
            Err(err) => self.fail(err),
        }
        self
    }

    pub fn add_records<S: AsRef<str>>(
        mut self,
        records: impl IntoIterator<Item = impl AsRef<[S]>>,
    ) -> Self
    where
        T: for<'a> From<&'a str>,
    {
        for record in records {
            self = self.add_record(record.as_ref());
        }
        self
    }

    fn fail(&mut self, err: IntervalError) {
        if self.failure.is_none() {
            self.failure = Some((self.pending.len(), err));
        }
    }

    pub fn build(self) -> Result<IntervalSet<Idx, T>> {
        if let Some((ind, err)) = self.failure {
            return Err(Report::new(err).wrap_err(format!("Invalid interval at position {ind}")));
        }

        let strict = self.strict;
        let intervals = self
            .pending
            .into_iter()
            .enumerate()
            .map(|(ind, (start, end, tags))| -> Result<TaggedInterval<Idx, T>> {
                let interval = if strict {
                    Interval::new(start, end)
                        .map_err(|err| err.wrap_err(format!("Invalid interval at position {ind}")))?
                } else {
                    Interval::ordered(start, end)
                };
                Ok(TaggedInterval::new(interval, tags))
            })
            .collect::<Result<Vec<_>>>()?;

        if self.raw {
            ensure!(
                IntervalSet::is_normalized(&intervals),
                "Intervals must be sorted and mutually exclusive to build a raw IntervalSet"
            );
            return Ok(IntervalSet::raw(intervals));
        }

        let total = intervals.len();
        let set = IntervalSet::new(intervals);
        if set.len() != total {
            log::debug!("Merged {total} intervals into {} mutually exclusive ones", set.len());
        }
        Ok(set)
    }
}
