use std::fmt::{Debug, Display};

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{Report, Result};

use super::interval::{Interval, IntervalOp};
use crate::num::{Coordinate, PrimInt};
use crate::IntervalError;

/// Half-open interval with an ordered list of opaque tags attached to it.
///
/// Tags carry no identity beyond their position: duplicates are meaningful and merging two
/// intervals concatenates their tags.
#[derive(
    Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Constructor, Dissolve, Getters,
)]
pub struct TaggedInterval<Idx: PrimInt, T> {
    interval: Interval<Idx>,
    tags: Vec<T>,
}

impl<Idx: PrimInt, T> IntervalOp for TaggedInterval<Idx, T> {
    type Idx = Idx;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.interval.start()
    }

    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.interval.end()
    }
}

impl<Idx: PrimInt, T> TaggedInterval<Idx, T> {
    pub fn untagged(interval: Interval<Idx>) -> Self {
        Self {
            interval,
            tags: Vec::new(),
        }
    }

    /// Coerce loosely typed bounds and attach the tags, see [`Interval::coerce`].
    pub fn coerce(
        start: impl Coordinate,
        end: impl Coordinate,
        tags: Vec<T>,
        strict: bool,
    ) -> Result<Self> {
        Interval::coerce(start, end, strict).map(|interval| Self { interval, tags })
    }

    /// Split a textual record, e.g. BED columns, into bounds and tags.
    /// The first two fields are the start and end, the remaining ones become tags.
    pub fn split_record<S: AsRef<str>>(fields: &[S]) -> Result<(Idx, Idx, Vec<T>), IntervalError>
    where
        T: for<'a> From<&'a str>,
    {
        match fields {
            [start, end, tags @ ..] => {
                let (start, end) = Interval::coerce_bounds(&start.as_ref(), &end.as_ref())?;
                let tags = tags.iter().map(|x| T::from(x.as_ref())).collect();
                Ok((start, end, tags))
            }
            _ => Err(IntervalError::MissingFields(fields.len())),
        }
    }

    pub fn from_record<S: AsRef<str>>(fields: &[S], strict: bool) -> Result<Self>
    where
        T: for<'a> From<&'a str>,
    {
        let (start, end, tags) = Self::split_record(fields)?;
        let interval = if strict {
            Interval::new(start, end)?
        } else {
            Interval::ordered(start, end)
        };
        Ok(Self { interval, tags })
    }

    pub fn tags_mut(&mut self) -> &mut Vec<T> {
        &mut self.tags
    }

    /// Absorb another interval: the result spans both and carries self's tags followed by other's.
    pub fn absorb(&mut self, other: Self) -> &mut Self {
        self.interval = self.interval.span(&other.interval);
        self.tags.extend(other.tags);
        self
    }

    /// Same tags, different coordinates.
    pub fn with_interval(&self, interval: Interval<Idx>) -> Self
    where
        T: Clone,
    {
        Self {
            interval,
            tags: self.tags.clone(),
        }
    }
}

impl<Idx: PrimInt, T> From<Interval<Idx>> for TaggedInterval<Idx, T> {
    fn from(interval: Interval<Idx>) -> Self {
        Self::untagged(interval)
    }
}

impl<Idx: PrimInt, T> TryFrom<(Idx, Idx)> for TaggedInterval<Idx, T> {
    type Error = Report;

    fn try_from(value: (Idx, Idx)) -> Result<Self, Self::Error> {
        Interval::new(value.0, value.1).map(Self::untagged)
    }
}

impl<Idx: PrimInt, T> TryFrom<(Idx, Idx, Vec<T>)> for TaggedInterval<Idx, T> {
    type Error = Report;

    fn try_from(value: (Idx, Idx, Vec<T>)) -> Result<Self, Self::Error> {
        let (start, end, tags) = value;
        Interval::new(start, end).map(|interval| Self { interval, tags })
    }
}

impl<Idx: PrimInt, T> PartialEq<(Idx, Idx)> for TaggedInterval<Idx, T> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.interval == *other
    }
}

impl<Idx: PrimInt + Display, T: Display> Display for TaggedInterval<Idx, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.interval)?;
        for tag in &self.tags {
            write!(f, " {}", tag)?;
        }
        Ok(())
    }
}
