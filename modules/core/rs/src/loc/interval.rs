use std::fmt::{Debug, Display};
use std::rc::Rc;
use std::sync::Arc;

use derive_getters::Dissolve;
use eyre::{Report, Result};
use impl_tools::autoimpl;

use crate::num::{Coordinate, PrimInt};
use crate::IntervalError;

/// Half-open coordinate range [start, end) with start <= end.
///
/// Zero-width intervals (start == end) are valid: they cover no positions but survive
/// normalization and joins as regular elements.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

/// Anything that can be viewed as a half-open interval [start, end).
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>, Rc<T>, Arc<T>)]
#[allow(clippy::len_without_is_empty)]
pub trait IntervalOp {
    type Idx: PrimInt;

    fn start(&self) -> Self::Idx;

    fn end(&self) -> Self::Idx;

    fn len(&self) -> Self::Idx {
        self.end() - self.start()
    }

    /// Whether the position falls inside [start, end).
    fn contains(&self, pos: Self::Idx) -> bool {
        self.start() <= pos && pos < self.end()
    }

    /// Strict overlap, touching intervals don't intersect.
    fn intersects<O: IntervalOp<Idx = Self::Idx> + ?Sized>(&self, other: &O) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    fn as_interval(&self) -> Interval<Self::Idx> {
        Interval {
            start: self.start(),
            end: self.end(),
        }
    }
}

impl<T: PrimInt> IntervalOp for Interval<T> {
    type Idx = T;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(IntervalError::Inverted {
                start: format!("{:?}", start),
                end: format!("{:?}", end),
            }
            .into())
        }
    }

    /// Interval between two bounds given in any order.
    pub fn ordered(a: Idx, b: Idx) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Interval [start, end) if it covers at least one position.
    pub fn nonempty(start: Idx, end: Idx) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Coerce loosely typed bounds into an interval.
    /// In strict mode start > end is an error, otherwise the bounds are swapped.
    pub fn coerce(start: impl Coordinate, end: impl Coordinate, strict: bool) -> Result<Self> {
        let (start, end) = Self::coerce_bounds(&start, &end)?;
        if strict {
            Self::new(start, end)
        } else {
            Ok(Self::ordered(start, end))
        }
    }

    /// Coerce both bounds without checking their order.
    pub fn coerce_bounds(
        start: &impl Coordinate,
        end: &impl Coordinate,
    ) -> Result<(Idx, Idx), IntervalError> {
        let start = start
            .to_coordinate()
            .ok_or_else(|| IntervalError::NotACoordinate(format!("{:?}", start)))?;
        let end = end
            .to_coordinate()
            .ok_or_else(|| IntervalError::NotACoordinate(format!("{:?}", end)))?;
        Ok((start, end))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest interval covering both intervals, including the gap between them if any.
    pub fn span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<Idx: PrimInt> TryFrom<(Idx, Idx)> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: (Idx, Idx)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}
