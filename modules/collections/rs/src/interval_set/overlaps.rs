use covkit_core_rs::loc::{Interval, IntervalOp};

/// Two-pointer sweep over two sorted, mutually exclusive interval sequences.
///
/// Yields every non-empty overlap `[max(starts), min(ends))` together with the pair of intervals
/// that produced it. After each step the side(s) ending at the overlap end are advanced, the
/// sweep stops as soon as either side is exhausted.
#[derive(Clone, Debug)]
pub struct Overlaps<'a, A, B> {
    left: &'a [A],
    right: &'a [B],
    lind: usize,
    rind: usize,
}

impl<'a, A, B> Overlaps<'a, A, B>
where
    A: IntervalOp,
    B: IntervalOp<Idx = A::Idx>,
{
    pub fn new(left: &'a [A], right: &'a [B]) -> Self {
        Self {
            left,
            right,
            lind: 0,
            rind: 0,
        }
    }
}

impl<'a, A, B> Iterator for Overlaps<'a, A, B>
where
    A: IntervalOp,
    B: IntervalOp<Idx = A::Idx>,
{
    type Item = (Interval<A::Idx>, &'a A, &'a B);

    fn next(&mut self) -> Option<Self::Item> {
        while self.lind < self.left.len() && self.rind < self.right.len() {
            let (a, b) = (&self.left[self.lind], &self.right[self.rind]);

            let start = a.start().max(b.start());
            let end = a.end().min(b.end());

            // Advance both on a tie
            if a.end() == end {
                self.lind += 1;
            }
            if b.end() == end {
                self.rind += 1;
            }

            if let Some(overlap) = Interval::nonempty(start, end) {
                return Some((overlap, a, b));
            }
        }
        None
    }
}
