use eyre::{ensure, eyre, Result};

use covkit_core_rs::loc::Interval;
use covkit_core_rs::num::PrimInt;

/// Operation of a SAM CIGAR string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Kind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Pad,
    SequenceMatch,
    SequenceMismatch,
}

impl Kind {
    /// Whether the operation moves along the reference.
    pub fn consumes_reference(&self) -> bool {
        matches!(
            self,
            Kind::Match | Kind::Deletion | Kind::Skip | Kind::SequenceMatch | Kind::SequenceMismatch
        )
    }
}

impl TryFrom<char> for Kind {
    type Error = eyre::Report;

    fn try_from(value: char) -> Result<Self> {
        match value {
            'M' => Ok(Kind::Match),
            'I' => Ok(Kind::Insertion),
            'D' => Ok(Kind::Deletion),
            'N' => Ok(Kind::Skip),
            'S' => Ok(Kind::SoftClip),
            'H' => Ok(Kind::HardClip),
            'P' => Ok(Kind::Pad),
            '=' => Ok(Kind::SequenceMatch),
            'X' => Ok(Kind::SequenceMismatch),
            _ => Err(eyre!("Unknown CIGAR operation: {value}")),
        }
    }
}

/// Split a CIGAR string into (operation, length) pairs.
pub fn parse(cigar: &str) -> Result<Vec<(Kind, usize)>> {
    ensure!(!cigar.is_empty(), "Empty CIGAR string");
    ensure!(cigar != "*", "CIGAR is unavailable (*)");

    let mut ops = Vec::new();
    let mut length: Option<usize> = None;
    for symbol in cigar.chars() {
        if let Some(digit) = symbol.to_digit(10) {
            let current = length.unwrap_or(0);
            length = Some(
                current
                    .checked_mul(10)
                    .and_then(|x| x.checked_add(digit as usize))
                    .ok_or_else(|| eyre!("CIGAR operation length overflow: {cigar}"))?,
            );
            continue;
        }

        let kind = Kind::try_from(symbol)?;
        let length = length
            .take()
            .ok_or_else(|| eyre!("CIGAR operation {symbol} without length: {cigar}"))?;
        ops.push((kind, length));
    }
    ensure!(length.is_none(), "Trailing digits in CIGAR string: {cigar}");
    Ok(ops)
}

/// Reference blocks covered by an alignment starting at `pos`.
///
/// Matches and deletions extend the current block, a skip (N) closes it and opens a new one
/// right after the skipped region. Insertions, clipping and padding are ignored. The last block
/// is always reported, even if it's empty (e.g. the alignment ends with a skip).
pub fn segments<Idx: PrimInt>(pos: Idx, cigar: &str) -> Result<Vec<Interval<Idx>>> {
    let mut blocks = Vec::new();
    let (mut start, mut end) = (pos, pos);
    for (kind, length) in parse(cigar)? {
        if !kind.consumes_reference() {
            continue;
        }
        let length: Idx = ::num::cast(length).ok_or_else(|| {
            eyre!("CIGAR operation length {length} doesn't fit the coordinate type")
        })?;
        let shifted = end
            .checked_add(&length)
            .ok_or_else(|| eyre!("Alignment end overflows the coordinate type: {cigar}"))?;

        match kind {
            Kind::Skip => {
                blocks.push(Interval::new(start, end)?);
                start = shifted;
                end = shifted;
            }
            _ => end = shifted,
        }
    }
    blocks.push(Interval::new(start, end)?);
    Ok(blocks)
}
