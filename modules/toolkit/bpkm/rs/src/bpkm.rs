use std::hash::Hash;

use ahash::HashMap;
use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, eyre, Result};
use itertools::Itertools;

use covkit_collections_rs::join::map_to;
use covkit_core_rs::loc::{Interval, IntervalOp, TaggedInterval};
use covkit_core_rs::num::PrimInt;

use crate::segments::AlignmentSegments;

/// Bases per kilobase of region per million mapped reads.
///
/// Unlike read counting, each read contributes only the bases it actually places inside the region,
/// and the result is normalized by the read length so that it's comparable with RPKM.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Bpkm {
    total_reads: u64,
    read_length: u64,
}

impl Bpkm {
    pub fn set_total_reads(&mut self, total_reads: u64) -> &mut Self {
        self.total_reads = total_reads;
        self
    }

    pub fn set_read_length(&mut self, read_length: u64) -> &mut Self {
        self.read_length = read_length;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.total_reads > 0, "Total number of reads must be positive");
        ensure!(self.read_length > 0, "Read length must be positive");
        Ok(())
    }

    /// Read blocks clipped to the region, each tagged with the index of its read.
    pub fn segments<Idx: PrimInt>(
        &self,
        region: Interval<Idx>,
        reads: &AlignmentSegments<Idx>,
    ) -> Vec<TaggedInterval<Idx, usize>> {
        map_to(reads.fragments(), [TaggedInterval::untagged(region)])
    }

    /// Number of read bases inside the region.
    pub fn coverage<Idx: PrimInt>(
        &self,
        region: Interval<Idx>,
        reads: &AlignmentSegments<Idx>,
    ) -> Result<u64> {
        total_length(&self.segments(region, reads))
    }

    pub fn calculate<Idx: PrimInt>(
        &self,
        region: Interval<Idx>,
        reads: &AlignmentSegments<Idx>,
    ) -> Result<f64> {
        self.validate()?;
        if region.is_empty() {
            log::warn!("BPKM requested for an empty region {:?}", region);
            return Ok(0.0);
        }

        let coverage = self.coverage(region, reads)?;
        Ok(self.normalize(coverage, total_length(&[region])?))
    }

    /// BPKM for each label of a multi-region index, e.g. exons labelled by their gene.
    ///
    /// Coverage and width of all regions sharing a label are summed, a region with several labels
    /// counts toward each of them. Regions are expected to be mutually exclusive, otherwise bases
    /// covered by overlapping regions are counted by the first one only.
    pub fn per_label<Idx: PrimInt, L: Hash + Eq + Clone>(
        &self,
        index: &[TaggedInterval<Idx, L>],
        reads: &AlignmentSegments<Idx>,
    ) -> Result<HashMap<L, f64>> {
        self.validate()?;

        let mut regions: Vec<_> = index
            .iter()
            .enumerate()
            .map(|(ind, region)| TaggedInterval::new(region.as_interval(), vec![ind]))
            .collect();
        regions.sort_by_key(|x| (x.start(), x.end()));
        if regions.iter().tuple_windows().any(|(a, b)| a.intersects(b)) {
            log::warn!("Index regions overlap, shared bases are assigned to a single region");
        }

        let covered = coverage_by_label(&map_to(reads.fragments(), regions))?;

        let mut width: HashMap<L, u64> = HashMap::default();
        let mut coverage: HashMap<L, u64> = HashMap::default();
        for (ind, region) in index.iter().enumerate() {
            let bases = covered.get(&ind).copied().unwrap_or(0);
            let region_width = total_length(&[region])?;
            for label in region.tags() {
                *width.entry(label.clone()).or_default() += region_width;
                *coverage.entry(label.clone()).or_default() += bases;
            }
        }

        let result = width
            .into_iter()
            .map(|(label, width)| {
                let bpkm = match width {
                    0 => 0.0,
                    _ => self.normalize(coverage.get(&label).copied().unwrap_or(0), width),
                };
                (label, bpkm)
            })
            .collect();
        Ok(result)
    }

    fn normalize(&self, coverage: u64, width: u64) -> f64 {
        if coverage == 0 {
            return 0.0;
        }
        coverage as f64 * 1e9 / (self.total_reads as f64 * self.read_length as f64 * width as f64)
    }
}

/// Summed length of join fragments per index label, the label being the last tag of a fragment.
/// Fragments without tags are skipped.
pub fn coverage_by_label<Idx: PrimInt, L: Hash + Eq + Clone>(
    fragments: &[TaggedInterval<Idx, L>],
) -> Result<HashMap<L, u64>> {
    let mut coverage: HashMap<L, u64> = HashMap::default();
    for fragment in fragments {
        if let Some(label) = fragment.tags().last() {
            *coverage.entry(label.clone()).or_default() += total_length(&[fragment])?;
        }
    }
    Ok(coverage)
}

fn total_length<I: IntervalOp>(intervals: &[I]) -> Result<u64> {
    intervals.iter().try_fold(0u64, |total, x| {
        let length: u64 = ::num::cast(x.len())
            .ok_or_else(|| eyre!("Interval length {:?} doesn't fit into u64", x.len()))?;
        total
            .checked_add(length)
            .ok_or_else(|| eyre!("Total interval length overflows u64"))
    })
}
