use covkit_collections_rs::interval_set::IntervalSet;
use covkit_collections_rs::join::map_to;
use covkit_core_rs::loc::{IntervalOp, TaggedInterval};
use eyre::Result;
use pretty_assertions::assert_eq;
use rstest::rstest;

type Set = IntervalSet<i32, u32>;

const UNIVERSE: std::ops::Range<i32> = -5..60;

fn set(raw: &[(i32, i32)]) -> Result<Set> {
    let intervals = raw
        .iter()
        .enumerate()
        .map(|(ind, (start, end))| TaggedInterval::try_from((*start, *end, vec![ind as u32])))
        .collect::<Result<Vec<_>>>()?;
    Ok(Set::new(intervals))
}

fn covers(set: &Set, pos: i32) -> bool {
    set.iter().any(|x| x.contains(pos))
}

fn points(set: &Set) -> Vec<i32> {
    UNIVERSE.filter(|pos| covers(set, *pos)).collect()
}

fn assert_normalized(set: &Set) {
    assert!(Set::is_normalized(set.intervals()), "{:?}", set);
    assert!(set.iter().all(|x| x.start() <= x.end()));
}

const CASES: &[(&[(i32, i32)], &[(i32, i32)])] = &[
    (&[], &[]),
    (&[(1, 10)], &[]),
    (&[], &[(1, 10)]),
    (&[(1, 10)], &[(10, 20)]),
    (&[(1, 10)], &[(9, 20)]),
    (&[(1, 10), (17, 22), (7, 12), (20, 25), (30, 35)], &[(5, 12), (20, 22), (23, 28)]),
    (&[(0, 50)], &[(5, 6), (10, 20), (20, 30), (49, 55)]),
    (&[(3, 4), (4, 5), (5, 6)], &[(0, 3), (6, 9), (4, 5)]),
    (&[(-5, 0), (2, 2), (40, 58)], &[(-3, 45)]),
];

#[rstest]
fn normalization_is_idempotent(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8)] case: usize) -> Result<()> {
    let (a, b) = CASES[case];
    for raw in [a, b] {
        let once = set(raw)?;
        assert_normalized(&once);
        let twice = Set::new(once.clone().into_inner());
        assert_eq!(once, twice);
    }
    Ok(())
}

#[rstest]
fn union_is_pointwise_or(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8)] case: usize) -> Result<()> {
    let (a, b) = (set(CASES[case].0)?, set(CASES[case].1)?);

    let ab = a.union(&b);
    let ba = b.union(&a);
    assert_normalized(&ab);
    assert_eq!(points(&ab), points(&ba));
    for pos in UNIVERSE {
        assert_eq!(covers(&ab, pos), covers(&a, pos) || covers(&b, pos), "{pos}");
    }
    Ok(())
}

#[rstest]
fn union_is_associative(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8)] case: usize) -> Result<()> {
    let (a, b) = (set(CASES[case].0)?, set(CASES[case].1)?);
    let c = set(&[(8, 18), (33, 41)])?;

    let left = a.union(&b).union(&c);
    let right = a.union(&b.union(&c));
    assert_eq!(points(&left), points(&right));
    assert_eq!(
        left.iter().map(|x| x.as_interval()).collect::<Vec<_>>(),
        right.iter().map(|x| x.as_interval()).collect::<Vec<_>>()
    );
    Ok(())
}

#[rstest]
fn intersection_is_pointwise_and(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8)] case: usize) -> Result<()> {
    let (a, b) = (set(CASES[case].0)?, set(CASES[case].1)?);

    let ab = a.intersect(&b);
    assert_normalized(&ab);
    for pos in UNIVERSE {
        assert_eq!(covers(&ab, pos), covers(&a, pos) && covers(&b, pos), "{pos}");
    }
    assert_eq!(ab.is_empty(), !a.contains_any(b.iter().map(|x| x.as_interval())));
    Ok(())
}

#[rstest]
fn difference_is_pointwise_and_not(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8)] case: usize) -> Result<()> {
    let (a, b) = (set(CASES[case].0)?, set(CASES[case].1)?);

    for (left, right) in [(&a, &b), (&b, &a)] {
        let diff = left.difference(right);
        assert_normalized(&diff);
        for pos in UNIVERSE {
            assert_eq!(covers(&diff, pos), covers(left, pos) && !covers(right, pos), "{pos}");
        }

        let mut restricted = left.clone();
        restricted.restrict_away(right);
        assert_eq!(restricted, diff);

        let mut restricted = left.clone();
        restricted.restrict_to(right);
        assert_eq!(points(&restricted), points(&left.intersect(right)));
        // Only own tags survive
        for interval in restricted.iter() {
            assert!(interval
                .tags()
                .iter()
                .all(|tag| left.iter().any(|x| x.tags().contains(tag))));
        }
    }
    Ok(())
}

#[rstest]
fn complement_round_trip(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8)] case: usize) -> Result<()> {
    let (lo, hi) = (UNIVERSE.start, UNIVERSE.end);
    for raw in [CASES[case].0, CASES[case].1] {
        let s = set(raw)?;
        let gaps = s.complement(Some(lo), Some(hi));
        assert_normalized(&gaps);

        assert!(s.intersect(&gaps).is_empty());
        assert_eq!(points(&s.union(&gaps)), UNIVERSE.collect::<Vec<_>>());
        assert!(gaps.iter().all(|x| x.tags().is_empty()));
    }
    Ok(())
}

#[test]
fn worked_example() -> Result<()> {
    let set = IntervalSet::<i64, String>::builder()
        .add_records::<&str>([
            ["1", "10", "a"],
            ["17", "22", "b"],
            ["7", "12", "c"],
            ["20", "25", "d"],
            ["30", "35", "e"],
        ])
        .build()?;
    assert_eq!(
        set.iter().map(|x| x.to_string()).collect::<Vec<_>>(),
        ["[1, 12) a c", "[17, 25) b d", "[30, 35) e"]
    );
    Ok(())
}

#[test]
fn join_covers_only_index() -> Result<()> {
    let reads = set(&[(0, 7), (5, 15), (12, 30), (28, 29), (45, 52)])?;
    let index = set(&[(3, 13), (20, 35), (50, 51)])?;

    // Reads are re-split into raw fragments to keep their multiplicity
    let fragments = vec![
        TaggedInterval::try_from((0, 7, vec![0]))?,
        TaggedInterval::try_from((5, 15, vec![1]))?,
        TaggedInterval::try_from((12, 30, vec![2]))?,
        TaggedInterval::try_from((28, 29, vec![3]))?,
        TaggedInterval::try_from((45, 52, vec![4]))?,
    ];
    let mapped = map_to(fragments, index.clone().into_inner());

    let overlapped: i32 = mapped.iter().map(|x| x.len()).sum();
    // [3, 7) + [5, 13) + [12, 13) + [20, 30) + [28, 29) + [50, 51)
    assert_eq!(overlapped, 4 + 8 + 1 + 10 + 1 + 1);

    // Every piece lies within the index and the union of pieces equals reads ∩ index
    let pieces = Set::new(mapped);
    assert_eq!(points(&pieces), points(&reads.intersect(&index)));
    Ok(())
}
