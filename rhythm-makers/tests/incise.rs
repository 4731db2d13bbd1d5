use itertools::Itertools;
use rhythm_makers::{
    Cursor, Duration, Forest, Incise, InciseBody, LeafKind, MakerConfig,
    RhythmMaker, Talea,
};

fn d(num: i64, den: i64) -> Duration {
    Duration::new(num, den).unwrap()
}

fn maker(incise: Incise) -> RhythmMaker {
    let _ = env_logger::builder().is_test(true).try_init();
    RhythmMaker::new(MakerConfig {
        talea: Talea::new(vec![4], 16).unwrap(),
        incise: Some(incise),
        ..Default::default()
    })
    .unwrap()
}

fn leaves(forest: &Forest) -> Vec<(Duration, LeafKind, usize)> {
    forest
        .leaves()
        .map(|leaf| (leaf.duration, leaf.kind, leaf.position))
        .collect()
}

fn rest_and_accent() -> Incise {
    Incise {
        prefix_talea: vec![-1],
        prefix_counts: vec![1],
        suffix_talea: vec![1],
        suffix_counts: vec![1],
        ..Default::default()
    }
}

#[test]
fn prefix_and_suffix() {
    let maker = maker(rest_and_accent());
    let (forest, cursor) = maker.generate(&[d(1, 4), d(1, 4)], &Cursor::new()).unwrap();
    leaves(&forest)
        .into_iter()
        .zip_eq([
            (d(1, 16), LeafKind::Rest, 0),
            (d(1, 8), LeafKind::Note, 1),
            (d(1, 16), LeafKind::Note, 2),
            (d(1, 16), LeafKind::Rest, 3),
            (d(1, 8), LeafKind::Note, 1),
            (d(1, 16), LeafKind::Note, 4),
        ])
        .for_each(|(leaf, expected)| assert_eq!(leaf, expected));
    // the carried talea count is not adjacent to its head.
    assert!(forest.leaves().all(|leaf| !leaf.tie.to_next));
    assert_eq!(cursor.positions_produced, 5);
    assert_eq!(cursor.carry, None);
    assert!(forest.iter().all(|division| division.is_exact()));
}

#[test]
fn note_body() {
    let maker = maker(Incise {
        body: InciseBody::Note,
        ..rest_and_accent()
    });
    let (forest, cursor) = maker.generate(&[d(3, 8)], &Cursor::new()).unwrap();
    assert_eq!(
        leaves(&forest),
        vec![
            (d(1, 16), LeafKind::Rest, 0),
            (d(1, 4), LeafKind::Note, 1),
            (d(1, 16), LeafKind::Note, 2),
        ]
    );
    assert_eq!(cursor.offset, 0);
    assert_eq!(cursor.positions_produced, 3);
}

#[test]
fn rest_body() {
    let maker = maker(Incise {
        body: InciseBody::Rest,
        prefix_talea: vec![],
        prefix_counts: vec![],
        ..rest_and_accent()
    });
    let (forest, _) = maker.generate(&[d(1, 4)], &Cursor::new()).unwrap();
    assert_eq!(
        leaves(&forest),
        vec![(d(3, 16), LeafKind::Rest, 0), (d(1, 16), LeafKind::Note, 1)]
    );
}

#[test]
fn outer_divisions_only() {
    let maker = maker(Incise {
        outer_divisions_only: true,
        ..rest_and_accent()
    });
    let (forest, _) = maker.generate(&[d(1, 4); 3], &Cursor::new()).unwrap();
    let kinds: Vec<Vec<LeafKind>> = forest
        .iter()
        .map(|division| division.kinds().collect())
        .collect();
    assert_eq!(kinds[0][0], LeafKind::Rest);
    assert!(kinds[1].iter().all(|kind| *kind == LeafKind::Note));
    assert_eq!(forest.divisions()[2].last_leaf().unwrap().duration, d(1, 16));
    assert!(forest.iter().all(|division| division.is_exact()));
}

#[test]
fn prefix_longer_than_division() {
    let maker = maker(Incise {
        prefix_talea: vec![-3, 2],
        prefix_counts: vec![2],
        ..rest_and_accent()
    });
    let (forest, _) = maker.generate(&[d(1, 8)], &Cursor::new()).unwrap();
    assert_eq!(leaves(&forest), vec![(d(1, 8), LeafKind::Rest, 0)]);
}

#[test]
fn invalid() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = MakerConfig {
        incise: Some(Incise {
            suffix_counts: vec![],
            ..rest_and_accent()
        }),
        ..Default::default()
    };
    assert!(RhythmMaker::new(config).is_err());
}
