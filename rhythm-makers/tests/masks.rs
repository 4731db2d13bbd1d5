use itertools::Itertools;
use rhythm_makers::{
    mask::{Mask, MaskAction, Pattern},
    Cursor, Duration, Forest, LeafKind, MakerConfig, MaskSet, RhythmMaker,
    Talea,
};

fn d(num: i64, den: i64) -> Duration {
    Duration::new(num, den).unwrap()
}

fn generate(config: MakerConfig, targets: &[Duration]) -> Forest {
    let _ = env_logger::builder().is_test(true).try_init();
    RhythmMaker::new(config)
        .unwrap()
        .generate(targets, &Cursor::new())
        .unwrap()
        .0
}

fn eights(masks: Vec<Mask>) -> MakerConfig {
    MakerConfig {
        talea: Talea::new(vec![1], 8).unwrap(),
        masks: MaskSet::new(masks),
        ..Default::default()
    }
}

fn kinds(forest: &Forest) -> Vec<LeafKind> {
    forest.leaves().map(|leaf| leaf.kind).collect()
}

use LeafKind::{Note as N, Rest as R, Silence as S};

#[test]
fn global_positions() {
    let forest = generate(
        eights(vec![Mask::rest(Pattern::cyclic(vec![1], 2))]),
        &[d(1, 4); 3],
    );
    assert_eq!(kinds(&forest), vec![N, R, N, R, N, R]);
}

#[test]
fn positions_in_division() {
    let forest = generate(
        eights(vec![Mask::silence(Pattern::first(1)).in_division()]),
        &[d(3, 8), d(1, 4)],
    );
    assert_eq!(kinds(&forest), vec![S, N, N, S, N]);
    let forest = generate(
        eights(vec![Mask::rest(Pattern::last(1)).in_division()]),
        &[d(3, 8), d(1, 4)],
    );
    assert_eq!(kinds(&forest), vec![N, N, R, N, R]);
}

#[test]
fn negative_global_index() {
    let forest = generate(
        eights(vec![Mask::rest(Pattern::last(2))]),
        &[d(1, 4), d(1, 4)],
    );
    assert_eq!(kinds(&forest), vec![N, N, R, R]);
}

#[test]
fn first_match_wins() {
    let forest = generate(
        eights(vec![
            Mask::new(Pattern::indices(vec![0]), MaskAction::Keep),
            Mask::rest(Pattern::all()),
        ]),
        &[d(1, 4)],
    );
    assert_eq!(kinds(&forest), vec![N, R]);
}

#[test]
fn sustain() {
    let forest = generate(
        MakerConfig {
            talea: Talea::new(vec![1, -1], 8).unwrap(),
            masks: MaskSet::new(vec![Mask::sustain(Pattern::cyclic(vec![1], 4))]),
            ..Default::default()
        },
        &[d(1, 2)],
    );
    assert_eq!(kinds(&forest), vec![N, N, N, R]);
}

#[test]
fn split_count_is_masked_as_a_whole() {
    let forest = generate(
        MakerConfig {
            talea: Talea::new(vec![3, 1], 8).unwrap(),
            masks: MaskSet::new(vec![Mask::rest(Pattern::indices(vec![0]))]),
            ..Default::default()
        },
        &[d(1, 4), d(1, 4)],
    );
    forest
        .leaves()
        .zip_eq([(R, 0), (R, 0), (N, 1)])
        .for_each(|(leaf, (kind, position))| {
            assert_eq!(leaf.kind, kind);
            assert_eq!(leaf.position, position);
            assert!(!leaf.tie.to_next);
        });
}

#[test]
fn division_masks() {
    let config = MakerConfig {
        talea: Talea::new(vec![1], 12).unwrap(),
        masks: MaskSet::new(vec![
            Mask::rest(Pattern::indices(vec![1])).of_divisions(),
            Mask::sustain(Pattern::indices(vec![-1])).of_divisions(),
            Mask::rest(Pattern::all()),
        ]),
        ..Default::default()
    };
    let forest = generate(config, &[d(1, 4); 3]);
    let divisions = forest.divisions();
    // untouched by division masks, leaf mask makes everything rest.
    assert!(divisions[0].container.is_some());
    assert_eq!(kinds(&Forest::new(vec![divisions[0].clone()])), vec![R; 3]);

    assert_eq!(divisions[1].container, None);
    assert_eq!(divisions[1].leaves().len(), 1);
    assert_eq!(divisions[1].leaves()[0].kind, R);
    assert_eq!(divisions[1].leaves()[0].duration, d(1, 4));

    assert_eq!(divisions[2].container, None);
    assert_eq!(divisions[2].leaves().len(), 1);
    assert_eq!(divisions[2].leaves()[0].kind, N);
    assert!(forest.iter().all(|division| division.is_exact()));
}

#[test]
fn rest_filled_divisions() {
    let config = MakerConfig {
        talea: Talea::new(vec![1], 12).unwrap(),
        masks: MaskSet::new(vec![Mask::rest(Pattern::first(3))]),
        ..Default::default()
    };
    let forest = generate(config.clone(), &[d(1, 4), d(1, 4)]);
    assert_eq!(forest.divisions()[0].leaves().len(), 3);
    assert!(forest.divisions()[0].is_rest_filled());
    assert!(forest.divisions()[0].container.is_some());

    let forest = generate(
        MakerConfig {
            rewrite_rest_filled: true,
            ..config
        },
        &[d(1, 4), d(1, 4)],
    );
    let first = &forest.divisions()[0];
    assert_eq!(first.container, None);
    assert_eq!(first.leaves().len(), 1);
    assert_eq!(first.leaves()[0].duration, d(1, 4));
    assert_eq!(first.leaves()[0].kind, R);
    let second = &forest.divisions()[1];
    assert!(second.container.is_some());
    assert_eq!(kinds(&Forest::new(vec![second.clone()])), vec![N; 3]);
}

#[test]
fn invalid_masks() {
    let config = eights(vec![Mask::rest(Pattern::cyclic(vec![3], 3))]);
    assert!(RhythmMaker::new(config).is_err());
    let config = eights(vec![Mask::rest(Pattern::cyclic(vec![0], 0))]);
    assert!(RhythmMaker::new(config).is_err());
}
