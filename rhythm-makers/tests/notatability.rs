use rhythm_makers::{
    Cursor, Duration, MakerConfig, NotatabilityError, RhythmError, RhythmMaker,
    Spelling, Talea,
};

fn d(num: i64, den: i64) -> Duration {
    Duration::new(num, den).unwrap()
}

fn maker(denominator: u64, spelling: Spelling) -> RhythmMaker {
    let _ = env_logger::builder().is_test(true).try_init();
    RhythmMaker::new(MakerConfig {
        talea: Talea::new(vec![1], denominator).unwrap(),
        spelling,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn smallest_unit_is_written() {
    let maker = maker(128, Spelling::default());
    let (forest, _) = maker.generate(&[d(1, 128)], &Cursor::new()).unwrap();
    assert_eq!(forest.leaves().count(), 1);
    assert_eq!(forest.leaves().next().unwrap().duration, d(1, 128));
}

#[test]
fn below_smallest_unit() {
    let maker = maker(256, Spelling::default());
    let cursor = Cursor::new();
    assert_eq!(
        maker.generate(&[d(1, 256)], &cursor),
        Err(RhythmError::Notatability(NotatabilityError::BelowResolution {
            duration: d(1, 256),
            remainder: d(1, 256),
            smallest_denominator: 128,
        }))
    );
    let coarse = Spelling {
        smallest_denominator: 16,
        ..Default::default()
    };
    let maker = self::maker(32, coarse);
    assert!(maker.generate(&[d(1, 4)], &cursor).is_err());
}

#[test]
fn dots() {
    let _ = env_logger::builder().is_test(true).try_init();
    let written = |max_dots| {
        let maker = RhythmMaker::new(MakerConfig {
            talea: Talea::new(vec![7], 16).unwrap(),
            spelling: Spelling {
                max_dots,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
        let (forest, _) = maker.generate(&[d(7, 16)], &Cursor::new()).unwrap();
        forest.leaves().map(|leaf| leaf.duration).collect::<Vec<_>>()
    };
    assert_eq!(written(0), vec![d(1, 4), d(1, 8), d(1, 16)]);
    assert_eq!(written(1), vec![d(3, 8), d(1, 16)]);
    assert_eq!(written(2), vec![d(7, 16)]);
}

#[test]
fn many_dots_are_capped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let maker = RhythmMaker::new(MakerConfig {
        talea: Talea::new(vec![3], 8).unwrap(),
        spelling: Spelling {
            max_dots: 64,
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();
    let (forest, _) = maker.generate(&[d(3, 8)], &Cursor::new()).unwrap();
    assert_eq!(
        forest.leaves().map(|leaf| leaf.duration).collect::<Vec<_>>(),
        vec![d(3, 8)]
    );
}
