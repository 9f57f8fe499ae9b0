//! Full picking passes against a CPU-painted surface.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{PaintSurface, Tile, BOTTOM, FULL, LEFT, RIGHT, TOP};
use proptest::prelude::*;
use tilepick::{
    Aggregation, Feature, PickContext, PickOptions, PickResult, Picker, SchedulePolicy,
    TargetPixel, TargetSize, ViewportSize, ZoomRange, MAX_ITEMS_PER_PASS,
};

const VIEWPORT: ViewportSize = ViewportSize::new(800, 600);

fn ctx(items: &[Tile]) -> PickContext<'_, Tile> {
    PickContext::new(items, 15.0, VIEWPORT)
}

fn new_picker(options: PickOptions) -> Picker<PaintSurface> {
    Picker::new(PaintSurface::new(options.target_size), options).unwrap()
}

/// Single pass on a small target, enough for half-viewport layouts.
fn pick_once(items: &[Tile], x: f32, y: f32) -> Option<PickResult> {
    let options = PickOptions {
        target_size: TargetSize::new(128, 128).unwrap(),
        ..PickOptions::default()
    };
    new_picker(options).pick_now(&ctx(items), x, y)
}

fn part_ids(result: &PickResult) -> Vec<&str> {
    result.parts.iter().map(|p| p.id.as_str()).collect()
}

type Log = Rc<RefCell<Vec<Option<String>>>>;

fn recorder(log: &Log) -> impl FnOnce(Option<PickResult>) + 'static {
    let log = Rc::clone(log);
    move |result| log.borrow_mut().push(result.map(|r| r.id.to_string()))
}

#[test]
fn test_empty_scene_never_hits() {
    let items: Vec<Tile> = Vec::new();
    for (x, y) in [(0.0, 0.0), (400.0, 300.0), (799.0, 599.0)] {
        assert!(pick_once(&items, x, y).is_none());
    }
}

#[test]
fn test_tiles_without_geometry_never_hit() {
    let items = vec![Tile::new().with_hidden(Feature::bare("ghost"))];
    assert!(pick_once(&items, 400.0, 300.0).is_none());
}

proptest! {
    #[test]
    fn prop_full_coverage_always_hits(x in 0f32..799.0, y in 0f32..599.0) {
        let items = vec![Tile::new().with(Feature::bare("water").with_property("kind", "lake"), FULL)];
        let result = pick_once(&items, x, y).unwrap();

        prop_assert_eq!(result.id.as_str(), "water");
        prop_assert_eq!(result.properties.get("kind"), Some(&"lake".into()));
        prop_assert_eq!(part_ids(&result), vec!["water"]);
    }
}

#[test]
fn test_building_parts_across_tiles() {
    let items = vec![
        Tile::new().with(
            Feature::bare("A").with_property("building", "G"),
            [0.0, 0.0, 0.5, 0.5],
        ),
        Tile::new()
            .with(
                Feature::bare("B").with_property("building", "G"),
                [0.5, 0.0, 1.0, 0.5],
            )
            .with(Feature::bare("G"), BOTTOM),
    ];

    for (x, y, picked) in [(100.0, 100.0, "A"), (700.0, 100.0, "B"), (400.0, 500.0, "G")] {
        let result = pick_once(&items, x, y).unwrap();
        assert_eq!(result.id.as_str(), picked);
        assert_eq!(part_ids(&result), ["A", "B", "G"]);
    }
}

#[test]
fn test_superseded_requests_complete_at_tick() {
    let items = vec![Tile::new().with(Feature::bare("left"), LEFT)];
    let held = Rc::new(RefCell::new(0u32));
    let options = PickOptions {
        schedule: SchedulePolicy::LatestOnly,
        ..PickOptions::default()
    };
    let mut picker = new_picker(options);

    {
        let _borrowed = held.borrow_mut();
        for _ in 0..3 {
            let held = Rc::clone(&held);
            picker.pick(100.0, 300.0, move |_| *held.borrow_mut() += 1);
        }
    }
    assert_eq!(*held.borrow(), 0);

    picker.on_frame(&ctx(&items));
    assert_eq!(*held.borrow(), 3);
    assert_eq!(picker.surface().passes, 1);
}

#[test]
fn test_lone_feature_is_its_own_part() {
    let items = vec![
        Tile::new().with(Feature::bare("shop"), LEFT),
        Tile::new().with(Feature::bare("A").with_property("building", "G"), RIGHT),
    ];
    let result = pick_once(&items, 100.0, 300.0).unwrap();
    assert_eq!(part_ids(&result), ["shop"]);
}

#[test]
fn test_parts_include_items_not_drawn() {
    let mut culled = Tile::new().with(Feature::bare("C").with_property("building", "G"), FULL);
    culled.visible = false;
    let mut far = Tile::new().with(Feature::bare("D").with_property("building", "G"), FULL);
    far.zoom = ZoomRange::new(18.0, 22.0);
    let items = vec![
        culled,
        Tile::new().with(Feature::bare("A").with_property("building", "G"), FULL),
        far,
    ];

    let result = pick_once(&items, 400.0, 300.0).unwrap();
    assert_eq!(result.id.as_str(), "A");
    assert_eq!(part_ids(&result), ["C", "A", "D"]);
}

#[test]
fn test_duplicate_parts_are_kept() {
    let part = Feature::bare("A").with_property("building", "G");
    let items = vec![
        Tile::new().with(part.clone(), FULL),
        Tile::new().with_hidden(part),
    ];
    let result = pick_once(&items, 400.0, 300.0).unwrap();
    assert_eq!(part_ids(&result), ["A", "A"]);
}

#[test]
fn test_hidden_items_are_not_pickable() {
    let mut out_of_zoom = Tile::new().with(Feature::bare("far"), FULL);
    out_of_zoom.zoom = ZoomRange::new(16.0, 20.0);
    let mut culled = Tile::new().with(Feature::bare("culled"), FULL);
    culled.visible = false;
    let mut faded = Tile::new().with(Feature::bare("faded"), FULL);
    faded.fade = 0.0;
    let items = vec![
        Tile::new().with(Feature::bare("ground"), FULL),
        out_of_zoom,
        culled,
        faded,
    ];

    let result = pick_once(&items, 400.0, 300.0).unwrap();
    assert_eq!(result.id.as_str(), "ground");
}

#[test]
fn test_zoom_window_is_inclusive() {
    let mut tile = Tile::new().with(Feature::bare("edge"), FULL);
    tile.zoom = ZoomRange::new(10.0, 15.0);
    let items = vec![tile];
    assert!(pick_once(&items, 400.0, 300.0).is_some());
}

#[test]
fn test_later_items_cover_earlier_ones() {
    let items = vec![
        Tile::new().with(Feature::bare("below"), FULL),
        Tile::new().with(Feature::bare("above"), LEFT),
    ];
    assert_eq!(pick_once(&items, 100.0, 300.0).unwrap().id.as_str(), "above");
    assert_eq!(pick_once(&items, 700.0, 300.0).unwrap().id.as_str(), "below");
}

#[test]
fn test_rows_are_not_mirrored() {
    let items = vec![Tile::new()
        .with(Feature::bare("north"), TOP)
        .with(Feature::bare("south"), BOTTOM)];

    assert_eq!(pick_once(&items, 400.0, 10.0).unwrap().id.as_str(), "north");
    assert_eq!(pick_once(&items, 400.0, 590.0).unwrap().id.as_str(), "south");
}

#[test]
fn test_coordinate_mapping_reads_flipped_row() {
    let items = vec![Tile::new().with(Feature::bare("all"), FULL)];
    let mut picker = new_picker(PickOptions::default());
    let ctx = PickContext::new(&items, 15.0, ViewportSize::new(1024, 768));

    assert!(picker.pick_now(&ctx, 512.0, 384.0).is_some());
    assert_eq!(picker.surface().reads, [TargetPixel { x: 256, y: 255 }]);
}

#[test]
fn test_points_outside_viewport_miss() {
    let items = vec![Tile::new().with(Feature::bare("all"), FULL)];
    assert!(pick_once(&items, -1.0, 300.0).is_none());
    assert!(pick_once(&items, 800.0, 300.0).is_none());
    assert!(pick_once(&items, 400.0, 600.0).is_none());
}

#[test]
fn test_items_over_capacity_are_skipped() {
    let items: Vec<Tile> = (0..300)
        .map(|i| Tile::new().with(Feature::bare(format!("t{i}")), FULL))
        .collect();
    let result = pick_once(&items, 400.0, 300.0).unwrap();
    assert_eq!(result.id.as_str(), format!("t{}", MAX_ITEMS_PER_PASS - 1));
}

#[test]
fn test_many_features_in_one_item() {
    let mut tile = Tile::new();
    for i in 0..1000 {
        tile = tile.with_hidden(Feature::bare(format!("f{i}")));
    }
    let items = vec![tile.with(Feature::bare("last"), FULL)];
    assert_eq!(pick_once(&items, 400.0, 300.0).unwrap().id.as_str(), "last");
}

#[test]
fn test_requests_wait_for_frame_tick() {
    let items = vec![Tile::new().with(Feature::bare("left"), LEFT)];
    let log = Log::default();
    let mut picker = new_picker(PickOptions::default());

    picker.pick(100.0, 300.0, recorder(&log));
    picker.pick(700.0, 300.0, recorder(&log));
    picker.pick(50.0, 50.0, recorder(&log));
    assert!(log.borrow().is_empty());
    assert_eq!(picker.surface().passes, 0);

    picker.on_frame(&ctx(&items));
    assert_eq!(
        *log.borrow(),
        [Some("left".to_string()), None, Some("left".to_string())]
    );
    assert_eq!(picker.surface().passes, 3);
}

#[test]
fn test_each_tick_sees_its_own_scene() {
    let before = vec![Tile::new().with(Feature::bare("old"), FULL)];
    let after = vec![Tile::new().with(Feature::bare("new"), FULL)];
    let log = Log::default();
    let mut picker = new_picker(PickOptions::default());

    picker.pick(400.0, 300.0, recorder(&log));
    picker.on_frame(&ctx(&before));
    picker.pick(400.0, 300.0, recorder(&log));
    picker.on_frame(&ctx(&after));

    assert_eq!(
        *log.borrow(),
        [Some("old".to_string()), Some("new".to_string())]
    );
}

#[test]
fn test_latest_only_supersedes_pending() {
    let items = vec![Tile::new().with(Feature::bare("right"), RIGHT)];
    let log = Log::default();
    let options = PickOptions {
        schedule: SchedulePolicy::LatestOnly,
        ..PickOptions::default()
    };
    let mut picker = new_picker(options);

    picker.pick(700.0, 300.0, recorder(&log));
    picker.pick(710.0, 300.0, recorder(&log));
    assert!(log.borrow().is_empty());
    assert_eq!(picker.pending(), 1);

    picker.on_frame(&ctx(&items));
    assert_eq!(*log.borrow(), [None, Some("right".to_string())]);
    assert_eq!(picker.surface().passes, 1);
}

#[test]
fn test_indexed_aggregation_matches_rescan() {
    let items = vec![
        Tile::new()
            .with(Feature::bare("A").with_property("building", "G"), LEFT)
            .with_hidden(Feature::bare("G")),
        Tile::new()
            .with(Feature::bare("B").with_property("building", 7), RIGHT)
            .with_hidden(Feature::bare("C").with_property("building", "G")),
        Tile::new().with_hidden(Feature::bare("7")),
    ];

    for (x, y) in [(100.0, 300.0), (700.0, 300.0)] {
        let mut results = Vec::new();
        for aggregation in [Aggregation::Rescan, Aggregation::Indexed] {
            let mut picker = new_picker(PickOptions {
                aggregation,
                ..PickOptions::default()
            });
            let slot = Rc::new(RefCell::new(None));
            let out = Rc::clone(&slot);
            picker.pick(x, y, move |r| *out.borrow_mut() = r);
            picker.on_frame(&ctx(&items));
            results.push(slot.take().unwrap());
        }
        assert_eq!(results[0], results[1]);
    }
}

#[test]
fn test_numeric_building_reference() {
    let items = vec![
        Tile::new().with(Feature::bare("B").with_property("building", 7), FULL),
        Tile::new().with_hidden(Feature::bare("7")),
    ];
    let result = pick_once(&items, 400.0, 300.0).unwrap();
    assert_eq!(part_ids(&result), ["B", "7"]);
}

#[test]
fn test_custom_grouping_property() {
    let items = vec![
        Tile::new().with(Feature::bare("a").with_property("parent", "p"), LEFT),
        Tile::new().with(Feature::bare("b").with_property("parent", "p"), RIGHT),
    ];
    let options = PickOptions {
        grouping_property: "parent".to_string(),
        ..PickOptions::default()
    };
    let result = new_picker(options).pick_now(&ctx(&items), 100.0, 300.0).unwrap();
    assert_eq!(part_ids(&result), ["a", "b"]);
}

#[test]
fn test_destroy_completes_pending_with_none() {
    let log = Log::default();
    let mut picker = new_picker(PickOptions::default());
    picker.pick(100.0, 300.0, recorder(&log));
    picker.pick(700.0, 300.0, recorder(&log));

    picker.destroy();
    assert_eq!(*log.borrow(), [None, None]);
}

#[test]
fn test_options_from_json_drive_target() {
    let options = PickOptions::from_json(
        r#"{ "target_size": { "width": 64, "height": 32 }, "schedule": "latest_only" }"#,
    )
    .unwrap();
    assert_eq!(options.schedule, SchedulePolicy::LatestOnly);
    assert_eq!(options.grouping_property, "building");

    let items = vec![Tile::new()
        .with(Feature::bare("north"), TOP)
        .with(Feature::bare("south"), BOTTOM)];
    let mut picker = new_picker(options);
    assert_eq!(picker.pick_now(&ctx(&items), 400.0, 590.0).unwrap().id.as_str(), "south");
    assert_eq!(picker.surface().reads, [TargetPixel { x: 32, y: 0 }]);
}

#[test]
fn test_invalid_options_are_rejected() {
    assert!(PickOptions::from_json(r#"{ "target_size": { "width": 0, "height": 32 } }"#).is_err());
    assert!(PickOptions::from_json(r#"{ "grouping_property": "" }"#).is_err());
    assert!(PickOptions::from_json("not json").is_err());
}
