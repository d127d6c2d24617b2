mod common;

use chrono::Duration;

use iss_tracker::predict::{
    find_passes, scan_passes, Ephemeris, Observer, PassBundle, PassSearch, Propagator,
};

use common::{ISS_LINE1, ISS_LINE2};

fn propagator() -> Propagator {
    Propagator::from_lines(ISS_LINE1, ISS_LINE2).unwrap()
}

#[test]
fn passes_over_istanbul_are_well_formed() {
    let propagator = propagator();
    let observer = Observer::new(41.0, 29.0, 0.0).unwrap();
    let start = propagator.epoch();

    let passes = find_passes(
        &propagator,
        &observer,
        start,
        start + Duration::hours(36),
        &PassSearch::default(),
    );
    assert!(!passes.is_empty(), "ISS crosses 41N several times a day");

    for pair in passes.windows(2) {
        assert!(pair[0].los < pair[1].aos);
    }
    for pass in &passes {
        assert!(pass.aos <= pass.los);
        assert!(pass.aos <= pass.tca && pass.tca <= pass.los);
        assert!(pass.max_elevation_deg >= 0.0);
        assert!(pass.max_elevation_deg <= 90.0);
        assert_eq!(pass.visible, pass.max_elevation_deg >= 20.0);
        assert_eq!(pass.duration_seconds, (pass.los - pass.aos).num_seconds());
        // A LEO pass never lasts longer than a quarter of an hour.
        assert!(pass.duration_seconds < 15 * 60);
    }
}

#[test]
fn pass_elevations_match_propagator() {
    let propagator = propagator();
    let observer = Observer::new(41.0, 29.0, 0.0).unwrap();
    let start = propagator.epoch();

    let passes = find_passes(
        &propagator,
        &observer,
        start,
        start + Duration::hours(24),
        &PassSearch::default(),
    );
    let pass = passes
        .iter()
        .find(|p| p.aos > start && !p.truncated)
        .unwrap();

    let at_tca = propagator.look_angles(&observer, pass.tca).unwrap();
    assert!((at_tca.elevation_deg - pass.max_elevation_deg).abs() < 0.01);
    let before = propagator
        .look_angles(&observer, pass.aos - Duration::seconds(10))
        .unwrap();
    assert!(before.elevation_deg <= 0.0);
}

#[test]
fn bundle_picks_first_and_first_visible() {
    let propagator = propagator();
    let observer = Observer::new(41.0, 29.0, 0.0).unwrap();
    let start = propagator.epoch();
    let scan = scan_passes(
        &propagator,
        &observer,
        start,
        start + Duration::hours(36),
        &PassSearch::default(),
    );
    assert_eq!(scan.gaps, 0);
    assert!(!scan.aborted);

    let bundle = PassBundle::from_passes(scan.passes.clone());
    assert_eq!(bundle.next_pass.as_ref(), scan.passes.first());
    assert_eq!(
        bundle.next_visible_pass.as_ref(),
        scan.passes.iter().find(|p| p.visible)
    );
}

#[test]
fn refinement_stays_within_one_coarse_step() {
    let propagator = propagator();
    let observer = Observer::new(41.0, 29.0, 0.0).unwrap();
    let start = propagator.epoch();
    let coarse = find_passes(
        &propagator,
        &observer,
        start,
        start + Duration::hours(12),
        &PassSearch::default(),
    );
    let refined = find_passes(
        &propagator,
        &observer,
        start,
        start + Duration::hours(12),
        &PassSearch {
            refine: true,
            ..PassSearch::default()
        },
    );

    assert_eq!(coarse.len(), refined.len());
    for (c, r) in coarse.iter().zip(&refined) {
        assert!(r.aos <= c.aos && c.aos - r.aos <= Duration::seconds(10));
        assert!(r.los <= c.los && c.los - r.los <= Duration::seconds(10));
    }
}

#[test]
fn two_hour_scan_brackets_peak_for_visible_passes() {
    let propagator = propagator();
    let observer = Observer::new(41.0, 29.0, 0.0).unwrap();
    let start = propagator.epoch();
    let scan = scan_passes(
        &propagator,
        &observer,
        start,
        start + Duration::hours(2),
        &PassSearch::default(),
    );

    for pass in scan.passes.iter().filter(|p| p.visible && !p.truncated) {
        assert!(pass.aos < pass.tca, "{:?}", pass);
        assert!(pass.tca < pass.los, "{:?}", pass);
    }
    for pair in scan.passes.windows(2) {
        assert!(pair[0].aos < pair[1].aos);
    }
}
