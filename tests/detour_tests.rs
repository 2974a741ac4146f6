//! Detour cost tests against real Bangkok geometry.

mod fixtures;

use trip_engine::config::EngineConfig;
use trip_engine::detour::{nearest_step, DetourEstimator, SearchPlan};
use trip_engine::geometry::{point_to_segment_distance, spherical_distance};
use trip_engine::{Coordinates, Place, RouteStep};

use fixtures::{all_places, route, Location, FAR_AWAY, HOTEL, SIAM};

const ON_THE_WAY: Location = Location::new("Pratunam Pier", 13.7510, 100.5180);

fn hotel_to_siam() -> Vec<RouteStep> {
    vec![RouteStep::new(HOTEL.coords(), SIAM.coords())]
}

#[test]
fn candidate_on_the_way_is_accepted() {
    let estimator = DetourEstimator::default();
    let found = estimator
        .estimate(&ON_THE_WAY.place(), &hotel_to_siam(), 2_000.0)
        .expect("candidate inside the corridor");

    assert!(found.distance_from_route < 500.0, "got {}", found.distance_from_route);
    assert_eq!(found.order, 0);
    assert!(found.detour_cost <= 1);
}

#[test]
fn distant_candidate_is_rejected() {
    let estimator = DetourEstimator::default();
    assert!(estimator.estimate(&FAR_AWAY.place(), &hotel_to_siam(), 2_000.0).is_none());
    assert!(estimator.estimate(&FAR_AWAY.place(), &hotel_to_siam(), 5_000.0).is_none());
}

#[test]
fn accepted_candidates_stay_inside_the_corridor() {
    let estimator = DetourEstimator::default();
    let steps = hotel_to_siam();

    for radius in [500.0, 1_000.0, 2_000.0, 5_000.0] {
        for found in estimator.along_route(&all_places(), &steps, radius) {
            assert!(found.distance_from_route < radius);
        }
    }
}

#[test]
fn detour_cost_grows_with_distance() {
    let estimator = DetourEstimator::default();
    let steps = hotel_to_siam();
    let mut matches = estimator.along_route(&all_places(), &steps, 5_000.0);
    assert!(matches.len() > 3);

    matches.sort_by(|a, b| a.distance_from_route.total_cmp(&b.distance_from_route));
    for pair in matches.windows(2) {
        assert!(pair[0].detour_cost <= pair[1].detour_cost);
    }
}

#[test]
fn multi_step_route_orders_by_position() {
    // Hotel -> Siam -> Victory Monument
    let victory = Coordinates::new(13.7649, 100.5383);
    let steps = vec![
        RouteStep::new(HOTEL.coords(), SIAM.coords()),
        RouteStep::new(SIAM.coords(), victory),
    ];

    let near_victory = Location::new("Phaya Thai", 13.7600, 100.5360).place();
    let near_hotel = Location::new("Golden Mount", 13.7539, 100.5068).place();

    let matches = DetourEstimator::default().along_route(&[near_victory, near_hotel], &steps, 2_000.0);
    let ids: Vec<&str> = matches.iter().map(|found| found.place.id.as_str()).collect();

    assert_eq!(ids, vec!["golden-mount", "phaya-thai"]);
    assert_eq!(matches[1].order, 1);
}

#[test]
fn route_places_carry_step_order_and_cost() {
    let matches = DetourEstimator::default().along_route(&[ON_THE_WAY.place()], &hotel_to_siam(), 2_000.0);
    let route_place = matches[0].to_route_place();
    assert_eq!(route_place.place_id, "pratunam-pier");
    assert_eq!(route_place.order, 0);
}

#[test]
fn open_route_plans_a_corridor() {
    let open = route("r1", &HOTEL, &SIAM, &[]);
    let plan = SearchPlan::for_route(&open, None, None, &EngineConfig::default()).unwrap();
    assert_eq!(
        plan,
        SearchPlan::Corridor {
            steps: hotel_to_siam(),
            radius_m: 2_000.0
        }
    );
}

#[test]
fn general_search_uses_wide_radius() {
    let plan = SearchPlan::around(HOTEL.coords(), &EngineConfig::default());
    assert_eq!(plan.radius_m(), 5_000.0);

    let candidates: Vec<Place> = vec![ON_THE_WAY.place(), FAR_AWAY.place()];
    let matches = DetourEstimator::default().score(&plan, &candidates);
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].distance_from_route,
        spherical_distance(HOTEL.coords(), ON_THE_WAY.coords())
    );
}

#[test]
fn degenerate_step_measures_from_the_point() {
    let point = ON_THE_WAY.coords();
    let here = HOTEL.coords();
    assert_eq!(point_to_segment_distance(point, here, here), spherical_distance(point, here));
    let (index, distance) = nearest_step(point, &[RouteStep::new(here, here)]).unwrap();
    assert_eq!(index, 0);
    assert_eq!(distance, spherical_distance(point, here));
}
