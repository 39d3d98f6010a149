//! Property-based tests for the vrp-core engine.
//!
//! # Invariants tested
//!
//! - **Consistency:** every returned assignment passes model validation.
//! - **Coverage:** every demand pair is served, on one aircraft, pickup first.
//! - **Landing budget:** inserted reload checkpoints keep every tour within
//!   the landing budget.

use std::time::Duration;

use proptest::prelude::*;
use sortie_core::test_support::{checkpoint_data, standard_model};
use sortie_core::{
    AircraftProfile, DimensionId, ProblemData, RoutingEngine, RoutingModel, SearchConfig,
};
use sortie_solver_vrp::VrpEngine;

fn model_strategy() -> impl Strategy<Value = RoutingModel> {
    (
        prop::collection::vec(prop::collection::vec(1_i64..50, 8), 8),
        2_i64..6,
        1_usize..3,
    )
        .prop_map(|(time, max_landings, vehicles)| {
            let data = checkpoint_data();
            standard_model(ProblemData {
                distance_matrix: time.clone(),
                time_matrix: time,
                num_vehicles: vehicles,
                aircraft: AircraftProfile {
                    max_landings_per_route: max_landings,
                    ..data.aircraft
                },
                ..data
            })
        })
}

fn search() -> SearchConfig {
    SearchConfig {
        time_limit: Duration::from_secs(2),
        max_generations: Some(10),
        ..SearchConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn solved_assignments_validate(model in model_strategy()) {
        let assignment = VrpEngine::new().solve(&model, &search()).expect("solve succeeds");
        prop_assert_eq!(model.validate_assignment(&assignment), Ok(()));
    }

    #[test]
    fn demand_pairs_are_served_in_order(model in model_strategy()) {
        let assignment = VrpEngine::new().solve(&model, &search()).expect("solve succeeds");
        for pair in model.demand_pairs() {
            let pickup = assignment.find_visit(pair.pickup);
            let delivery = assignment.find_visit(pair.delivery);
            prop_assert!(pickup.is_some() && delivery.is_some(), "pair {:?} dropped", pair);
            if let (Some((vp, p)), Some((vd, d))) = (pickup, delivery) {
                prop_assert_eq!(vp, vd);
                let at = |visit: &sortie_core::Visit| visit.cumuls.get(DimensionId::GlobalTime);
                prop_assert!(at(p) <= at(d));
            }
        }
    }

    #[test]
    fn tours_respect_the_landing_budget(model in model_strategy()) {
        let assignment = VrpEngine::new().solve(&model, &search()).expect("solve succeeds");
        let landing = model.dimension(DimensionId::Landing).expect("landing dimension");
        for route in &assignment.routes {
            for visit in &route.visits {
                let cumul = visit.cumuls.get(DimensionId::Landing).expect("landing cumul");
                prop_assert!(cumul <= landing.capacity(route.vehicle));
            }
        }
    }
}
