//! Unit tests for itinerary decoding.

use rstest::rstest;

use super::*;
use crate::assignment::DimensionValues;
use crate::test_support::{checkpoint_model, scenario_a_model};

fn flights(itinerary: &Itinerary) -> Vec<usize> {
    itinerary.records.iter().map(|record| record.flight).collect()
}

#[rstest]
fn scenario_a_flies_a_single_flight() {
    let model = scenario_a_model();
    let assignment = model.evaluate_routes(&[vec![1, 2]]).expect("feasible route");
    let report = decode(&model, &assignment, &ReportColumns::default()).expect("decodes");
    let itinerary = report.itineraries.first().expect("one itinerary");
    assert_eq!(flights(itinerary), vec![1, 1, 1, 1]);
    let nodes: Vec<&str> = itinerary.records.iter().map(|r| r.node.as_str()).collect();
    assert_eq!(nodes, vec!["HUB", "A-1", "B-1", "HUB"]);
    assert_eq!(itinerary.makespan, 45);
    assert_eq!(report.total_makespan, 45);
    assert!(report.unvisited.is_empty());
}

#[rstest]
fn flight_counter_increments_before_trigger_record() {
    let model = checkpoint_model();
    let assignment = model
        .evaluate_routes(&[vec![1, 2, 6, 3, 4, 7]])
        .expect("feasible route");
    let report = decode(&model, &assignment, &ReportColumns::default()).expect("decodes");
    let itinerary = report.itineraries.first().expect("vehicle 0");
    assert_eq!(flights(itinerary), vec![1, 1, 1, 2, 2, 2, 3, 3]);
    assert_eq!(itinerary.flights(), 3);
}

#[rstest]
fn boundary_checkpoint_does_not_start_a_flight() {
    let model = checkpoint_model();
    let assignment = model
        .evaluate_routes(&[vec![1, 2, 5]])
        .expect("feasible route");
    let report = decode(&model, &assignment, &ReportColumns::default()).expect("decodes");
    let itinerary = report.itineraries.first().expect("vehicle 0");
    assert!(itinerary.records.iter().all(|record| record.flight == 1));
}

#[rstest]
fn idle_vehicle_reports_start_and_return() {
    let model = checkpoint_model();
    let assignment = model
        .evaluate_routes(&[vec![1, 2, 3, 4]])
        .expect("feasible route");
    let report = decode(&model, &assignment, &ReportColumns::default()).expect("decodes");
    let idle = report.itineraries.get(1).expect("vehicle 1");
    let nodes: Vec<NodeIndex> = idle.records.iter().map(|r| r.node_id).collect();
    assert_eq!(nodes, vec![DEPOT, DEPOT]);
    assert_eq!(idle.makespan, 0);
    assert_eq!(report.unvisited, vec![5, 6, 7]);
}

#[rstest]
fn values_follow_column_order() {
    let model = scenario_a_model();
    let assignment = model.evaluate_routes(&[vec![1, 2]]).expect("feasible route");
    let columns = ReportColumns::new([DimensionId::Load, DimensionId::GlobalTime]);
    let report = decode(&model, &assignment, &columns).expect("decodes");
    let delivery = report
        .itineraries
        .first()
        .and_then(|itinerary| itinerary.records.get(2))
        .expect("delivery record");
    assert_eq!(delivery.values, vec![80, 25]);
    assert_eq!(report.columns, vec![DimensionId::Load, DimensionId::GlobalTime]);
}

#[rstest]
fn missing_cumul_is_reported() {
    let model = scenario_a_model();
    let mut assignment = model.evaluate_routes(&[vec![1, 2]]).expect("feasible route");
    if let Some(visit) = assignment
        .routes
        .get_mut(0)
        .and_then(|route| route.visits.get_mut(1))
    {
        visit.cumuls = DimensionValues::default();
    }
    let err = decode(&model, &assignment, &ReportColumns::default()).expect_err("gap");
    assert_eq!(
        err,
        ReportingError::MissingCumul {
            dimension: DimensionId::GlobalTime,
            vehicle: 0,
            node: 1
        }
    );
}

#[cfg(feature = "serde")]
#[rstest]
fn json_report_keeps_column_order() {
    let model = scenario_a_model();
    let assignment = model.evaluate_routes(&[vec![1, 2]]).expect("feasible route");
    let report = decode(&model, &assignment, &ReportColumns::default()).expect("decodes");
    let json = serde_json::to_value(&report).expect("serialises");
    assert_eq!(
        json["columns"],
        serde_json::json!([
            "global-time",
            "global-distance",
            "reload-time",
            "reload-distance",
            "load",
            "landing"
        ])
    );
    assert_eq!(json["itineraries"][0]["records"][3]["node_id"], 0);
}
