// Integration tests for the step semantics

use num_bigint::BigInt;
use warpgrid::board::{Coord, Grid, OpCode, Value};
use warpgrid::interpreter::{Outcome, SimConfig, SimError, Simulator, run};
use warpgrid::parser::parse_grid;

fn simulator(layout: &str) -> Simulator {
    let grid = parse_grid(layout).expect("Parsing failed");
    Simulator::new(grid, SimConfig::default())
}

fn cell(grid: &Grid, x: i64, y: i64) -> Option<&Value> {
    grid.get(Coord::new(x, y))
}

fn demo(name: &str) -> Grid {
    let path = format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name);
    let source = std::fs::read_to_string(path).expect("Failed to read demo file");
    parse_grid(&source).expect("Parsing failed")
}

#[test]
fn test_mover_transfers_value() {
    let mut sim = simulator("7 > .");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 0, 0), None);
    assert_eq!(cell(next, 2, 0), Some(&Value::from(7)));
    assert_eq!(cell(next, 1, 0), Some(&Value::Op(OpCode::MoveRight)));
}

#[test]
fn test_up_mover_transfers_value() {
    let mut sim = simulator(". . .\n. ^ .\n. 5 .");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 1, 2), None);
    assert_eq!(cell(next, 1, 0), Some(&Value::from(5)));
    assert_eq!(cell(next, 1, 1), Some(&Value::Op(OpCode::MoveUp)));
}

#[test]
fn test_mover_with_empty_source_changes_nothing() {
    let mut sim = simulator(". > 3");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 0, 0), None);
    assert_eq!(cell(next, 2, 0), Some(&Value::from(3)));
    assert_eq!(next, sim.timeline().get(1).unwrap());
}

#[test]
fn test_addition_writes_right_and_down() {
    let mut sim = simulator(". 4 .\n3 + .\n. . .");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 2, 1), Some(&Value::from(7)));
    assert_eq!(cell(next, 1, 2), Some(&Value::from(7)));
    assert_eq!(cell(next, 0, 1), None);
    assert_eq!(cell(next, 1, 0), None);
    // the operator itself stays in place
    assert_eq!(cell(next, 1, 1), Some(&Value::Op(OpCode::Add)));
    assert_eq!(sim.current_time(), 2);
}

#[test]
fn test_multiplication_writes_right_and_down() {
    let mut sim = simulator(". 6 .\n-3 * .\n. . .");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 2, 1), Some(&Value::from(-18)));
    assert_eq!(cell(next, 1, 2), Some(&Value::from(-18)));
    assert_eq!(cell(next, 0, 1), None);
    assert_eq!(cell(next, 1, 0), None);
}

#[test]
fn test_reads_come_from_the_pre_step_snapshot() {
    // the second mover still sees 2, not the 1 that is moving in
    let mut sim = simulator("1 > 2 > .");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 0, 0), None);
    assert_eq!(cell(next, 2, 0), Some(&Value::from(1)));
    assert_eq!(cell(next, 4, 0), Some(&Value::from(2)));
}

#[test]
fn test_writes_overwrite_occupied_destinations() {
    let mut sim = simulator("1 > 9");
    sim.step().expect("Step failed");

    assert_eq!(cell(sim.timeline().current(), 2, 0), Some(&Value::from(1)));
}

#[test]
fn test_identical_concurrent_writes_are_allowed() {
    let mut sim = simulator("1 > . < 1");
    sim.step().expect("Step failed");

    let next = sim.timeline().current();
    assert_eq!(cell(next, 2, 0), Some(&Value::from(1)));
    assert_eq!(cell(next, 0, 0), None);
    assert_eq!(cell(next, 4, 0), None);
}

#[test]
fn test_different_concurrent_writes_conflict() {
    let mut sim = simulator("1 > . < 2");
    let err = sim.step().unwrap_err();

    assert_eq!(
        err,
        SimError::WriteConflict {
            coord: Coord::new(2, 0),
            existing: Value::from(1),
            incoming: Value::from(2),
        }
    );
}

#[test]
fn test_failed_step_leaves_history_untouched() {
    let mut sim = simulator("1 > . < 2");
    let before = sim.timeline().current().clone();

    assert!(sim.step().is_err());
    assert_eq!(sim.current_time(), 1);
    assert_eq!(sim.steps(), 0);
    assert_eq!(sim.trace().len(), 1);
    assert_eq!(sim.timeline().current(), &before);
}

#[test]
fn test_direct_submission() {
    let mut sim = simulator("42 > S");
    assert_eq!(sim.run(), Ok(Outcome::Submitted(Value::from(42))));
    assert_eq!(sim.steps(), 1);
}

#[test]
fn test_submission_on_a_later_step() {
    let mut sim = simulator(". 42\n. v\n. .\n. v\n. S");
    assert_eq!(sim.run(), Ok(Outcome::Submitted(Value::from(42))));
    assert_eq!(sim.steps(), 2);
    assert_eq!(sim.result(), Some(&Value::from(42)));
}

#[test]
fn test_same_value_into_two_submit_cells() {
    let mut sim = simulator("1 > S S < 1");
    assert_eq!(sim.run(), Ok(Outcome::Submitted(Value::from(1))));
}

#[test]
fn test_two_results_in_one_step() {
    let mut sim = simulator("1 > S S < 2");
    let err = sim.run().unwrap_err();

    assert_eq!(
        err,
        SimError::MultipleSubmissions {
            values: vec![Value::from(1), Value::from(2)],
        }
    );
}

#[test]
fn test_submitting_twice() {
    let mut sim = simulator("1 > S . S < . < 2");

    let first = sim.step().expect("Step failed");
    assert_eq!(first.submitted, Some(Value::from(1)));

    let err = sim.step().unwrap_err();
    assert_eq!(
        err,
        SimError::MultipleSubmissions {
            values: vec![Value::from(1), Value::from(2)],
        }
    );
    assert_eq!(sim.result(), Some(&Value::from(1)));
    // the refused step commits nothing
    assert_eq!(sim.steps(), 1);
    assert_eq!(sim.timeline().len(), 2);
    assert_eq!(sim.trace().len(), 2);
}

#[test]
fn test_step_budget_is_not_an_error() {
    let grid = parse_grid("1 > . . .").expect("Parsing failed");
    let report = run(grid, &BigInt::from(0), &BigInt::from(0), 5).expect("Run failed");

    assert_eq!(report.outcome, Outcome::StepBudgetExceeded);
    assert_eq!(report.steps, 5);
    assert_eq!(report.timeline.len(), 6);
    assert!(report.timeline.result().is_none());
}

#[test]
fn test_placeholders_must_be_substituted() {
    let mut sim = simulator(". A .\nB + S");
    assert!(matches!(
        sim.step(),
        Err(SimError::PlaceholderLeak { .. })
    ));
}

#[test]
fn test_add_demo() {
    let report = run(demo("add.3d"), &BigInt::from(3), &BigInt::from(4), 10).expect("Run failed");
    assert_eq!(report.outcome, Outcome::Submitted(Value::from(7)));

    let huge: BigInt = "100000000000000000000".parse().unwrap();
    let report = run(demo("add.3d"), &huge, &BigInt::from(1), 10).expect("Run failed");
    assert_eq!(
        report.outcome,
        Outcome::Submitted(Value::Int("100000000000000000001".parse().unwrap()))
    );
}

#[test]
fn test_equal_demo() {
    let report = run(demo("equal.3d"), &BigInt::from(5), &BigInt::from(5), 10).expect("Run failed");
    assert_eq!(report.outcome, Outcome::Submitted(Value::from(5)));

    let report = run(demo("equal.3d"), &BigInt::from(5), &BigInt::from(6), 10).expect("Run failed");
    assert_eq!(report.outcome, Outcome::StepBudgetExceeded);
}

#[test]
fn test_trace_disabled() {
    let config = SimConfig {
        max_steps: 3,
        record_trace: false,
    };
    let mut sim = Simulator::new(parse_grid("1 > . .").unwrap(), config);
    assert_eq!(sim.run(), Ok(Outcome::StepBudgetExceeded));
    assert!(sim.trace().is_empty());
    assert_eq!(sim.space_used().ticks, 4);
}
