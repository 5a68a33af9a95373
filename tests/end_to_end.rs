use crossover_study::engine::StopKind;
use crossover_study::error::Error;
use crossover_study::knapsack::KnapsackProblem;
use crossover_study::problem::LoadInstance;
use crossover_study::record::{CsvSink, RecordSink};
use crossover_study::runner::{RunConfig, Runner};
use crossover_study::set_covering::SetCoveringProblem;
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("crossover_study_{}_{}", std::process::id(), name));
    fs::write(&path, content).unwrap();
    path
}

fn scenario_config() -> RunConfig {
    RunConfig {
        population_size: 20,
        tournament_size: 4,
        stop_bound: 50,
        crossover_rate: 0.8,
        mutation_rate: 0.02,
        ..RunConfig::default()
    }
}

// 3 rows over 4 columns, row costs 2, 3 and 1; the third row alone covers
// every column, so the optimum selects exactly that row.
const SCP_TOY: &str = "3 4\n2 2 1 2\n3 2 2 3\n1 4 1 2 3 4\n";

// Two items with profit/weight (10, 5) and (6, 4) against one capacity of 5;
// the optimum takes the first item only.
const MKNAP_TOY: &str = "2 1 10\n10 6\n5 4\n5\n";

#[test]
fn set_covering_toy_converges_to_the_cheapest_cover() {
    let path = temp_file("scp_toy.txt", SCP_TOY);
    let mut runner =
        Runner::<SetCoveringProblem>::from_file(&path, StopKind::Generations).unwrap();
    let result = runner.execute(&scenario_config(), |_, _| {}).unwrap();

    assert_eq!(result.selected, vec![3]);
    assert_eq!(result.solution_size(), 1);
    assert!((result.total_cost - 1.0).abs() < 1e-9);
    assert_eq!(result.convergence.len(), 50);

    assert_eq!(runner.problem().num_columns(), 4);
    fs::remove_file(&path).unwrap();
}

#[test]
fn knapsack_toy_converges_to_the_single_best_item() {
    let path = temp_file("mknap_toy.txt", MKNAP_TOY);
    let mut runner = Runner::<KnapsackProblem>::from_file(&path, StopKind::Generations).unwrap();
    let result = runner.execute(&scenario_config(), |_, _| {}).unwrap();

    assert_eq!(result.selected, vec![1]);
    assert!((result.total_cost - 10.0).abs() < 1e-9);
    assert_eq!(runner.formatted_solution().unwrap(), "1");

    fs::remove_file(&path).unwrap();
}

#[test]
fn convergence_is_reported_in_true_cost_units() {
    let path = temp_file("scp_units.txt", SCP_TOY);
    let mut runner =
        Runner::<SetCoveringProblem>::from_file(&path, StopKind::Generations).unwrap();
    let result = runner.execute(&scenario_config(), |_, _| {}).unwrap();

    // The cheapest possible cover costs 1, and no penalized cost is below
    // that, so every reported value sits at or above the optimum.
    assert!(result.convergence.iter().all(|&cost| cost >= 1.0 - 1e-9));
    // The trace must end at the converged optimum, not at its inverse.
    assert!((result.convergence.last().unwrap() - 1.0).abs() < 1e-9);

    fs::remove_file(&path).unwrap();
}

#[test]
fn executed_run_records_through_the_csv_sink() {
    let instance = temp_file("scp_record.txt", SCP_TOY);
    let db = std::env::temp_dir().join(format!(
        "crossover_study_{}_records.csv",
        std::process::id()
    ));
    let _ = fs::remove_file(&db);

    let mut runner =
        Runner::<SetCoveringProblem>::from_file(&instance, StopKind::Generations).unwrap();
    let config = scenario_config();
    runner.execute(&config, |_, _| {}).unwrap();

    let record = runner.record("set-covering", &config).unwrap();
    let mut sink = CsvSink::new(&db);
    sink.record(&record).unwrap();

    let text = fs::read_to_string(&db).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("recorded_at,"));
    assert!(lines[1].contains("set-covering"));
    assert!(lines[1].contains("scp_record.txt"));

    fs::remove_file(&instance).unwrap();
    fs::remove_file(&db).unwrap();
}

#[test]
fn malformed_instances_fail_with_a_parse_error() {
    let path = temp_file("scp_broken.txt", "3 4\n2 2 1\n");
    let result = SetCoveringProblem::from_instance_file(&path);
    assert!(matches!(result, Err(Error::InstanceParse { .. })));

    let missing = std::env::temp_dir().join("crossover_study_does_not_exist.txt");
    assert!(matches!(
        KnapsackProblem::from_instance_file(&missing),
        Err(Error::InstanceParse { .. })
    ));

    fs::remove_file(&path).unwrap();
}

#[test]
fn observer_runs_once_per_generation_without_steering_the_run() {
    let path = temp_file("scp_observer.txt", SCP_TOY);
    let mut runner =
        Runner::<SetCoveringProblem>::from_file(&path, StopKind::Generations).unwrap();
    let mut generations = 0u32;
    let result = runner
        .execute(&scenario_config(), |_, population| {
            generations += 1;
            assert_eq!(population.len(), 20);
        })
        .unwrap();
    assert_eq!(generations, 50);
    assert_eq!(result.convergence.len(), 50);

    fs::remove_file(&path).unwrap();
}
