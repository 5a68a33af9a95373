//! Run records and the "record a run" persistence contract.

use crate::crossover::Crossover;
use crate::engine::StopKind;
use crate::error::Error;
use crate::runner::{RunConfig, RunResult};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One row of run output: the normalized result plus the parameters that
/// produced it, flat so it serializes straight into a CSV record.
#[derive(Clone, Debug, Serialize)]
pub struct RunRecord {
    pub recorded_at: String,
    pub problem: String,
    pub instance_file: String,
    pub population_size: usize,
    pub stop_criterion: String,
    pub stop_bound: u32,
    pub tournament_size: usize,
    pub crossover: String,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub duration_ms: u64,
    pub num_selected: usize,
    pub total_cost: f64,
    pub solution: String,
    pub convergence: String,
}

impl RunRecord {
    pub fn new(
        problem: &str,
        stop_kind: StopKind,
        config: &RunConfig,
        result: &RunResult,
    ) -> Result<Self, Error> {
        let crossover = Crossover::from_id(config.crossover_id)?;
        Ok(Self {
            recorded_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            problem: problem.to_string(),
            instance_file: result.instance_file.clone(),
            population_size: config.population_size,
            stop_criterion: stop_kind.label().to_string(),
            stop_bound: config.stop_bound,
            tournament_size: config.tournament_size,
            crossover: crossover.name().to_string(),
            crossover_rate: config.crossover_rate,
            mutation_rate: config.mutation_rate,
            duration_ms: result.duration.as_millis() as u64,
            num_selected: result.solution_size(),
            total_cost: result.total_cost,
            solution: result.formatted_solution(),
            convergence: sequence_to_string(&result.convergence),
        })
    }
}

/// Space-joined rendering for sequence-valued record fields.
pub fn sequence_to_string<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// The narrow contract the harness depends on. A failed save never
// invalidates the computed result; callers may retry it independently.
pub trait RecordSink {
    fn record(&mut self, record: &RunRecord) -> Result<(), Error>;
}

/// Appends rows to a CSV file, writing the header only when the file starts
/// out empty.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn record(&mut self, record: &RunRecord) -> Result<(), Error> {
        append_csv_row(&self.path, record)
    }
}

/// Appends one serializable row to a CSV file, creating it (with a header)
/// on first use.
pub fn append_csv_row<T: Serialize>(path: &Path, row: &T) -> Result<(), Error> {
    let fail = |error: &dyn std::fmt::Display| {
        Error::persistence(format!("{}: {}", path.display(), error))
    };
    let write_header = fs::metadata(path).map(|meta| meta.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| fail(&error))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    writer.serialize(row).map_err(|error| fail(&error))?;
    writer.flush().map_err(|error| fail(&error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_record() -> RunRecord {
        let result = RunResult {
            instance_file: "toy.txt".into(),
            selected: vec![1, 3],
            total_cost: 16.0,
            duration: Duration::from_millis(120),
            convergence: vec![10.0, 16.0],
        };
        RunRecord::new(
            "knapsack",
            StopKind::Generations,
            &RunConfig::default(),
            &result,
        )
        .unwrap()
    }

    #[test]
    fn sequences_join_with_spaces() {
        assert_eq!(sequence_to_string(&[1, 3, 5]), "1 3 5");
        assert_eq!(sequence_to_string::<u32>(&[]), "");
    }

    #[test]
    fn record_carries_result_and_parameters() {
        let record = sample_record();
        assert_eq!(record.solution, "1 3");
        assert_eq!(record.num_selected, 2);
        assert_eq!(record.total_cost, 16.0);
        assert_eq!(record.duration_ms, 120);
        assert_eq!(record.crossover, "One-point");
        assert_eq!(record.stop_criterion, "generations");
        assert_eq!(record.convergence, "10 16");
    }

    #[test]
    fn record_rejects_an_unknown_crossover_id() {
        let result = RunResult {
            instance_file: "toy.txt".into(),
            selected: vec![],
            total_cost: 0.0,
            duration: Duration::ZERO,
            convergence: vec![],
        };
        let config = RunConfig {
            crossover_id: 99,
            ..RunConfig::default()
        };
        assert!(matches!(
            RunRecord::new("knapsack", StopKind::Generations, &config, &result),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn csv_sink_appends_and_writes_one_header() {
        let path = std::env::temp_dir().join(format!(
            "crossover_study_sink_{}.csv",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let mut sink = CsvSink::new(&path);
        sink.record(&sample_record()).unwrap();
        sink.record(&sample_record()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("recorded_at,"));
        assert!(lines[1].contains("toy.txt"));
        assert!(lines[2].contains("toy.txt"));

        fs::remove_file(&path).unwrap();
    }
}
