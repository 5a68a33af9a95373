//! Set covering: select rows so every column is covered by at least one of
//! them, at minimum total row cost.
//!
//! Instance format: a `rows cols` header, then one line per row holding the
//! row cost, the number of covered columns and the 1-based column indices.

use crate::encoding::Chromosome;
use crate::error::Error;
use crate::problem::{LoadInstance, Problem, Sense};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct SetCoveringProblem {
    num_columns: usize,
    costs: Vec<f64>,
    // Columns covered by each row, 0-based.
    covers: Vec<Vec<usize>>,
    // One uncovered column costs as much as selecting every row, so a full
    // cover always outranks a partial one.
    penalty: f64,
}

impl SetCoveringProblem {
    /// Builds an instance from `(cost, covered columns)` rows. Column indices
    /// are 1-based, matching the file format.
    pub fn new(num_columns: usize, rows: Vec<(f64, Vec<usize>)>) -> Result<Self, Error> {
        if num_columns == 0 {
            return Err(Error::configuration("set covering needs at least one column"));
        }
        if rows.is_empty() {
            return Err(Error::configuration("set covering needs at least one row"));
        }
        let mut costs = Vec::with_capacity(rows.len());
        let mut covers = Vec::with_capacity(rows.len());
        for (index, (cost, columns)) in rows.into_iter().enumerate() {
            if cost <= 0.0 {
                return Err(Error::configuration(format!(
                    "row {} has non-positive cost {}",
                    index + 1,
                    cost
                )));
            }
            let mut row = Vec::with_capacity(columns.len());
            for column in columns {
                if column == 0 || column > num_columns {
                    return Err(Error::configuration(format!(
                        "row {} covers column {} outside 1..={}",
                        index + 1,
                        column,
                        num_columns
                    )));
                }
                row.push(column - 1);
            }
            costs.push(cost);
            covers.push(row);
        }
        let penalty = costs.iter().sum();
        Ok(Self {
            num_columns,
            costs,
            covers,
            penalty,
        })
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// How many selected rows cover each column.
    pub fn coverage(&self, chromosome: &Chromosome) -> Vec<u32> {
        let mut counts = vec![0u32; self.num_columns];
        for (row, selected) in self.covers.iter().zip(chromosome.bits()) {
            if *selected {
                for &column in row {
                    counts[column] += 1;
                }
            }
        }
        counts
    }

    pub fn is_cover(&self, chromosome: &Chromosome) -> bool {
        self.coverage(chromosome).iter().all(|&count| count > 0)
    }

    fn selected_cost(&self, chromosome: &Chromosome) -> f64 {
        self.costs
            .iter()
            .zip(chromosome.bits())
            .filter(|(_, &selected)| selected)
            .map(|(cost, _)| cost)
            .sum()
    }

    fn parse(text: &str) -> Result<Self, String> {
        let mut tokens = text.split_whitespace();
        let mut next = |what: &str| -> Result<f64, String> {
            let token = tokens
                .next()
                .ok_or_else(|| format!("unexpected end of file, expected {}", what))?;
            token
                .parse::<f64>()
                .map_err(|_| format!("expected {} but found {:?}", what, token))
        };

        let num_rows = next("row count")? as usize;
        let num_columns = next("column count")? as usize;
        if num_rows == 0 || num_columns == 0 {
            return Err("row and column counts must be positive".into());
        }

        let mut rows = Vec::with_capacity(num_rows);
        for _ in 0..num_rows {
            let cost = next("row cost")?;
            let covered = next("covered column count")? as usize;
            let columns = (0..covered)
                .map(|_| next("column index").map(|column| column as usize))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push((cost, columns));
        }

        SetCoveringProblem::new(num_columns, rows).map_err(|error| error.to_string())
    }
}

impl LoadInstance for SetCoveringProblem {
    fn from_instance_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|error| Error::instance_parse(path.display().to_string(), error.to_string()))?;
        Self::parse(&text)
            .map_err(|message| Error::instance_parse(path.display().to_string(), message))
    }
}

impl Problem for SetCoveringProblem {
    fn dimension(&self) -> usize {
        self.costs.len()
    }

    fn sense(&self) -> Sense {
        Sense::Minimize
    }

    // Fitness is the inverse of the (penalized) cover cost, so the engine's
    // "larger is better" comparison minimizes cost. The penalized cost is
    // always positive: uncovered columns charge the penalty, and a full cover
    // selects at least one row with positive cost.
    fn objective(&self, chromosome: &Chromosome) -> f64 {
        let uncovered = self
            .coverage(chromosome)
            .iter()
            .filter(|&&count| count == 0)
            .count();
        let cost = self.selected_cost(chromosome) + self.penalty * uncovered as f64;
        1.0 / cost
    }

    fn display_info(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            out,
            "Set covering: {} rows, {} columns",
            self.costs.len(),
            self.num_columns
        )
    }
}
