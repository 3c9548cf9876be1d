//! Statistics Calculator Module
//! Group-by-key aggregation of mean and sample standard deviation.

use std::collections::BTreeMap;
use tracing::warn;

use crate::data::{Dataset, GroupKey};

/// Running statistics for one field of one group.
///
/// The mean is `sum / count`; the variance uses Welford's update so large
/// offsets do not cancel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator {
    count: usize,
    sum: f64,
    running_mean: f64,
    m2: f64,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        let delta = value - self.running_mean;
        self.running_mean += delta / self.count as f64;
        self.m2 += delta * (value - self.running_mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, NaN when no values were pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    /// Sample variance (Bessel's correction), NaN below two values.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation, NaN below two values.
    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Descriptive statistics for a slice of values.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
}

/// Per-field statistics for one key.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    key: GroupKey,
    counts: Vec<usize>,
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl GroupSummary {
    fn from_accumulators(key: GroupKey, accumulators: &[Accumulator]) -> Self {
        Self {
            key,
            counts: accumulators.iter().map(Accumulator::count).collect(),
            means: accumulators.iter().map(Accumulator::mean).collect(),
            stds: accumulators.iter().map(Accumulator::std).collect(),
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Non-missing values seen per field.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}

/// Summaries for every distinct key of a dataset, ascending by key.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    key_column: String,
    fields: Vec<String>,
    groups: Vec<GroupSummary>,
    skipped_rows: usize,
}

impl SummaryTable {
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn groups(&self) -> &[GroupSummary] {
        &self.groups
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.iter().map(GroupSummary::key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Rows dropped because their key was missing.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Group `dataset` rows by key and summarize each field.
    ///
    /// Rows are visited once; only one accumulator per (key, field) is kept.
    pub fn summarize(dataset: &Dataset) -> SummaryTable {
        let width = dataset.fields().len();
        let mut groups: BTreeMap<GroupKey, Vec<Accumulator>> = BTreeMap::new();
        let mut skipped_rows = 0;

        for row in 0..dataset.len() {
            let Some(key) = dataset.key(row) else {
                skipped_rows += 1;
                continue;
            };

            let accumulators = groups
                .entry(key.clone())
                .or_insert_with(|| vec![Accumulator::default(); width]);

            for (field, acc) in accumulators.iter_mut().enumerate() {
                if let Some(v) = dataset.value(row, field) {
                    acc.push(v);
                }
            }
        }

        if skipped_rows > 0 {
            warn!(
                "Skipped {} rows with no '{}' value",
                skipped_rows,
                dataset.key_column()
            );
        }

        SummaryTable {
            key_column: dataset.key_column().to_string(),
            fields: dataset.fields().to_vec(),
            groups: groups
                .into_iter()
                .map(|(key, accs)| GroupSummary::from_accumulators(key, &accs))
                .collect(),
            skipped_rows,
        }
    }

    /// Compute mean and sample standard deviation of `values` directly.
    #[cfg(test)]
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
            };
        }

        let mean = values.iter().sum::<f64>() / n as f64;

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            f64::NAN
        };

        DescriptiveStats {
            count: n,
            mean,
            std: variance.sqrt(),
        }
    }
}
