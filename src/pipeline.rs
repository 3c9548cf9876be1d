//! Aggregation pipeline.
//!
//! Reads the sender and receiver tables of each category, summarizes them by
//! key, and writes the mean and standard-deviation tables next to the inputs.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::data::{DataLoader, Statistic, SummaryWriter};
use crate::stats::{StatsCalculator, SummaryTable};

/// Side of the transfer a table was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sender,
    Receiver,
}

impl Role {
    /// Input file stem (`csv-sender-all.csv`).
    fn input_stem(self) -> &'static str {
        match self {
            Role::Sender => "sender",
            Role::Receiver => "receiver",
        }
    }

    /// Output file infix (`meanSenderall.csv`).
    fn output_label(self) -> &'static str {
        match self {
            Role::Sender => "Sender",
            Role::Receiver => "Receiver",
        }
    }
}

/// Locations and names used by a run.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Holds both the inputs and the outputs.
    pub csv_dir: PathBuf,
    /// Created if missing, otherwise untouched.
    pub graphs_dir: PathBuf,
    /// Category suffixes; each selects one sender/receiver input pair.
    pub categories: Vec<String>,
    pub key_column: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from("csv"),
            graphs_dir: PathBuf::from("graphes"),
            categories: vec!["all".to_string()],
            key_column: "key".to_string(),
        }
    }
}

/// One output file produced by a run.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: Vec<WrittenFile>,
}

pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn input_path(&self, role: Role, category: &str) -> PathBuf {
        self.config
            .csv_dir
            .join(format!("csv-{}-{}.csv", role.input_stem(), category))
    }

    pub fn output_path(&self, statistic: Statistic, role: Role, category: &str) -> PathBuf {
        self.config.csv_dir.join(format!(
            "{}{}{}.csv",
            statistic.file_prefix(),
            role.output_label(),
            category
        ))
    }

    /// Process every configured category. The first failure aborts the run.
    pub fn run(&self) -> Result<RunReport> {
        ensure_dir(&self.config.graphs_dir)?;

        let mut report = RunReport::default();
        for category in &self.config.categories {
            info!("Summarizing category '{}'", category);
            let files = self
                .summarize_category(category)
                .with_context(|| format!("Category '{category}' failed"))?;
            report.files.extend(files);
        }

        Ok(report)
    }

    /// Load both tables of `category`, then write its four summary files.
    pub fn summarize_category(&self, category: &str) -> Result<Vec<WrittenFile>> {
        let sender = self.summarize_role(Role::Sender, category)?;
        let receiver = self.summarize_role(Role::Receiver, category)?;

        let outputs = [
            (Statistic::Mean, Role::Sender, &sender),
            (Statistic::Mean, Role::Receiver, &receiver),
            (Statistic::Std, Role::Sender, &sender),
            (Statistic::Std, Role::Receiver, &receiver),
        ];

        let mut files = Vec::with_capacity(outputs.len());
        for (statistic, role, table) in outputs {
            let path = self.output_path(statistic, role, category);
            let rows = SummaryWriter::write(table, statistic, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} ({} rows)", path.display(), rows);
            files.push(WrittenFile { path, rows });
        }

        Ok(files)
    }

    fn summarize_role(&self, role: Role, category: &str) -> Result<SummaryTable> {
        let path = self.input_path(role, category);
        let dataset = DataLoader::load_csv(&path, &self.config.key_column)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if dataset.is_empty() {
            debug!("{} has no data rows", path.display());
        }

        let table = StatsCalculator::summarize(&dataset);
        let values: usize = table.groups().iter().flat_map(|g| g.counts()).sum();
        debug!(
            "{}: {} groups by '{}' over {} fields ({} values)",
            path.display(),
            table.len(),
            table.key_column(),
            table.fields().len(),
            values
        );
        if let (Some(first), Some(last)) = (table.keys().next(), table.keys().last()) {
            debug!("{}: keys {} to {}", path.display(), first, last);
        }

        Ok(table)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        debug!("Created {}", path.display());
    }
    Ok(())
}
