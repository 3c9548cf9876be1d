//! Summary Writer Module
//! Writes one statistic of a summary table as a header-less CSV.

use std::path::Path;
use thiserror::Error;

use super::model::format_float;
use crate::stats::SummaryTable;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which per-group statistic a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Std,
}

impl Statistic {
    /// Output file name prefix (`meanSenderall.csv`).
    pub fn file_prefix(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
        }
    }
}

pub struct SummaryWriter;

impl SummaryWriter {
    /// Write `statistic` for every group of `table` to `path`, replacing any
    /// existing file. Rows are `key,field1,field2,...` in table order.
    ///
    /// Returns the number of rows written.
    pub fn write(
        table: &SummaryTable,
        statistic: Statistic,
        path: &Path,
    ) -> Result<usize, WriterError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)?;

        for group in table.groups() {
            let values = match statistic {
                Statistic::Mean => group.means(),
                Statistic::Std => group.stds(),
            };

            let mut record = Vec::with_capacity(values.len() + 1);
            record.push(group.key().to_string());
            record.extend(values.iter().map(|v| format_float(*v)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(table.len())
    }
}
