//! Data module - CSV loading and summary writing

mod loader;
mod model;
mod writer;

pub use loader::{DataLoader, LoaderError};
pub use model::{Dataset, GroupKey};
pub use writer::{Statistic, SummaryWriter};
