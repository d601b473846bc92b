use tracing::info;

use crate::app::ports::RecordSource;
use crate::error::Result;
use crate::pipeline::processing::overview::{profile, DatasetOverview};

/// Use case for profiling a dataset produced by an earlier stage
pub struct OverviewUseCase {
    source: Box<dyn RecordSource>,
}

impl OverviewUseCase {
    pub fn new(source: Box<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub fn run(&self) -> Result<DatasetOverview> {
        let table = self.source.load()?;
        info!("Profiling {} scholarships from {}", table.len(), self.source.describe());
        Ok(profile(&table))
    }
}
