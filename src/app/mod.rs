pub mod clean_use_case;
pub mod overview_use_case;
pub mod ports;

pub use clean_use_case::{CleanUseCase, RunReport};
pub use overview_use_case::OverviewUseCase;
