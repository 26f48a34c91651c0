//! Cycle orchestration: the stop signal, per-cycle reports and the scheduler
//! loop that ties registries, fetcher, normalizer and aggregator together.

mod report;
mod scheduler;
mod stop;


pub use report::{CycleReport, CycleStats, CycleStatus, MinerPriceRecord};
pub use scheduler::{
    CyclePhase, CyclePolicy, CycleScheduler, ReportSink, RunSummary, SchedulerConfig,
};
pub use stop::StopSignal;
