//! Application layer for perfverdict.
//!
//! The app layer coordinates ingestion, domain logic and rendering.
//! It does not parse CLI flags and it does not do filesystem I/O.

mod compare;
mod extract;

pub use compare::{
    CompareOutcome, CompareRequest, CompareUseCase, ReportOutcome, ReportRequest, ReportUseCase,
    StatisticsRequest, StatisticsUseCase, SummaryRequest, SummaryUseCase,
};
pub use extract::{
    MetadataOutcome, MetadataRequest, MetadataUseCase, TestrunOutcome, TestrunRequest,
    TestrunUseCase,
};
