//! Testrun extraction and metadata comparison use cases.

use anyhow::Context;
use perfverdict_domain::compare_metadata;
use perfverdict_ingest::{UnevenSplit, extract_testrun};
use perfverdict_render::{RenderedTable, render_metadata, render_testrun};
use perfverdict_types::{MetadataComparison, MetadataConfig, SampleTable, TestrunConfig};
use serde_json::{Map, Value as Json};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TestrunRequest {
    /// Array of iteration objects.
    pub datastore: Json,
    pub metadata: Map<String, Json>,
    pub config: TestrunConfig,
}

#[derive(Debug, Clone)]
pub struct TestrunOutcome {
    pub table: SampleTable,
    pub rendered: RenderedTable,
    /// Iterations kept unsplit because their sample counts disagree.
    pub uneven: Vec<UnevenSplit>,
}

pub struct TestrunUseCase;

impl TestrunUseCase {
    pub fn execute(req: TestrunRequest) -> anyhow::Result<TestrunOutcome> {
        let extraction = extract_testrun(&req.datastore, &req.metadata, &req.config)
            .context("extract testrun results")?;

        for u in &extraction.uneven {
            let lengths = u
                .lengths
                .iter()
                .map(|(c, n)| format!("{c}={n}"))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(
                iteration = u.iteration,
                %lengths,
                "sample counts differ; iteration kept as one row"
            );
        }

        let rendered = render_testrun(&extraction.table, &req.config);
        info!(
            rows = extraction.table.len(),
            columns = extraction.table.columns().len(),
            "testrun results extracted"
        );

        Ok(TestrunOutcome {
            table: extraction.table,
            rendered,
            uneven: extraction.uneven,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MetadataRequest {
    pub base: Map<String, Json>,
    pub test: Map<String, Json>,
    pub config: MetadataConfig,
    pub fillna: String,
}

#[derive(Debug, Clone)]
pub struct MetadataOutcome {
    pub comparison: MetadataComparison,
    pub rendered: RenderedTable,
}

pub struct MetadataUseCase;

impl MetadataUseCase {
    pub fn execute(req: MetadataRequest) -> MetadataOutcome {
        let comparison = compare_metadata(&req.base, &req.test, &req.config);
        let rendered = render_metadata(&comparison, &req.fillna);
        info!(rows = comparison.rows.len(), "metadata compared");
        MetadataOutcome {
            comparison,
            rendered,
        }
    }
}
