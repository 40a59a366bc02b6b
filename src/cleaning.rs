use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::artifact::{ArtifactMeta, ArtifactRef, ArtifactStore};
use crate::constants::CLEAN_FILE_NAME;
use crate::error::Result;
use crate::run::RunContext;
use crate::transform;

/// Parameters for one cleaning run. All fields are required; there are no
/// defaults.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningParams {
    pub input_artifact: String,
    pub output_artifact: String,
    pub output_type: String,
    pub output_description: String,
    pub min_price: i64,
    pub max_price: i64,
}

/// Row counts and the published output of a successful run.
#[derive(Debug)]
pub struct CleaningOutcome {
    pub input_rows: usize,
    pub output_rows: usize,
    pub output: ArtifactMeta,
}

/// Runs the cleaning step end to end: resolve the input artifact, apply the
/// price filter, the `last_review` normalization and the bounding-box filter,
/// then publish the result as a new artifact version.
///
/// The intermediate CSV lives in a scoped temp directory which is removed on
/// every exit path, including a failed publish.
pub fn run_cleaning(
    store: &dyn ArtifactStore,
    run: &RunContext,
    params: &CleaningParams,
) -> Result<CleaningOutcome> {
    let reference = ArtifactRef::parse(&params.input_artifact)?;

    info!(input = %reference, "Downloading artifact");
    let resolved = store.resolve(&reference)?;
    run.record_artifact_used(&resolved.meta)?;

    let df = read_csv(&resolved.path)?;
    let input_rows = df.height();

    info!(rows = input_rows, "Dropping price outliers");
    let df = transform::filter_price_range(df, params.min_price, params.max_price)?;

    info!("Converting last_review to a date column");
    let df = transform::normalize_last_review(df)?;

    info!("Dropping rows outside the expected geolocation");
    let mut df = transform::filter_bounding_box(df)?;
    let output_rows = df.height();

    info!(rows = output_rows, "Saving the cleaned dataset");
    let scratch = tempfile::tempdir()?;
    let local_path = scratch.path().join(CLEAN_FILE_NAME);
    write_csv(&mut df, &local_path)?;

    info!(artifact = %params.output_artifact, "Logging artifact");
    let output = store.publish(
        &params.output_artifact,
        &params.output_type,
        &params.output_description,
        &local_path,
    )?;
    run.record_artifact_logged(&output)?;

    // `scratch` drops here, deleting the local file; an early `?` above
    // drops it just the same.
    Ok(CleaningOutcome {
        input_rows,
        output_rows,
        output,
    })
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Headered, comma-separated UTF-8 output with no index column.
fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
