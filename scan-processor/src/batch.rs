use thiserror::Error;

/// Errors surfaced by a caller-supplied transform.
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch size must be positive")]
    InvalidBatchSize,
    #[error("failed to process batch {batch}/{total}")]
    Transform {
        batch: usize,
        total: usize,
        #[source]
        source: TransformError,
    },
}

/// Applies `transform` to contiguous batches of at most `batch_size`
/// items, concatenating results in input order.
///
/// Batching only controls memory and throughput; for a transform that
/// preserves order and ignores batch length, the concatenated output is
/// identical to running the transform over the whole input at once.
///
/// Fails fast: the first transform error aborts the run and no partial
/// result is returned. Already-processed batches are not rolled back,
/// their results are simply discarded with the rest.
pub fn process_in_batches<T, R, F>(
    items: &[T],
    batch_size: usize,
    mut transform: F,
) -> Result<Vec<R>, BatchError>
where
    F: FnMut(&[T]) -> Result<Vec<R>, TransformError>,
{
    if batch_size == 0 {
        return Err(BatchError::InvalidBatchSize);
    }
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total_batches = items.len().div_ceil(batch_size);
    log::info!(
        "processing {} items in {} batches of size {}",
        items.len(),
        total_batches,
        batch_size
    );

    let mut results = Vec::new();
    for (index, batch) in items.chunks(batch_size).enumerate() {
        let batch_results = transform(batch).map_err(|source| BatchError::Transform {
            batch: index + 1,
            total: total_batches,
            source,
        })?;
        log::debug!(
            "processed batch {}/{} with {} results",
            index + 1,
            total_batches,
            batch_results.len()
        );
        results.extend(batch_results);
    }

    log::info!(
        "completed processing: {} results from {} input items",
        results.len(),
        items.len()
    );
    Ok(results)
}
