use thiserror::Error;

/// Export failures.
///
/// Missing or malformed rubric data never ends up here; lookups degrade
/// to empty fields instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Encode(#[from] csv::Error),

    #[error("failed to save {target}: {source}")]
    Delivery {
        target: String,
        #[source]
        source: std::io::Error,
    },
}
