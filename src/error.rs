use thiserror::Error;

/// Failures the engine reports to its immediate caller.
///
/// All variants are synchronous and local: nothing is retried, nothing is
/// fatal to the process, and a failed call never leaves a partial write in
/// the store.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("device_id is required")]
    MissingDeviceId,

    #[error("invalid {field}: {value:?} is not a finite coordinate")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("missing query parameter: {0}")]
    InvalidQuery(&'static str),

    #[error("unknown vehicle: {0}")]
    NotFound(String),

    #[error("failed to read route catalog {path}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse route catalog {path}")]
    CatalogParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
