use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("A tour needs at least two waypoints, found {found}")]
    TooFewWaypoints { found: usize },
}
