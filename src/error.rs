use thiserror::Error;

/// Reasons the map geometry could not be loaded. All are shown to the user the same way.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected response status: {0}")]
    Status(u16),

    #[error("Could not read map data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("Map data is not a FeatureCollection")]
    NotFeatureCollection,
}
