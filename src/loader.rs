use crate::error::LoadError;
use geojson::{FeatureCollection, GeoJson};
use std::{path::PathBuf, str::FromStr};
use tracing::{info, warn};

/// Where the world geometry comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeoSource {
    Http(String),
    File(PathBuf),
}

impl GeoSource {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            GeoSource::Http(location.to_string())
        } else {
            GeoSource::File(PathBuf::from(location))
        }
    }

    /// Loads and parses the map geometry. Runs once; no retry, no timeout.
    pub async fn load(&self) -> Result<FeatureCollection, LoadError> {
        let result = match self {
            GeoSource::Http(url) => fetch(url).await,
            GeoSource::File(path) => {
                let text = tokio::task::spawn_blocking({
                    let path = path.clone();
                    move || std::fs::read_to_string(path)
                })
                .await??;
                parse_document(&text)
            }
        };
        match &result {
            Ok(fc) => info!(source = ?self, features = fc.features.len(), "Loaded map geometry"),
            Err(e) => warn!(source = ?self, error = %e, "Failed to load map geometry"),
        }
        result
    }
}

async fn fetch(url: &str) -> Result<FeatureCollection, LoadError> {
    let response = reqwest::get(url).await?;
    let status = response.status();
    let body = response.text().await?;
    check_response(status.as_u16(), &body)
}

/// Any non-2xx status is a failure, whatever the body says.
pub fn check_response(status: u16, body: &str) -> Result<FeatureCollection, LoadError> {
    if !(200..300).contains(&status) {
        return Err(LoadError::Status(status));
    }
    parse_document(body)
}

pub fn parse_document(text: &str) -> Result<FeatureCollection, LoadError> {
    match GeoJson::from_str(text)? {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(LoadError::NotFeatureCollection),
    }
}
