//! reqwest-backed adapters for the public hazard services.
//!
//! Each adapter makes one attempt per call. Timeouts come from the shared client.

mod climate;
mod elevation;
mod flood;
mod geocoder;
mod roads;
mod seismic;

pub use climate::OpenMeteoClimateSource;
pub use elevation::OpenElevationSource;
pub use flood::FemaFloodSource;
pub use geocoder::NominatimGeocoder;
pub use roads::OverpassRoadSource;
pub use seismic::UsgsSeismicSource;

use super::SourceError;
use crate::config::SourcesConfig;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn build_client(config: &SourcesConfig) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|err| SourceError::Client(err.to_string()))
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    if path.is_empty() {
        base.trim_end_matches('/').to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Send the request and decode a JSON body, mapping every failure to a `SourceError`.
pub(crate) async fn fetch_json<T>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(|err| SourceError::Transport {
        service,
        detail: err.to_string(),
    })?;

    let status = response.status();
    debug!(service, %status, "source responded");
    if !status.is_success() {
        return Err(SourceError::Status {
            service,
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| SourceError::malformed(service, err.to_string()))
}
