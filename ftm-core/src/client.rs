//! HTTP client for the snow analysis backend.

use crate::error::ApiError;
use crate::geojson::FeatureCollection;
use crate::record::{ResultRow, ResultsPage, UserPolygon};
use crate::request::AreaOfInterestRequest;
use log::{debug, info};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use std::time::Duration;

/// Backend address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Body of a successful `POST /api/create`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CreateResponse {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl CreateResponse {
    /// Whatever the backend said about the submission.
    pub fn summary(&self) -> &str {
        self.status
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("accepted")
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("invalid API url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "API url {:?} cannot be a base",
                base_url.as_str()
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(ApiClient { client, base_url })
    }

    /// `base_url` joined with `segments`, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `POST /api/create`
    pub async fn create(&self, request: &AreaOfInterestRequest) -> Result<CreateResponse, ApiError> {
        let url = self.endpoint(&["api", "create"]);
        info!("Submitting area {} to {}", request.name(), url);
        let response = self
            .client
            .post(url)
            .json(&request.to_payload())
            .send()
            .await
            .map_err(transport)?;
        let body = read_body(response).await?;
        let created: CreateResponse = serde_json::from_str(&body)?;
        info!("Area {} submitted: {}", request.name(), created.summary());
        Ok(created)
    }

    /// `GET /api/results`
    pub async fn fetch_results(&self) -> Result<ResultsPage, ApiError> {
        let body = self.get(&["api", "results"]).await?;
        ResultRow::parse_results(&body)
    }

    /// `GET /api/geojson/{area_name}`
    pub async fn fetch_geojson(&self, area_name: &str) -> Result<FeatureCollection, ApiError> {
        let body = self.get(&["api", "geojson", area_name]).await?;
        FeatureCollection::parse(&body)
    }

    /// `GET /api/userpolygons`
    pub async fn fetch_user_polygons(&self) -> Result<Vec<UserPolygon>, ApiError> {
        let body = self.get(&["api", "userpolygons"]).await?;
        UserPolygon::parse_list(&body)
    }

    /// `POST /api/reset` clears every stored result on the backend.
    pub async fn reset(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "reset"]);
        info!("Resetting backend results at {}", url);
        let response = self.client.post(url).send().await.map_err(transport)?;
        let body = read_body(response).await?;
        let _: serde_json::Value = serde_json::from_str(&body)?;
        Ok(())
    }

    async fn get(&self, segments: &[&str]) -> Result<String, ApiError> {
        let url = self.endpoint(segments);
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport)?;
        read_body(response).await
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(transport)
}
