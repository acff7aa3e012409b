use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use pooling_core::{RouteAdvice, RouteQuery};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// What the daemon said about a route query.
#[derive(Debug, PartialEq, Eq)]
pub enum AdvisorReply {
    Advice(RouteAdvice),
    /// The query was incomplete; the user has to fix `field`.
    Rejected { field: Option<String>, error: String },
    /// The model could not produce advice; retrying later may help.
    Unavailable(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    field: Option<String>,
}

#[derive(Debug)]
pub struct AdvisorClient {
    base_url: String,
    http_client: Client,
}

impl AdvisorClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(anyhow!("Advisor daemon URL cannot be empty"));
        }
        info!("Using advisor daemon at {}", base_url);
        Ok(Self {
            base_url,
            http_client: Client::new(),
        })
    }

    fn route_optimization_url(&self) -> String {
        format!("{}/route-optimization", self.base_url)
    }

    /// Sends a route query to the advisor daemon.
    pub async fn optimize(&self, query: &RouteQuery) -> Result<AdvisorReply> {
        debug!("Sending route query: {:?}", query);
        let response = self
            .http_client
            .post(self.route_optimization_url())
            .json(query)
            .send()
            .await
            .with_context(|| format!("Failed to reach advisor daemon at {}", self.base_url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read advisor daemon response")?;
        debug!("Advisor daemon replied {} ({} bytes)", status, body.len());

        interpret_response(status, &body)
    }
}

/// Maps a daemon HTTP response onto an [`AdvisorReply`].
pub fn interpret_response(status: StatusCode, body: &str) -> Result<AdvisorReply> {
    if status.is_success() {
        let advice: RouteAdvice =
            serde_json::from_str(body).context("Failed to parse route advice")?;
        return Ok(AdvisorReply::Advice(advice));
    }

    let error = serde_json::from_str::<ErrorBody>(body).unwrap_or_else(|_| ErrorBody {
        error: body.trim().to_string(),
        field: None,
    });

    match status {
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => Ok(AdvisorReply::Rejected {
            field: error.field,
            error: error.error,
        }),
        StatusCode::SERVICE_UNAVAILABLE => Ok(AdvisorReply::Unavailable(error.error)),
        other => Err(anyhow!(
            "Advisor daemon returned unexpected status {}: {}",
            other,
            error.error
        )),
    }
}
