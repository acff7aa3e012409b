use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::client::TextGenerator;
use crate::errors::{AdviceError, AdviceResult};
use crate::prompt::{self, RawAdvice};
use crate::route::{RouteAdvice, RouteQuery};

/// Suggests route changes that raise the odds of pooling with other riders.
///
/// Stateless: every call renders a fresh prompt and makes exactly one model
/// request. Nothing is cached or retried.
#[derive(Clone)]
pub struct RoutePoolingAdvisor {
    generator: Arc<dyn TextGenerator>,
}

impl RoutePoolingAdvisor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Asks the model for pooling advice on `query`.
    ///
    /// Fails with [`AdviceError::Validation`] before any model call when the
    /// query is incomplete, and with [`AdviceError::ServiceUnavailable`] when
    /// the call fails or the answer does not fit the advice schema.
    #[instrument(
        skip(self, query),
        fields(request_id = %Uuid::new_v4(), start = %query.start_location, end = %query.end_location)
    )]
    pub async fn advise(&self, query: &RouteQuery) -> AdviceResult<RouteAdvice> {
        query.validate()?;

        let prompt = prompt::render(query);
        let schema = prompt::response_schema();

        let text = self
            .generator
            .generate_json(&prompt, &schema)
            .await
            .map_err(|e| {
                warn!(error = %e, "Model call failed");
                AdviceError::from(e)
            })?;

        let advice = RawAdvice::parse(&text)
            .and_then(RawAdvice::into_advice)
            .map_err(|reason| {
                warn!(%reason, "Model output rejected");
                AdviceError::ServiceUnavailable(reason)
            })?;

        info!(suggestion = advice.is_suggestion(), "Route advice ready");
        Ok(advice)
    }
}
