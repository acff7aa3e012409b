use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{AdviceError, AdviceResult};

/// A planned route submitted for pooling advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current_route_description: String,
    // Absent or null endpoints are left for `validate` to report by name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_location: String,
    /// Stops in travel order.
    #[serde(default)]
    pub stops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rider_demographics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_ride_data: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl RouteQuery {
    pub fn new(
        start_location: impl Into<String>,
        end_location: impl Into<String>,
        stops: Vec<String>,
        current_route_description: impl Into<String>,
    ) -> Self {
        Self {
            current_route_description: current_route_description.into(),
            start_location: start_location.into(),
            end_location: end_location.into(),
            stops,
            rider_demographics: None,
            historical_ride_data: None,
        }
    }

    pub fn with_rider_demographics(mut self, demographics: impl Into<String>) -> Self {
        self.rider_demographics = Some(demographics.into());
        self
    }

    pub fn with_historical_ride_data(mut self, data: impl Into<String>) -> Self {
        self.historical_ride_data = Some(data.into());
        self
    }

    /// Checks the required fields. Stops are not checked for plausibility.
    pub fn validate(&self) -> AdviceResult<()> {
        if self.start_location.trim().is_empty() {
            return Err(AdviceError::validation(
                "startLocation",
                "start location is required",
            ));
        }
        if self.end_location.trim().is_empty() {
            return Err(AdviceError::validation(
                "endLocation",
                "end location is required",
            ));
        }
        Ok(())
    }
}

/// Outcome of a successful advisor call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteAdvice {
    /// The model proposes changes to the route.
    #[serde(rename_all = "camelCase")]
    Suggestion {
        suggested_route_modifications: String,
        expected_impact: String,
        justification: String,
    },
    /// The route is already as good as it gets for pooling.
    NoSuggestion { justification: String },
}

impl RouteAdvice {
    pub fn is_suggestion(&self) -> bool {
        matches!(self, Self::Suggestion { .. })
    }

    pub fn justification(&self) -> &str {
        match self {
            Self::Suggestion { justification, .. } | Self::NoSuggestion { justification } => {
                justification
            }
        }
    }
}
