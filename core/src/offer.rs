//! The "offer a ride" form and the route query its optimize action submits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{AdviceError, AdviceResult};
use crate::route::RouteQuery;

pub const MIN_LOCATION_LEN: usize = 3;
pub const MAX_SEATS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Car,
    Bike,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car => write!(f, "car"),
            Self::Bike => write!(f, "bike"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "car" => Ok(Self::Car),
            "bike" => Ok(Self::Bike),
            other => Err(format!("unknown transport mode '{}', expected car or bike", other)),
        }
    }
}

/// One failed form rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferForm {
    pub start_location: String,
    pub end_location: String,
    /// Comma-separated stop names as typed by the driver.
    #[serde(default)]
    pub stops: Option<String>,
    pub seats: u8,
    #[serde(default)]
    pub transport_mode: TransportMode,
    pub fare: f64,
}

impl OfferForm {
    /// Checks every rule and reports all failures at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.start_location.trim().chars().count() < MIN_LOCATION_LEN {
            errors.push(FieldError::new("startLocation", "Start location is required"));
        }
        if self.end_location.trim().chars().count() < MIN_LOCATION_LEN {
            errors.push(FieldError::new("endLocation", "End location is required"));
        }
        if self.seats < 1 {
            errors.push(FieldError::new(
                "seats",
                "At least 1 seat must be available",
            ));
        } else if self.seats > MAX_SEATS {
            errors.push(FieldError::new(
                "seats",
                format!("At most {} seats can be offered", MAX_SEATS),
            ));
        }
        if !self.fare.is_finite() || self.fare < 0.0 {
            errors.push(FieldError::new("fare", "Fare must be a positive number"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Stop names in the order they were typed, blanks dropped.
    pub fn stop_list(&self) -> Vec<String> {
        self.stops
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Builds the query the optimize action sends to the advisor.
    ///
    /// Only the route endpoints are required here; seats and fare do not
    /// affect pooling advice.
    pub fn route_query(&self) -> AdviceResult<RouteQuery> {
        let start = self.start_location.trim();
        let end = self.end_location.trim();
        if start.is_empty() {
            return Err(AdviceError::validation(
                "startLocation",
                "start location is required",
            ));
        }
        if end.is_empty() {
            return Err(AdviceError::validation(
                "endLocation",
                "end location is required",
            ));
        }

        let stops = self.stop_list();
        let stops_text = if stops.is_empty() {
            "none".to_string()
        } else {
            stops.join(", ")
        };
        let description = format!(
            "A ride from {} to {} with potential stops at {}.",
            start, end, stops_text
        );

        Ok(RouteQuery::new(start, end, stops, description))
    }
}
