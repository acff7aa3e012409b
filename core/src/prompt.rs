//! Prompt template sent to the model and the schema its answer must follow.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::route::{RouteAdvice, RouteQuery};

const INSTRUCTIONS: &str = "You are a route optimization expert for ride-sharing applications. \
Analyze the user's planned route and suggest modifications that would increase the likelihood \
of matching with other riders, maximizing pooled rides and reducing overall traffic. Only present \
suggestions if they demonstrably improve the chances of a match; otherwise return an empty \
suggestedRouteModifications. Provide a justification for your suggestions and an estimate of the \
positive impact on overall number of riders.";

/// Rendered in place of an empty stop list.
pub const NO_STOPS: &str = "none";

/// Rendered in place of a missing optional field.
pub const NOT_PROVIDED: &str = "not provided";

/// Interpolates `query` into the fixed advisor prompt.
pub fn render(query: &RouteQuery) -> String {
    let stops = if query.stops.is_empty() {
        NO_STOPS.to_string()
    } else {
        query.stops.join(", ")
    };

    format!(
        "{INSTRUCTIONS}\n\n\
         Current Route Description: {description}\n\
         Start Location: {start}\n\
         End Location: {end}\n\
         Stops: {stops}\n\
         Rider Demographics (optional): {demographics}\n\
         Historical Ride Data (optional): {history}",
        description = query.current_route_description,
        start = query.start_location,
        end = query.end_location,
        demographics = optional(&query.rider_demographics),
        history = optional(&query.historical_ride_data),
    )
}

fn optional(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_PROVIDED)
}

/// Output schema in the subset of OpenAPI the Gemini API accepts.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestedRouteModifications": {
                "type": "STRING",
                "nullable": true,
                "description": "Suggested modifications to the route that would increase the likelihood of matching with other riders. Empty if there are no suggestions."
            },
            "expectedImpact": {
                "type": "STRING",
                "description": "An estimate of the positive impact on overall number of riders if the suggestion is implemented."
            },
            "justification": {
                "type": "STRING",
                "description": "The reasoning behind the suggested route modifications and expected impact."
            }
        },
        "required": ["suggestedRouteModifications", "expectedImpact", "justification"]
    })
}

/// The model's answer, as the schema describes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAdvice {
    #[serde(default)]
    pub suggested_route_modifications: Option<String>,
    pub expected_impact: String,
    pub justification: String,
}

impl RawAdvice {
    /// Parses model output, accepting a JSON object optionally wrapped in a markdown code fence.
    pub fn parse(text: &str) -> Result<Self, String> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err("model returned no output".to_string());
        }
        serde_json::from_str(body).map_err(|e| format!("output does not match advice schema: {e}"))
    }

    /// Converts to the tagged advice, rejecting half-filled answers.
    pub fn into_advice(self) -> Result<RouteAdvice, String> {
        let justification = self.justification.trim().to_string();
        if justification.is_empty() {
            return Err("justification is empty".to_string());
        }

        match self
            .suggested_route_modifications
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(suggested_route_modifications) => {
                let expected_impact = self.expected_impact.trim().to_string();
                if expected_impact.is_empty() {
                    return Err("suggestion has no expected impact".to_string());
                }
                Ok(RouteAdvice::Suggestion {
                    suggested_route_modifications,
                    expected_impact,
                    justification,
                })
            }
            None => Ok(RouteAdvice::NoSuggestion { justification }),
        }
    }
}

// Models sometimes wrap JSON in ```json ... ``` even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language identifier line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(stops: &[&str]) -> RouteQuery {
        RouteQuery::new(
            "Downtown",
            "Airport",
            stops.iter().map(|s| s.to_string()).collect(),
            "A ride from Downtown to Airport",
        )
    }

    #[test]
    fn test_render_without_stops() {
        let prompt = render(&query(&[]));
        assert!(prompt.contains("Downtown"));
        assert!(prompt.contains("Airport"));
        assert!(prompt.contains("Stops: none\n"));
        assert!(prompt.contains("Rider Demographics (optional): not provided"));
        assert!(prompt.ends_with("Historical Ride Data (optional): not provided"));
    }

    #[test]
    fn test_render_joins_stops_in_order() {
        let prompt = render(&query(&["Central Station", "North Mall"]));
        assert!(prompt.contains("Stops: Central Station, North Mall\n"));
    }

    #[test]
    fn test_render_optional_fields() {
        let q = query(&[])
            .with_rider_demographics("Students, 18-25")
            .with_historical_ride_data("   ");
        let prompt = render(&q);
        assert!(prompt.contains("Rider Demographics (optional): Students, 18-25"));
        assert!(prompt.contains("Historical Ride Data (optional): not provided"));
    }

    #[test]
    fn test_schema_requires_three_fields() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert!(required.iter().any(|f| f == "justification"));
    }

    #[test]
    fn test_parse_fenced_output() {
        let text = "```json\n{\"suggestedRouteModifications\": \"Add a stop at Central Station\", \"expectedImpact\": \"+2 riders\", \"justification\": \"Busy hub\"}\n```";
        let advice = RawAdvice::parse(text).unwrap().into_advice().unwrap();
        assert_eq!(
            advice,
            RouteAdvice::Suggestion {
                suggested_route_modifications: "Add a stop at Central Station".to_string(),
                expected_impact: "+2 riders".to_string(),
                justification: "Busy hub".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_justification() {
        let text = r#"{"suggestedRouteModifications": "x", "expectedImpact": "y"}"#;
        assert!(RawAdvice::parse(text).is_err());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(RawAdvice::parse("Your route looks fine to me.").is_err());
        assert!(RawAdvice::parse("   ").is_err());
    }

    #[test]
    fn test_empty_or_null_suggestion_is_no_suggestion() {
        for text in [
            r#"{"suggestedRouteModifications": "", "expectedImpact": "", "justification": "Direct route"}"#,
            r#"{"suggestedRouteModifications": null, "expectedImpact": "none", "justification": "Direct route"}"#,
            r#"{"suggestedRouteModifications": "  ", "expectedImpact": "none", "justification": "Direct route"}"#,
            r#"{"expectedImpact": "none", "justification": "Direct route"}"#,
        ] {
            let advice = RawAdvice::parse(text).unwrap().into_advice().unwrap();
            assert_eq!(
                advice,
                RouteAdvice::NoSuggestion {
                    justification: "Direct route".to_string()
                }
            );
        }
    }

    #[test]
    fn test_suggestion_without_impact_is_rejected() {
        let text = r#"{"suggestedRouteModifications": "Detour", "expectedImpact": " ", "justification": "why"}"#;
        assert!(RawAdvice::parse(text).unwrap().into_advice().is_err());
    }

    #[test]
    fn test_blank_justification_is_rejected() {
        let text = r#"{"suggestedRouteModifications": "Detour", "expectedImpact": "+1", "justification": ""}"#;
        assert!(RawAdvice::parse(text).unwrap().into_advice().is_err());
    }
}
