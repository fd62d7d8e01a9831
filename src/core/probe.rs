use crate::core::request::ApiCall;
use crate::domain::model::{ApiResponse, LeaderboardEntry, LeaderboardSort, Meal};
use crate::utils::error::{Result, SmokeError};
use serde_json::Value;

const MAX_BODY_IN_ERROR: usize = 200;

/// Top-level field whose exact value proves the call succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub field: &'static str,
    pub value: &'static str,
}

impl Marker {
    pub const HEALTHY: Marker = Marker { field: "status", value: "healthy" };
    pub const DATABASE_HEALTHY: Marker = Marker { field: "database_status", value: "healthy" };
    pub const SUCCESS: Marker = Marker { field: "status", value: "success" };

    pub fn for_call(call: &ApiCall) -> Marker {
        match call {
            ApiCall::Health => Marker::HEALTHY,
            ApiCall::DbCheck => Marker::DATABASE_HEALTHY,
            _ => Marker::SUCCESS,
        }
    }
}

/// Extra assertions on top of the marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// `meal.meal` equals the name.
    MealNamed(String),
    /// `combatants` holds exactly this many entries.
    CombatantCount(usize),
    /// `winner` is one of the names.
    WinnerAmong(Vec<String>),
    /// `leaderboard` is non-increasing in the sort key.
    LeaderboardOrdered(LeaderboardSort),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub call: ApiCall,
    pub marker: Marker,
    pub expectations: Vec<Expectation>,
}

impl Probe {
    pub fn new(call: ApiCall) -> Self {
        let marker = Marker::for_call(&call);
        Self {
            call,
            marker,
            expectations: Vec::new(),
        }
    }

    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    pub fn name(&self) -> String {
        self.call.label()
    }

    /// Decides pass/fail for one response. Returns the parsed body on success.
    pub fn evaluate(&self, response: &ApiResponse) -> Result<Value> {
        let probe = self.name();

        if !response.is_success() {
            return Err(SmokeError::UnexpectedStatus {
                probe,
                status: response.status,
                body: truncate(&response.body),
            });
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| SmokeError::MalformedResponse {
            probe: probe.clone(),
            message: format!("body is not JSON ({}): {}", e, truncate(&response.body)),
        })?;

        if !body.is_object() {
            return Err(SmokeError::MalformedResponse {
                probe,
                message: "expected a JSON object".to_string(),
            });
        }

        let actual = body.get(self.marker.field).map(render);
        if actual.as_deref() != Some(self.marker.value) {
            return Err(SmokeError::MarkerMismatch {
                probe,
                field: self.marker.field.to_string(),
                expected: self.marker.value.to_string(),
                actual,
            });
        }

        for expectation in &self.expectations {
            check(&probe, expectation, &body)?;
        }

        Ok(body)
    }
}

fn check(probe: &str, expectation: &Expectation, body: &Value) -> Result<()> {
    match expectation {
        Expectation::MealNamed(name) => {
            let meal: Meal = field(probe, body, "meal")?;
            if &meal.meal != name {
                return Err(failed(
                    probe,
                    format!("expected meal '{}', got '{}' (id {})", name, meal.meal, meal.id),
                ));
            }
        }
        Expectation::CombatantCount(expected) => {
            let combatants: Vec<Value> = field(probe, body, "combatants")?;
            if combatants.len() != *expected {
                return Err(failed(
                    probe,
                    format!("expected {} combatants, got {}", expected, combatants.len()),
                ));
            }
        }
        Expectation::WinnerAmong(names) => {
            let winner: String = field(probe, body, "winner")?;
            if !names.contains(&winner) {
                return Err(failed(
                    probe,
                    format!("winner '{}' is not one of {:?}", winner, names),
                ));
            }
        }
        Expectation::LeaderboardOrdered(sort) => {
            let entries: Vec<LeaderboardEntry> = field(probe, body, "leaderboard")?;
            for pair in entries.windows(2) {
                let (above, below) = (sort.key_of(&pair[0]), sort.key_of(&pair[1]));
                if above < below {
                    return Err(failed(
                        probe,
                        format!(
                            "leaderboard not sorted by {}: '{}' ({}) ranked above '{}' ({})",
                            sort, pair[0].meal, above, pair[1].meal, below
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn field<T: serde::de::DeserializeOwned>(probe: &str, body: &Value, name: &str) -> Result<T> {
    let value = body.get(name).ok_or_else(|| SmokeError::MalformedResponse {
        probe: probe.to_string(),
        message: format!("missing field '{}'", name),
    })?;

    serde_json::from_value(value.clone()).map_err(|e| SmokeError::MalformedResponse {
        probe: probe.to_string(),
        message: format!("field '{}' has unexpected shape: {}", name, e),
    })
}

fn failed(probe: &str, message: String) -> SmokeError {
    SmokeError::ExpectationFailed {
        probe: probe.to_string(),
        message,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_IN_ERROR {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_BODY_IN_ERROR).collect();
        format!("{}…", head)
    }
}
