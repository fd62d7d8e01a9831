use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::SmokeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Low,
    Med,
    High,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Low => "LOW",
            Difficulty::Med => "MED",
            Difficulty::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// Body of `POST /create-meal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeal {
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
}

impl NewMeal {
    pub fn new(meal: &str, cuisine: &str, price: f64, difficulty: Difficulty) -> Self {
        Self {
            meal: meal.to_string(),
            cuisine: cuisine.to_string(),
            price,
            difficulty,
        }
    }
}

/// Body of `POST /prep-combatant`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantRef {
    pub meal: String,
}

/// A meal as the server reports it back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meal {
    pub id: u64,
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u64,
    pub meal: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
    pub battles: u64,
    pub wins: u64,
    pub win_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    Wins,
    WinPct,
}

impl LeaderboardSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardSort::Wins => "wins",
            LeaderboardSort::WinPct => "win_pct",
        }
    }

    /// The value an entry is ranked by under this key.
    pub fn key_of(&self, entry: &LeaderboardEntry) -> f64 {
        match self {
            LeaderboardSort::Wins => entry.wins as f64,
            LeaderboardSort::WinPct => entry.win_pct,
        }
    }
}

impl fmt::Display for LeaderboardSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardSort {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wins" => Ok(LeaderboardSort::Wins),
            "win_pct" => Ok(LeaderboardSort::WinPct),
            other => Err(SmokeError::InvalidConfigValueError {
                field: "sort_by".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Invalid sort_by parameter: '{}'. Expected 'wins' or 'win_pct'.",
                    other
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One outgoing request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Display form, e.g. `GET /leaderboard?sort=wins`. Not percent-encoded.
    pub fn describe(&self) -> String {
        let mut out = format!("{} /{}", self.method, self.segments.join("/"));
        if !self.query.is_empty() {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            out.push('?');
            out.push_str(&pairs.join("&"));
        }
        out
    }
}

/// Raw response as received; interpreted only by the probe that sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
