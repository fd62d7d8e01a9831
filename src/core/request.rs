use crate::domain::model::{ApiRequest, CombatantRef, HttpMethod, LeaderboardSort, NewMeal};
use crate::utils::error::Result;

/// Every endpoint the smoke run touches. Method and path are fixed per variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Health,
    DbCheck,
    ClearMeals,
    CreateMeal(NewMeal),
    GetMealById(u64),
    GetMealByName(String),
    DeleteMeal(u64),
    PrepCombatant(String),
    Battle,
    ClearCombatants,
    GetCombatants,
    Leaderboard(LeaderboardSort),
}

impl ApiCall {
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::Health => "health",
            ApiCall::DbCheck => "db-check",
            ApiCall::ClearMeals => "clear-meals",
            ApiCall::CreateMeal(_) => "create-meal",
            ApiCall::GetMealById(_) => "get-meal-by-id",
            ApiCall::GetMealByName(_) => "get-meal-by-name",
            ApiCall::DeleteMeal(_) => "delete-meal",
            ApiCall::PrepCombatant(_) => "prep-combatant",
            ApiCall::Battle => "battle",
            ApiCall::ClearCombatants => "clear-combatants",
            ApiCall::GetCombatants => "get-combatants",
            ApiCall::Leaderboard(_) => "leaderboard",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            ApiCall::Health
            | ApiCall::DbCheck
            | ApiCall::GetMealById(_)
            | ApiCall::GetMealByName(_)
            | ApiCall::Battle
            | ApiCall::GetCombatants
            | ApiCall::Leaderboard(_) => HttpMethod::Get,
            ApiCall::CreateMeal(_) | ApiCall::PrepCombatant(_) | ApiCall::ClearCombatants => {
                HttpMethod::Post
            }
            ApiCall::ClearMeals | ApiCall::DeleteMeal(_) => HttpMethod::Delete,
        }
    }

    /// Label used in logs, e.g. `get-meal-by-name(Sushi)`.
    pub fn label(&self) -> String {
        match self {
            ApiCall::CreateMeal(meal) => format!("{}({})", self.name(), meal.meal),
            ApiCall::GetMealById(id) | ApiCall::DeleteMeal(id) => format!("{}({})", self.name(), id),
            ApiCall::GetMealByName(name) | ApiCall::PrepCombatant(name) => {
                format!("{}({})", self.name(), name)
            }
            ApiCall::Leaderboard(sort) => format!("{}({})", self.name(), sort),
            _ => self.name().to_string(),
        }
    }

    pub fn to_request(&self) -> Result<ApiRequest> {
        let mut segments = vec![self.name().to_string()];
        let mut query = Vec::new();
        let mut body = None;

        match self {
            ApiCall::CreateMeal(meal) => {
                body = Some(serde_json::to_value(meal)?);
            }
            ApiCall::GetMealById(id) | ApiCall::DeleteMeal(id) => {
                segments.push(id.to_string());
            }
            ApiCall::GetMealByName(name) => {
                segments.push(name.clone());
            }
            ApiCall::PrepCombatant(name) => {
                body = Some(serde_json::to_value(CombatantRef { meal: name.clone() })?);
            }
            ApiCall::Leaderboard(sort) => {
                query.push(("sort".to_string(), sort.as_str().to_string()));
            }
            ApiCall::Health
            | ApiCall::DbCheck
            | ApiCall::ClearMeals
            | ApiCall::Battle
            | ApiCall::ClearCombatants
            | ApiCall::GetCombatants => {}
        }

        Ok(ApiRequest {
            method: self.method(),
            segments,
            query,
            body,
        })
    }
}
