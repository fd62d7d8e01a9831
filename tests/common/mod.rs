#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;

/// Handles for every endpoint of a healthy meal max API mounted under `/api`.
pub struct HealthyApi<'a> {
    pub health: Mock<'a>,
    pub db_check: Mock<'a>,
    pub clear_meals: Mock<'a>,
    pub clear_combatants: Mock<'a>,
    pub create_meals: Vec<Mock<'a>>,
    pub get_by_id: Mock<'a>,
    pub get_by_name: Mock<'a>,
    pub prep_combatants: Vec<Mock<'a>>,
    pub get_combatants: Mock<'a>,
    pub battle: Mock<'a>,
    pub leaderboard_wins: Mock<'a>,
    pub leaderboard_win_pct: Mock<'a>,
    pub delete_meal: Mock<'a>,
}

fn meal(id: u64, name: &str, cuisine: &str, price: f64, difficulty: &str) -> serde_json::Value {
    json!({"id": id, "meal": name, "cuisine": cuisine, "price": price, "difficulty": difficulty})
}

fn leaderboard_row(id: u64, name: &str, battles: u64, wins: u64) -> serde_json::Value {
    let win_pct = if battles == 0 { 0.0 } else { wins as f64 * 100.0 / battles as f64 };
    json!({
        "id": id, "meal": name, "cuisine": "Italian", "price": 12.5, "difficulty": "MED",
        "battles": battles, "wins": wins, "win_pct": win_pct
    })
}

pub fn mount_healthy_api(server: &MockServer) -> HealthyApi<'_> {
    let seeds = [
        ("Spaghetti", "Italian", 12.5, "MED"),
        ("Sushi", "Japanese", 15.0, "HIGH"),
        ("Tacos", "Mexican", 8.0, "LOW"),
    ];

    let health = server.mock(|when, then| {
        when.method(GET).path("/api/health");
        then.status(200).json_body(json!({"status": "healthy"}));
    });
    let db_check = server.mock(|when, then| {
        when.method(GET).path("/api/db-check");
        then.status(200).json_body(json!({"database_status": "healthy"}));
    });
    let clear_meals = server.mock(|when, then| {
        when.method(DELETE).path("/api/clear-meals");
        then.status(200).json_body(json!({"status": "success"}));
    });
    let clear_combatants = server.mock(|when, then| {
        when.method(POST).path("/api/clear-combatants");
        then.status(200).json_body(json!({"status": "success"}));
    });

    let create_meals = seeds
        .iter()
        .map(|(name, cuisine, price, difficulty)| {
            server.mock(|when, then| {
                when.method(POST).path("/api/create-meal").json_body(json!({
                    "meal": name, "cuisine": cuisine, "price": price, "difficulty": difficulty
                }));
                then.status(201)
                    .json_body(json!({"status": "success", "meal": name}));
            })
        })
        .collect();

    let get_by_id = server.mock(|when, then| {
        when.method(GET).path("/api/get-meal-by-id/1");
        then.status(200).json_body(json!({
            "status": "success",
            "meal": meal(1, "Spaghetti", "Italian", 12.5, "MED")
        }));
    });
    let get_by_name = server.mock(|when, then| {
        when.method(GET).path("/api/get-meal-by-name/Sushi");
        then.status(200).json_body(json!({
            "status": "success",
            "meal": meal(2, "Sushi", "Japanese", 15.0, "HIGH")
        }));
    });

    let prep_combatants = ["Spaghetti", "Sushi"]
        .iter()
        .map(|name| {
            server.mock(|when, then| {
                when.method(POST)
                    .path("/api/prep-combatant")
                    .json_body(json!({"meal": name}));
                then.status(200).json_body(json!({"status": "success"}));
            })
        })
        .collect();

    let get_combatants = server.mock(|when, then| {
        when.method(GET).path("/api/get-combatants");
        then.status(200).json_body(json!({
            "status": "success",
            "combatants": [
                meal(1, "Spaghetti", "Italian", 12.5, "MED"),
                meal(2, "Sushi", "Japanese", 15.0, "HIGH")
            ]
        }));
    });
    let battle = server.mock(|when, then| {
        when.method(GET).path("/api/battle");
        then.status(200).json_body(json!({"status": "success", "winner": "Sushi"}));
    });

    // Sushi leads on wins, Spaghetti on percentage
    let leaderboard_wins = server.mock(|when, then| {
        when.method(GET).path("/api/leaderboard").query_param("sort", "wins");
        then.status(200).json_body(json!({
            "status": "success",
            "leaderboard": [leaderboard_row(2, "Sushi", 4, 2), leaderboard_row(1, "Spaghetti", 1, 1)]
        }));
    });
    let leaderboard_win_pct = server.mock(|when, then| {
        when.method(GET).path("/api/leaderboard").query_param("sort", "win_pct");
        then.status(200).json_body(json!({
            "status": "success",
            "leaderboard": [leaderboard_row(1, "Spaghetti", 1, 1), leaderboard_row(2, "Sushi", 4, 2)]
        }));
    });

    let delete_meal = server.mock(|when, then| {
        when.method(DELETE).path("/api/delete-meal/1");
        then.status(200).json_body(json!({"status": "success"}));
    });

    HealthyApi {
        health,
        db_check,
        clear_meals,
        clear_combatants,
        create_meals,
        get_by_id,
        get_by_name,
        prep_combatants,
        get_combatants,
        battle,
        leaderboard_wins,
        leaderboard_win_pct,
        delete_meal,
    }
}
