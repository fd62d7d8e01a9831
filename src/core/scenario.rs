use crate::core::probe::{Expectation, Probe};
use crate::core::request::ApiCall;
use crate::domain::model::{Difficulty, LeaderboardSort, NewMeal};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_min_items, validate_non_empty_string, validate_positive_price, validate_unique, Validate,
};

/// Id the server assigns to the first meal created after `clear-meals`.
///
/// The lookup and delete steps address the first seed through this id rather
/// than an id read back from the create response. The run therefore assumes a
/// server that restarts its id sequence on clear; the lookup asserts the name
/// so a server that does not will fail loudly at that step.
pub const FIRST_SEED_ID: u64 = 1;

/// What the fixed probe sequence is parameterised by.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub seed_meals: Vec<NewMeal>,
    pub leaderboard_sorts: Vec<LeaderboardSort>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed_meals: default_seed_meals(),
            leaderboard_sorts: vec![LeaderboardSort::Wins, LeaderboardSort::WinPct],
        }
    }
}

pub fn default_seed_meals() -> Vec<NewMeal> {
    vec![
        NewMeal::new("Spaghetti", "Italian", 12.5, Difficulty::Med),
        NewMeal::new("Sushi", "Japanese", 15.0, Difficulty::High),
        NewMeal::new("Tacos", "Mexican", 8.0, Difficulty::Low),
    ]
}

impl Validate for Scenario {
    fn validate(&self) -> Result<()> {
        // two combatants are needed for the battle
        validate_min_items("seed_meals", &self.seed_meals, 2)?;
        validate_min_items("leaderboard_sorts", &self.leaderboard_sorts, 1)?;

        for (i, meal) in self.seed_meals.iter().enumerate() {
            validate_non_empty_string(&format!("seed_meals[{}].meal", i), &meal.meal)?;
            validate_non_empty_string(&format!("seed_meals[{}].cuisine", i), &meal.cuisine)?;
            validate_positive_price(&format!("seed_meals[{}].price", i), meal.price)?;
        }
        validate_unique("seed_meals", self.seed_meals.iter().map(|m| m.meal.as_str()))?;

        Ok(())
    }
}

impl Scenario {
    /// The ordered probe list. Later steps depend on the state earlier ones leave behind.
    pub fn probes(&self) -> Result<Vec<Probe>> {
        self.validate()?;

        let first = &self.seed_meals[0].meal;
        let second = &self.seed_meals[1].meal;

        let mut probes = vec![
            Probe::new(ApiCall::Health),
            Probe::new(ApiCall::DbCheck),
            Probe::new(ApiCall::ClearMeals),
            Probe::new(ApiCall::ClearCombatants),
        ];

        probes.extend(
            self.seed_meals
                .iter()
                .map(|meal| Probe::new(ApiCall::CreateMeal(meal.clone()))),
        );

        probes.push(
            Probe::new(ApiCall::GetMealById(FIRST_SEED_ID)).with_expectation(Expectation::MealNamed(first.clone())),
        );
        probes.push(
            Probe::new(ApiCall::GetMealByName(second.clone()))
                .with_expectation(Expectation::MealNamed(second.clone())),
        );

        probes.push(Probe::new(ApiCall::PrepCombatant(first.clone())));
        probes.push(Probe::new(ApiCall::PrepCombatant(second.clone())));
        probes.push(Probe::new(ApiCall::GetCombatants).with_expectation(Expectation::CombatantCount(2)));
        probes.push(
            Probe::new(ApiCall::Battle)
                .with_expectation(Expectation::WinnerAmong(vec![first.clone(), second.clone()])),
        );

        probes.extend(self.leaderboard_sorts.iter().map(|sort| {
            Probe::new(ApiCall::Leaderboard(*sort)).with_expectation(Expectation::LeaderboardOrdered(*sort))
        }));

        probes.push(Probe::new(ApiCall::DeleteMeal(FIRST_SEED_ID)));
        probes.push(Probe::new(ApiCall::ClearCombatants));

        Ok(probes)
    }
}
