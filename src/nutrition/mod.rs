mod extract;
pub mod intake;

use serde::{Deserialize, Serialize};

pub use extract::extract;
pub use intake::{DailyIntake, MealAdded};

/// Nutrition values pulled out of one AI reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64, // kcal
    pub protein: f64,  // g
    pub carbs: f64,    // g
    pub fat: f64,      // g
    pub sodium: f64,   // mg
}

impl NutritionFacts {
    /// Only replies that mention calories count as a meal.
    pub fn is_meal(&self) -> bool {
        self.calories > 0.0
    }
}
