use serde::Serialize;

use super::NutritionFacts;

/// Meal descriptions are cut to this many characters.
pub const MEAL_DESC_MAX_CHARS: usize = 40;
/// How many meals the daily summary lists.
pub const SUMMARY_RECENT_MEALS: usize = 5;

pub const SODIUM_CAUTION_MG: f64 = 1200.0;
pub const SODIUM_LIMIT_MG: f64 = 1500.0;

/// Running totals for one user's day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyIntake {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub sodium: f64,
    pub meals: Vec<String>,
}

/// Raised when a meal pushes the sodium total over a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SodiumAlert {
    Caution,
    OverLimit,
}

impl SodiumAlert {
    /// Compares the totals before and after a meal; the higher threshold wins.
    pub fn crossed(before: f64, after: f64) -> Option<Self> {
        if before < SODIUM_LIMIT_MG && after >= SODIUM_LIMIT_MG {
            Some(Self::OverLimit)
        } else if before < SODIUM_CAUTION_MG && after >= SODIUM_CAUTION_MG {
            Some(Self::Caution)
        } else {
            None
        }
    }

    pub fn message(&self, total_mg: f64) -> String {
        match self {
            Self::Caution => format!(
                "⚠️ 今日鈉攝取已達 {:.0} mg，接近 {:.0} mg 上限，下一餐請清淡一點。",
                total_mg, SODIUM_LIMIT_MG
            ),
            Self::OverLimit => format!(
                "🚨 今日鈉攝取 {:.0} mg，已超過 {:.0} mg 上限！請多喝水，避免湯汁與醃製食品。",
                total_mg, SODIUM_LIMIT_MG
            ),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

impl DailyIntake {
    /// Adds a meal when it carries calories and reports any sodium threshold it crossed.
    ///
    /// Returns `None` and leaves the totals untouched for zero-calorie facts.
    pub fn add_meal(&mut self, facts: &NutritionFacts, description: &str) -> Option<MealAdded> {
        if !facts.is_meal() {
            return None;
        }
        let sodium_before = self.sodium;
        self.calories += facts.calories;
        self.protein += facts.protein;
        self.carbs += facts.carbs;
        self.fat += facts.fat;
        self.sodium += facts.sodium;
        self.meals
            .push(truncate_chars(description.trim(), MEAL_DESC_MAX_CHARS));

        Some(MealAdded {
            alert: SodiumAlert::crossed(sodium_before, self.sodium),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn recent_meals(&self) -> &[String] {
        let start = self.meals.len().saturating_sub(SUMMARY_RECENT_MEALS);
        &self.meals[start..]
    }

    /// One-line view used as context for the AI prompt.
    pub fn context_line(&self) -> String {
        format!(
            "熱量 {:.0} kcal、蛋白質 {:.1} g、碳水 {:.1} g、脂肪 {:.1} g、鈉 {:.0} mg",
            self.calories, self.protein, self.carbs, self.fat, self.sodium
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "📊 今日攝取\n熱量 {:.0} kcal\n蛋白 {:.1} g\n碳水 {:.1} g\n脂肪 {:.1} g\n鈉 {:.0} mg\n最近餐點: {}",
            self.calories,
            self.protein,
            self.carbs,
            self.fat,
            self.sodium,
            self.recent_meals().join(", ")
        )
    }
}

/// Outcome of a meal that was accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealAdded {
    pub alert: Option<SodiumAlert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kcal(calories: f64) -> NutritionFacts {
        NutritionFacts {
            calories,
            ..Default::default()
        }
    }

    #[test]
    fn sequential_meals_accumulate() {
        let mut day = DailyIntake::default();
        assert!(day.add_meal(&kcal(100.0), "早餐").is_some());
        assert!(day.add_meal(&kcal(50.0), "點心").is_some());
        assert_eq!(day.calories, 150.0);
        assert_eq!(day.meals, vec!["早餐".to_string(), "點心".to_string()]);
    }

    #[test]
    fn zero_calorie_reply_is_ignored() {
        let mut day = DailyIntake::default();
        let facts = NutritionFacts {
            sodium: 900.0,
            ..Default::default()
        };
        assert!(day.add_meal(&facts, "喝水").is_none());
        assert_eq!(day, DailyIntake::default());
    }

    #[test]
    fn meal_description_is_truncated() {
        let mut day = DailyIntake::default();
        let long = "滷肉飯".repeat(20);
        day.add_meal(&kcal(500.0), &long);
        assert_eq!(day.meals[0].chars().count(), MEAL_DESC_MAX_CHARS);
    }

    #[test]
    fn clear_resets_everything() {
        let mut day = DailyIntake::default();
        day.add_meal(
            &NutritionFacts {
                calories: 600.0,
                protein: 30.0,
                carbs: 70.0,
                fat: 20.0,
                sodium: 1300.0,
            },
            "便當",
        );
        day.clear();
        assert_eq!(day.calories, 0.0);
        assert_eq!(day.sodium, 0.0);
        assert!(day.meals.is_empty());
    }

    #[test]
    fn sodium_thresholds() {
        assert_eq!(SodiumAlert::crossed(1000.0, 1100.0), None);
        assert_eq!(SodiumAlert::crossed(1000.0, 1200.0), Some(SodiumAlert::Caution));
        assert_eq!(SodiumAlert::crossed(1250.0, 1400.0), None);
        assert_eq!(SodiumAlert::crossed(1250.0, 1600.0), Some(SodiumAlert::OverLimit));
        assert_eq!(SodiumAlert::crossed(800.0, 1700.0), Some(SodiumAlert::OverLimit));
        assert_eq!(SodiumAlert::crossed(1600.0, 2000.0), None);
    }

    #[test]
    fn add_meal_reports_crossed_threshold() {
        let mut day = DailyIntake::default();
        let salty = NutritionFacts {
            calories: 500.0,
            sodium: 700.0,
            ..Default::default()
        };
        assert_eq!(day.add_meal(&salty, "拉麵").and_then(|m| m.alert), None);
        assert_eq!(
            day.add_meal(&salty, "拉麵").and_then(|m| m.alert),
            Some(SodiumAlert::Caution)
        );
        assert_eq!(
            day.add_meal(&salty, "拉麵").and_then(|m| m.alert),
            Some(SodiumAlert::OverLimit)
        );
        assert!(SodiumAlert::OverLimit.message(day.sodium).contains("2100 mg"));
    }

    #[test]
    fn summary_lists_last_five_meals() {
        let mut day = DailyIntake::default();
        for i in 1..=7 {
            day.add_meal(&kcal(100.0), &format!("餐{}", i));
        }
        let summary = day.summary();
        assert!(summary.contains("熱量 700 kcal"));
        assert!(summary.contains("最近餐點: 餐3, 餐4, 餐5, 餐6, 餐7"));
        assert!(!summary.contains("餐2"));
    }
}
