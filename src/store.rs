use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::Serialize;
use time::Date;
use tokio::sync::Mutex;

use crate::nutrition::{DailyIntake, MealAdded, NutritionFacts};

/// Readings kept per user; older ones are dropped.
pub const BP_HISTORY_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BpReading {
    pub recorded_at: String, // "YYYY-MM-DD HH:MM"
    pub value: String,       // "systolic/diastolic"
}

#[derive(Default)]
struct Inner {
    intake: HashMap<String, DailyIntake>,
    bp: HashMap<String, Vec<BpReading>>,
    medication: HashMap<String, HashMap<Date, bool>>,
    exercise: HashMap<String, HashMap<Date, u32>>,
    greeted: HashSet<String>,
    turns: HashMap<String, u32>,
}

/// In-memory per-user tracking state (single-instance, lost on restart).
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the user as greeted; `true` only on the first call for that user.
    pub async fn mark_greeted(&self, user_id: &str) -> bool {
        self.inner.lock().await.greeted.insert(user_id.to_string())
    }

    /// Bumps and returns the user's conversation turn (first turn is 1).
    pub async fn next_turn(&self, user_id: &str) -> u32 {
        let mut inner = self.inner.lock().await;
        let turn = inner.turns.entry(user_id.to_string()).or_insert(0);
        *turn += 1;
        *turn
    }

    pub async fn intake(&self, user_id: &str) -> Option<DailyIntake> {
        self.inner.lock().await.intake.get(user_id).cloned()
    }

    /// Accumulates a meal into the user's totals. Creates the record on first use.
    pub async fn record_meal(
        &self,
        user_id: &str,
        facts: &NutritionFacts,
        description: &str,
    ) -> (Option<MealAdded>, DailyIntake) {
        let mut inner = self.inner.lock().await;
        let day = inner.intake.entry(user_id.to_string()).or_default();
        let added = day.add_meal(facts, description);
        (added, day.clone())
    }

    pub async fn clear_intake(&self, user_id: &str) {
        self.inner
            .lock()
            .await
            .intake
            .entry(user_id.to_string())
            .or_default()
            .clear();
    }

    pub async fn record_bp(&self, user_id: &str, reading: BpReading) {
        let mut inner = self.inner.lock().await;
        let history = inner.bp.entry(user_id.to_string()).or_default();
        history.push(reading);
        if history.len() > BP_HISTORY_LEN {
            let excess = history.len() - BP_HISTORY_LEN;
            history.drain(..excess);
        }
    }

    pub async fn bp_history(&self, user_id: &str) -> Vec<BpReading> {
        self.inner
            .lock()
            .await
            .bp
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn record_medication(&self, user_id: &str, date: Date) {
        self.inner
            .lock()
            .await
            .medication
            .entry(user_id.to_string())
            .or_default()
            .insert(date, true);
    }

    pub async fn medication_taken(&self, user_id: &str, date: Date) -> bool {
        self.inner
            .lock()
            .await
            .medication
            .get(user_id)
            .and_then(|days| days.get(&date).copied())
            .unwrap_or(false)
    }

    pub async fn record_exercise(&self, user_id: &str, date: Date, minutes: u32) {
        self.inner
            .lock()
            .await
            .exercise
            .entry(user_id.to_string())
            .or_default()
            .insert(date, minutes);
    }

    pub async fn exercise_minutes(&self, user_id: &str, date: Date) -> Option<u32> {
        self.inner
            .lock()
            .await
            .exercise
            .get(user_id)
            .and_then(|days| days.get(&date).copied())
    }
}
