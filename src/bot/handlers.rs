use time::macros::format_description;
use tracing::{info, instrument, warn};

use super::{
    commands::{BpArg, Command},
    replies,
};
use crate::{
    line::dto::{IncomingMessage, MessageContent},
    nutrition::{self, MealAdded},
    profile::{self, MR_LIN},
    state::AppState,
    store::BpReading,
};

/// Answers one message event. Delivery failures are logged, never returned:
/// the webhook must still acknowledge the event.
pub async fn handle_message(state: &AppState, message: IncomingMessage) {
    let IncomingMessage {
        user_id,
        reply_token,
        content,
    } = message;

    match content {
        MessageContent::Text(text) => {
            let reply = on_text(state, &user_id, &text).await;
            send_reply(state, &user_id, &reply_token, &reply).await;
        }
        MessageContent::Image { message_id } => {
            on_image(state, &user_id, &reply_token, &message_id).await;
        }
    }
}

#[instrument(skip(state, text))]
async fn on_text(state: &AppState, user_id: &str, text: &str) -> String {
    if state.store.mark_greeted(user_id).await {
        info!(user_id = %user_id, "new user greeted");
        return MR_LIN.greeting.to_string();
    }

    match Command::parse(text) {
        Command::Help => replies::help_text().to_string(),
        Command::Today => today_report(state, user_id).await,
        Command::Plan => MR_LIN.weekly_meal_plan(),
        Command::Bp(arg) => on_bp(state, user_id, arg).await,
        Command::Med => {
            let today = state.local_now().date();
            state.store.record_medication(user_id, today).await;
            replies::med_recorded(MR_LIN.medication)
        }
        Command::Exercise { minutes } => {
            let today = state.local_now().date();
            state.store.record_exercise(user_id, today, minutes).await;
            replies::exercise_recorded(minutes)
        }
        Command::Tips => replies::tips_text().to_string(),
        Command::Clear => {
            state.store.clear_intake(user_id).await;
            info!(user_id = %user_id, "daily intake cleared");
            replies::CLEARED.to_string()
        }
        Command::Chat(message) => chat(state, user_id, &message).await,
    }
}

async fn today_report(state: &AppState, user_id: &str) -> String {
    let today = state.local_now().date();
    let mut report = match state.store.intake(user_id).await {
        Some(day) => day.summary(),
        None => replies::NO_RECORD_TODAY.to_string(),
    };
    if state.store.medication_taken(user_id, today).await {
        report.push_str(&replies::med_taken_line(MR_LIN.medication));
    }
    if let Some(minutes) = state.store.exercise_minutes(user_id, today).await {
        report.push_str(&replies::exercise_line(minutes));
    }
    report
}

async fn on_bp(state: &AppState, user_id: &str, arg: BpArg) -> String {
    match arg {
        BpArg::Record(value) => {
            let recorded_at = state
                .local_now()
                .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .unwrap_or_default();
            state
                .store
                .record_bp(
                    user_id,
                    BpReading {
                        recorded_at,
                        value: value.clone(),
                    },
                )
                .await;
            replies::bp_recorded(&value)
        }
        BpArg::Show => profile::bp_log(&state.store.bp_history(user_id).await),
        BpArg::Invalid(value) => {
            warn!(user_id = %user_id, %value, "unparseable blood pressure");
            replies::BP_FORMAT_HINT.to_string()
        }
    }
}

/// Free text goes to the model; whatever nutrition its reply mentions is tracked.
async fn chat(state: &AppState, user_id: &str, message: &str) -> String {
    let turn = state.store.next_turn(user_id).await;
    let today = state
        .store
        .intake(user_id)
        .await
        .map(|day| day.context_line())
        .unwrap_or_else(|| "尚無紀錄".into());
    let prompt = replies::chat_prompt(turn, &today, message);

    match state.ai.generate(&prompt).await {
        Ok(reply) => track_meal(state, user_id, message, reply).await,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "AI reply failed");
            replies::AI_UNAVAILABLE.to_string()
        }
    }
}

#[instrument(skip(state, reply_token))]
async fn on_image(state: &AppState, user_id: &str, reply_token: &str, message_id: &str) {
    send_reply(state, user_id, reply_token, replies::ANALYZING_IMAGE).await;

    let text = match analyze_image(state, message_id).await {
        Ok(analysis) => track_meal(state, user_id, replies::IMAGE_MEAL_DESC, analysis).await,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "image analysis failed");
            replies::IMAGE_FAILED.to_string()
        }
    };

    if let Err(e) = state.messenger.push_text(user_id, &text).await {
        warn!(user_id = %user_id, error = %e, "push failed");
    }
}

async fn analyze_image(state: &AppState, message_id: &str) -> anyhow::Result<String> {
    let image = state.messenger.message_content(message_id).await?;
    state
        .ai
        .generate_with_image(replies::IMAGE_PROMPT, image, "image/jpeg")
        .await
}

/// Accumulates the nutrition mentioned in `reply` and appends a sodium warning if one fired.
async fn track_meal(state: &AppState, user_id: &str, description: &str, reply: String) -> String {
    let facts = nutrition::extract(&reply);
    let (added, day) = state.store.record_meal(user_id, &facts, description).await;

    match added {
        Some(MealAdded { alert: Some(alert) }) => {
            info!(user_id = %user_id, sodium = day.sodium, ?alert, "sodium threshold crossed");
            format!("{}\n\n{}", reply, alert.message(day.sodium))
        }
        Some(_) => {
            info!(user_id = %user_id, calories = facts.calories, "meal recorded");
            reply
        }
        None => reply,
    }
}

async fn send_reply(state: &AppState, user_id: &str, reply_token: &str, text: &str) {
    if let Err(e) = state.messenger.reply_text(reply_token, text).await {
        warn!(user_id = %user_id, error = %e, "reply failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{Harness, Sent, BROKEN_IMAGE_ID};

    const USER: &str = "U123";

    fn text(body: &str) -> IncomingMessage {
        IncomingMessage {
            user_id: USER.into(),
            reply_token: "reply-token".into(),
            content: MessageContent::Text(body.into()),
        }
    }

    fn image(message_id: &str) -> IncomingMessage {
        IncomingMessage {
            user_id: USER.into(),
            reply_token: "reply-token".into(),
            content: MessageContent::Image {
                message_id: message_id.into(),
            },
        }
    }

    async fn greeted(ai_reply: Option<&str>) -> Harness {
        let h = AppState::fake(ai_reply);
        handle_message(&h.state, text("hi")).await;
        h
    }

    #[tokio::test]
    async fn first_message_only_greets() {
        let h = AppState::fake(Some("320 kcal"));
        handle_message(&h.state, text("午餐吃了便當")).await;

        assert_eq!(h.messenger.last_text(), MR_LIN.greeting);
        assert!(h.ai.prompts.lock().unwrap().is_empty());
        assert!(h.state.store.intake(USER).await.is_none());
    }

    #[tokio::test]
    async fn chat_reply_is_tracked() {
        let h = greeted(Some("這份雞腿便當約 650 kcal，蛋白質 35 克，鈉 900 毫克")).await;
        handle_message(&h.state, text("午餐吃雞腿便當")).await;

        assert!(h.messenger.last_text().starts_with("這份雞腿便當"));
        let day = h.state.store.intake(USER).await.unwrap();
        assert_eq!(day.calories, 650.0);
        assert_eq!(day.protein, 35.0);
        assert_eq!(day.sodium, 900.0);
        assert_eq!(day.meals, vec!["午餐吃雞腿便當".to_string()]);

        let prompts = h.ai.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("第 1 次對話。今日統計：尚無紀錄"));
        assert!(prompts[0].contains("使用者訊息：午餐吃雞腿便當"));
    }

    #[tokio::test]
    async fn prompt_carries_turn_and_totals() {
        let h = greeted(Some("約 500 kcal")).await;
        handle_message(&h.state, text("早餐")).await;
        handle_message(&h.state, text("午餐")).await;

        let prompts = h.ai.prompts.lock().unwrap();
        assert!(prompts[1].starts_with("第 2 次對話。今日統計：熱量 500 kcal"));
    }

    #[tokio::test]
    async fn sodium_warning_is_appended() {
        let h = greeted(Some("牛肉麵約 600 kcal，鈉 1300mg")).await;
        handle_message(&h.state, text("牛肉麵")).await;
        assert!(h.messenger.last_text().contains("⚠️ 今日鈉攝取已達 1300 mg"));

        handle_message(&h.state, text("又一碗牛肉麵")).await;
        assert!(h.messenger.last_text().contains("🚨 今日鈉攝取 2600 mg"));
    }

    #[tokio::test]
    async fn ai_failure_becomes_apology() {
        let h = greeted(None).await;
        handle_message(&h.state, text("今天吃什麼好？")).await;

        assert_eq!(h.messenger.last_text(), replies::AI_UNAVAILABLE);
        assert!(h.state.store.intake(USER).await.is_none());
    }

    #[tokio::test]
    async fn today_and_clear() {
        let h = greeted(Some("約 400 kcal")).await;
        handle_message(&h.state, text("/today")).await;
        assert_eq!(h.messenger.last_text(), replies::NO_RECORD_TODAY);

        handle_message(&h.state, text("水餃十顆")).await;
        handle_message(&h.state, text("/today")).await;
        assert!(h.messenger.last_text().contains("熱量 400 kcal"));

        handle_message(&h.state, text("/clear")).await;
        assert_eq!(h.messenger.last_text(), replies::CLEARED);
        let day = h.state.store.intake(USER).await.unwrap();
        assert_eq!(day.calories, 0.0);
        assert_eq!(day.protein, 0.0);
        assert_eq!(day.carbs, 0.0);
        assert_eq!(day.fat, 0.0);
        assert_eq!(day.sodium, 0.0);
        assert!(day.meals.is_empty());
    }

    #[tokio::test]
    async fn bp_record_and_show() {
        let h = greeted(None).await;
        handle_message(&h.state, text("/bp")).await;
        assert!(h.messenger.last_text().contains("尚無血壓記錄"));

        handle_message(&h.state, text("/bp 135/88")).await;
        assert_eq!(h.messenger.last_text(), "✅ 已記錄血壓 135/88");

        handle_message(&h.state, text("/bp")).await;
        let log = h.messenger.last_text();
        assert!(log.starts_with("📊 最近血壓:"));
        assert!(log.contains("135/88"));

        handle_message(&h.state, text("/bp high")).await;
        assert_eq!(h.messenger.last_text(), replies::BP_FORMAT_HINT);
        assert_eq!(h.state.store.bp_history(USER).await.len(), 1);
    }

    #[tokio::test]
    async fn med_and_exercise_are_recorded_for_today() {
        let h = greeted(None).await;
        let today = h.state.local_now().date();

        handle_message(&h.state, text("/med")).await;
        assert_eq!(h.messenger.last_text(), "✅ 已記錄今日 Amlodipine 5 mg");
        assert!(h.state.store.medication_taken(USER, today).await);

        handle_message(&h.state, text("運動")).await;
        assert_eq!(h.messenger.last_text(), "✅ 運動 30 分鐘已記錄");
        handle_message(&h.state, text("/exercise 50")).await;
        assert_eq!(h.state.store.exercise_minutes(USER, today).await, Some(50));

        handle_message(&h.state, text("/today")).await;
        let report = h.messenger.last_text();
        assert!(report.starts_with(replies::NO_RECORD_TODAY));
        assert!(report.contains("💊 今日已服用 Amlodipine 5 mg"));
        assert!(report.contains("🏃 今日運動 50 分鐘"));
    }

    #[tokio::test]
    async fn image_is_analyzed_and_pushed() {
        let h = AppState::fake(Some("滷肉飯約 550 大卡，鈉 800mg"));
        handle_message(&h.state, image("m1")).await;

        let sent = h.messenger.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                Sent::Reply {
                    token: "reply-token".into(),
                    text: replies::ANALYZING_IMAGE.into(),
                },
                Sent::Push {
                    to: USER.into(),
                    text: "滷肉飯約 550 大卡，鈉 800mg".into(),
                },
            ]
        );
        let day = h.state.store.intake(USER).await.unwrap();
        assert_eq!(day.calories, 550.0);
        assert_eq!(day.meals, vec![replies::IMAGE_MEAL_DESC.to_string()]);
        assert_eq!(h.ai.prompts.lock().unwrap()[0], replies::IMAGE_PROMPT);
    }

    #[tokio::test]
    async fn broken_image_gets_apology() {
        let h = AppState::fake(Some("550 大卡"));
        handle_message(&h.state, image(BROKEN_IMAGE_ID)).await;

        assert_eq!(h.messenger.last_text(), replies::IMAGE_FAILED);
        assert!(h.state.store.intake(USER).await.is_none());
    }
}
