pub const NO_RECORD_TODAY: &str = "今天還沒有紀錄任何餐點！";
pub const CLEARED: &str = "已清除今天的紀錄";
pub const ANALYZING_IMAGE: &str = "📸 分析中…";
pub const AI_UNAVAILABLE: &str = "抱歉，暫時無法回覆…";
pub const IMAGE_FAILED: &str = "圖片有問題，再傳一次試試！";
pub const BP_FORMAT_HINT: &str = "血壓格式不對喔，請輸入例如 /bp 130/85";

pub const IMAGE_PROMPT: &str = "請判斷食物並估算營養（熱量、蛋白質、脂肪、碳水、鈉）。";
pub const IMAGE_MEAL_DESC: &str = "照片";

pub fn help_text() -> &'static str {
    "🥗 指令：
/help 說明
/today 今日摘要
/plan 一週菜單
/bp 130/85 記錄血壓
/med 記錄服藥
/exercise 30 記錄運動
/tips 小技巧
/clear 清除今日紀錄
"
}

pub fn tips_text() -> &'static str {
    "🌟 健康小技巧
• 醬料分開沾
• 麵改乾、湯另外裝
• 用醋、檸檬、大蒜調味
• 飯後散步 30 分鐘
"
}

pub fn bp_recorded(value: &str) -> String {
    format!("✅ 已記錄血壓 {}", value)
}

pub fn med_recorded(medication: &str) -> String {
    format!("✅ 已記錄今日 {}", medication)
}

pub fn exercise_recorded(minutes: u32) -> String {
    format!("✅ 運動 {} 分鐘已記錄", minutes)
}

pub fn med_taken_line(medication: &str) -> String {
    format!("\n💊 今日已服用 {}", medication)
}

pub fn exercise_line(minutes: u32) -> String {
    format!("\n🏃 今日運動 {} 分鐘", minutes)
}

pub fn chat_prompt(turn: u32, today: &str, message: &str) -> String {
    format!(
        "第 {} 次對話。今日統計：{}\n使用者訊息：{}\n請用台灣口吻回覆。",
        turn, today, message
    )
}
