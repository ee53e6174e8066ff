//! Baseline profile of the patient the bot is set up for.

use crate::store::BpReading;

pub struct DayPlan {
    pub breakfast: &'static str,
    pub lunch: &'static str,
    pub dinner: &'static str,
    pub snack: &'static str,
}

pub struct PatientProfile {
    pub greeting: &'static str,
    pub medication: &'static str,
    /// Monday first.
    pub dash_meal_plan: [DayPlan; 7],
}

pub static MR_LIN: PatientProfile = PatientProfile {
    greeting: "林先生您好！我是您的營養追蹤助手 😊\n輸入 /help 看指令",
    medication: "Amlodipine 5 mg",
    dash_meal_plan: [
        DayPlan {
            breakfast: "全麥吐司+水煮蛋+無糖豆漿",
            lunch: "清蒸雞胸肉+糙米飯+炒青江菜",
            dinner: "烤鮭魚+地瓜+清炒菠菜",
            snack: "蘋果一顆",
        },
        DayPlan {
            breakfast: "燕麥粥+低脂牛奶+香蕉",
            lunch: "豆腐蔬菜湯麵（湯少喝）",
            dinner: "烤雞腿（去皮）+五穀飯+燙地瓜葉",
            snack: "無調味堅果一小把",
        },
        DayPlan {
            breakfast: "蔬菜蛋餅（少醬）+無糖豆漿",
            lunch: "鯖魚便當（少鹽）+三樣青菜",
            dinner: "番茄豆腐燉牛肉+糙米飯",
            snack: "芭樂半顆",
        },
        DayPlan {
            breakfast: "地瓜+水煮蛋+無糖優格",
            lunch: "雞絲蕎麥麵+燙青菜",
            dinner: "清蒸鱈魚+紫米飯+炒高麗菜",
            snack: "奇異果一顆",
        },
        DayPlan {
            breakfast: "全麥饅頭+豆漿",
            lunch: "蔬菜豆腐咖哩（少鹽）+糙米飯",
            dinner: "蒜香蝦仁+花椰菜+五穀飯",
            snack: "低脂牛奶一杯",
        },
        DayPlan {
            breakfast: "燕麥+藍莓+無糖優格",
            lunch: "自助餐：瘦肉+兩樣青菜+半碗飯",
            dinner: "香煎鮭魚+烤南瓜+燙菠菜",
            snack: "小番茄一碗",
        },
        DayPlan {
            breakfast: "鮪魚（水煮）全麥三明治+黑咖啡",
            lunch: "雞胸肉蔬菜沙拉（油醋醬）",
            dinner: "清燉雞湯（去油）+糙米飯+炒空心菜",
            snack: "木瓜一片",
        },
    ],
};

const WEEKDAYS: [&str; 7] = ["週一", "週二", "週三", "週四", "週五", "週六", "週日"];

impl PatientProfile {
    pub fn weekly_meal_plan(&self) -> String {
        let mut txt = String::from("📅 一週 DASH 菜單\n");
        for (day, plan) in WEEKDAYS.iter().zip(self.dash_meal_plan.iter()) {
            txt.push_str(&format!(
                "\n【{}】\n🌅 {}\n☀️ {}\n🌙 {}\n🍎 {}\n",
                day, plan.breakfast, plan.lunch, plan.dinner, plan.snack
            ));
        }
        txt
    }
}

pub fn bp_log(records: &[BpReading]) -> String {
    if records.is_empty() {
        return "尚無血壓記錄，使用 /bp 130/85 來記錄".into();
    }
    let start = records.len().saturating_sub(crate::store::BP_HISTORY_LEN);
    let mut txt = String::from("📊 最近血壓:\n");
    for r in &records[start..] {
        txt.push_str(&format!("{}  {}\n", r.recorded_at, r.value));
    }
    txt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_plan_covers_every_day() {
        let plan = MR_LIN.weekly_meal_plan();
        for day in WEEKDAYS {
            assert!(plan.contains(&format!("【{}】", day)));
        }
        assert!(plan.contains("全麥吐司+水煮蛋+無糖豆漿"));
    }

    #[test]
    fn bp_log_formats_entries() {
        assert!(bp_log(&[]).contains("尚無血壓記錄"));
        let log = bp_log(&[BpReading {
            recorded_at: "2024-05-01 08:30".into(),
            value: "132/86".into(),
        }]);
        assert_eq!(log, "📊 最近血壓:\n2024-05-01 08:30  132/86\n");
    }
}
