use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_EXERCISE_MINUTES: u32 = 30;

/// What a text message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Today,
    Plan,
    Bp(BpArg),
    Med,
    Exercise { minutes: u32 },
    Tips,
    Clear,
    /// Anything else goes to the AI.
    Chat(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BpArg {
    /// `/bp` alone: show history.
    Show,
    /// `/bp 130/85`
    Record(String),
    /// `/bp` with something that is not systolic/diastolic.
    Invalid(String),
}

fn is_bp_value(value: &str) -> bool {
    lazy_static! {
        static ref BP_RE: Regex = Regex::new(r"^\d{2,3}/\d{2,3}$").unwrap();
    }
    BP_RE.is_match(value)
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let msg = input.trim();
        let lower = msg.to_lowercase();
        let mut parts = msg.split_whitespace();
        let head = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next();

        match lower.as_str() {
            "/help" | "幫助" | "說明" => return Self::Help,
            "/today" | "今天" => return Self::Today,
            "/plan" | "飲食計畫" => return Self::Plan,
            "/med" | "吃藥" => return Self::Med,
            "/tips" | "小技巧" => return Self::Tips,
            "/clear" | "清除" => return Self::Clear,
            _ => {}
        }

        match head.as_str() {
            "/bp" => Self::Bp(match arg {
                None => BpArg::Show,
                Some(v) if is_bp_value(v) => BpArg::Record(v.to_string()),
                Some(v) => BpArg::Invalid(v.to_string()),
            }),
            "/exercise" | "運動" => Self::Exercise {
                minutes: arg
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(DEFAULT_EXERCISE_MINUTES),
            },
            _ => Self::Chat(msg.to_string()),
        }
    }
}
