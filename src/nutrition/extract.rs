use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::NutritionFacts;

// Shared fragments. NUM accepts decimals and 1,200-style grouping.
const NUM: &str = r"(\d+(?:,\d{3})*(?:\.\d+)?)";
const RANGE_SEP: &str = r"\s*(?:-|~|～|–|—|至|到)\s*";
// Label-to-value and value-to-label gaps never cross a clause separator.
const GAP: &str = r"[^\d\n,，;；、。]{0,8}?";
const SHORT_GAP: &str = r"[^\d\n,，;；、。]{0,4}?";

const KCAL: &str = r"(?:kcal|大卡|千卡|卡路里|calories|cal\b)";
const GRAM: &str = r"(?:grams?|g|公克|克)";
const MG: &str = r"(?:mg|毫克)";

const CALORIES_LABEL: &str = r"(?:calories|熱量|卡路里)";
const PROTEIN_LABEL: &str = r"(?:protein|蛋白質|蛋白)";
const CARBS_LABEL: &str = r"(?:carbohydrates?|carbs?|碳水化合物|碳水)";
const FAT_LABEL: &str = r"(?:fat|脂肪)";
const SODIUM_LABEL: &str = r"(?:sodium|鈉)";
// Nutrients that are not tracked but still claim the number in front of them.
const UNTRACKED_LABEL: &str =
    r"(?:cholesterol|膽固醇|fib(?:er|re)|纖維|potassium|鉀|calcium|鈣|caffeine|咖啡因|vitamin|維生素)";

fn compile(pattern: String) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("nutrition pattern compiles")
}

/// Ordered patterns for one field.
struct FieldPatterns {
    /// "蛋白質 15g", "sodium: 800 mg".
    label_first: Vec<Regex>,
    /// "15g protein", "15 克蛋白質", then unlabelled fallbacks.
    value_first: Vec<Regex>,
    /// Matches another nutrient's label right after a label-first match. The
    /// number then belongs to that nutrient ("protein and 55g carbs").
    next_label: Option<Regex>,
}

impl FieldPatterns {
    fn first_match(&self, text: &str) -> f64 {
        self.label_first
            .iter()
            .find_map(|re| {
                re.captures_iter(text)
                    .find(|caps| !self.names_next_field(text, caps))
                    .and_then(|caps| captured_value(&caps))
            })
            .or_else(|| {
                self.value_first
                    .iter()
                    .find_map(|re| re.captures(text).and_then(|caps| captured_value(&caps)))
            })
            .unwrap_or(0.0)
    }

    fn names_next_field(&self, text: &str, caps: &Captures<'_>) -> bool {
        let Some(next_label) = &self.next_label else {
            return false;
        };
        caps.get(0).is_some_and(|m| next_label.is_match(&text[m.end()..]))
    }
}

/// Labels of every nutrient except `own`, anchored a short gap after a match.
fn next_label(own: &str) -> Regex {
    let others: Vec<&str> = [
        CALORIES_LABEL,
        PROTEIN_LABEL,
        CARBS_LABEL,
        FAT_LABEL,
        SODIUM_LABEL,
        UNTRACKED_LABEL,
    ]
    .into_iter()
    .filter(|label| *label != own)
    .collect();
    compile(format!(r"^{SHORT_GAP}(?:{})", others.join("|")))
}

/// "蛋白質 15g" / "protein: 20-25 g" first, then "15g protein" / "15 克蛋白質".
fn macro_patterns(label: &str) -> FieldPatterns {
    FieldPatterns {
        label_first: vec![compile(format!(
            r"{label}{GAP}(?:{NUM}{RANGE_SEP})?{NUM}\s*{GRAM}"
        ))],
        value_first: vec![compile(format!(r"{NUM}\s*{GRAM}{SHORT_GAP}{label}"))],
        next_label: Some(next_label(label)),
    }
}

lazy_static! {
    // No next-label check: "熱量 380 蛋白質 22g" keeps 380.
    static ref CALORIE_PATTERNS: FieldPatterns = FieldPatterns {
        label_first: vec![],
        value_first: vec![
            compile(format!(r"{NUM}\s*{KCAL}")),
            compile(format!(r"{CALORIES_LABEL}{GAP}{NUM}")),
        ],
        next_label: None,
    };
    static ref PROTEIN_PATTERNS: FieldPatterns = macro_patterns(PROTEIN_LABEL);
    static ref CARBS_PATTERNS: FieldPatterns = macro_patterns(CARBS_LABEL);
    static ref FAT_PATTERNS: FieldPatterns = macro_patterns(FAT_LABEL);
    static ref SODIUM_PATTERNS: FieldPatterns = FieldPatterns {
        label_first: vec![
            compile(format!(r"{SODIUM_LABEL}{GAP}{NUM}{RANGE_SEP}{NUM}\s*{MG}")),
            compile(format!(r"{SODIUM_LABEL}{GAP}{NUM}\s*{MG}")),
        ],
        value_first: vec![
            compile(format!(r"{NUM}{RANGE_SEP}{NUM}\s*{MG}{SHORT_GAP}{SODIUM_LABEL}")),
            compile(format!(r"{NUM}\s*{MG}{SHORT_GAP}{SODIUM_LABEL}")),
            // a bare mg range is only ever quoted for sodium
            compile(format!(r"{NUM}{RANGE_SEP}{NUM}\s*{MG}")),
        ],
        next_label: Some(next_label(SODIUM_LABEL)),
    };
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Value of the match: the upper bound when the pattern captured a range.
fn captured_value(caps: &Captures<'_>) -> Option<f64> {
    caps.iter()
        .skip(1)
        .flatten()
        .filter_map(|m| parse_number(m.as_str()))
        .reduce(f64::max)
}

/// Pull calories, macros and sodium out of free-form (English or Chinese) text.
///
/// Every field defaults to zero when none of its patterns match.
pub fn extract(text: &str) -> NutritionFacts {
    NutritionFacts {
        calories: CALORIE_PATTERNS.first_match(text),
        protein: PROTEIN_PATTERNS.first_match(text),
        carbs: CARBS_PATTERNS.first_match(text),
        fat: FAT_PATTERNS.first_match(text),
        sodium: SODIUM_PATTERNS.first_match(text),
    }
}
