//! Controlled vocabularies shared by validation, graph building, and dialog.

/// Accepted gender values.
pub const GENDERS: [&str; 3] = ["男", "女", "その他"];

/// Recognized notebook (disability certificate) types.
pub const NOTEBOOK_TYPES: [&str; 3] = ["療育手帳", "精神保健福祉手帳", "身体障害者手帳"];

/// Notebook statuses. The first entry marks an active notebook.
pub const NOTEBOOK_STATUSES: [&str; 3] = ["有効", "期限切れ", "更新済み"];

/// Support-level statuses. The first entry marks the current level.
pub const SUPPORT_LEVEL_STATUSES: [&str; 2] = ["現在", "期限切れ"];

/// Service-plan statuses. The first entry marks an active plan.
pub const SERVICE_PLAN_STATUSES: [&str; 3] = ["有効", "期限切れ", "見直し中"];

/// Service-contract statuses. The first entry marks a running contract.
pub const CONTRACT_STATUSES: [&str; 3] = ["契約中", "体験中", "契約終了"];

/// Diagnosis statuses.
pub const DIAGNOSIS_STATUSES: [&str; 3] = ["継続", "寛解", "治癒"];

pub const NOTEBOOK_ACTIVE: &str = NOTEBOOK_STATUSES[0];
pub const SUPPORT_LEVEL_CURRENT: &str = SUPPORT_LEVEL_STATUSES[0];
pub const SERVICE_PLAN_ACTIVE: &str = SERVICE_PLAN_STATUSES[0];
pub const CONTRACT_ACTIVE: &str = CONTRACT_STATUSES[0];

/// Support levels range over 0..=6.
pub const SUPPORT_LEVEL_RANGE: std::ops::RangeInclusive<i64> = 0..=6;

const TRUTHY_FLAGS: [&str; 4] = ["○", "〇", "Yes", "yes"];
const FALSY_FLAGS: [&str; 3] = ["×", "No", "no"];

/// Tokens that end a repeatable dialog category. Compared case-insensitively.
pub const SKIP_TOKENS: [&str; 10] = [
    "なし", "ない", "スキップ", "次へ", "完了", "skip", "none", "n/a", "next", "done",
];

/// Check whether a flag cell (e.g. "living together") is set.
pub fn is_truthy_flag(value: &str) -> bool {
    TRUTHY_FLAGS.contains(&value.trim())
}

/// Check whether a flag cell holds one of the accepted yes/no values.
pub fn is_known_flag(value: &str) -> bool {
    let value = value.trim();
    TRUTHY_FLAGS.contains(&value) || FALSY_FLAGS.contains(&value)
}

/// Check whether user input is a skip token.
pub fn is_skip_token(input: &str) -> bool {
    let lowered = input.trim().to_lowercase();
    SKIP_TOKENS.iter().any(|token| *token == lowered)
}

/// Map a gender answer to its canonical value, accepting English aliases.
pub fn canonical_gender(value: &str) -> Option<&'static str> {
    let value = value.trim();
    if let Some(found) = GENDERS.iter().find(|g| **g == value) {
        return Some(found);
    }
    match value.to_lowercase().as_str() {
        "male" | "m" => Some(GENDERS[0]),
        "female" | "f" => Some(GENDERS[1]),
        "other" => Some(GENDERS[2]),
        _ => None,
    }
}

/// Parse a support level written as "3", "区分3", or "Level 3".
pub fn parse_support_level(value: &str) -> Option<i64> {
    let digits = value
        .trim()
        .trim_start_matches("区分")
        .trim_start_matches("Level")
        .trim_start_matches("level")
        .trim();
    digits.parse().ok()
}
