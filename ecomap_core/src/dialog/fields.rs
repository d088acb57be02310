//! Ordered field tables for each dialog category.
//!
//! Answers fill fields strictly in table order: the first field not yet
//! present in the item in progress is the one being asked for.

use case_records::{
    canonical_gender, dates, is_known_flag, is_truthy_flag, parse_support_level,
    CONTRACT_STATUSES, NOTEBOOK_STATUSES, NOTEBOOK_TYPES, SUPPORT_LEVEL_RANGE,
    SUPPORT_LEVEL_STATUSES,
};

/// Answers meaning "unknown" for optional dates.
const UNKNOWN_TOKENS: [&str; 4] = ["不明", "わからない", "覚えていない", "unknown"];

const DATE_HINT: &str = "日付の形式が正しくありません。例: 2021-04-15 または 令和3年4月15日";

/// How an answer is checked and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    /// Any non-empty text.
    Text,
    /// Any text, including nothing.
    OptionalText,
    /// A date in any recognized form, stored as `YYYY-MM-DD`.
    Date,
    /// Like `Date`, but blank or "unknown" answers store an empty value.
    OptionalDate,
    /// 男 / 女 / その他, or an English alias.
    Gender,
    /// A yes/no flag, stored as ○ or ×.
    Flag,
    /// A notebook type, given by name or keyword and stored as the full name.
    NotebookType,
    /// A support level 0-6, stored as its number.
    SupportLevel,
    /// One of a fixed list of values.
    Choice(&'static [&'static str]),
}

impl FieldParser {
    /// Parse an answer into the stored value, or return a hint for the user.
    pub fn parse(&self, input: &str) -> Result<String, String> {
        let input = input.trim();
        match self {
            FieldParser::Text => {
                if input.is_empty() {
                    Err("入力が空です。".to_string())
                } else {
                    Ok(input.to_string())
                }
            }
            FieldParser::OptionalText => Ok(input.to_string()),
            FieldParser::Date => parse_date(input),
            FieldParser::OptionalDate => {
                if input.is_empty() || UNKNOWN_TOKENS.contains(&input.to_lowercase().as_str()) {
                    Ok(String::new())
                } else {
                    parse_date(input)
                }
            }
            FieldParser::Gender => canonical_gender(input)
                .map(str::to_string)
                .ok_or_else(|| "性別は「男」「女」「その他」のいずれかで入力してください。".to_string()),
            FieldParser::Flag => {
                if is_known_flag(input) {
                    Ok(if is_truthy_flag(input) { "○" } else { "×" }.to_string())
                } else {
                    Err("「○」または「×」で入力してください。".to_string())
                }
            }
            FieldParser::NotebookType => ["療育", "精神", "身体"]
                .iter()
                .zip(NOTEBOOK_TYPES)
                .find(|(keyword, _)| input.contains(*keyword))
                .map(|(_, full)| full.to_string())
                .ok_or_else(|| {
                    format!("手帳種別は次のいずれかで入力してください: {}", NOTEBOOK_TYPES.join("、"))
                }),
            FieldParser::SupportLevel => match parse_support_level(input) {
                Some(level) if SUPPORT_LEVEL_RANGE.contains(&level) => Ok(level.to_string()),
                _ => Err("支援区分は0から6の数字で入力してください（例: 区分3）。".to_string()),
            },
            FieldParser::Choice(options) => {
                if options.contains(&input) {
                    Ok(input.to_string())
                } else {
                    Err(format!("次のいずれかで入力してください: {}", options.join("、")))
                }
            }
        }
    }

    /// Optional fields may be blanked with a skip token instead of ending the category.
    pub fn is_optional(&self) -> bool {
        matches!(self, FieldParser::OptionalText | FieldParser::OptionalDate)
    }
}

fn parse_date(input: &str) -> Result<String, String> {
    let normalized = dates::normalize(input);
    if !normalized.is_empty() && dates::is_valid(&normalized) {
        Ok(normalized)
    } else {
        Err(DATE_HINT.to_string())
    }
}

/// One question of a dialog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Record field the answer is stored under.
    pub name: &'static str,
    pub prompt: &'static str,
    pub parser: FieldParser,
}

const fn field(name: &'static str, prompt: &'static str, parser: FieldParser) -> FieldSpec {
    FieldSpec {
        name,
        prompt,
        parser,
    }
}

pub const PERSON_FIELDS: &[FieldSpec] = &[
    field("name", "お名前を教えてください。", FieldParser::Text),
    field(
        "birth_date",
        "生年月日を教えてください（例: 2021-04-15 または 令和3年4月15日）。",
        FieldParser::Date,
    ),
    field("gender", "性別を教えてください（男/女/その他）。", FieldParser::Gender),
];

pub const FAMILY_FIELDS: &[FieldSpec] = &[
    field(
        "name",
        "ご家族のお名前を教えてください（いない場合は「なし」）。",
        FieldParser::Text,
    ),
    field("relation", "続柄を教えてください（例: 母、父、兄）。", FieldParser::Text),
    field("living_together", "同居していますか？（○/×）", FieldParser::Flag),
    field("primary_caregiver", "主な介護者ですか？（○/×）", FieldParser::Flag),
];

pub const NOTEBOOK_FIELDS: &[FieldSpec] = &[
    field(
        "type",
        "お持ちの手帳の種別を教えてください（療育手帳/精神保健福祉手帳/身体障害者手帳、ない場合は「なし」）。",
        FieldParser::NotebookType,
    ),
    field("grade", "等級を教えてください（例: A1、2級、1種）。", FieldParser::Text),
    field("issue_date", "交付日を教えてください（例: 2020-04-01）。", FieldParser::Date),
    field(
        "expiry_date",
        "有効期限を教えてください（期限がない場合は「なし」）。",
        FieldParser::OptionalDate,
    ),
    field("issuing_authority", "交付自治体を教えてください。", FieldParser::Text),
    field(
        "status",
        "状態を教えてください（有効/期限切れ/更新済み）。",
        FieldParser::Choice(&NOTEBOOK_STATUSES),
    ),
];

pub const SUPPORT_LEVEL_FIELDS: &[FieldSpec] = &[
    field(
        "level",
        "障害支援区分を教えてください（区分0〜区分6、ない場合は「なし」）。",
        FieldParser::SupportLevel,
    ),
    field("decision_date", "認定日を教えてください（例: 2023-04-01）。", FieldParser::Date),
    field(
        "expiry_date",
        "有効期限を教えてください（例: 2026-03-31）。",
        FieldParser::OptionalDate,
    ),
    field("deciding_authority", "認定した自治体を教えてください。", FieldParser::Text),
    field(
        "status",
        "状態を教えてください（現在/期限切れ）。",
        FieldParser::Choice(&SUPPORT_LEVEL_STATUSES),
    ),
];

pub const DIAGNOSIS_FIELDS: &[FieldSpec] = &[
    field(
        "name",
        "診断名を教えてください（ない場合は「なし」）。",
        FieldParser::Text,
    ),
    field(
        "diagnosis_date",
        "診断日を教えてください（わからない場合は「不明」）。",
        FieldParser::OptionalDate,
    ),
];

pub const LEGAL_GUARDIAN_FIELDS: &[FieldSpec] = &[
    field(
        "name",
        "成年後見人等のお名前を教えてください（利用していない場合は「なし」）。",
        FieldParser::Text,
    ),
    field("type", "類型を教えてください（後見/保佐/補助）。", FieldParser::Text),
    field(
        "start_date",
        "開始日を教えてください（わからない場合は「不明」）。",
        FieldParser::OptionalDate,
    ),
];

pub const SERVICE_FIELDS: &[FieldSpec] = &[
    field(
        "service_type",
        "利用しているサービスの種類を教えてください（例: 生活介護、ない場合は「なし」）。",
        FieldParser::Text,
    ),
    field("office_name", "事業所名を教えてください。", FieldParser::Text),
    field("manager", "サービス管理責任者のお名前を教えてください。", FieldParser::OptionalText),
    field(
        "status",
        "契約の状態を教えてください（契約中/体験中/契約終了）。",
        FieldParser::Choice(&CONTRACT_STATUSES),
    ),
];

pub const MEDICAL_FIELDS: &[FieldSpec] = &[
    field(
        "name",
        "通院している医療機関名を教えてください（ない場合は「なし」）。",
        FieldParser::Text,
    ),
    field("department", "診療科を教えてください。", FieldParser::Text),
    field("doctor", "主治医のお名前を教えてください。", FieldParser::OptionalText),
    field(
        "medications",
        "処方薬を教えてください（複数の場合は「、」区切り）。",
        FieldParser::OptionalText,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_fields() {
        assert_eq!(FieldParser::Date.parse("令和3年4月15日"), Ok("2021-04-15".to_string()));
        assert!(FieldParser::Date.parse("昨日").is_err());
        assert!(FieldParser::Date.parse("2021-02-30").is_err());
        assert_eq!(FieldParser::OptionalDate.parse("不明"), Ok(String::new()));
        assert_eq!(FieldParser::OptionalDate.parse("2026/3/31"), Ok("2026-03-31".to_string()));
    }

    #[test]
    fn test_gender_and_flag() {
        assert_eq!(FieldParser::Gender.parse("female"), Ok("女".to_string()));
        assert!(FieldParser::Gender.parse("?").is_err());
        assert_eq!(FieldParser::Flag.parse("yes"), Ok("○".to_string()));
        assert_eq!(FieldParser::Flag.parse("No"), Ok("×".to_string()));
        assert!(FieldParser::Flag.parse("たぶん").is_err());
    }

    #[test]
    fn test_notebook_type_expansion() {
        assert_eq!(FieldParser::NotebookType.parse("療育"), Ok("療育手帳".to_string()));
        assert_eq!(
            FieldParser::NotebookType.parse("精神の手帳"),
            Ok("精神保健福祉手帳".to_string())
        );
        assert!(FieldParser::NotebookType.parse("愛の手帳").is_err());
        assert!(FieldParser::NotebookType.parse("").is_err());
    }

    #[test]
    fn test_support_level_and_choice() {
        assert_eq!(FieldParser::SupportLevel.parse("区分4"), Ok("4".to_string()));
        assert!(FieldParser::SupportLevel.parse("7").is_err());
        assert!(FieldParser::Choice(&CONTRACT_STATUSES).parse("契約中").is_ok());
        assert!(FieldParser::Choice(&CONTRACT_STATUSES).parse("検討中").is_err());
    }

    #[test]
    fn test_field_tables_have_unique_names() {
        for table in [
            PERSON_FIELDS,
            FAMILY_FIELDS,
            NOTEBOOK_FIELDS,
            SUPPORT_LEVEL_FIELDS,
            DIAGNOSIS_FIELDS,
            LEGAL_GUARDIAN_FIELDS,
            SERVICE_FIELDS,
            MEDICAL_FIELDS,
        ] {
            let names: std::collections::HashSet<_> = table.iter().map(|f| f.name).collect();
            assert_eq!(names.len(), table.len());
            assert!(!table[0].parser.is_optional());
        }
    }
}
