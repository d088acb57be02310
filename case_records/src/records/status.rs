//! Certificates and statuses: notebooks, support levels, diagnoses, guardianship.

use serde::{Deserialize, Serialize};

use super::lenient_string;
use crate::vocabulary::parse_support_level;

/// A disability notebook (療育手帳, 精神保健福祉手帳, 身体障害者手帳).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookRecord {
    /// Raw notebook type label.
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_string")]
    pub grade: String,
    #[serde(deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub issue_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub expiry_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub issuing_authority: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

/// A disability support level decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportLevelRecord {
    /// Raw level text; expected to be an integer in 0..=6.
    #[serde(deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub decision_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub expiry_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub deciding_authority: String,
    #[serde(deserialize_with = "lenient_string")]
    pub assessor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

impl SupportLevelRecord {
    /// The level as a number, if it parses.
    pub fn level_number(&self) -> Option<i64> {
        parse_support_level(&self.level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub icd10_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub diagnosis_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub doctor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

/// An adult guardianship arrangement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalGuardianRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Guardian type, e.g. 成年後見人 or 保佐人.
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub profession: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub authority: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contact: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}
