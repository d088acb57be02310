//! The record-set: one person plus nine repeatable collections.
//!
//! Produced by tabular ingestion or by the dialog engine, consumed by the
//! graph builder. Field values are kept as text the way case files hold them;
//! numbers and booleans in incoming JSON are accepted and converted.

mod person;
mod services;
mod status;

pub use person::*;
pub use services::*;
pub use status::*;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::dates;
use crate::error::{RecordError, Result};

/// The sections of a record-set, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Person,
    Family,
    Notebooks,
    SupportLevels,
    Diagnoses,
    LegalGuardians,
    ConsultationSupports,
    ServicePlans,
    ServiceContracts,
    MedicalInstitutions,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Person,
        Section::Family,
        Section::Notebooks,
        Section::SupportLevels,
        Section::Diagnoses,
        Section::LegalGuardians,
        Section::ConsultationSupports,
        Section::ServicePlans,
        Section::ServiceContracts,
        Section::MedicalInstitutions,
    ];

    /// Human-readable section label.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Person => "Person",
            Section::Family => "Family",
            Section::Notebooks => "Notebooks",
            Section::SupportLevels => "Support levels",
            Section::Diagnoses => "Diagnoses",
            Section::LegalGuardians => "Legal guardians",
            Section::ConsultationSupports => "Consultation supports",
            Section::ServicePlans => "Service plans",
            Section::ServiceContracts => "Service contracts",
            Section::MedicalInstitutions => "Medical institutions",
        }
    }
}

/// The canonical input to graph construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<PersonRecord>,
    #[serde(default)]
    pub family: Vec<FamilyRecord>,
    #[serde(default)]
    pub notebooks: Vec<NotebookRecord>,
    #[serde(default)]
    pub support_levels: Vec<SupportLevelRecord>,
    #[serde(default)]
    pub diagnoses: Vec<DiagnosisRecord>,
    #[serde(default)]
    pub legal_guardians: Vec<LegalGuardianRecord>,
    #[serde(default)]
    pub consultation_supports: Vec<ConsultationSupportRecord>,
    #[serde(default)]
    pub service_plans: Vec<ServicePlanRecord>,
    #[serde(default)]
    pub service_contracts: Vec<ServiceContractRecord>,
    #[serde(default)]
    pub medical_institutions: Vec<MedicalInstitutionRecord>,
}

impl RecordSet {
    /// Create a record-set for a person with empty collections.
    pub fn new(person: PersonRecord) -> Self {
        Self {
            person: Some(person),
            ..Default::default()
        }
    }

    /// The person section; its absence is the one unrecoverable input.
    pub fn person(&self) -> Result<&PersonRecord> {
        self.person.as_ref().ok_or(RecordError::MissingPerson)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of entries in a section (0 or 1 for the person).
    pub fn count(&self, section: Section) -> usize {
        match section {
            Section::Person => usize::from(self.person.is_some()),
            Section::Family => self.family.len(),
            Section::Notebooks => self.notebooks.len(),
            Section::SupportLevels => self.support_levels.len(),
            Section::Diagnoses => self.diagnoses.len(),
            Section::LegalGuardians => self.legal_guardians.len(),
            Section::ConsultationSupports => self.consultation_supports.len(),
            Section::ServicePlans => self.service_plans.len(),
            Section::ServiceContracts => self.service_contracts.len(),
            Section::MedicalInstitutions => self.medical_institutions.len(),
        }
    }

    /// Return a copy with every date normalized to `YYYY-MM-DD` and ages
    /// computed as of `reference` for everyone with a birth date.
    pub fn normalize_dates(&self, reference: NaiveDate) -> RecordSet {
        let mut records = self.clone();

        if let Some(person) = records.person.as_mut() {
            if !person.birth_date.is_empty() {
                normalize_field(&mut person.birth_date);
                person.age = dates::calculate_age_on(&person.birth_date, reference).into();
            }
        }

        for family in &mut records.family {
            if !family.birth_date.is_empty() {
                normalize_field(&mut family.birth_date);
                family.age = dates::calculate_age_on(&family.birth_date, reference).into();
            }
        }

        for notebook in &mut records.notebooks {
            normalize_field(&mut notebook.issue_date);
            normalize_field(&mut notebook.expiry_date);
        }
        for level in &mut records.support_levels {
            normalize_field(&mut level.decision_date);
            normalize_field(&mut level.expiry_date);
        }
        for diagnosis in &mut records.diagnoses {
            normalize_field(&mut diagnosis.diagnosis_date);
        }
        for guardian in &mut records.legal_guardians {
            normalize_field(&mut guardian.start_date);
        }
        for support in &mut records.consultation_supports {
            normalize_field(&mut support.contract_date);
        }
        for plan in &mut records.service_plans {
            normalize_field(&mut plan.creation_date);
            normalize_field(&mut plan.last_monitoring_date);
            normalize_field(&mut plan.next_monitoring_date);
        }
        for contract in &mut records.service_contracts {
            normalize_field(&mut contract.contract_date);
        }
        for institution in &mut records.medical_institutions {
            normalize_field(&mut institution.start_date);
        }

        records
    }
}

fn normalize_field(value: &mut String) {
    if !value.is_empty() {
        *value = dates::normalize(value);
    }
}

/// Accept strings, numbers, booleans, string arrays, or null as text.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

/// Accept integers, whole floats, or numeric strings; anything else is 0.
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => match n.as_f64() {
            // Spreadsheet integers often arrive as 3.0
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        object @ Value::Object(_) => object.to_string(),
    }
}
