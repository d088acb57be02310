//! Service providers: consultation support, plans, contracts, and medical care.

use serde::{Deserialize, Serialize};

use super::lenient_string;

/// A consultation support office and its assigned specialist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsultationSupportRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub office_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub office_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub support_type: String,
    /// Name of the consultation support specialist, if any.
    #[serde(deserialize_with = "lenient_string")]
    pub specialist: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contract_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

/// A service-use plan (サービス等利用計画).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePlanRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub plan_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub creation_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub last_monitoring_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub next_monitoring_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

/// A welfare service contract with a provider office.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceContractRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub service_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub office_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub office_number: String,
    /// Name of the service manager at the office, if any.
    #[serde(deserialize_with = "lenient_string")]
    pub manager: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contract_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub frequency: String,
    #[serde(deserialize_with = "lenient_string")]
    pub days: String,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

/// A medical institution the person attends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalInstitutionRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub department: String,
    /// Attending doctor's name, if any.
    #[serde(deserialize_with = "lenient_string")]
    pub doctor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_doctor: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub frequency: String,
    #[serde(deserialize_with = "lenient_string")]
    pub treatment: String,
    /// Free-text prescription list, separated by `,` or `、`.
    #[serde(deserialize_with = "lenient_string")]
    pub medications: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

impl MedicalInstitutionRecord {
    /// Split the prescription text into trimmed, non-empty medication names.
    pub fn medication_list(&self) -> Vec<String> {
        self.medications
            .replace('、', ",")
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }
}
