//! The person at the center of the ecomap and their family.

use serde::{Deserialize, Serialize};

use super::{lenient_int, lenient_string};
use crate::vocabulary::is_truthy_flag;

/// The person the case is about. Exactly one per record-set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub birth_date: String,
    #[serde(deserialize_with = "lenient_int")]
    pub age: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub postal_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub emergency_contact: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

impl PersonRecord {
    /// Create a person record with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A family member of the person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Relationship to the person, e.g. "母".
    #[serde(deserialize_with = "lenient_string")]
    pub relation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub birth_date: String,
    #[serde(deserialize_with = "lenient_int")]
    pub age: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub living_together: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_caregiver: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

impl FamilyRecord {
    /// Create a family record with a name and relationship.
    pub fn new(name: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relation: relation.into(),
            ..Default::default()
        }
    }

    pub fn lives_together(&self) -> bool {
        is_truthy_flag(&self.living_together)
    }

    pub fn is_primary_caregiver(&self) -> bool {
        is_truthy_flag(&self.primary_caregiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_from_sparse_json() {
        let person: PersonRecord =
            serde_json::from_str(r#"{"name": "山田太郎", "age": "25", "phone": 930001111}"#).unwrap();
        assert_eq!(person.name, "山田太郎");
        assert_eq!(person.age, 25);
        assert_eq!(person.phone, "930001111");
        assert!(person.gender.is_empty());
    }

    #[test]
    fn test_family_flags() {
        let mut mother = FamilyRecord::new("山田花子", "母");
        assert!(!mother.lives_together());

        mother.living_together = "○".to_string();
        mother.primary_caregiver = "×".to_string();
        assert!(mother.lives_together());
        assert!(!mother.is_primary_caregiver());
    }

    #[test]
    fn test_family_boolean_flag() {
        let family: FamilyRecord =
            serde_json::from_str(r#"{"name": "山田一郎", "primary_caregiver": true}"#).unwrap();
        assert!(family.is_primary_caregiver());
    }
}
