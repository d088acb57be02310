//! Record validation.
//!
//! Every check returns a list of human-readable messages; an empty list means
//! the record is acceptable. Nothing here mutates input or fails, so callers
//! decide whether problems abort a build or are only reported.

use crate::dates;
use crate::records::*;
use crate::vocabulary::*;

/// Report each required field that is blank.
pub fn validate_required(fields: &[(&str, &str)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| format!("{} is required", name))
        .collect()
}

fn check_date(errors: &mut Vec<String>, field: &str, value: &str) {
    if !value.is_empty() && !dates::is_valid(value) {
        errors.push(format!("{} has an invalid date: {}", field, value));
    }
}

fn check_enum(errors: &mut Vec<String>, field: &str, value: &str, allowed: &[&str]) {
    if !value.is_empty() && !allowed.contains(&value) {
        errors.push(format!(
            "{} has an unexpected value: {} (expected one of {})",
            field,
            value,
            allowed.join("/")
        ));
    }
}

pub fn validate_person(person: &PersonRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("name", person.name.as_str()),
        ("birth_date", person.birth_date.as_str()),
        ("gender", person.gender.as_str()),
    ]);
    check_date(&mut errors, "birth_date", &person.birth_date);
    if !person.gender.is_empty() && canonical_gender(&person.gender).is_none() {
        errors.push(format!("gender has an unexpected value: {}", person.gender));
    }
    errors
}

pub fn validate_family(family: &FamilyRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("name", family.name.as_str()),
        ("relation", family.relation.as_str()),
        ("living_together", family.living_together.as_str()),
    ]);
    check_date(&mut errors, "birth_date", &family.birth_date);
    if !family.living_together.is_empty() && !is_known_flag(&family.living_together) {
        errors.push(format!(
            "living_together has an unexpected value: {}",
            family.living_together
        ));
    }
    errors
}

pub fn validate_notebook(notebook: &NotebookRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("type", notebook.kind.as_str()),
        ("grade", notebook.grade.as_str()),
        ("issue_date", notebook.issue_date.as_str()),
        ("issuing_authority", notebook.issuing_authority.as_str()),
        ("status", notebook.status.as_str()),
    ]);
    check_enum(&mut errors, "type", &notebook.kind, &NOTEBOOK_TYPES);
    check_date(&mut errors, "issue_date", &notebook.issue_date);
    check_date(&mut errors, "expiry_date", &notebook.expiry_date);
    check_enum(&mut errors, "status", &notebook.status, &NOTEBOOK_STATUSES);
    errors
}

pub fn validate_support_level(level: &SupportLevelRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("level", level.level.as_str()),
        ("decision_date", level.decision_date.as_str()),
        ("deciding_authority", level.deciding_authority.as_str()),
        ("status", level.status.as_str()),
    ]);
    if !level.level.trim().is_empty() {
        match level.level_number() {
            Some(n) if SUPPORT_LEVEL_RANGE.contains(&n) => {}
            Some(n) => errors.push(format!("level must be between 0 and 6: {}", n)),
            None => errors.push(format!("level is not a number: {}", level.level)),
        }
    }
    check_date(&mut errors, "decision_date", &level.decision_date);
    check_date(&mut errors, "expiry_date", &level.expiry_date);
    check_enum(&mut errors, "status", &level.status, &SUPPORT_LEVEL_STATUSES);
    errors
}

pub fn validate_diagnosis(diagnosis: &DiagnosisRecord) -> Vec<String> {
    let mut errors = validate_required(&[("name", diagnosis.name.as_str())]);
    check_date(&mut errors, "diagnosis_date", &diagnosis.diagnosis_date);
    check_enum(&mut errors, "status", &diagnosis.status, &DIAGNOSIS_STATUSES);
    errors
}

pub fn validate_legal_guardian(guardian: &LegalGuardianRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("name", guardian.name.as_str()),
        ("type", guardian.kind.as_str()),
    ]);
    check_date(&mut errors, "start_date", &guardian.start_date);
    errors
}

pub fn validate_consultation_support(support: &ConsultationSupportRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("office_name", support.office_name.as_str()),
        ("support_type", support.support_type.as_str()),
    ]);
    check_date(&mut errors, "contract_date", &support.contract_date);
    errors
}

pub fn validate_service_plan(plan: &ServicePlanRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("creation_date", plan.creation_date.as_str()),
        ("status", plan.status.as_str()),
    ]);
    check_date(&mut errors, "creation_date", &plan.creation_date);
    check_date(&mut errors, "last_monitoring_date", &plan.last_monitoring_date);
    check_date(&mut errors, "next_monitoring_date", &plan.next_monitoring_date);
    check_enum(&mut errors, "status", &plan.status, &SERVICE_PLAN_STATUSES);
    errors
}

pub fn validate_service_contract(contract: &ServiceContractRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("service_type", contract.service_type.as_str()),
        ("office_name", contract.office_name.as_str()),
    ]);
    check_date(&mut errors, "contract_date", &contract.contract_date);
    check_enum(&mut errors, "status", &contract.status, &CONTRACT_STATUSES);
    errors
}

pub fn validate_medical_institution(institution: &MedicalInstitutionRecord) -> Vec<String> {
    let mut errors = validate_required(&[
        ("name", institution.name.as_str()),
        ("department", institution.department.as_str()),
    ]);
    check_date(&mut errors, "start_date", &institution.start_date);
    errors
}

fn collect_section<T>(
    all_errors: &mut Vec<String>,
    section: Section,
    records: &[T],
    validate: impl Fn(&T) -> Vec<String>,
) {
    for (i, record) in records.iter().enumerate() {
        let errors = validate(record);
        if !errors.is_empty() {
            all_errors.push(format!("{} #{}:", section.label(), i + 1));
            all_errors.extend(errors.into_iter().map(|e| format!("  {}", e)));
        }
    }
}

/// Validate a whole record-set, labelling errors by section and entry.
pub fn validate_all(records: &RecordSet) -> Vec<String> {
    let mut all_errors = Vec::new();

    match &records.person {
        Some(person) => {
            let errors = validate_person(person);
            if !errors.is_empty() {
                all_errors.push(format!("{}:", Section::Person.label()));
                all_errors.extend(errors.into_iter().map(|e| format!("  {}", e)));
            }
        }
        None => all_errors.push("Person section is missing".to_string()),
    }

    collect_section(&mut all_errors, Section::Family, &records.family, validate_family);
    collect_section(&mut all_errors, Section::Notebooks, &records.notebooks, validate_notebook);
    collect_section(
        &mut all_errors,
        Section::SupportLevels,
        &records.support_levels,
        validate_support_level,
    );
    collect_section(&mut all_errors, Section::Diagnoses, &records.diagnoses, validate_diagnosis);
    collect_section(
        &mut all_errors,
        Section::LegalGuardians,
        &records.legal_guardians,
        validate_legal_guardian,
    );
    collect_section(
        &mut all_errors,
        Section::ConsultationSupports,
        &records.consultation_supports,
        validate_consultation_support,
    );
    collect_section(
        &mut all_errors,
        Section::ServicePlans,
        &records.service_plans,
        validate_service_plan,
    );
    collect_section(
        &mut all_errors,
        Section::ServiceContracts,
        &records.service_contracts,
        validate_service_contract,
    );
    collect_section(
        &mut all_errors,
        Section::MedicalInstitutions,
        &records.medical_institutions,
        validate_medical_institution,
    );

    all_errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_person() -> PersonRecord {
        PersonRecord {
            name: "山田太郎".to_string(),
            birth_date: "2000-01-01".to_string(),
            gender: "男".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let errors = validate_required(&[("name", "山田太郎"), ("address", "  ")]);
        assert_eq!(errors, vec!["address is required"]);
    }

    #[test]
    fn test_valid_person() {
        assert!(validate_person(&valid_person()).is_empty());
    }

    #[test]
    fn test_invalid_person() {
        let person = PersonRecord {
            birth_date: "invalid".to_string(),
            gender: "不明".to_string(),
            ..valid_person()
        };
        let errors = validate_person(&person);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("birth_date"));
        assert!(errors[1].contains("不明"));
    }

    #[test]
    fn test_family_flag_values() {
        let mut family = FamilyRecord::new("山田花子", "母");
        family.living_together = "○".to_string();
        assert!(validate_family(&family).is_empty());

        family.living_together = "sometimes".to_string();
        assert_eq!(validate_family(&family).len(), 1);
    }

    #[test]
    fn test_notebook_enums() {
        let mut notebook = NotebookRecord {
            kind: "療育手帳".to_string(),
            grade: "A1".to_string(),
            issue_date: "2020-04-01".to_string(),
            issuing_authority: "北九州市".to_string(),
            status: "有効".to_string(),
            ..Default::default()
        };
        assert!(validate_notebook(&notebook).is_empty());

        notebook.status = "紛失".to_string();
        notebook.expiry_date = "someday".to_string();
        assert_eq!(validate_notebook(&notebook).len(), 2);
    }

    #[test]
    fn test_support_level_range() {
        let mut level = SupportLevelRecord {
            level: "6".to_string(),
            decision_date: "2021-04-01".to_string(),
            deciding_authority: "北九州市".to_string(),
            status: "現在".to_string(),
            ..Default::default()
        };
        assert!(validate_support_level(&level).is_empty());

        level.level = "7".to_string();
        assert!(validate_support_level(&level)[0].contains("between 0 and 6"));

        level.level = "high".to_string();
        assert!(validate_support_level(&level)[0].contains("not a number"));

        level.level = "0".to_string();
        assert!(validate_support_level(&level).is_empty());
    }

    #[test]
    fn test_validate_all_labels_sections() {
        let mut records = RecordSet::new(valid_person());
        records.family.push(FamilyRecord::new("山田花子", "母"));
        records.medical_institutions.push(MedicalInstitutionRecord {
            name: "北九州病院".to_string(),
            department: "精神科".to_string(),
            ..Default::default()
        });

        let errors = validate_all(&records);
        assert_eq!(errors, vec!["Family #1:", "  living_together is required"]);
    }

    #[test]
    fn test_validate_all_missing_person() {
        let errors = validate_all(&RecordSet::default());
        assert_eq!(errors, vec!["Person section is missing"]);
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let records = RecordSet::new(PersonRecord::new("山田太郎"));
        let before = records.clone();
        let _ = validate_all(&records);
        assert_eq!(records, before);
    }
}
