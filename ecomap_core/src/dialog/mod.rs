//! Conversational collection of a record-set.
//!
//! [`DialogEngine`] walks the categories in a fixed order, one answer per
//! call, and produces the same [`RecordSet`] shape that tabular ingestion
//! does. It never moves backwards; once complete, further input only
//! receives a fixed reply.

mod fields;

pub use fields::*;

use case_records::{
    dates, is_skip_token, DiagnosisRecord, FamilyRecord, LegalGuardianRecord,
    MedicalInstitutionRecord, NotebookRecord, PersonRecord, RecordSet, Section,
    ServiceContractRecord, SupportLevelRecord,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Reply to any input once the session is complete.
pub const SESSION_COMPLETE: &str = "セッションは完了しています。";

/// Number of collecting states.
pub const TOTAL_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Initial,
    CollectPerson,
    CollectFamily,
    CollectNotebook,
    CollectSupportLevel,
    CollectDiagnosis,
    CollectLegalGuardian,
    CollectService,
    CollectMedical,
    Complete,
}

impl DialogState {
    /// The following state. `Complete` is terminal.
    pub fn next(&self) -> DialogState {
        match self {
            DialogState::Initial => DialogState::CollectPerson,
            DialogState::CollectPerson => DialogState::CollectFamily,
            DialogState::CollectFamily => DialogState::CollectNotebook,
            DialogState::CollectNotebook => DialogState::CollectSupportLevel,
            DialogState::CollectSupportLevel => DialogState::CollectDiagnosis,
            DialogState::CollectDiagnosis => DialogState::CollectLegalGuardian,
            DialogState::CollectLegalGuardian => DialogState::CollectService,
            DialogState::CollectService => DialogState::CollectMedical,
            DialogState::CollectMedical | DialogState::Complete => DialogState::Complete,
        }
    }

    /// 1-based position among the collecting states; 0 before the session starts.
    pub fn step(&self) -> usize {
        match self {
            DialogState::Initial => 0,
            DialogState::CollectPerson => 1,
            DialogState::CollectFamily => 2,
            DialogState::CollectNotebook => 3,
            DialogState::CollectSupportLevel => 4,
            DialogState::CollectDiagnosis => 5,
            DialogState::CollectLegalGuardian => 6,
            DialogState::CollectService => 7,
            DialogState::CollectMedical | DialogState::Complete => TOTAL_STEPS,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            DialogState::CollectPerson => PERSON_FIELDS,
            DialogState::CollectFamily => FAMILY_FIELDS,
            DialogState::CollectNotebook => NOTEBOOK_FIELDS,
            DialogState::CollectSupportLevel => SUPPORT_LEVEL_FIELDS,
            DialogState::CollectDiagnosis => DIAGNOSIS_FIELDS,
            DialogState::CollectLegalGuardian => LEGAL_GUARDIAN_FIELDS,
            DialogState::CollectService => SERVICE_FIELDS,
            DialogState::CollectMedical => MEDICAL_FIELDS,
            DialogState::Initial | DialogState::Complete => &[],
        }
    }

    /// The record-set section this state fills.
    pub fn section(&self) -> Option<Section> {
        match self {
            DialogState::CollectPerson => Some(Section::Person),
            DialogState::CollectFamily => Some(Section::Family),
            DialogState::CollectNotebook => Some(Section::Notebooks),
            DialogState::CollectSupportLevel => Some(Section::SupportLevels),
            DialogState::CollectDiagnosis => Some(Section::Diagnoses),
            DialogState::CollectLegalGuardian => Some(Section::LegalGuardians),
            DialogState::CollectService => Some(Section::ServiceContracts),
            DialogState::CollectMedical => Some(Section::MedicalInstitutions),
            DialogState::Initial | DialogState::Complete => None,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            DialogState::CollectPerson => "本人情報",
            DialogState::CollectFamily => "家族情報",
            DialogState::CollectNotebook => "手帳情報",
            DialogState::CollectSupportLevel => "障害支援区分",
            DialogState::CollectDiagnosis => "診断情報",
            DialogState::CollectLegalGuardian => "成年後見",
            DialogState::CollectService => "サービス利用",
            DialogState::CollectMedical => "医療機関",
            DialogState::Initial | DialogState::Complete => "",
        }
    }
}

fn section_title(section: Section) -> &'static str {
    match section {
        Section::Person => "本人",
        Section::Family => "家族",
        Section::Notebooks => "手帳",
        Section::SupportLevels => "支援区分",
        Section::Diagnoses => "診断",
        Section::LegalGuardians => "成年後見",
        Section::ConsultationSupports => "相談支援",
        Section::ServicePlans => "サービス等利用計画",
        Section::ServiceContracts => "サービス契約",
        Section::MedicalInstitutions => "医療機関",
    }
}

/// Single-session, single-consumer dialog state machine.
#[derive(Debug, Clone)]
pub struct DialogEngine {
    state: DialogState,
    records: RecordSet,
    current_item: Map<String, Value>,
    reference_date: NaiveDate,
}

impl Default for DialogEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogEngine {
    pub fn new() -> Self {
        Self {
            state: DialogState::Initial,
            records: RecordSet::default(),
            current_item: Map::new(),
            reference_date: dates::today(),
        }
    }

    /// Compute ages as of `date` instead of today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    /// Begin collecting, optionally with the person's name already known.
    pub fn start_session(&mut self, person_name: Option<&str>) -> String {
        self.state = DialogState::CollectPerson;
        self.records = RecordSet::default();
        self.current_item.clear();

        let greeting = match person_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => {
                self.current_item
                    .insert("name".to_string(), Value::String(name.to_string()));
                format!("承知しました。{}さんのエコマップを作成します。", name)
            }
            None => "エコマップを作成します。".to_string(),
        };
        info!(preset_name = person_name.is_some(), "Dialog session started");

        format!(
            "{}\n\n[{}] {}\n{}",
            greeting,
            self.progress(),
            self.state.title(),
            self.pending_prompt()
        )
    }

    /// Feed one answer and return the next question or summary.
    pub fn process_input(&mut self, input: &str) -> String {
        match self.state {
            DialogState::Complete => return SESSION_COMPLETE.to_string(),
            DialogState::Initial => {
                self.start_session(None);
            }
            _ => {}
        }

        let Some(pending) = self.pending_field() else {
            // Only reachable if an item was left full; finish it.
            return self.finish_item();
        };

        if is_skip_token(input) {
            if self.state == DialogState::CollectPerson {
                return format!("本人情報は省略できません。\n\n{}", pending.prompt);
            }
            if self.current_item.is_empty() {
                return self.advance();
            }
            if pending.parser.is_optional() {
                self.current_item
                    .insert(pending.name.to_string(), Value::String(String::new()));
                return self.after_answer();
            }
            warn!(
                state = ?self.state,
                field = pending.name,
                "Skip in the middle of an item; discarding it"
            );
            self.current_item.clear();
            return self.advance();
        }

        match pending.parser.parse(input) {
            Ok(value) => {
                self.current_item
                    .insert(pending.name.to_string(), Value::String(value));
                self.after_answer()
            }
            Err(hint) => {
                debug!(state = ?self.state, field = pending.name, "Answer rejected");
                format!("{}\n\n{}", hint, pending.prompt)
            }
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn step_count(&self) -> usize {
        self.state.step()
    }

    /// Progress indicator such as `Step 3/8`.
    pub fn progress(&self) -> String {
        format!("Step {}/{}", self.step_count(), TOTAL_STEPS)
    }

    /// Fields answered so far for the item in progress.
    pub fn current_item(&self) -> &Map<String, Value> {
        &self.current_item
    }

    pub fn get_collected_data(&self) -> &RecordSet {
        &self.records
    }

    pub fn into_records(self) -> RecordSet {
        self.records
    }

    pub fn is_complete(&self) -> bool {
        self.state == DialogState::Complete
    }

    fn pending_field(&self) -> Option<&'static FieldSpec> {
        self.state
            .fields()
            .iter()
            .find(|f| !self.current_item.contains_key(f.name))
    }

    fn pending_prompt(&self) -> &'static str {
        self.pending_field().map(|f| f.prompt).unwrap_or("")
    }

    fn after_answer(&mut self) -> String {
        match self.pending_field() {
            Some(next) => next.prompt.to_string(),
            None => self.finish_item(),
        }
    }

    /// Move the completed item into the record-set.
    fn finish_item(&mut self) -> String {
        let item = Value::Object(std::mem::take(&mut self.current_item));
        let stored = match self.state {
            DialogState::CollectPerson => {
                let result = from_item::<PersonRecord>(item).map(|mut person| {
                    person.age = dates::calculate_age_on(&person.birth_date, self.reference_date).into();
                    person
                });
                result.map(|person| self.records.person = Some(person))
            }
            DialogState::CollectFamily => push_item::<FamilyRecord>(&mut self.records.family, item),
            DialogState::CollectNotebook => {
                push_item::<NotebookRecord>(&mut self.records.notebooks, item)
            }
            DialogState::CollectSupportLevel => {
                push_item::<SupportLevelRecord>(&mut self.records.support_levels, item)
            }
            DialogState::CollectDiagnosis => {
                push_item::<DiagnosisRecord>(&mut self.records.diagnoses, item)
            }
            DialogState::CollectLegalGuardian => {
                push_item::<LegalGuardianRecord>(&mut self.records.legal_guardians, item)
            }
            DialogState::CollectService => {
                push_item::<ServiceContractRecord>(&mut self.records.service_contracts, item)
            }
            DialogState::CollectMedical => {
                push_item::<MedicalInstitutionRecord>(&mut self.records.medical_institutions, item)
            }
            DialogState::Initial | DialogState::Complete => Ok(()),
        };

        if let Err(e) = stored {
            warn!(state = ?self.state, error = %e, "Could not store dialog item");
            return format!("入力内容を登録できませんでした。\n\n{}", self.pending_prompt());
        }
        debug!(state = ?self.state, "Dialog item stored");

        if self.state == DialogState::CollectPerson {
            let ack = match &self.records.person {
                Some(person) => format!(
                    "ありがとうございます。{}さん（{}歳）の本人情報を確認しました。",
                    person.name, person.age
                ),
                None => String::new(),
            };
            return format!("{}\n\n{}", ack, self.advance());
        }

        format!(
            "{}を追加しました。続けて入力するか、終わる場合は「次へ」と入力してください。\n\n{}",
            self.state.title(),
            self.pending_prompt()
        )
    }

    fn advance(&mut self) -> String {
        let from = self.state;
        self.state = self.state.next();
        self.current_item.clear();
        info!(from = ?from, to = ?self.state, "Dialog advanced");

        if self.is_complete() {
            return self.summary();
        }
        format!(
            "[{}] {}\n{}",
            self.progress(),
            self.state.title(),
            self.pending_prompt()
        )
    }

    fn summary(&self) -> String {
        let mut lines = vec!["情報の収集が完了しました。".to_string()];
        for section in Section::ALL {
            lines.push(format!(
                "- {}: {}件",
                section_title(section),
                self.records.count(section)
            ));
        }
        lines.join("\n")
    }
}

fn from_item<T: DeserializeOwned>(item: Value) -> serde_json::Result<T> {
    serde_json::from_value(item)
}

fn push_item<T: DeserializeOwned>(collection: &mut Vec<T>, item: Value) -> serde_json::Result<()> {
    collection.push(from_item(item)?);
    Ok(())
}
