//! Node generation - one rule per record type.
//!
//! Each rule picks an allow-listed subset of the record's fields as
//! properties, composes the display name, and decides default visibility.

use std::collections::HashMap;

use case_records::{
    ConsultationSupportRecord, DiagnosisRecord, FamilyRecord,
    LegalGuardianRecord, MedicalInstitutionRecord, NotebookRecord, PersonRecord,
    ServiceContractRecord, ServicePlanRecord, SupportLevelRecord, CONTRACT_ACTIVE,
    NOTEBOOK_ACTIVE, SERVICE_PLAN_ACTIVE, SUPPORT_LEVEL_CURRENT,
};
use chrono::NaiveDateTime;
use serde_json::{json, Value};

use super::node::{Node, NodeId, NodeType, Properties};

fn properties<const N: usize>(entries: [(&str, Value); N]) -> Properties {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Creates nodes for a single build and keeps them in creation order.
#[derive(Debug, Clone)]
pub struct NodeGenerator {
    created_at: NaiveDateTime,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl NodeGenerator {
    /// Every node produced by this generator is stamped with `created_at`.
    pub fn new(created_at: NaiveDateTime) -> Self {
        Self {
            created_at,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn node(&self, node_type: NodeType, name: impl Into<String>, label: impl Into<String>) -> Node {
        Node::new(node_type, name, label, self.created_at)
    }

    pub fn person(&mut self, record: &PersonRecord) -> NodeId {
        let node = self
            .node(NodeType::Person, &record.name, &record.name)
            .with_properties(properties([
                ("birth_date", json!(record.birth_date)),
                ("age", json!(record.age)),
                ("gender", json!(record.gender)),
                ("address", json!(record.address)),
                ("postal_code", json!(record.postal_code)),
                ("phone", json!(record.phone)),
                ("emergency_contact", json!(record.emergency_contact)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(true);
        self.push(node)
    }

    /// Family members are shown by default when they live with the person
    /// or are the primary caregiver.
    pub fn family(&mut self, record: &FamilyRecord) -> NodeId {
        let living_together = record.lives_together();
        let primary_caregiver = record.is_primary_caregiver();
        let node = self
            .node(NodeType::Family, &record.name, &record.name)
            .with_properties(properties([
                ("relation", json!(record.relation)),
                ("birth_date", json!(record.birth_date)),
                ("age", json!(record.age)),
                ("gender", json!(record.gender)),
                ("living_together", json!(living_together)),
                ("primary_caregiver", json!(primary_caregiver)),
                ("address", json!(record.address)),
                ("phone", json!(record.phone)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(living_together || primary_caregiver);
        self.push(node)
    }

    pub fn notebook(&mut self, record: &NotebookRecord) -> NodeId {
        let node_type = NodeType::notebook_subtype(&record.kind);
        let name = format!("{} {}", record.kind, record.grade);
        let node = self
            .node(node_type, &name, &name)
            .with_properties(properties([
                ("type", json!(record.kind)),
                ("grade", json!(record.grade)),
                ("number", json!(record.number)),
                ("issue_date", json!(record.issue_date)),
                ("expiry_date", json!(record.expiry_date)),
                ("issuing_authority", json!(record.issuing_authority)),
                ("status", json!(record.status)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(record.status == NOTEBOOK_ACTIVE);
        self.push(node)
    }

    pub fn support_level(&mut self, record: &SupportLevelRecord) -> NodeId {
        let node = self
            .node(
                NodeType::SupportLevel,
                format!("支援区分{}", record.level),
                format!("区分{}", record.level),
            )
            .with_properties(properties([
                ("level", json!(record.level_number().unwrap_or(0))),
                ("decision_date", json!(record.decision_date)),
                ("expiry_date", json!(record.expiry_date)),
                ("deciding_authority", json!(record.deciding_authority)),
                ("assessor", json!(record.assessor)),
                ("status", json!(record.status)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(record.status == SUPPORT_LEVEL_CURRENT);
        self.push(node)
    }

    pub fn diagnosis(&mut self, record: &DiagnosisRecord) -> NodeId {
        let node = self
            .node(NodeType::Diagnosis, &record.name, &record.name)
            .with_properties(properties([
                ("name", json!(record.name)),
                ("icd10_code", json!(record.icd10_code)),
                ("diagnosis_date", json!(record.diagnosis_date)),
                ("doctor", json!(record.doctor)),
                ("institution", json!(record.institution)),
                ("status", json!(record.status)),
                ("notes", json!(record.notes)),
            ]));
        self.push(node)
    }

    pub fn legal_guardian(&mut self, record: &LegalGuardianRecord) -> NodeId {
        let node = self
            .node(NodeType::LegalGuardian, &record.name, &record.name)
            .with_properties(properties([
                ("name", json!(record.name)),
                ("type", json!(record.kind)),
                ("category", json!(record.category)),
                ("profession", json!(record.profession)),
                ("start_date", json!(record.start_date)),
                ("authority", json!(record.authority)),
                ("contact", json!(record.contact)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(true);
        self.push(node)
    }

    pub fn consultation_support(&mut self, record: &ConsultationSupportRecord) -> NodeId {
        let node = self
            .node(NodeType::ConsultationSupport, &record.office_name, &record.office_name)
            .with_properties(properties([
                ("office_name", json!(record.office_name)),
                ("office_number", json!(record.office_number)),
                ("support_type", json!(record.support_type)),
                ("address", json!(record.address)),
                ("phone", json!(record.phone)),
                ("contract_date", json!(record.contract_date)),
                ("notes", json!(record.notes)),
            ]));
        self.push(node)
    }

    /// A consultation support specialist affiliated with `office`.
    pub fn consultation_support_specialist(&mut self, name: &str, office: NodeId) -> NodeId {
        let node = self
            .node(NodeType::ConsultationSupportSpecialist, name, name)
            .with_properties(properties([
                ("name", json!(name)),
                ("office_id", json!(office.to_string())),
            ]));
        self.push(node)
    }

    pub fn service_plan(&mut self, record: &ServicePlanRecord) -> NodeId {
        let mut name = String::from("サービス等利用計画");
        if !record.plan_number.is_empty() {
            name.push(' ');
            name.push_str(&record.plan_number);
        }
        let node = self
            .node(NodeType::ServicePlan, &name, &name)
            .with_properties(properties([
                ("plan_number", json!(record.plan_number)),
                ("creation_date", json!(record.creation_date)),
                ("last_monitoring_date", json!(record.last_monitoring_date)),
                ("next_monitoring_date", json!(record.next_monitoring_date)),
                ("status", json!(record.status)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(record.status == SERVICE_PLAN_ACTIVE);
        self.push(node)
    }

    pub fn support_service(&mut self, office_name: &str, office_number: &str) -> NodeId {
        let node = self
            .node(NodeType::SupportService, office_name, office_name)
            .with_properties(properties([
                ("office_name", json!(office_name)),
                ("office_number", json!(office_number)),
            ]))
            .with_visibility(true);
        self.push(node)
    }

    /// A service manager affiliated with the support service `office`.
    pub fn service_manager(&mut self, name: &str, office: NodeId) -> NodeId {
        let node = self
            .node(NodeType::ServiceManager, name, name)
            .with_properties(properties([
                ("name", json!(name)),
                ("office_id", json!(office.to_string())),
            ]));
        self.push(node)
    }

    pub fn service_contract(&mut self, record: &ServiceContractRecord) -> NodeId {
        let node = self
            .node(
                NodeType::ServiceContract,
                format!("{} 契約", record.service_type),
                &record.service_type,
            )
            .with_properties(properties([
                ("service_type", json!(record.service_type)),
                ("contract_date", json!(record.contract_date)),
                ("frequency", json!(record.frequency)),
                ("days", json!(record.days)),
                ("status", json!(record.status)),
                ("notes", json!(record.notes)),
            ]))
            .with_visibility(record.status == CONTRACT_ACTIVE);
        self.push(node)
    }

    pub fn medical_institution(&mut self, record: &MedicalInstitutionRecord) -> NodeId {
        let node = self
            .node(NodeType::MedicalInstitution, &record.name, &record.name)
            .with_properties(properties([
                ("name", json!(record.name)),
                ("department", json!(record.department)),
                ("address", json!(record.address)),
                ("phone", json!(record.phone)),
                ("start_date", json!(record.start_date)),
                ("frequency", json!(record.frequency)),
                ("treatment", json!(record.treatment)),
                ("notes", json!(record.notes)),
            ]));
        self.push(node)
    }

    /// A doctor working at `institution`.
    pub fn doctor(&mut self, name: &str, institution: NodeId) -> NodeId {
        let node = self
            .node(NodeType::Doctor, name, name)
            .with_properties(properties([
                ("name", json!(name)),
                ("institution_id", json!(institution.to_string())),
            ]));
        self.push(node)
    }

    /// One Medication node per entry of the institution's prescription text.
    pub fn medications(&mut self, record: &MedicalInstitutionRecord, doctor: NodeId) -> Vec<NodeId> {
        record
            .medication_list()
            .into_iter()
            .map(|medication| {
                let node = self
                    .node(NodeType::Medication, &medication, &medication)
                    .with_properties(properties([
                        ("medication", json!(medication)),
                        ("doctor_id", json!(doctor.to_string())),
                    ]));
                self.push(node)
            })
            .collect()
    }

    /// An administrative body. Not produced from a record-set section.
    pub fn government(&mut self, name: &str) -> NodeId {
        let node = self
            .node(NodeType::Government, name, name)
            .with_properties(properties([("name", json!(name))]));
        self.push(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Ids of all nodes of `node_type`, in creation order.
    pub fn ids_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .map(|n| n.id)
            .collect()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> NodeGenerator {
        NodeGenerator::new(chrono::Local::now().naive_local())
    }

    fn visible(generator: &NodeGenerator, id: NodeId) -> bool {
        generator.get(id).unwrap().is_default_visible
    }

    #[test]
    fn test_person_node() {
        let mut nodes = generator();
        let mut record = PersonRecord::new("山田太郎");
        record.age = 35;
        let id = nodes.person(&record);

        let node = nodes.get(id).unwrap();
        assert_eq!(node.node_type, NodeType::Person);
        assert_eq!(node.name, "山田太郎");
        assert_eq!(node.properties["age"], 35);
        assert_eq!(node.properties["postal_code"], "");
        assert!(node.is_default_visible);
    }

    #[test]
    fn test_family_visibility() {
        let mut nodes = generator();
        let mut together = FamilyRecord::new("山田花子", "母");
        together.living_together = "○".to_string();
        let mut caregiver = FamilyRecord::new("山田一郎", "父");
        caregiver.primary_caregiver = "Yes".to_string();
        let mut apart = FamilyRecord::new("山田次郎", "兄");
        apart.living_together = "×".to_string();
        apart.primary_caregiver = "no".to_string();

        let together = nodes.family(&together);
        let caregiver = nodes.family(&caregiver);
        let apart = nodes.family(&apart);

        assert!(visible(&nodes, together));
        assert!(visible(&nodes, caregiver));
        assert!(!visible(&nodes, apart));
        assert_eq!(nodes.get(together).unwrap().properties["living_together"], true);
    }

    #[test]
    fn test_notebook_node() {
        let mut nodes = generator();
        let active = nodes.notebook(&NotebookRecord {
            kind: "精神保健福祉手帳".to_string(),
            grade: "2級".to_string(),
            status: "有効".to_string(),
            ..Default::default()
        });
        let expired = nodes.notebook(&NotebookRecord {
            kind: "謎の手帳".to_string(),
            grade: "A".to_string(),
            status: "期限切れ".to_string(),
            ..Default::default()
        });

        let node = nodes.get(active).unwrap();
        assert_eq!(node.node_type, NodeType::MentalHealthNotebook);
        assert_eq!(node.name, "精神保健福祉手帳 2級");
        assert!(node.is_default_visible);

        let node = nodes.get(expired).unwrap();
        assert_eq!(node.node_type, NodeType::RyoikuNotebook);
        assert!(!node.is_default_visible);
    }

    #[test]
    fn test_support_level_node() {
        let mut nodes = generator();
        let current = nodes.support_level(&SupportLevelRecord {
            level: "4".to_string(),
            status: "現在".to_string(),
            ..Default::default()
        });
        let old = nodes.support_level(&SupportLevelRecord {
            level: "3".to_string(),
            status: "期限切れ".to_string(),
            ..Default::default()
        });

        let node = nodes.get(current).unwrap();
        assert_eq!(node.name, "支援区分4");
        assert_eq!(node.display.label, "区分4");
        assert_eq!(node.properties["level"], 4);
        assert!(node.is_default_visible);
        assert!(!visible(&nodes, old));
    }

    #[test]
    fn test_always_and_never_visible_types() {
        let mut nodes = generator();
        let diagnosis = nodes.diagnosis(&DiagnosisRecord {
            name: "自閉スペクトラム症".to_string(),
            ..Default::default()
        });
        let guardian = nodes.legal_guardian(&LegalGuardianRecord {
            name: "佐藤弁護士".to_string(),
            ..Default::default()
        });
        let office = nodes.consultation_support(&ConsultationSupportRecord {
            office_name: "相談支援センターA".to_string(),
            ..Default::default()
        });
        let specialist = nodes.consultation_support_specialist("田中", office);
        let service = nodes.support_service("就労支援B", "1234");
        let manager = nodes.service_manager("鈴木", service);
        let institution = nodes.medical_institution(&MedicalInstitutionRecord {
            name: "市民病院".to_string(),
            ..Default::default()
        });
        let doctor = nodes.doctor("山口医師", institution);
        let government = nodes.government("○○市");

        assert!(visible(&nodes, guardian));
        assert!(visible(&nodes, service));
        for hidden in [diagnosis, office, specialist, manager, institution, doctor, government] {
            assert!(!visible(&nodes, hidden));
        }
        assert_eq!(
            nodes.get(specialist).unwrap().property_str("office_id"),
            office.to_string()
        );
    }

    #[test]
    fn test_plan_and_contract_visibility() {
        let mut nodes = generator();
        let active_plan = nodes.service_plan(&ServicePlanRecord {
            plan_number: "P-001".to_string(),
            status: "有効".to_string(),
            ..Default::default()
        });
        let reviewing_plan = nodes.service_plan(&ServicePlanRecord {
            status: "見直し中".to_string(),
            ..Default::default()
        });
        let active_contract = nodes.service_contract(&ServiceContractRecord {
            service_type: "生活介護".to_string(),
            status: "契約中".to_string(),
            ..Default::default()
        });
        let trial_contract = nodes.service_contract(&ServiceContractRecord {
            service_type: "短期入所".to_string(),
            status: "体験中".to_string(),
            ..Default::default()
        });

        assert_eq!(nodes.get(active_plan).unwrap().name, "サービス等利用計画 P-001");
        assert_eq!(nodes.get(reviewing_plan).unwrap().name, "サービス等利用計画");
        assert!(visible(&nodes, active_plan));
        assert!(!visible(&nodes, reviewing_plan));

        let node = nodes.get(active_contract).unwrap();
        assert_eq!(node.name, "生活介護 契約");
        assert_eq!(node.display.label, "生活介護");
        assert!(node.is_default_visible);
        assert!(!visible(&nodes, trial_contract));
    }

    #[test]
    fn test_medications_split() {
        let mut nodes = generator();
        let record = MedicalInstitutionRecord {
            name: "市民病院".to_string(),
            medications: "DrugA 1mg, DrugB 2mg、DrugC".to_string(),
            ..Default::default()
        };
        let institution = nodes.medical_institution(&record);
        let doctor = nodes.doctor("山口医師", institution);
        let medications = nodes.medications(&record, doctor);

        assert_eq!(medications.len(), 3);
        let names: Vec<_> = medications
            .iter()
            .map(|id| nodes.get(*id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["DrugA 1mg", "DrugB 2mg", "DrugC"]);
        for id in medications {
            assert_eq!(nodes.get(id).unwrap().property_str("doctor_id"), doctor.to_string());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut nodes = generator();
        for i in 0..50 {
            nodes.family(&FamilyRecord::new(format!("family {}", i), "兄"));
        }
        let ids: std::collections::HashSet<_> = nodes.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(nodes.ids_of_type(NodeType::Family).len(), 50);
    }
}
