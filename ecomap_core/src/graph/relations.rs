//! Relation generation - one operation per relation type.

use chrono::NaiveDateTime;
use serde_json::json;

use super::node::{Layer, NodeId, Properties};
use super::relation::{Direction, Relation, RelationDisplay, RelationId, RelationType};
use crate::config::RelationStyle;

impl RelationType {
    /// The layer a relation of this type belongs to.
    ///
    /// `WorksFor` has no fixed home; callers pass the member's layer.
    pub fn default_layer(&self) -> Layer {
        match self {
            RelationType::HasNotebook | RelationType::RenewedFrom => Layer::Notebooks,
            RelationType::HasSupportLevel | RelationType::ChangedFrom => Layer::SupportLevels,
            RelationType::HasDiagnosis | RelationType::DiagnosedBy => Layer::Diagnoses,
            RelationType::FamilyRelation => Layer::Family,
            RelationType::UnderGuardianship => Layer::LegalGuardians,
            RelationType::HasServicePlan | RelationType::CreatedBy | RelationType::RevisedFrom => {
                Layer::ServicePlans
            }
            RelationType::HasContract | RelationType::ContractWith | RelationType::ManagedBy => {
                Layer::ServiceContracts
            }
            RelationType::ReceivesMedicalCare
            | RelationType::TreatedBy
            | RelationType::PrescribedBy
            | RelationType::TakesMedication => Layer::Medical,
            RelationType::WorksFor => Layer::ConsultationSupports,
        }
    }
}

/// Creates relations for a single build, in creation order.
#[derive(Debug, Clone)]
pub struct RelationGenerator {
    created_at: NaiveDateTime,
    style: RelationStyle,
    relations: Vec<Relation>,
}

impl RelationGenerator {
    pub fn new(created_at: NaiveDateTime, style: RelationStyle) -> Self {
        Self {
            created_at,
            style,
            relations: Vec::new(),
        }
    }

    fn create(
        &mut self,
        relation_type: RelationType,
        source_id: NodeId,
        target_id: NodeId,
        properties: Properties,
        layer: Layer,
    ) -> RelationId {
        let direction = relation_type.direction();
        let relation = Relation {
            id: RelationId::new(),
            relation_type,
            source_id,
            target_id,
            properties,
            direction,
            display: RelationDisplay {
                line_style: relation_type.line_style(),
                line_width: self.style.line_width,
                color: self.style.color.clone(),
                arrow: direction == Direction::Directed,
            },
            layer,
            created_at: self.created_at,
        };
        let id = relation.id;
        self.relations.push(relation);
        id
    }

    fn simple(&mut self, relation_type: RelationType, source: NodeId, target: NodeId) -> RelationId {
        let mut properties = Properties::new();
        if let Some(kind) = relation_type.history_kind() {
            properties.insert("history_type".to_string(), json!(kind));
        }
        self.create(relation_type, source, target, properties, relation_type.default_layer())
    }

    pub fn has_notebook(&mut self, person: NodeId, notebook: NodeId) -> RelationId {
        self.simple(RelationType::HasNotebook, person, notebook)
    }

    pub fn has_support_level(&mut self, person: NodeId, level: NodeId) -> RelationId {
        self.simple(RelationType::HasSupportLevel, person, level)
    }

    pub fn has_diagnosis(&mut self, person: NodeId, diagnosis: NodeId) -> RelationId {
        self.simple(RelationType::HasDiagnosis, person, diagnosis)
    }

    /// Undirected tie carrying the family relation label (母, 兄, ...).
    pub fn family_relation(&mut self, person: NodeId, family: NodeId, label: &str) -> RelationId {
        let mut properties = Properties::new();
        properties.insert("relation".to_string(), json!(label));
        self.create(
            RelationType::FamilyRelation,
            person,
            family,
            properties,
            Layer::Family,
        )
    }

    pub fn under_guardianship(&mut self, person: NodeId, guardian: NodeId) -> RelationId {
        self.simple(RelationType::UnderGuardianship, person, guardian)
    }

    pub fn has_service_plan(&mut self, person: NodeId, plan: NodeId) -> RelationId {
        self.simple(RelationType::HasServicePlan, person, plan)
    }

    pub fn has_contract(&mut self, person: NodeId, contract: NodeId) -> RelationId {
        self.simple(RelationType::HasContract, person, contract)
    }

    pub fn receives_medical_care(&mut self, person: NodeId, institution: NodeId) -> RelationId {
        self.simple(RelationType::ReceivesMedicalCare, person, institution)
    }

    pub fn treated_by(&mut self, person: NodeId, doctor: NodeId) -> RelationId {
        self.simple(RelationType::TreatedBy, person, doctor)
    }

    pub fn created_by(&mut self, plan: NodeId, specialist: NodeId) -> RelationId {
        self.simple(RelationType::CreatedBy, plan, specialist)
    }

    /// Membership of a staff node in an office. `role` is recorded only when non-empty.
    pub fn works_for(&mut self, member: NodeId, office: NodeId, layer: Layer, role: &str) -> RelationId {
        let mut properties = Properties::new();
        if !role.is_empty() {
            properties.insert("role".to_string(), json!(role));
        }
        self.create(RelationType::WorksFor, member, office, properties, layer)
    }

    pub fn contract_with(&mut self, contract: NodeId, service: NodeId) -> RelationId {
        self.simple(RelationType::ContractWith, contract, service)
    }

    pub fn managed_by(&mut self, contract: NodeId, manager: NodeId) -> RelationId {
        self.simple(RelationType::ManagedBy, contract, manager)
    }

    pub fn diagnosed_by(&mut self, diagnosis: NodeId, doctor: NodeId) -> RelationId {
        self.simple(RelationType::DiagnosedBy, diagnosis, doctor)
    }

    /// Links a renewed notebook to the one it replaced.
    pub fn renewed_from(&mut self, new_notebook: NodeId, old_notebook: NodeId) -> RelationId {
        self.simple(RelationType::RenewedFrom, new_notebook, old_notebook)
    }

    /// Links a support level to the decision it changed.
    pub fn changed_from(&mut self, new_level: NodeId, old_level: NodeId) -> RelationId {
        self.simple(RelationType::ChangedFrom, new_level, old_level)
    }

    /// Links a revised service plan to its predecessor.
    pub fn revised_from(&mut self, new_plan: NodeId, old_plan: NodeId) -> RelationId {
        self.simple(RelationType::RevisedFrom, new_plan, old_plan)
    }

    pub fn prescribed_by(&mut self, medication: NodeId, doctor: NodeId) -> RelationId {
        self.simple(RelationType::PrescribedBy, medication, doctor)
    }

    pub fn takes_medication(&mut self, person: NodeId, medication: NodeId) -> RelationId {
        self.simple(RelationType::TakesMedication, person, medication)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn into_relations(self) -> Vec<Relation> {
        self.relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::relation::LineStyle;

    fn generator() -> RelationGenerator {
        RelationGenerator::new(chrono::Local::now().naive_local(), RelationStyle::default())
    }

    #[test]
    fn test_family_relation() {
        let mut relations = generator();
        let (person, mother) = (NodeId::new(), NodeId::new());
        relations.family_relation(person, mother, "母");

        let relation = &relations.relations()[0];
        assert_eq!(relation.relation_type, RelationType::FamilyRelation);
        assert_eq!(relation.direction, Direction::Undirected);
        assert!(!relation.display.arrow);
        assert_eq!(relation.properties["relation"], "母");
        assert_eq!(relation.layer, Layer::Family);
        assert_eq!(relation.other_end(mother), Some(person));
    }

    #[test]
    fn test_directed_relation_display() {
        let mut relations = generator();
        relations.has_notebook(NodeId::new(), NodeId::new());

        let relation = &relations.relations()[0];
        assert_eq!(relation.direction, Direction::Directed);
        assert!(relation.display.arrow);
        assert_eq!(relation.display.line_style, LineStyle::Solid);
        assert_eq!(relation.display.color, "#999");
        assert_eq!(relation.display.line_width, 2);
        assert!(relation.properties.is_empty());
    }

    #[test]
    fn test_history_relations() {
        let mut relations = generator();
        let (new, old) = (NodeId::new(), NodeId::new());
        relations.renewed_from(new, old);
        relations.changed_from(new, old);
        relations.revised_from(new, old);

        let kinds: Vec<_> = relations
            .relations()
            .iter()
            .map(|r| r.properties["history_type"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(kinds, vec!["renewal", "change", "revision"]);
        for relation in relations.relations() {
            assert_eq!(relation.display.line_style, LineStyle::Dashed);
            assert_eq!(relation.source_id, new);
        }
        assert_eq!(relations.relations()[2].layer, Layer::ServicePlans);
    }

    #[test]
    fn test_works_for_role() {
        let mut relations = generator();
        let (member, office) = (NodeId::new(), NodeId::new());
        relations.works_for(member, office, Layer::Medical, "");
        relations.works_for(member, office, Layer::ServiceContracts, "サービス管理責任者");

        let all = relations.relations();
        assert!(all[0].properties.is_empty());
        assert_eq!(all[0].layer, Layer::Medical);
        assert_eq!(all[1].properties["role"], "サービス管理責任者");
    }

    #[test]
    fn test_custom_style() {
        let style = RelationStyle {
            color: "#333".to_string(),
            line_width: 4,
        };
        let mut relations = RelationGenerator::new(chrono::Local::now().naive_local(), style);
        relations.treated_by(NodeId::new(), NodeId::new());
        assert_eq!(relations.relations()[0].display.color, "#333");
        assert_eq!(relations.relations()[0].display.line_width, 4);
    }
}
