//! Graph construction from a record-set.
//!
//! Nodes are built first in section order, then relations. Relation rules
//! resolve their endpoints from the nodes of the first pass, so the two
//! passes must not be interleaved.

use std::collections::HashSet;

use case_records::{validate_all, RecordSet};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::node::{Node, NodeId, NodeType};
use super::nodes::NodeGenerator;
use super::relation::{Relation, RelationType};
use super::relations::RelationGenerator;
use crate::config::{EcomapConfig, ValidationMode};
use crate::error::{EcomapError, Result};

/// The person at the centre of the map, repeated at the top of the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: NodeId,
    pub name: String,
    pub age: i64,
    pub birth_date: String,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub created_at: NaiveDateTime,
    pub created_by: String,
    pub version: String,
    pub schema_version: String,
    pub source: String,
    pub node_count: usize,
    pub relation_count: usize,
    pub person_name: String,
    pub person_age: i64,
}

/// A complete ecomap: the unit handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcomapGraph {
    pub person: PersonSummary,
    pub nodes: Vec<Node>,
    pub relations: Vec<Relation>,
    pub metadata: GraphMetadata,
}

impl EcomapGraph {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    pub fn relations_of_type(&self, relation_type: RelationType) -> impl Iterator<Item = &Relation> {
        self.relations
            .iter()
            .filter(move |r| r.relation_type == relation_type)
    }

    /// Relations with an endpoint that is not a node of this graph.
    ///
    /// Always empty for graphs produced by [`GraphBuilder`].
    pub fn dangling_relations(&self) -> Vec<&Relation> {
        let ids: HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        self.relations
            .iter()
            .filter(|r| !ids.contains(&r.source_id) || !ids.contains(&r.target_id))
            .collect()
    }
}

/// Node ids from the first pass, grouped the way relation rules consume them.
#[derive(Debug, Default)]
struct BuiltNodes {
    person: Option<NodeId>,
    family: Vec<NodeId>,
    notebooks: Vec<NodeId>,
    support_levels: Vec<NodeId>,
    diagnoses: Vec<NodeId>,
    guardians: Vec<NodeId>,
    specialists: Vec<(NodeId, NodeId)>,
    plans: Vec<NodeId>,
    contracts: Vec<NodeId>,
    services: Vec<NodeId>,
    managers: Vec<NodeId>,
    institutions: Vec<NodeId>,
    doctors: Vec<(NodeId, NodeId)>,
    medications: Vec<(NodeId, NodeId)>,
}

/// Builds one [`EcomapGraph`] per call.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: EcomapConfig,
}

impl GraphBuilder {
    pub fn new(config: EcomapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EcomapConfig {
        &self.config
    }

    /// Build nodes, then relations, then metadata.
    ///
    /// Fails only when the record-set has no person.
    pub fn build(&self, records: &RecordSet) -> Result<EcomapGraph> {
        let person = records.person()?;
        let created_at = chrono::Local::now().naive_local();
        info!(person = %person.name, source = %self.config.output.source, "Building ecomap");

        let mut nodes = NodeGenerator::new(created_at);
        let built = build_nodes(&mut nodes, records);
        debug!(node_count = nodes.len(), "Generated nodes");

        let mut relations = RelationGenerator::new(created_at, self.config.relations.clone());
        build_relations(&mut relations, &built, records);
        debug!(relation_count = relations.len(), "Generated relations");

        let person_id = built.person.ok_or(case_records::RecordError::MissingPerson)?;
        let nodes = nodes.into_nodes();
        let relations = relations.into_relations();

        let output = &self.config.output;
        let metadata = GraphMetadata {
            created_at,
            created_by: output.created_by.clone(),
            version: output.version.clone(),
            schema_version: output.schema_version.clone(),
            source: output.source.clone(),
            node_count: nodes.len(),
            relation_count: relations.len(),
            person_name: person.name.clone(),
            person_age: person.age,
        };
        info!(
            node_count = metadata.node_count,
            relation_count = metadata.relation_count,
            "Ecomap built"
        );

        Ok(EcomapGraph {
            person: PersonSummary {
                id: person_id,
                name: person.name.clone(),
                age: person.age,
                birth_date: person.birth_date.clone(),
                gender: person.gender.clone(),
            },
            nodes,
            relations,
            metadata,
        })
    }
}

fn build_nodes(nodes: &mut NodeGenerator, records: &RecordSet) -> BuiltNodes {
    let mut built = BuiltNodes::default();

    if let Some(person) = &records.person {
        built.person = Some(nodes.person(person));
    }
    built.family = records.family.iter().map(|f| nodes.family(f)).collect();
    built.notebooks = records.notebooks.iter().map(|n| nodes.notebook(n)).collect();
    built.support_levels = records
        .support_levels
        .iter()
        .map(|l| nodes.support_level(l))
        .collect();
    built.diagnoses = records.diagnoses.iter().map(|d| nodes.diagnosis(d)).collect();
    built.guardians = records
        .legal_guardians
        .iter()
        .map(|g| nodes.legal_guardian(g))
        .collect();

    for support in &records.consultation_supports {
        let office = nodes.consultation_support(support);
        if !support.specialist.is_empty() {
            let specialist = nodes.consultation_support_specialist(&support.specialist, office);
            built.specialists.push((specialist, office));
        }
    }

    built.plans = records
        .service_plans
        .iter()
        .map(|p| nodes.service_plan(p))
        .collect();

    for contract in &records.service_contracts {
        built.contracts.push(nodes.service_contract(contract));
        if !contract.office_name.is_empty() {
            let service = nodes.support_service(&contract.office_name, &contract.office_number);
            built.services.push(service);
            if !contract.manager.is_empty() {
                built.managers.push(nodes.service_manager(&contract.manager, service));
            }
        }
    }

    for institution in &records.medical_institutions {
        let institution_id = nodes.medical_institution(institution);
        built.institutions.push(institution_id);
        if !institution.doctor.is_empty() {
            let doctor = nodes.doctor(&institution.doctor, institution_id);
            built.doctors.push((doctor, institution_id));
            for medication in nodes.medications(institution, doctor) {
                built.medications.push((medication, doctor));
            }
        }
    }

    built
}

fn build_relations(relations: &mut RelationGenerator, built: &BuiltNodes, records: &RecordSet) {
    let Some(person) = built.person else {
        return;
    };

    for (family, record) in built.family.iter().zip(&records.family) {
        relations.family_relation(person, *family, &record.relation);
    }
    for notebook in &built.notebooks {
        relations.has_notebook(person, *notebook);
    }
    for level in &built.support_levels {
        relations.has_support_level(person, *level);
    }
    for diagnosis in &built.diagnoses {
        relations.has_diagnosis(person, *diagnosis);
    }
    for guardian in &built.guardians {
        relations.under_guardianship(person, *guardian);
    }

    for (specialist, office) in &built.specialists {
        relations.works_for(
            *specialist,
            *office,
            NodeType::ConsultationSupportSpecialist.layer(),
            "",
        );
    }

    // Plans, contracts and managers link to the first candidate of each kind.
    let first_specialist = built.specialists.first().map(|(id, _)| *id);
    for plan in &built.plans {
        relations.has_service_plan(person, *plan);
        if let Some(specialist) = first_specialist {
            relations.created_by(*plan, specialist);
        }
    }

    let first_service = built.services.first().copied();
    let first_manager = built.managers.first().copied();
    if built.contracts.len() > 1 && built.services.len() > 1 {
        warn!(
            contract_count = built.contracts.len(),
            service_count = built.services.len(),
            "Several support services present, contracts link to the first"
        );
    }
    for contract in &built.contracts {
        relations.has_contract(person, *contract);
        if let Some(service) = first_service {
            relations.contract_with(*contract, service);
        }
        if let Some(manager) = first_manager {
            relations.managed_by(*contract, manager);
            if let Some(service) = first_service {
                relations.works_for(manager, service, NodeType::ServiceManager.layer(), "");
            }
        }
    }

    for institution in &built.institutions {
        relations.receives_medical_care(person, *institution);
    }
    for (doctor, institution) in &built.doctors {
        relations.treated_by(person, *doctor);
        relations.works_for(*doctor, *institution, NodeType::Doctor.layer(), "");
    }
    for (medication, doctor) in &built.medications {
        relations.takes_medication(person, *medication);
        relations.prescribed_by(*medication, *doctor);
    }
}

/// Validate, normalize dates as of `reference_date`, and build.
///
/// A missing person always fails with [`EcomapError::Records`]. Other
/// validation errors fail the build in strict mode and are logged in
/// advisory mode.
pub fn build_ecomap(
    records: &RecordSet,
    config: &EcomapConfig,
    reference_date: NaiveDate,
) -> Result<EcomapGraph> {
    records.person()?;

    let errors = validate_all(records);
    if !errors.is_empty() {
        match config.validation {
            ValidationMode::Strict => {
                warn!(error_count = errors.len(), "Record-set rejected");
                return Err(EcomapError::Validation(errors));
            }
            ValidationMode::Advisory => {
                for error in &errors {
                    warn!(%error, "Validation");
                }
            }
        }
    }

    let normalized = records.normalize_dates(reference_date);
    GraphBuilder::new(config.clone()).build(&normalized)
}
