//! Relation definitions - typed edges between nodes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::{Layer, NodeId, Properties};

/// Unique identifier for relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationId(pub Uuid);

impl RelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The nineteen relation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    HasNotebook,
    HasSupportLevel,
    HasDiagnosis,
    FamilyRelation,
    UnderGuardianship,
    HasServicePlan,
    HasContract,
    ReceivesMedicalCare,
    TreatedBy,
    CreatedBy,
    WorksFor,
    ContractWith,
    ManagedBy,
    DiagnosedBy,
    RenewedFrom,
    ChangedFrom,
    RevisedFrom,
    PrescribedBy,
    TakesMedication,
}

impl RelationType {
    pub const ALL: [RelationType; 19] = [
        RelationType::HasNotebook,
        RelationType::HasSupportLevel,
        RelationType::HasDiagnosis,
        RelationType::FamilyRelation,
        RelationType::UnderGuardianship,
        RelationType::HasServicePlan,
        RelationType::HasContract,
        RelationType::ReceivesMedicalCare,
        RelationType::TreatedBy,
        RelationType::CreatedBy,
        RelationType::WorksFor,
        RelationType::ContractWith,
        RelationType::ManagedBy,
        RelationType::DiagnosedBy,
        RelationType::RenewedFrom,
        RelationType::ChangedFrom,
        RelationType::RevisedFrom,
        RelationType::PrescribedBy,
        RelationType::TakesMedication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::HasNotebook => "HAS_NOTEBOOK",
            RelationType::HasSupportLevel => "HAS_SUPPORT_LEVEL",
            RelationType::HasDiagnosis => "HAS_DIAGNOSIS",
            RelationType::FamilyRelation => "FAMILY_RELATION",
            RelationType::UnderGuardianship => "UNDER_GUARDIANSHIP",
            RelationType::HasServicePlan => "HAS_SERVICE_PLAN",
            RelationType::HasContract => "HAS_CONTRACT",
            RelationType::ReceivesMedicalCare => "RECEIVES_MEDICAL_CARE",
            RelationType::TreatedBy => "TREATED_BY",
            RelationType::CreatedBy => "CREATED_BY",
            RelationType::WorksFor => "WORKS_FOR",
            RelationType::ContractWith => "CONTRACT_WITH",
            RelationType::ManagedBy => "MANAGED_BY",
            RelationType::DiagnosedBy => "DIAGNOSED_BY",
            RelationType::RenewedFrom => "RENEWED_FROM",
            RelationType::ChangedFrom => "CHANGED_FROM",
            RelationType::RevisedFrom => "REVISED_FROM",
            RelationType::PrescribedBy => "PRESCRIBED_BY",
            RelationType::TakesMedication => "TAKES_MEDICATION",
        }
    }

    /// Only family links are undirected.
    pub fn direction(&self) -> Direction {
        match self {
            RelationType::FamilyRelation => Direction::Undirected,
            _ => Direction::Directed,
        }
    }

    /// True for edges linking a record to the record it superseded.
    pub fn is_history(&self) -> bool {
        matches!(
            self,
            RelationType::RenewedFrom | RelationType::ChangedFrom | RelationType::RevisedFrom
        )
    }

    pub fn line_style(&self) -> LineStyle {
        if self.is_history() {
            LineStyle::Dashed
        } else {
            LineStyle::Solid
        }
    }

    /// The `history_type` property value for history edges.
    pub fn history_kind(&self) -> Option<&'static str> {
        match self {
            RelationType::RenewedFrom => Some("renewal"),
            RelationType::ChangedFrom => Some("change"),
            RelationType::RevisedFrom => Some("revision"),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Directed,
    Undirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// How a relation is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDisplay {
    pub line_style: LineStyle,
    pub line_width: u32,
    pub color: String,
    pub arrow: bool,
}

/// A directed (or undirected) edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,

    #[serde(rename = "type")]
    pub relation_type: RelationType,

    pub source_id: NodeId,
    pub target_id: NodeId,

    pub properties: Properties,
    pub direction: Direction,
    pub display: RelationDisplay,
    pub layer: Layer,
    pub created_at: NaiveDateTime,
}

impl Relation {
    /// The node at the other end of this relation, if `node` is one of its endpoints.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source_id == node {
            Some(self.target_id)
        } else if self.target_id == node {
            Some(self.source_id)
        } else {
            None
        }
    }

    pub fn involves(&self, node: NodeId) -> bool {
        self.source_id == node || self.target_id == node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        for relation_type in RelationType::ALL {
            let json = serde_json::to_value(relation_type).unwrap();
            assert_eq!(json, relation_type.as_str());
        }
    }

    #[test]
    fn test_only_family_is_undirected() {
        let undirected: Vec<_> = RelationType::ALL
            .into_iter()
            .filter(|t| t.direction() == Direction::Undirected)
            .collect();
        assert_eq!(undirected, vec![RelationType::FamilyRelation]);
    }

    #[test]
    fn test_history_relations_are_dashed() {
        for relation_type in RelationType::ALL {
            let dashed = relation_type.line_style() == LineStyle::Dashed;
            assert_eq!(dashed, relation_type.is_history());
            assert_eq!(dashed, relation_type.history_kind().is_some());
        }
        assert_eq!(RelationType::RevisedFrom.history_kind(), Some("revision"));
    }
}
