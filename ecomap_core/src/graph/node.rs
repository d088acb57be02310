//! Node definitions - the typed entities of an ecomap.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form key/value properties carried by nodes and relations.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Unique identifier for nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eighteen node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Person,
    Family,
    RyoikuNotebook,
    MentalHealthNotebook,
    PhysicalDisabilityNotebook,
    SupportLevel,
    Diagnosis,
    LegalGuardian,
    ConsultationSupport,
    ConsultationSupportSpecialist,
    ServicePlan,
    SupportService,
    ServiceManager,
    ServiceContract,
    MedicalInstitution,
    Doctor,
    Government,
    Medication,
}

impl NodeType {
    pub const ALL: [NodeType; 18] = [
        NodeType::Person,
        NodeType::Family,
        NodeType::RyoikuNotebook,
        NodeType::MentalHealthNotebook,
        NodeType::PhysicalDisabilityNotebook,
        NodeType::SupportLevel,
        NodeType::Diagnosis,
        NodeType::LegalGuardian,
        NodeType::ConsultationSupport,
        NodeType::ConsultationSupportSpecialist,
        NodeType::ServicePlan,
        NodeType::SupportService,
        NodeType::ServiceManager,
        NodeType::ServiceContract,
        NodeType::MedicalInstitution,
        NodeType::Doctor,
        NodeType::Government,
        NodeType::Medication,
    ];

    /// The type tag as it appears in graph JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Person => "Person",
            NodeType::Family => "Family",
            NodeType::RyoikuNotebook => "RyoikuNotebook",
            NodeType::MentalHealthNotebook => "MentalHealthNotebook",
            NodeType::PhysicalDisabilityNotebook => "PhysicalDisabilityNotebook",
            NodeType::SupportLevel => "SupportLevel",
            NodeType::Diagnosis => "Diagnosis",
            NodeType::LegalGuardian => "LegalGuardian",
            NodeType::ConsultationSupport => "ConsultationSupport",
            NodeType::ConsultationSupportSpecialist => "ConsultationSupportSpecialist",
            NodeType::ServicePlan => "ServicePlan",
            NodeType::SupportService => "SupportService",
            NodeType::ServiceManager => "ServiceManager",
            NodeType::ServiceContract => "ServiceContract",
            NodeType::MedicalInstitution => "MedicalInstitution",
            NodeType::Doctor => "Doctor",
            NodeType::Government => "Government",
            NodeType::Medication => "Medication",
        }
    }

    /// Select the notebook subtype from a raw notebook label.
    ///
    /// Labels matching none of the keywords fall back to `RyoikuNotebook`.
    pub fn notebook_subtype(label: &str) -> NodeType {
        if label.contains("療育") {
            NodeType::RyoikuNotebook
        } else if label.contains("精神") {
            NodeType::MentalHealthNotebook
        } else if label.contains("身体") {
            NodeType::PhysicalDisabilityNotebook
        } else {
            NodeType::RyoikuNotebook
        }
    }

    pub fn is_notebook(&self) -> bool {
        matches!(
            self,
            NodeType::RyoikuNotebook
                | NodeType::MentalHealthNotebook
                | NodeType::PhysicalDisabilityNotebook
        )
    }

    /// The fixed UI layer for this type.
    pub fn layer(&self) -> Layer {
        match self {
            NodeType::Person => Layer::Person,
            NodeType::Family => Layer::Family,
            NodeType::RyoikuNotebook
            | NodeType::MentalHealthNotebook
            | NodeType::PhysicalDisabilityNotebook => Layer::Notebooks,
            NodeType::SupportLevel => Layer::SupportLevels,
            NodeType::Diagnosis => Layer::Diagnoses,
            NodeType::LegalGuardian => Layer::LegalGuardians,
            NodeType::ConsultationSupport | NodeType::ConsultationSupportSpecialist => {
                Layer::ConsultationSupports
            }
            NodeType::ServicePlan => Layer::ServicePlans,
            NodeType::SupportService | NodeType::ServiceManager | NodeType::ServiceContract => {
                Layer::ServiceContracts
            }
            NodeType::MedicalInstitution | NodeType::Doctor | NodeType::Medication => Layer::Medical,
            NodeType::Government => Layer::Government,
        }
    }

    /// Colour, size, and shape for this type.
    pub fn display_style(&self) -> DisplayStyle {
        use NodeSize::*;
        let (color, size) = match self {
            NodeType::Person => ("orange", Large),
            NodeType::Family => ("red", Medium),
            NodeType::RyoikuNotebook => ("darkred", Medium),
            NodeType::MentalHealthNotebook => ("darkgreen", Medium),
            NodeType::PhysicalDisabilityNotebook => ("darkblue", Medium),
            NodeType::SupportLevel => ("purple", Medium),
            NodeType::Diagnosis => ("lightblue", Small),
            NodeType::LegalGuardian => ("brown", Medium),
            NodeType::ConsultationSupport => ("purple", Medium),
            NodeType::ConsultationSupportSpecialist => ("blue", Small),
            NodeType::ServicePlan => ("blueviolet", Medium),
            NodeType::SupportService => ("green", Medium),
            NodeType::ServiceManager => ("green", Small),
            NodeType::ServiceContract => ("green", Medium),
            NodeType::MedicalInstitution => ("lightblue", Medium),
            NodeType::Doctor => ("lightblue", Small),
            NodeType::Government => ("gray", Medium),
            NodeType::Medication => ("pink", Small),
        };
        DisplayStyle {
            color,
            size,
            shape: NodeShape::Circle,
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown node type: {}", s))
    }
}

/// UI grouping used for default show/hide. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Person,
    Family,
    Notebooks,
    SupportLevels,
    Diagnoses,
    LegalGuardians,
    ConsultationSupports,
    ServicePlans,
    ServiceContracts,
    Medical,
    Government,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Circle,
}

/// Static display settings for a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStyle {
    pub color: &'static str,
    pub size: NodeSize,
    pub shape: NodeShape,
}

impl DisplayStyle {
    /// Used for type names outside the known set.
    pub const FALLBACK: DisplayStyle = DisplayStyle {
        color: "gray",
        size: NodeSize::Medium,
        shape: NodeShape::Circle,
    };

    /// Look up the style for a type tag, falling back for unknown tags.
    pub fn for_type_name(name: &str) -> DisplayStyle {
        name.parse::<NodeType>()
            .map(|t| t.display_style())
            .unwrap_or(Self::FALLBACK)
    }

    /// Attach a label to produce the serialized display block.
    pub fn labelled(&self, label: impl Into<String>) -> NodeDisplay {
        NodeDisplay {
            color: self.color.to_string(),
            size: self.size,
            shape: self.shape,
            label: label.into(),
        }
    }
}

/// The display block of a node as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplay {
    pub color: String,
    pub size: NodeSize,
    pub shape: NodeShape,
    pub label: String,
}

/// A node in the ecomap graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Display name.
    pub name: String,

    /// Type-specific properties with defaults filled in.
    pub properties: Properties,

    pub display: NodeDisplay,

    pub layer: Layer,

    /// Whether the renderer shows this node before any layer toggling.
    pub is_default_visible: bool,

    pub created_at: NaiveDateTime,
}

impl Node {
    /// Create a node of the given type, taking display style and layer from the type.
    pub fn new(
        node_type: NodeType,
        name: impl Into<String>,
        label: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: NodeId::new(),
            node_type,
            name: name.into(),
            properties: Properties::new(),
            display: node_type.display_style().labelled(label),
            layer: node_type.layer(),
            is_default_visible: false,
            created_at,
        }
    }

    /// Set the properties.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Set default visibility.
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.is_default_visible = visible;
        self
    }

    /// Read a string property, empty if absent.
    pub fn property_str(&self, key: &str) -> &str {
        self.properties
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    #[test]
    fn test_notebook_subtype() {
        assert_eq!(NodeType::notebook_subtype("療育手帳"), NodeType::RyoikuNotebook);
        assert_eq!(
            NodeType::notebook_subtype("精神保健福祉手帳"),
            NodeType::MentalHealthNotebook
        );
        assert_eq!(
            NodeType::notebook_subtype("身体障害者手帳"),
            NodeType::PhysicalDisabilityNotebook
        );
        assert_eq!(NodeType::notebook_subtype("愛の手帳"), NodeType::RyoikuNotebook);
        assert_eq!(NodeType::notebook_subtype(""), NodeType::RyoikuNotebook);
    }

    #[test]
    fn test_type_tags_round_trip() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.as_str().parse::<NodeType>(), Ok(node_type));
            let json = serde_json::to_value(node_type).unwrap();
            assert_eq!(json, node_type.as_str());
        }
    }

    #[test]
    fn test_display_styles() {
        assert_eq!(NodeType::Person.display_style().color, "orange");
        assert_eq!(NodeType::Person.display_style().size, NodeSize::Large);
        assert_eq!(NodeType::Medication.display_style().color, "pink");
        assert_eq!(DisplayStyle::for_type_name("Doctor").size, NodeSize::Small);
        assert_eq!(DisplayStyle::for_type_name("Pharmacy"), DisplayStyle::FALLBACK);
    }

    #[test]
    fn test_layers() {
        assert_eq!(NodeType::Medication.layer(), Layer::Medical);
        assert_eq!(NodeType::ServiceManager.layer(), Layer::ServiceContracts);
        assert_eq!(
            serde_json::to_value(Layer::SupportLevels).unwrap(),
            "support_levels"
        );
    }

    #[test]
    fn test_node_serialization_contract() {
        let node = Node::new(NodeType::Family, "山田花子", "山田花子", now()).with_visibility(true);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "Family");
        assert_eq!(json["display"]["color"], "red");
        assert_eq!(json["display"]["size"], "medium");
        assert_eq!(json["display"]["shape"], "circle");
        assert_eq!(json["display"]["label"], "山田花子");
        assert_eq!(json["layer"], "family");
        assert_eq!(json["is_default_visible"], true);
        assert_eq!(json["id"], node.id.to_string());
    }
}
