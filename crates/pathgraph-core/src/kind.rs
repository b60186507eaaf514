//! Renderable kinds and connection roles.
//!
//! The scene graph dispatches on [`RenderableKind`] through capability
//! queries instead of matching on concrete variants at every call site.
//! [`ConnectRole`] names the typed roles a hyper-edge branch can attach with.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::Deserialize;

/// The closed set of renderable kinds in a pathway diagram.
///
/// - Containers: `Pathway`, `Compartment`, `Complex`
/// - Entity family: `EntitySet`, `Protein`, `Chemical`, `Gene`, `Rna`, `Entity`
/// - Process nodes: `ReactionNode`
/// - Edges: `Reaction`, `Interaction`, `FlowLine`
/// - Free text: `Note`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderableKind {
    Pathway,
    Compartment,
    Complex,
    EntitySet,
    Protein,
    Chemical,
    Gene,
    Rna,
    Entity,
    ReactionNode,
    Reaction,
    Interaction,
    FlowLine,
    Note,
}

impl RenderableKind {
    /// All kinds, in declaration order.
    pub const ALL: [RenderableKind; 14] = [
        Self::Pathway,
        Self::Compartment,
        Self::Complex,
        Self::EntitySet,
        Self::Protein,
        Self::Chemical,
        Self::Gene,
        Self::Rna,
        Self::Entity,
        Self::ReactionNode,
        Self::Reaction,
        Self::Interaction,
        Self::FlowLine,
        Self::Note,
    ];

    /// Human readable type name, used as the base for generated names.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Pathway => "Pathway",
            Self::Compartment => "Compartment",
            Self::Complex => "Complex",
            Self::EntitySet => "EntitySet",
            Self::Protein => "Protein",
            Self::Chemical => "Chemical",
            Self::Gene => "Gene",
            Self::Rna => "RNA",
            Self::Entity => "Entity",
            Self::ReactionNode => "ReactionNode",
            Self::Reaction => "Reaction",
            Self::Interaction => "Interaction",
            Self::FlowLine => "FlowLine",
            Self::Note => "Note",
        }
    }

    /// Returns true for kinds drawn as hyper-edges.
    pub fn is_edge(self) -> bool {
        matches!(self, Self::Reaction | Self::Interaction | Self::FlowLine)
    }

    /// Returns true for kinds that occupy 2D space and accept connections.
    pub fn is_node(self) -> bool {
        !self.is_edge() && self != Self::Note
    }

    /// Returns true for the entity family (simple physical entities).
    pub fn is_entity(self) -> bool {
        matches!(
            self,
            Self::EntitySet | Self::Protein | Self::Chemical | Self::Gene | Self::Rna | Self::Entity
        )
    }

    /// Returns true for kinds treated as leaves when searching for
    /// containment cycles.
    pub fn is_structural_leaf(self) -> bool {
        self.is_entity() || self.is_edge() || self == Self::ReactionNode
    }

    /// Returns false for kinds whose component list is not ownership, so a
    /// registry removal must not cascade into it.
    pub fn cascades_removal(self) -> bool {
        self != Self::Reaction
    }

    /// Returns true for kinds that can be aliased by shortcuts.
    pub fn supports_shortcuts(self) -> bool {
        self.is_node()
    }
}

impl FromStr for RenderableKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pathway" => Ok(Self::Pathway),
            "compartment" => Ok(Self::Compartment),
            "complex" => Ok(Self::Complex),
            "entity_set" => Ok(Self::EntitySet),
            "protein" => Ok(Self::Protein),
            "chemical" => Ok(Self::Chemical),
            "gene" => Ok(Self::Gene),
            "rna" => Ok(Self::Rna),
            "entity" => Ok(Self::Entity),
            "reaction_node" => Ok(Self::ReactionNode),
            "reaction" => Ok(Self::Reaction),
            "interaction" => Ok(Self::Interaction),
            "flow_line" => Ok(Self::FlowLine),
            "note" => Ok(Self::Note),
            _ => Err("Unsupported renderable kind"),
        }
    }
}

impl Display for RenderableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Role with which a hyper-edge branch attaches to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectRole {
    Input,
    Output,
    Catalyst,
    Activator,
    Inhibitor,
}

impl ConnectRole {
    pub const ALL: [ConnectRole; 5] = [
        Self::Input,
        Self::Output,
        Self::Catalyst,
        Self::Activator,
        Self::Inhibitor,
    ];
}

impl From<ConnectRole> for &'static str {
    fn from(val: ConnectRole) -> Self {
        match val {
            ConnectRole::Input => "input",
            ConnectRole::Output => "output",
            ConnectRole::Catalyst => "catalyst",
            ConnectRole::Activator => "activator",
            ConnectRole::Inhibitor => "inhibitor",
        }
    }
}

impl Display for ConnectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_not_nodes() {
        for kind in RenderableKind::ALL {
            assert!(
                !(kind.is_edge() && kind.is_node()),
                "{kind} is both an edge and a node"
            );
        }
        assert!(!RenderableKind::Note.is_node());
        assert!(!RenderableKind::Note.is_edge());
    }

    #[test]
    fn test_structural_leaves() {
        assert!(RenderableKind::Protein.is_structural_leaf());
        assert!(RenderableKind::ReactionNode.is_structural_leaf());
        assert!(RenderableKind::Reaction.is_structural_leaf());
        assert!(RenderableKind::FlowLine.is_structural_leaf());
        assert!(!RenderableKind::Complex.is_structural_leaf());
        assert!(!RenderableKind::Pathway.is_structural_leaf());
        assert!(!RenderableKind::Compartment.is_structural_leaf());
    }

    #[test]
    fn test_only_reactions_stop_removal_cascade() {
        for kind in RenderableKind::ALL {
            assert_eq!(kind.cascades_removal(), kind != RenderableKind::Reaction);
        }
    }

    #[test]
    fn test_shortcut_support() {
        assert!(RenderableKind::Complex.supports_shortcuts());
        assert!(RenderableKind::Protein.supports_shortcuts());
        assert!(!RenderableKind::Note.supports_shortcuts());
        assert!(!RenderableKind::Reaction.supports_shortcuts());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("complex".parse(), Ok(RenderableKind::Complex));
        assert_eq!("flow_line".parse(), Ok(RenderableKind::FlowLine));
        assert!("widget".parse::<RenderableKind>().is_err());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(RenderableKind::Rna.type_name(), "RNA");
        assert_eq!(RenderableKind::EntitySet.to_string(), "EntitySet");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(ConnectRole::Catalyst.to_string(), "catalyst");
        assert_eq!(ConnectRole::ALL.len(), 5);
    }
}
