//! The in-memory entity/relationship model.
//!
//! Names are the identity: an entity name is unique (case-insensitively)
//! within one diagram, and [`NodeId`] (the name plus an `entity:` or
//! `connector:` namespace tag) is the stable join key between the model and
//! anything on screen.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity classification from the command header (`name.kind`).
///
/// `Connector` is never user-authored: one is synthesized behind every
/// `super` entity by structural derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Strong,
    Weak,
    Assoc,
    Super,
    Sub,
    Connector,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
            Self::Assoc => "assoc",
            Self::Super => "super",
            Self::Sub => "sub",
            Self::Connector => "connector",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "strong" => Self::Strong,
            "weak" => Self::Weak,
            "assoc" => Self::Assoc,
            "super" => Self::Super,
            "sub" => Self::Sub,
            "connector" => Self::Connector,
            _ => return None,
        })
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an attribute participates in its owner's key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrRole {
    #[default]
    Plain,
    /// Declared with the `u.` prefix.
    Primary,
    /// Declared with the `du.` prefix (weak-entity partial key).
    Partial,
}

impl AttrRole {
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// A display-ordered attribute. Names are stored already formatted for
/// display (`u.enrolment_date` parses to `Enrolment_Date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "AttrRole::is_plain")]
    pub role: AttrRole,
}

impl Attribute {
    pub fn new(name: impl Into<String>, role: AttrRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, AttrRole::Plain)
    }
}

/// One of the four cardinality codes carried by an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "11")]
    ExactlyOne,
    #[serde(rename = "01")]
    ZeroOrOne,
    #[serde(rename = "0m")]
    ZeroOrMany,
    #[serde(rename = "1m")]
    OneOrMany,
}

impl Cardinality {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::ExactlyOne => "11",
            Self::ZeroOrOne => "01",
            Self::ZeroOrMany => "0m",
            Self::OneOrMany => "1m",
        }
    }

    pub(crate) fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "11" => Self::ExactlyOne,
            "01" => Self::ZeroOrOne,
            "0m" => Self::ZeroOrMany,
            "1m" => Self::OneOrMany,
            _ => return None,
        })
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Relationship rendering style. The headless styles carry no cardinality
/// glyphs and are reserved for derived supertype/subtype links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelStyle {
    #[default]
    Single,
    Double,
    SingleHeadless,
    DoubleHeadless,
}

impl RelStyle {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::SingleHeadless => "singleHeadless",
            Self::DoubleHeadless => "doubleHeadless",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "single" => Self::Single,
            "double" => Self::Double,
            "singleHeadless" => Self::SingleHeadless,
            "doubleHeadless" => Self::DoubleHeadless,
            _ => return None,
        })
    }

    pub fn is_headless(self) -> bool {
        matches!(self, Self::SingleHeadless | Self::DoubleHeadless)
    }
}

impl fmt::Display for RelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Namespace-qualified node identifier: `entity:<name>` or
/// `connector:<name>`, always lowercase. Stable across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

const ENTITY_TAG: &str = "entity:";
const CONNECTOR_TAG: &str = "connector:";

impl NodeId {
    pub fn entity(name: &str) -> Self {
        Self(format!("{ENTITY_TAG}{}", name.to_lowercase()))
    }

    pub fn connector(name: &str) -> Self {
        Self(format!("{CONNECTOR_TAG}{}", name.to_lowercase()))
    }

    /// Upgrades a bare end-user token to the `entity:` namespace. Derived
    /// text is always already qualified and passes through untouched.
    pub fn qualify(token: &str) -> Self {
        if token.starts_with(ENTITY_TAG) || token.starts_with(CONNECTOR_TAG) {
            Self(token.to_lowercase())
        } else {
            Self::entity(token)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_connector(&self) -> bool {
        self.0.starts_with(CONNECTOR_TAG)
    }

    /// The entity name without its namespace tag.
    pub fn name(&self) -> &str {
        self.0
            .split_once(':')
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Lowercase; the unique (case-insensitive) identity within a diagram.
    pub name: String,
    pub kind: EntityKind,
    /// Kind-specific modifiers, e.g. `["total", "disjoint"]` for a
    /// supertype or the parent name for a subtype.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into().to_lowercase(),
            kind,
            options: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn node_id(&self) -> NodeId {
        if self.kind == EntityKind::Connector {
            NodeId::connector(&self.name)
        } else {
            NodeId::entity(&self.name)
        }
    }
}

/// One directed half of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrow {
    pub from: NodeId,
    pub to: NodeId,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    pub style: RelStyle,
    /// Mirror images connecting the same unordered pair of nodes:
    /// `arrows[0]` runs from -> to, `arrows[1]` runs to -> from.
    pub arrows: [Arrow; 2],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Relationship {
    /// Builds the mirrored arrow pair connecting `from` and `to`.
    pub fn between(
        name: impl Into<String>,
        style: RelStyle,
        from: NodeId,
        to: NodeId,
        card_from_to: Cardinality,
        card_to_from: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            style,
            arrows: [
                Arrow {
                    from: from.clone(),
                    to: to.clone(),
                    cardinality: card_from_to,
                },
                Arrow {
                    from: to,
                    to: from,
                    cardinality: card_to_from,
                },
            ],
            attributes: Vec::new(),
        }
    }

    /// The unordered endpoint pair, in `arrows[0]` direction.
    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.arrows[0].from, &self.arrows[0].to)
    }

    /// A relationship is unary iff both arrows connect a node to itself.
    pub fn is_unary(&self) -> bool {
        self.arrows.iter().all(|a| a.from == a.to)
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        self.arrows.iter().any(|a| a.from == *id || a.to == *id)
    }
}

/// The whole diagram: ordered entities and relationships. Replaced
/// wholesale on document load, mutated in place by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Out-of-range indices are ignored.
    pub fn update_entity(&mut self, index: usize, entity: Entity) {
        if let Some(slot) = self.entities.get_mut(index) {
            *slot = entity;
        }
    }

    /// Removes the entity at `index` together with every relationship
    /// touching it. Deleting a supertype also removes its derived connector
    /// and the relationships touching that.
    pub fn delete_entity(&mut self, index: usize) {
        let Some(entity) = self.entities.get(index) else {
            return;
        };
        let entity = entity.clone();

        let mut doomed_rels: HashSet<usize> =
            self.relationships_touching(&entity.node_id()).into_iter().collect();
        let mut doomed_entities = vec![index];
        if entity.kind == EntityKind::Super {
            if let Some(connector_ix) = self.connector_index_for_super(&entity.name) {
                doomed_entities.push(connector_ix);
                doomed_rels
                    .extend(self.relationships_touching(&NodeId::connector(&entity.name)));
            }
        }

        let mut rel_ix = 0;
        self.relationships.retain(|_| {
            let keep = !doomed_rels.contains(&rel_ix);
            rel_ix += 1;
            keep
        });

        doomed_entities.sort_unstable();
        doomed_entities.dedup();
        for &entity_ix in doomed_entities.iter().rev() {
            self.entities.remove(entity_ix);
        }
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Out-of-range indices are ignored.
    pub fn update_relationship(&mut self, index: usize, relationship: Relationship) {
        if let Some(slot) = self.relationships.get_mut(index) {
            *slot = relationship;
        }
    }

    pub fn delete_relationship(&mut self, index: usize) {
        if index < self.relationships.len() {
            self.relationships.remove(index);
        }
    }

    /// Indices of every relationship with an arrow into or out of `id`.
    pub fn relationships_touching(&self, id: &NodeId) -> Vec<usize> {
        self.relationships
            .iter()
            .enumerate()
            .filter(|(_, rel)| rel.touches(id))
            .map(|(ix, _)| ix)
            .collect()
    }

    /// The derived connector sharing a supertype's name, if present.
    pub fn connector_index_for_super(&self, name: &str) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.kind == EntityKind::Connector && e.name.eq_ignore_ascii_case(name))
    }
}
