//! Structural derivation: synthesizes the connector node behind every
//! supertype plus the headless ISA relationships linking the hierarchy.
//!
//! Derivation is a pure pass over one entity batch. The caller owns the
//! model and merges the outputs back in; [`Diagram::load`] and
//! [`Diagram::append`] are the two merge variants.

use crate::model::{Cardinality, Diagram, Entity, EntityKind, NodeId, RelStyle, Relationship};
use crate::utils::capitalise_first;

/// Derived structural elements for one entity batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedElements {
    /// One `connector` entity per supertype, in supertype order.
    pub connectors: Vec<Entity>,
    /// The headless supertype<->connector and connector->subtype links.
    pub relationships: Vec<Relationship>,
}

/// Stable 3-way partition: supertypes first, then everything else, then
/// subtypes; relative order inside each group is preserved.
///
/// Subtype derivation looks its parent up among the supertypes already
/// walked, so supers must come first.
pub fn partition_hierarchy(entities: Vec<Entity>) -> Vec<Entity> {
    let mut supers = Vec::new();
    let mut others = Vec::new();
    let mut subs = Vec::new();
    for entity in entities {
        match entity.kind {
            EntityKind::Super => supers.push(entity),
            EntityKind::Sub => subs.push(entity),
            _ => others.push(entity),
        }
    }
    supers.into_iter().chain(others).chain(subs).collect()
}

/// Walks an already-partitioned batch (see [`partition_hierarchy`]) and
/// synthesizes connectors and ISA links. A subtype whose declared parent is
/// not a supertype of this batch is skipped without error; the parent may
/// arrive in a later append batch.
pub fn derive_structural_elements(batch: &[Entity]) -> DerivedElements {
    let mut derived = DerivedElements::default();
    let mut supers: Vec<&Entity> = Vec::new();

    for entity in batch {
        match entity.kind {
            EntityKind::Super => {
                supers.push(entity);
                derived.connectors.push(Entity {
                    name: entity.name.clone(),
                    kind: EntityKind::Connector,
                    options: entity.options.clone(),
                    attributes: Vec::new(),
                });
                derived.relationships.push(supertype_link(entity));
            }
            EntityKind::Sub => {
                let parent = entity.options.first().and_then(|want| {
                    supers
                        .iter()
                        .find(|sup| sup.name.eq_ignore_ascii_case(want))
                        .copied()
                });
                match parent {
                    Some(parent) => derived.relationships.push(subtype_link(parent, entity)),
                    None => tracing::debug!(
                        subtype = %entity.name,
                        "subtype parent not in this batch; ISA link skipped"
                    ),
                }
            }
            _ => {}
        }
    }

    derived
}

fn is_disjoint(sup: &Entity) -> bool {
    sup.options.get(1).is_some_and(|opt| opt == "disjoint")
}

/// The headless supertype<->connector link. Its display name comes from the
/// hierarchy discriminator, by convention the supertype's last attribute:
/// `Type(d)=` for a disjoint hierarchy, `Type:` (parenthesized suffix
/// stripped) for an overlapping one.
fn supertype_link(sup: &Entity) -> Relationship {
    let style = if sup.options.first().is_some_and(|opt| opt == "total") {
        RelStyle::DoubleHeadless
    } else {
        RelStyle::SingleHeadless
    };
    let discriminator = sup
        .attributes
        .last()
        .map(|attr| attr.name.as_str())
        .unwrap_or_default();
    let name = if is_disjoint(sup) {
        format!("{discriminator}=")
    } else {
        format!("{}:", discriminator.split('(').next().unwrap_or_default())
    };
    Relationship::between(
        name,
        style,
        NodeId::entity(&sup.name),
        NodeId::connector(&sup.name),
        Cardinality::ZeroOrOne,
        Cardinality::ZeroOrOne,
    )
}

/// The headless connector->subtype link: `CAR` under a disjoint parent,
/// `Car? = 'Yes'` under an overlapping one.
fn subtype_link(parent: &Entity, sub: &Entity) -> Relationship {
    let name = if is_disjoint(parent) {
        sub.name.to_uppercase()
    } else {
        format!("{}? = 'Yes'", capitalise_first(&sub.name))
    };
    Relationship::between(
        name,
        RelStyle::SingleHeadless,
        NodeId::connector(&parent.name),
        NodeId::entity(&sub.name),
        Cardinality::ZeroOrOne,
        Cardinality::ZeroOrOne,
    )
}

impl Diagram {
    /// Replaces the whole model with a raw (underived) batch: partitions it,
    /// derives structural elements and merges everything into one snapshot.
    /// Connectors land after all supplied entities, derived relationships
    /// after all supplied relationships.
    pub fn load(entities: Vec<Entity>, relationships: Vec<Relationship>) -> Self {
        let ordered = partition_hierarchy(entities);
        let derived = derive_structural_elements(&ordered);
        let mut diagram = Diagram {
            entities: ordered,
            relationships,
        };
        diagram.entities.extend(derived.connectors);
        diagram.relationships.extend(derived.relationships);
        diagram
    }

    /// Appends a raw batch to the existing model.
    ///
    /// The caller must have deduplicated the batch against entities already
    /// present: derivation would happily synthesize a second connector for a
    /// re-sent supertype. Subtype parents resolve only within this batch,
    /// not against the pre-existing model.
    pub fn append(&mut self, entities: Vec<Entity>, relationships: Vec<Relationship>) {
        let ordered = partition_hierarchy(entities);
        let derived = derive_structural_elements(&ordered);
        self.entities.extend(ordered);
        self.entities.extend(derived.connectors);
        self.relationships.extend(relationships);
        self.relationships.extend(derived.relationships);
    }
}
