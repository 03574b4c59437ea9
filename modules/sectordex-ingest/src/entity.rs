//! Classification of the entities saved inside a system node.
//!
//! The save marks what an entity is through its element name plus a list of
//! category tags. Classifying first means the extraction code can match
//! exhaustively on a closed set of kinds.

use roxmltree::Node;
use sectordex_common::{StableLocation, StructureKind};

const PLANET_TAG: &str = "Plnt";
const JUMP_POINT_TAG: &str = "JumpPoint";
const GENERIC_ENTITY_TAG: &str = "CCEnt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Planet,
    Star,
    JumpPoint,
    /// Station with a populated market.
    Station,
    Salvageable,
    StableLocation(StableLocation),
    Unknown,
}

/// Classify a saved entity. `None` when the entity has no readable category
/// tags, in which case it is skipped outright.
pub fn classify(node: Node<'_, '_>) -> Option<EntityKind> {
    let categories = category_tags(node)?;
    let has = |tag: &str| categories.iter().any(|c| *c == tag);

    let kind = match node.tag_name().name() {
        PLANET_TAG if has("planet") => EntityKind::Planet,
        PLANET_TAG if has("star") => EntityKind::Star,
        JUMP_POINT_TAG => EntityKind::JumpPoint,
        GENERIC_ENTITY_TAG if has("station") && has_populated_market(node) => EntityKind::Station,
        GENERIC_ENTITY_TAG if has("salvageable") => EntityKind::Salvageable,
        GENERIC_ENTITY_TAG => stable_location(&categories)
            .map(EntityKind::StableLocation)
            .unwrap_or(EntityKind::Unknown),
        _ => EntityKind::Unknown,
    };
    Some(kind)
}

fn category_tags<'a>(node: Node<'a, '_>) -> Option<Vec<&'a str>> {
    let tags = node.children().find(|n| n.has_tag_name("tags"))?;
    Some(
        tags.children()
            .filter(|n| n.is_element())
            .filter_map(|n| n.text())
            .map(str::trim)
            .collect(),
    )
}

fn has_populated_market(node: Node<'_, '_>) -> bool {
    node.children()
        .find(|n| n.has_tag_name("market"))
        .is_some_and(|market| market.children().any(|n| n.is_element()))
}

// Structures are checked in a fixed order; a bare `stable_location` tag is an
// empty slot.
fn stable_location(categories: &[&str]) -> Option<StableLocation> {
    let makeshift = categories.contains(&"makeshift");
    if let Some(kind) = StructureKind::ALL
        .into_iter()
        .find(|kind| categories.contains(&kind.tag()))
    {
        return Some(StableLocation::with_structure(kind, makeshift));
    }
    categories
        .contains(&"stable_location")
        .then(StableLocation::empty)
}
