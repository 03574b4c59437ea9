//! Walks a campaign save and builds the star system catalog.
//!
//! Systems are listed by reference in the top-level `starSystems` index and
//! defined somewhere else in the document, under one of several element names
//! depending on the game version and installed mods. Problems confined to one
//! system, planet or entity are recorded in [`Extraction::skipped`] and the
//! walk carries on; only a missing index or an unreadable document fails the
//! whole extraction.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use roxmltree::{Document, Node};
use sectordex_common::{
    relaxed_json, Condition, Coordinate, Lookup, Planet, PlanetType, Population, Star,
    StarSystem, Station, SystemContents,
};
use tracing::{debug, info, warn};

use crate::entity::{classify, EntityKind};
use crate::error::{IngestError, LookupTable, Result};

/// Element names systems are normally saved under.
const SYSTEM_TAGS: &[&str] = &["s", "Sstm", "cL"];

/// Everything read out of one save document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub systems: Vec<StarSystem>,
    pub save_name: Option<String>,
    pub seed: Option<String>,
    pub mods: Vec<String>,
    /// Systems, planets and entities that could not be read.
    pub skipped: Vec<IngestError>,
}

/// Read and extract a save file.
pub fn extract_file(path: &Path, lookup: &dyn Lookup) -> Result<Extraction> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = text.len(), "Read save file");
    extract_str(&text, lookup)
}

/// Extract a save document already held in memory.
pub fn extract_str(text: &str, lookup: &dyn Lookup) -> Result<Extraction> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();

    let mut reader = SaveReader::new(root, lookup);
    let systems = reader.read_systems()?;

    Ok(Extraction {
        systems,
        save_name: child(root, "characterData")
            .and_then(|data| child_text(data, "name"))
            .map(str::to_string),
        seed: child_text(root, "seedString").map(str::to_string),
        mods: read_mods(root),
        skipped: reader.skipped,
    })
}

struct SaveReader<'a, 'input, 'l> {
    root: Node<'a, 'input>,
    lookup: &'l dyn Lookup,
    /// Every element carrying a `z` id, first occurrence wins.
    by_id: HashMap<&'a str, Node<'a, 'input>>,
    skipped: Vec<IngestError>,
}

impl<'a, 'input, 'l> SaveReader<'a, 'input, 'l> {
    fn new(root: Node<'a, 'input>, lookup: &'l dyn Lookup) -> Self {
        let mut by_id = HashMap::new();
        for node in root.descendants().filter(|n| n.is_element()) {
            if let Some(id) = node.attribute("z") {
                by_id.entry(id).or_insert(node);
            }
        }
        Self {
            root,
            lookup,
            by_id,
            skipped: Vec::new(),
        }
    }

    fn skip(&mut self, err: IngestError) {
        warn!(error = %err, "Skipping unreadable save entry");
        self.skipped.push(err);
    }

    fn read_systems(&mut self) -> Result<Vec<StarSystem>> {
        let ids = self.system_index()?;
        let nodes = self.resolve_systems(&ids);

        let mut systems = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.read_system(node) {
                Ok(system) => systems.push(system),
                Err(err) => self.skip(err),
            }
        }
        info!(systems = systems.len(), "Mapped ids to systems");
        Ok(systems)
    }

    /// Ordered, de-duplicated system ids from the `starSystems` index.
    fn system_index(&self) -> Result<Vec<&'a str>> {
        let index = child(self.root, "starSystems").ok_or_else(|| {
            IngestError::MalformedDocument("missing <starSystems> index".to_string())
        })?;

        let mut seen = HashSet::new();
        Ok(index
            .children()
            .filter(|n| n.is_element())
            .filter_map(|n| n.attribute("ref").or_else(|| n.attribute("z")))
            .filter(|id| seen.insert(*id))
            .collect())
    }

    /// Find the node defining each listed system. Nodes under the usual
    /// element names are taken first; whatever is still missing is looked up
    /// under any element name.
    fn resolve_systems(&mut self, ids: &[&'a str]) -> Vec<Node<'a, 'input>> {
        let mut resolved: HashMap<&'a str, Node<'a, 'input>> = HashMap::new();

        for id in ids {
            if let Some(node) = self.by_id.get(id) {
                if SYSTEM_TAGS.contains(&node.tag_name().name()) {
                    resolved.insert(*id, *node);
                }
            }
        }
        info!(
            found = resolved.len(),
            listed = ids.len(),
            "Resolved systems under standard tags"
        );

        let missing: Vec<&'a str> = ids
            .iter()
            .copied()
            .filter(|id| !resolved.contains_key(id))
            .collect();

        if !missing.is_empty() {
            info!(missing = missing.len(), "Looking for missing systems");
            let mut nonstandard_tags = Vec::new();
            for id in &missing {
                if let Some(node) = self.by_id.get(id) {
                    nonstandard_tags.push(node.tag_name().name());
                    resolved.insert(*id, *node);
                }
            }
            info!(
                found = nonstandard_tags.len(),
                tags = %nonstandard_tags.join(", "),
                "Resolved systems under nonstandard tags"
            );
        }

        let mut nodes = Vec::with_capacity(resolved.len());
        for id in ids {
            match resolved.get(id) {
                Some(node) => nodes.push(*node),
                None => self.skip(IngestError::UnresolvedReference(id.to_string())),
            }
        }
        nodes
    }

    fn read_system(&mut self, node: Node<'a, 'input>) -> Result<StarSystem> {
        let id = node.attribute("z").unwrap_or_default();
        let name = node.attribute("dN").unwrap_or(id);
        let location = self.read_location(node, id)?;

        let mut contents = SystemContents {
            themes: child(node, "tags")
                .map(|tags| element_texts(tags).map(str::to_string).collect())
                .unwrap_or_default(),
            ..Default::default()
        };

        let saved = child(node, "o").and_then(|o| child(o, "saved"));
        for entity in saved.iter().flat_map(|s| s.children()).filter(|n| n.is_element()) {
            let Some(kind) = classify(entity) else {
                debug!(system = id, tag = entity.tag_name().name(), "Entity without category tags");
                continue;
            };
            if let Err(err) = self.read_entity(kind, entity, id, &mut contents) {
                self.skip(err);
            }
        }

        Ok(StarSystem::new(id, name, location, contents))
    }

    fn read_entity(
        &self,
        kind: EntityKind,
        node: Node<'a, 'input>,
        system_id: &str,
        contents: &mut SystemContents,
    ) -> Result<()> {
        match kind {
            EntityKind::Planet => {
                if let Some(planet) = self.read_planet(node, system_id)? {
                    contents.planets.push(planet);
                }
            }
            EntityKind::Star => contents.stars.push(self.read_star(node, system_id)?),
            EntityKind::JumpPoint => contents.jump_points += 1,
            EntityKind::Station => contents.stations.push(self.read_station(node)?),
            EntityKind::Salvageable => {
                let kind = read_salvageable(node)?;
                *contents.salvageables.entry(kind).or_insert(0) += 1;
            }
            EntityKind::StableLocation(location) => contents.stable_locations.push(location),
            EntityKind::Unknown => {}
        }
        Ok(())
    }

    /// The `l` element either holds `x|y` in map pixels or refers to another
    /// element that does.
    fn read_location(&self, system: Node<'a, 'input>, system_id: &str) -> Result<Coordinate> {
        let malformed = |reason: &str| IngestError::MalformedEntity {
            id: system_id.to_string(),
            reason: reason.to_string(),
        };

        let location = child(system, "l").ok_or_else(|| malformed("missing location <l>"))?;
        let raw = match non_empty_text(location) {
            Some(text) => text,
            None => {
                let target = location
                    .attribute("ref")
                    .ok_or_else(|| malformed("location has neither a value nor a ref"))?;
                self.by_id
                    .get(target)
                    .and_then(|node| non_empty_text(*node))
                    .ok_or_else(|| malformed("location ref points at nothing"))?
            }
        };

        parse_pixels(raw).ok_or_else(|| malformed(&format!("unparsable location {raw:?}")))
    }

    fn read_planet(&self, node: Node<'a, 'input>, system_id: &str) -> Result<Option<Planet>> {
        let id = node.attribute("z").unwrap_or_default();
        let Some(market) = child(node, "market") else {
            return Ok(None);
        };
        let Some(name) = child_text(market, "name") else {
            return Ok(None);
        };

        let planet_type = self.read_type(node, id)?;
        let conditions = self.read_conditions(market, id)?;
        let population = self.read_population(market);

        Ok(Some(Planet::new(
            id,
            name,
            planet_type,
            owner_system(node).unwrap_or(system_id),
            conditions,
            population,
        )))
    }

    fn read_star(&self, node: Node<'a, 'input>, system_id: &str) -> Result<Star> {
        let id = node.attribute("z").unwrap_or_default();
        Ok(Star {
            id: id.to_string(),
            star_type: self.read_type(node, id)?,
            system_id: owner_system(node).unwrap_or(system_id).to_string(),
        })
    }

    fn read_type(&self, node: Node<'a, 'input>, entity_id: &str) -> Result<PlanetType> {
        let type_id = child_text(node, "type").ok_or_else(|| IngestError::MalformedEntity {
            id: entity_id.to_string(),
            reason: "missing <type>".to_string(),
        })?;
        let name = self
            .lookup
            .type_name(type_id)
            .ok_or_else(|| IngestError::UnknownLookupKey {
                table: LookupTable::TypeName,
                key: type_id.to_string(),
                entity: entity_id.to_string(),
            })?;
        Ok(PlanetType::new(type_id, name))
    }

    /// Uninhabited markets list condition ids as text under `cond`; inhabited
    /// ones keep them in the `i` attribute of children of `conditions`.
    fn read_conditions(&self, market: Node<'a, 'input>, planet_id: &str) -> Result<Vec<Condition>> {
        let ids: Vec<&str> = if let Some(list) = child(market, "cond") {
            element_texts(list).collect()
        } else if let Some(list) = child(market, "conditions") {
            list.children()
                .filter(|n| n.is_element())
                .filter_map(|n| n.attribute("i"))
                .collect()
        } else {
            Vec::new()
        };

        ids.into_iter()
            .map(|id| {
                self.lookup
                    .condition(id)
                    .ok_or_else(|| IngestError::UnknownLookupKey {
                        table: LookupTable::ConditionName,
                        key: id.to_string(),
                        entity: planet_id.to_string(),
                    })
            })
            .collect()
    }

    fn read_population(&self, market: Node<'a, 'input>) -> Option<Population> {
        let raw_size = child_text(market, "size")?;
        let size = match raw_size.parse::<u32>() {
            Ok(size) => size,
            Err(_) => {
                debug!(size = raw_size, "Ignoring unparsable market size");
                return None;
            }
        };
        let faction_id = child_text(market, "factionId").map(str::to_string);
        let faction_name = faction_id
            .as_deref()
            .and_then(|id| self.lookup.faction_name(id))
            .unwrap_or_default()
            .to_string();

        Some(Population {
            size,
            faction_id,
            faction_name,
        })
    }

    fn read_station(&self, node: Node<'a, 'input>) -> Result<Station> {
        let entity_id = node.attribute("z").unwrap_or_default();
        let market = child(node, "market").ok_or_else(|| IngestError::MalformedEntity {
            id: entity_id.to_string(),
            reason: "station without market".to_string(),
        })?;
        let id = child_text(market, "id").unwrap_or(entity_id);
        let name = child_text(market, "name").unwrap_or(id);

        Ok(Station {
            id: id.to_string(),
            name: name.to_string(),
            population: self.read_population(market),
        })
    }
}

fn read_salvageable(node: Node<'_, '_>) -> Result<String> {
    let entity_id = node.attribute("z").unwrap_or_default();
    let malformed = |reason: String| IngestError::MalformedEntity {
        id: entity_id.to_string(),
        reason,
    };

    let payload = child_text(node, "j0").ok_or_else(|| malformed("missing <j0> payload".into()))?;
    relaxed_json::string_field(payload, "f0")
        .map_err(|err| malformed(format!("salvage payload: {err}")))?
        .ok_or_else(|| malformed("salvage payload has no f0 kind".into()))
}

fn read_mods(root: Node<'_, '_>) -> Vec<String> {
    child(root, "modAndPluginData")
        .and_then(|data| child(data, "allModsEverEnabled"))
        .map(|mods| {
            mods.children()
                .filter(|n| n.is_element())
                .filter_map(|m| child(m, "spec").and_then(|spec| child_text(spec, "id")))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// System id from the entity's `cL` reference, or its inline definition.
fn owner_system<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    let container = child(node, "cL")?;
    container.attribute("ref").or_else(|| container.attribute("z"))
}

fn parse_pixels(raw: &str) -> Option<Coordinate> {
    let (x, y) = raw.split_once('|')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(Coordinate::from_pixels(x, y))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child(node, tag).and_then(non_empty_text)
}

fn non_empty_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

fn element_texts<'a>(node: Node<'a, '_>) -> impl Iterator<Item = &'a str> {
    node.children()
        .filter(|n| n.is_element())
        .filter_map(non_empty_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_convert_to_light_years() {
        let loc = parse_pixels("1000|0").unwrap();
        assert!((loc.x - 0.5).abs() < 1e-12);
        assert_eq!(loc.y, 0.0);

        let loc = parse_pixels(" -4000.5 | 2000 ").unwrap();
        assert!((loc.x + 2.00025).abs() < 1e-12);
        assert!((loc.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bad_pixel_pairs_are_rejected() {
        assert!(parse_pixels("1000").is_none());
        assert!(parse_pixels("a|b").is_none());
        assert!(parse_pixels("").is_none());
    }

    #[test]
    fn non_finite_pixels_are_rejected() {
        assert!(parse_pixels("NaN|0").is_none());
        assert!(parse_pixels("inf|0").is_none());
        assert!(parse_pixels("0|-inf").is_none());
    }

    #[test]
    fn owner_system_prefers_reference() {
        let doc = Document::parse(r#"<Plnt><cL ref="7"/></Plnt>"#).unwrap();
        assert_eq!(owner_system(doc.root_element()), Some("7"));

        let doc = Document::parse(r#"<Plnt><cL z="9" dN="Inline"/></Plnt>"#).unwrap();
        assert_eq!(owner_system(doc.root_element()), Some("9"));
    }

    #[test]
    fn salvageable_kind_comes_from_relaxed_payload() {
        let doc = Document::parse(
            "<CCEnt z=\"3\"><j0>{f0:\"research_station\", # kind\n f1:2,}</j0></CCEnt>",
        )
        .unwrap();
        assert_eq!(read_salvageable(doc.root_element()).unwrap(), "research_station");

        let doc = Document::parse("<CCEnt z=\"4\"><j0>{f1:2}</j0></CCEnt>").unwrap();
        assert!(matches!(
            read_salvageable(doc.root_element()),
            Err(IngestError::MalformedEntity { id, .. }) if id == "4"
        ));
    }

    #[test]
    fn mods_are_read_from_specs() {
        let doc = Document::parse(
            "<CampaignGameManager><modAndPluginData><allModsEverEnabled>\
             <EnabledModData><spec><id>lw_lazylib</id></spec></EnabledModData>\
             <EnabledModData><spec/></EnabledModData>\
             <EnabledModData><spec><id>nexerelin</id></spec></EnabledModData>\
             </allModsEverEnabled></modAndPluginData></CampaignGameManager>",
        )
        .unwrap();
        assert_eq!(read_mods(doc.root_element()), vec!["lw_lazylib", "nexerelin"]);
    }
}
