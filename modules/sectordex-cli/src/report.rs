use std::fmt;

use sectordex_common::StarSystem;
use sectordex_ingest::Sector;

/// Summary of a loaded sector.
pub struct SectorSummary<'a>(pub &'a Sector);

impl fmt::Display for SectorSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sector = self.0;
        writeln!(
            f,
            "Save: {} (seed {})",
            sector.name().unwrap_or("unnamed"),
            sector.seed().unwrap_or("unknown")
        )?;
        if !sector.mods().is_empty() {
            writeln!(f, "Mods: {}", sector.mods().join(", "))?;
        }
        writeln!(
            f,
            "{} systems, up to {} planets per system, up to {:.1}ly from center",
            sector.systems().len(),
            sector.max_planet_count(),
            sector.max_system_dist()
        )?;
        if let Some(range) = sector.hazard_range() {
            writeln!(
                f,
                "Hazard ratings from {:.0}% to {:.0}%",
                range.min * 100.0,
                range.max * 100.0
            )?;
        }
        writeln!(
            f,
            "{} planet types, {} star types, {} conditions, {} themes",
            sector.planet_types().len(),
            sector.star_types().len(),
            sector.conditions().len(),
            sector.themes().len()
        )?;
        if !sector.skipped().is_empty() {
            writeln!(f, "{} entries could not be read", sector.skipped().len())?;
        }
        Ok(())
    }
}

/// Matching systems, at most `limit` of them, in the order given.
pub struct SystemListing<'a> {
    systems: &'a [&'a StarSystem],
    limit: usize,
    details: bool,
}

impl<'a> SystemListing<'a> {
    pub fn new(systems: &'a [&'a StarSystem], limit: usize, details: bool) -> Self {
        Self {
            systems,
            limit,
            details,
        }
    }
}

impl fmt::Display for SystemListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} matching systems", self.systems.len())?;
        for system in self.systems.iter().take(self.limit) {
            writeln!(f, "{system}")?;
            if self.details {
                write_details(f, system)?;
            }
        }
        if self.systems.len() > self.limit {
            writeln!(f, "... and {} more", self.systems.len() - self.limit)?;
        }
        Ok(())
    }
}

fn write_details(f: &mut fmt::Formatter<'_>, system: &StarSystem) -> fmt::Result {
    if !system.stars().is_empty() {
        let stars: Vec<String> = system.stars().iter().map(|s| s.to_string()).collect();
        writeln!(f, "    stars: {}", stars.join(", "))?;
    }
    for planet in system.planets() {
        writeln!(f, "    {planet}")?;
        let conditions: Vec<&str> = planet.conditions().map(|c| c.name()).collect();
        if !conditions.is_empty() {
            writeln!(f, "        {}", conditions.join(", "))?;
        }
    }
    for station in system.stations() {
        writeln!(f, "    station: {station}")?;
    }
    for location in system.stable_locations() {
        writeln!(f, "    {location}")?;
    }
    if system.jump_points() > 0 {
        writeln!(f, "    jump points: {}", system.jump_points())?;
    }
    for (kind, count) in system.salvageables() {
        writeln!(f, "    salvage: {kind} x{count}")?;
    }
    if !system.themes().is_empty() {
        let themes: Vec<&str> = system.themes().iter().map(String::as_str).collect();
        writeln!(f, "    themes: {}", themes.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectordex_common::{Condition, Coordinate, Planet, PlanetType, SystemContents};

    fn system(name: &str, x: f64, planets: Vec<Planet>) -> StarSystem {
        StarSystem::new(
            name,
            name,
            Coordinate::new(x, 0.0),
            SystemContents {
                planets,
                jump_points: 2,
                ..Default::default()
            },
        )
    }

    #[test]
    fn listing_respects_limit() {
        let a = system("Alpha", 1.0, vec![]);
        let b = system("Beta", 2.0, vec![]);
        let c = system("Gamma", 3.0, vec![]);
        let text = SystemListing::new(&[&a, &b, &c], 2, false).to_string();

        assert!(text.starts_with("3 matching systems\n"));
        assert!(text.contains("Alpha (0 planets 1.0ly from center)"));
        assert!(text.contains("Beta"));
        assert!(!text.contains("Gamma"));
        assert!(text.ends_with("... and 1 more\n"));
    }

    #[test]
    fn details_list_planets_and_conditions() {
        let planet = Planet::new(
            "p1",
            "Rubble",
            PlanetType::new("barren", "Barren"),
            "a",
            vec![Condition::new("no_atmosphere", "No Atmosphere").with_hazard(Some(0.5))],
            None,
        );
        let a = system("Alpha", 1.0, vec![planet]);
        let text = SystemListing::new(&[&a], 10, true).to_string();

        assert!(text.contains("    Rubble (150% Barren)\n"));
        assert!(text.contains("        No Atmosphere\n"));
        assert!(text.contains("    jump points: 2\n"));
    }
}
