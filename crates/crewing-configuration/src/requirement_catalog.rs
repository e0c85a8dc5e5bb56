use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

pub const CONTAINER_SHIP: &str = "Container Ship";
pub const TANKER: &str = "Tanker";

/// What a mission on a given vehicle type needs from its crew.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRequirements
{
    #[serde(default)]
    pub min_crew: u32,
    #[serde(default)]
    pub required_skills: BTreeMap<String, f64>,
}

impl VehicleRequirements
{
    pub fn new<S: Into<String>>(
        min_crew: u32,
        required_skills: impl IntoIterator<Item = (S, f64)>,
    ) -> Self
    {
        Self {
            min_crew,
            required_skills: required_skills
                .into_iter()
                .map(|(skill, level)| (skill.into(), level))
                .collect(),
        }
    }
}

/// One `[[vehicle_types]]` table in the configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleTypeEntry
{
    #[serde(rename = "type")]
    pub vehicle_type: String,
    #[serde(flatten)]
    pub requirements: VehicleRequirements,
}

/// Vehicle type label to crew requirements. Types that are not in the catalog
/// are valid but unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequirementCatalog
{
    entries: HashMap<String, VehicleRequirements>,
}

impl RequirementCatalog
{
    pub fn empty() -> Self
    {
        Self::default()
    }

    pub fn seeded() -> Self
    {
        let mut requirement_catalog = Self::empty();
        requirement_catalog.insert(
            CONTAINER_SHIP,
            VehicleRequirements::new(
                5,
                [
                    ("navigation", 3.0),
                    ("cargo_handling", 2.0),
                    ("safety_training", 3.0),
                ],
            ),
        );
        requirement_catalog.insert(
            TANKER,
            VehicleRequirements::new(
                6,
                [
                    ("hazardous_materials", 2.0),
                    ("navigation", 3.0),
                    ("safety_training", 3.0),
                ],
            ),
        );
        requirement_catalog
    }

    /// Replaces any existing entry for the same type.
    pub fn insert(&mut self, vehicle_type: impl Into<String>, requirements: VehicleRequirements)
    {
        self.entries.insert(vehicle_type.into(), requirements);
    }

    pub fn with_entries(mut self, entries: impl IntoIterator<Item = VehicleTypeEntry>) -> Self
    {
        for entry in entries {
            self.insert(entry.vehicle_type, entry.requirements);
        }
        self
    }

    pub fn requirements(&self, vehicle_type: &str) -> Option<&VehicleRequirements>
    {
        self.entries.get(vehicle_type)
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// Entries sorted by vehicle type.
    pub fn entries(&self) -> Vec<(&String, &VehicleRequirements)>
    {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_seeded_catalog()
    {
        let requirement_catalog = RequirementCatalog::seeded();

        let tanker = requirement_catalog.requirements(TANKER).unwrap();
        assert_eq!(tanker.min_crew, 6);
        assert_eq!(tanker.required_skills["hazardous_materials"], 2.0);

        let container_ship = requirement_catalog.requirements(CONTAINER_SHIP).unwrap();
        assert_eq!(container_ship.min_crew, 5);
        assert_eq!(container_ship.required_skills.len(), 3);

        assert!(requirement_catalog.requirements("Bulk Carrier").is_none());
    }

    #[test]
    fn test_entries_override_and_extend()
    {
        let requirement_catalog = RequirementCatalog::seeded().with_entries([
            VehicleTypeEntry {
                vehicle_type: TANKER.to_string(),
                requirements: VehicleRequirements::new(4, [("navigation", 2.0)]),
            },
            VehicleTypeEntry {
                vehicle_type: "Ro-Ro".to_string(),
                requirements: VehicleRequirements::new(3, [("cargo_handling", 2.0)]),
            },
        ]);

        assert_eq!(requirement_catalog.len(), 3);
        assert_eq!(
            requirement_catalog.requirements(TANKER).unwrap().min_crew,
            4
        );
        assert_eq!(
            requirement_catalog
                .entries()
                .iter()
                .map(|(vehicle_type, _)| vehicle_type.as_str())
                .collect::<Vec<_>>(),
            vec![CONTAINER_SHIP, "Ro-Ro", TANKER]
        );
    }
}
