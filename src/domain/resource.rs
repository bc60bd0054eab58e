//! FHIR resource type enumeration
//!
//! The pipeline works over a fixed set of FHIR R4 resource types. Each type
//! knows its REST path segment and the lowercase stem used for snapshot
//! folders, file names, and derived table names.

use std::fmt;
use std::str::FromStr;

/// Resource types the pipeline ingests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Patient,
    Practitioner,
    Condition,
    Observation,
    Encounter,
}

/// All supported resource types, in ingestion order
pub const ALL_RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType::Patient,
    ResourceType::Practitioner,
    ResourceType::Condition,
    ResourceType::Observation,
    ResourceType::Encounter,
];

impl ResourceType {
    /// REST path segment as the FHIR server expects it (e.g. `Patient`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Patient => "Patient",
            ResourceType::Practitioner => "Practitioner",
            ResourceType::Condition => "Condition",
            ResourceType::Observation => "Observation",
            ResourceType::Encounter => "Encounter",
        }
    }

    /// Lowercase stem used for snapshot folders/files and bronze table names
    pub fn stem(&self) -> &'static str {
        match self {
            ResourceType::Patient => "patient",
            ResourceType::Practitioner => "practitioner",
            ResourceType::Condition => "condition",
            ResourceType::Observation => "observation",
            ResourceType::Encounter => "encounter",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patient" => Ok(ResourceType::Patient),
            "practitioner" => Ok(ResourceType::Practitioner),
            "condition" => Ok(ResourceType::Condition),
            "observation" => Ok(ResourceType::Observation),
            "encounter" => Ok(ResourceType::Encounter),
            _ => Err(format!(
                "Unknown resource type '{s}'. Supported: Patient, Practitioner, Condition, Observation, Encounter"
            )),
        }
    }
}
