use super::ids::GroupId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The entity category a chain (and every group in it) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Polymer,
    NonPolymer,
    Water,
    Other,
}

#[derive(Debug, Error)]
#[error("Unknown entity type '{0}'")]
pub struct ParseEntityTypeError(pub String);

impl FromStr for EntityType {
    type Err = ParseEntityTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polymer" => Ok(EntityType::Polymer),
            "non-polymer" | "nonpolymer" | "non_polymer" => Ok(EntityType::NonPolymer),
            "water" => Ok(EntityType::Water),
            "other" => Ok(EntityType::Other),
            _ => Err(ParseEntityTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EntityType::Polymer => "polymer",
                EntityType::NonPolymer => "non-polymer",
                EntityType::Water => "water",
                EntityType::Other => "other",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub(crate) id: String,              // Chain identifier as written in the record (e.g. "A")
    pub(crate) entity_type: EntityType, // Category shared by all groups of the chain
    pub(crate) groups: Vec<GroupId>,    // Groups in record order
}

impl Chain {
    pub(crate) fn new(id: &str, entity_type: EntityType) -> Self {
        Self {
            id: id.to_string(),
            entity_type,
            groups: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}
