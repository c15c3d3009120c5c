use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{entity::Entity, Error};

/**
A document of entities: the unit that's loaded, saved, and exported.
*/
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FsocData {
    #[serde(default)]
    pub melt: Vec<Entity>,
}

impl FsocData {
    pub fn new(entities: impl IntoIterator<Item = Entity>) -> Self {
        FsocData {
            melt: entities.into_iter().collect(),
        }
    }

    pub fn from_yaml_str(document: &str) -> Result<Self, Error> {
        serde_yaml::from_str(document).map_err(|e| Error::new("failed to parse document", e))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        serde_yaml::from_reader(reader).map_err(|e| Error::new("failed to parse document", e))
    }

    pub fn to_yaml_string(&self) -> Result<String, Error> {
        serde_yaml::to_string(self).map_err(|e| Error::new("failed to write document", e))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.melt
    }

    pub fn add(&mut self, entity: Entity) -> &mut Self {
        self.melt.push(entity);
        self
    }
}
