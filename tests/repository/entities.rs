//! Entities used across the repository tests.

use repobase::Entity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "items")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tag: String,
}

impl Item {
    pub fn new(id: &str, name: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
pub struct Score {
    pub id: String,
    pub player: String,
    pub score: i64,
}

impl Score {
    pub fn new(id: &str, player: &str, score: i64) -> Self {
        Self {
            id: id.to_string(),
            player: player.to_string(),
            score,
        }
    }
}

/// A field projection of [`Score`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlayerOnly {
    pub player: String,
}
