use serde::Deserialize;

/// How a repository fills in the id of an entity saved without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdGeneration {
    /// Generate a random UUID v4 on the client before the write.
    #[default]
    Uuid,
    /// Reject entities without an id.
    Disabled,
}

impl IdGeneration {
    pub(crate) fn generate(&self) -> Option<String> {
        match self {
            IdGeneration::Uuid => Some(uuid::Uuid::new_v4().to_string()),
            IdGeneration::Disabled => None,
        }
    }
}

/// Per-repository settings. Every field has a default, so a repository needs
/// nothing beyond its entity type and store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Overrides the entity's `COLLECTION`.
    pub collection: Option<String>,
    pub id_generation: IdGeneration,
}

impl RepositoryConfig {
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn id_generation(mut self, id_generation: IdGeneration) -> Self {
        self.id_generation = id_generation;
        self
    }
}
