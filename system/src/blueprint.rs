use crate::traits::BlueprintStore;
use crate::types::{Point, SessionKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub author: String,
    pub name: String,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Blueprint {
    pub fn new(author: impl Into<String>, name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
            points,
        }
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.author.clone(), self.name.clone())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlueprintError {
    #[error("Blueprint not found: {0}")]
    NotFound(String),
    #[error("Blueprints not found for author: {0}")]
    AuthorNotFound(String),
    #[error("{0}")]
    Persistence(String),
    #[error("blueprint store is unavailable")]
    Unavailable,
}

/// Keeps blueprints in process memory, unique per (author, name).
pub struct InMemoryBlueprintStore {
    blueprints: RwLock<HashMap<SessionKey, Blueprint>>,
}

impl InMemoryBlueprintStore {
    pub fn new() -> Self {
        Self {
            blueprints: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_blueprints(blueprints: impl IntoIterator<Item = Blueprint>) -> Self {
        Self {
            blueprints: RwLock::new(blueprints.into_iter().map(|b| (b.key(), b)).collect()),
        }
    }
}

impl Default for InMemoryBlueprintStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_key(key: &SessionKey) -> Result<(), BlueprintError> {
    if key.author().is_empty() || key.name().is_empty() {
        Err(BlueprintError::Persistence(
            "author and name must not be empty".into(),
        ))
    } else {
        Ok(())
    }
}

fn sorted(mut blueprints: Vec<Blueprint>) -> Vec<Blueprint> {
    blueprints.sort_by(|a, b| (&a.author, &a.name).cmp(&(&b.author, &b.name)));
    blueprints
}

impl BlueprintStore for InMemoryBlueprintStore {
    fn get(&self, key: &SessionKey) -> Result<Blueprint, BlueprintError> {
        let blueprints = self
            .blueprints
            .read()
            .map_err(|_| BlueprintError::Unavailable)?;
        blueprints
            .get(key)
            .cloned()
            .ok_or_else(|| BlueprintError::NotFound(key.to_string()))
    }

    fn list_by_author(&self, author: &str) -> Result<Vec<Blueprint>, BlueprintError> {
        let blueprints = self
            .blueprints
            .read()
            .map_err(|_| BlueprintError::Unavailable)?;
        let owned = blueprints
            .values()
            .filter(|b| b.author == author)
            .cloned()
            .collect::<Vec<_>>();
        if owned.is_empty() {
            Err(BlueprintError::AuthorNotFound(author.to_owned()))
        } else {
            Ok(sorted(owned))
        }
    }

    fn list_all(&self) -> Result<Vec<Blueprint>, BlueprintError> {
        let blueprints = self
            .blueprints
            .read()
            .map_err(|_| BlueprintError::Unavailable)?;
        Ok(sorted(blueprints.values().cloned().collect()))
    }

    fn create(&self, blueprint: Blueprint) -> Result<Blueprint, BlueprintError> {
        let key = blueprint.key();
        check_key(&key).map_err(|err| {
            BlueprintError::Persistence(format!("Error registering blueprint: {}", err))
        })?;
        let mut blueprints = self
            .blueprints
            .write()
            .map_err(|_| BlueprintError::Unavailable)?;
        if blueprints.contains_key(&key) {
            return Err(BlueprintError::Persistence(format!(
                "Error registering blueprint: {} already exists",
                key
            )));
        }
        blueprints.insert(key, blueprint.clone());
        Ok(blueprint)
    }

    fn update(&self, key: &SessionKey, blueprint: Blueprint) -> Result<Blueprint, BlueprintError> {
        let new_key = blueprint.key();
        check_key(&new_key)?;
        let mut blueprints = self
            .blueprints
            .write()
            .map_err(|_| BlueprintError::Unavailable)?;
        if !blueprints.contains_key(key) {
            return Err(BlueprintError::NotFound(key.to_string()));
        }
        if &new_key != key && blueprints.contains_key(&new_key) {
            return Err(BlueprintError::Persistence(format!(
                "blueprint {} already exists",
                new_key
            )));
        }
        blueprints.remove(key);
        blueprints.insert(new_key, blueprint.clone());
        Ok(blueprint)
    }

    fn delete(&self, key: &SessionKey) -> Result<(), BlueprintError> {
        let mut blueprints = self
            .blueprints
            .write()
            .map_err(|_| BlueprintError::Unavailable)?;
        blueprints
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlueprintError::NotFound(key.to_string()))
    }
}
