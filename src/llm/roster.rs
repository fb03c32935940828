//! Model roster: the models a caller may pick from
//!
//! The roster is read once at start-up. A missing, malformed or empty roster
//! is replaced by a single placeholder model whose calls never leave the
//! process.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Model id that routes every call to placeholder mode
pub const PLACEHOLDER_MODEL_ID: &str = "placeholder";

/// One selectable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub display_name: String,
    pub model_id: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub notes: String,
}

impl ModelDescriptor {
    /// Synthetic descriptor used when no roster is available
    pub fn placeholder() -> Self {
        Self {
            display_name: "Placeholder (offline)".to_string(),
            model_id: PLACEHOLDER_MODEL_ID.to_string(),
            provider: "local".to_string(),
            notes: "Returns canned output without calling a provider".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.model_id == PLACEHOLDER_MODEL_ID
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<ModelDescriptor>),
    Wrapped { models: Vec<ModelDescriptor> },
}

/// Ordered, read-only list of models; never empty
#[derive(Debug, Clone)]
pub struct ModelRoster {
    models: Vec<ModelDescriptor>,
}

impl ModelRoster {
    /// Build a roster, substituting the placeholder for an empty list
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        let models: Vec<_> = models
            .into_iter()
            .filter(|m| !m.model_id.trim().is_empty())
            .collect();
        if models.is_empty() {
            return Self::placeholder();
        }
        Self { models }
    }

    /// Roster containing only the placeholder model
    pub fn placeholder() -> Self {
        Self {
            models: vec![ModelDescriptor::placeholder()],
        }
    }

    /// Parse a JSON roster: either a list or `{"models": [...]}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let models = match serde_json::from_str::<RosterFile>(json)? {
            RosterFile::List(models) | RosterFile::Wrapped { models } => models,
        };
        Ok(Self::new(models))
    }

    /// Load a roster file, falling back to the placeholder on any problem
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No model roster configured, using placeholder model");
            return Self::placeholder();
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read model roster {}: {}", path.display(), e);
                return Self::placeholder();
            }
        };

        match Self::from_json(&contents) {
            Ok(roster) => {
                info!("Loaded {} models from {}", roster.models.len(), path.display());
                roster
            }
            Err(e) => {
                warn!("Malformed model roster {}: {}", path.display(), e);
                Self::placeholder()
            }
        }
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// First model in the roster
    pub fn default_model(&self) -> &ModelDescriptor {
        &self.models[0]
    }

    pub fn find(&self, model_id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.model_id == model_id)
    }
}

impl Default for ModelRoster {
    fn default() -> Self {
        Self::placeholder()
    }
}
