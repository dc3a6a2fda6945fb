//! Ordered column list the classifier was trained on.
//!
//! Loaded from `feature_columns.json`, a plain JSON array of names.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

pub const BUILTIN_FEATURE_COLUMNS: &str = include_str!("data/feature_columns.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Arc<[String]>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse feature schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read feature schema from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("feature schema lists no columns")]
    Empty,
    #[error("feature schema lists column '{0}' more than once")]
    Duplicate(String),
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }
        Ok(Self {
            names: names.into(),
        })
    }

    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json_str(BUILTIN_FEATURE_COLUMNS)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let names: Vec<String> = serde_json::from_str(json)?;
        Self::new(names)
    }

    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn shared_names(&self) -> Arc<[String]> {
        Arc::clone(&self.names)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }
}
