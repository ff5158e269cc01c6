//! Input loading
//!
//! Loads the persona pool and the health-record pool from JSON files.
//! Missing or structurally malformed files are fatal for the load step;
//! per-tree validation problems are recovered as warnings and never abort
//! a multi-thousand-record load.

use prm_common::model::record::HealthRecordSemanticTree;
use prm_common::model::{PersonaSemanticTree, ValidationWarning};
use prm_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One persona as it appears in `personas.json`. Generation metadata other
/// than the semantic tree is ignored; the tree itself may be absent, in
/// which case the persona scores neutral everywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub id: Option<String>,
    pub semantic_tree: Option<PersonaSemanticTree>,
}

/// A loaded pool plus the non-fatal validation warnings it produced.
#[derive(Debug)]
pub struct LoadedPool<T> {
    pub items: Vec<T>,
    pub warnings: Vec<ValidationWarning>,
}

fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::InvalidInput(format!("cannot read {} file {}: {}", what, path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::InvalidInput(format!("malformed {} file {}: {}", what, path.display(), e))
    })
}

/// Load and validate the persona pool.
pub fn load_personas(path: &Path) -> Result<LoadedPool<Persona>> {
    let mut personas: Vec<Persona> = read_json_array(path, "personas")?;

    let mut warnings = Vec::new();
    for (i, persona) in personas.iter_mut().enumerate() {
        if let Some(tree) = persona.semantic_tree.as_mut() {
            for w in tree.validate_and_clamp() {
                warn!("persona {}: {}: {}", i, w.field, w.message);
                warnings.push(ValidationWarning::new(
                    &format!("personas[{}].{}", i, w.field),
                    w.message,
                ));
            }
        }
    }

    info!(
        "loaded {} personas from {} ({} validation warnings)",
        personas.len(),
        path.display(),
        warnings.len()
    );
    Ok(LoadedPool {
        items: personas,
        warnings,
    })
}

/// Load and validate the health-record pool (the FHIR extractor's output
/// contract: a JSON array of semantic trees).
pub fn load_health_records(path: &Path) -> Result<LoadedPool<HealthRecordSemanticTree>> {
    let mut records: Vec<HealthRecordSemanticTree> = read_json_array(path, "health records")?;

    let mut warnings = Vec::new();
    for (i, record) in records.iter_mut().enumerate() {
        for w in record.validate_and_clamp() {
            warn!("record {}: {}: {}", i, w.field, w.message);
            warnings.push(ValidationWarning::new(
                &format!("records[{}].{}", i, w.field),
                w.message,
            ));
        }
    }

    info!(
        "loaded {} health records from {} ({} validation warnings)",
        records.len(),
        path.display(),
        warnings.len()
    );
    Ok(LoadedPool {
        items: records,
        warnings,
    })
}
