use anyhow::anyhow;
use serde_json::Value;

use crate::error::ServiceError;
use crate::model::{Entity, Patch};

/// Outcome of applying a patch to a loaded row.
#[derive(Debug, Clone)]
pub struct MergeOutcome<E> {
    pub merged: E,
    /// Allow-listed fields the patch actually overwrote.
    pub applied: Vec<&'static str>,
    /// Patch fields outside the allow-list, left untouched.
    pub ignored: Vec<String>,
}

/// Copy allow-listed fields from `patch` onto `existing`.
///
/// Only fields named in `E::MUTABLE_FIELDS` that are present and non-null in
/// the patch are copied. Everything else, including identifiers and
/// timestamps, keeps the value it had on the loaded row.
pub fn merge_patch<E: Entity>(existing: &E, patch: &Patch) -> Result<MergeOutcome<E>, ServiceError> {
    let mut current = match serde_json::to_value(existing) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(anyhow!("{} does not serialize to an object", E::KIND).into()),
        Err(e) => return Err(anyhow!("Failed to encode {}: {}", E::KIND, e).into()),
    };

    let mut applied = Vec::new();
    for field in E::MUTABLE_FIELDS {
        match patch.get(*field) {
            Some(value) if !value.is_null() => {
                current.insert((*field).to_string(), value.clone());
                applied.push(*field);
            }
            _ => {}
        }
    }

    let ignored = patch
        .keys()
        .filter(|key| !E::MUTABLE_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();

    let merged = serde_json::from_value(Value::Object(current)).map_err(|e| {
        ServiceError::InvalidArgument(format!("Invalid {} patch: {}", E::KIND, e))
    })?;

    Ok(MergeOutcome {
        merged,
        applied,
        ignored,
    })
}
