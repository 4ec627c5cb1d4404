//! Config-var reconciliation
//!
//! Desired vars come in two groups, public and private; the private group's
//! values never appear in logs. Diffing the desired groups against the
//! previous ones yields a sparse update: changed or new keys map to their
//! value, removed keys map to `None`, and untouched keys are omitted so the
//! apply writes the minimum.

use std::collections::{HashMap, HashSet};

use crate::error::{ProviderError, Result};

pub type Vars = HashMap<String, String>;

/// Compute the sparse config-var update that converges the previous groups
/// to the desired ones.
///
/// A key present in both desired groups is rejected: letting one group
/// shadow the other would make the applied value depend on iteration order.
pub fn diff_config_vars(
    previous_public: &Vars,
    previous_private: &Vars,
    desired_public: &Vars,
    desired_private: &Vars,
) -> Result<HashMap<String, Option<String>>> {
    let mut overlap: Vec<&str> = desired_public
        .keys()
        .filter(|key| desired_private.contains_key(*key))
        .map(String::as_str)
        .collect();
    if !overlap.is_empty() {
        overlap.sort_unstable();
        return Err(ProviderError::InvalidConfig(format!(
            "config vars declared both public and private: {}",
            overlap.join(", ")
        )));
    }

    let keys: HashSet<&String> = previous_public
        .keys()
        .chain(previous_private.keys())
        .chain(desired_public.keys())
        .chain(desired_private.keys())
        .collect();

    let mut changes = HashMap::new();
    for key in keys {
        let previous = previous_public
            .get(key)
            .or_else(|| previous_private.get(key));
        let desired = desired_public.get(key).or_else(|| desired_private.get(key));
        match (previous, desired) {
            (Some(previous), Some(desired)) if previous == desired => {}
            (_, Some(desired)) => {
                changes.insert(key.clone(), Some(desired.clone()));
            }
            (Some(_), None) => {
                changes.insert(key.clone(), None);
            }
            (None, None) => {}
        }
    }
    Ok(changes)
}
