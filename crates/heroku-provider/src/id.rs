//! Composite identifiers
//!
//! Association resources have no platform UUID of their own; their external
//! identifier joins the two component IDs with a `:`.

use crate::error::{ProviderError, Result};

/// Join two component IDs into one external identifier.
pub fn build_composite_id(left: &str, right: &str) -> String {
    format!("{left}:{right}")
}

/// Split a composite identifier on the first `:`.
///
/// Only the first separator is significant, so the right-hand component may
/// itself contain colons.
pub fn parse_composite_id(id: &str) -> Result<(&str, &str)> {
    id.split_once(':').ok_or_else(|| {
        ProviderError::InvalidState(format!(
            "expected a composite id of the form <left>:<right>, got {id:?}"
        ))
    })
}
