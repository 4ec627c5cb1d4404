//! Config var endpoints
//!
//! Config vars are a flat string map per app. Updates are sparse: only the
//! keys to change are sent, and a JSON `null` value deletes a key.

use std::collections::HashMap;

use crate::client::Heroku;
use crate::error::Result;

impl Heroku {
    /// Fetch all config vars for an app.
    pub async fn config_var_info(&self, app: &str) -> Result<HashMap<String, String>> {
        self.get(&format!("/apps/{app}/config-vars")).await
    }

    /// Apply a sparse config-var update and return the resulting full map.
    ///
    /// `Some(value)` sets a key, `None` deletes it. Deleted keys are dropped
    /// from the returned map even when the platform echoes them as `null`.
    pub async fn config_var_update(
        &self,
        app: &str,
        changes: &HashMap<String, Option<String>>,
    ) -> Result<HashMap<String, String>> {
        let vars: HashMap<String, Option<String>> = self
            .patch(&format!("/apps/{app}/config-vars"), changes)
            .await?;
        Ok(vars
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect())
    }
}
