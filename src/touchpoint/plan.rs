//! Provisioning plans
//!
//! A plan is a JSON document listing the operands to apply, in order. It
//! is what `provisor apply` feeds the engine:
//!
//! ```json
//! {
//!   "profile": "default",
//!   "operands": [
//!     {
//!       "id": "org.example.core",
//!       "version": "1.0.0",
//!       "artifact": { "classifier": "osgi.bundle", "id": "org.example.core", "version": "1.0.0" },
//!       "instructions": ["installBundle(bundle:@artifact);setStartLevel(startLevel:2)"]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisorError, Result};
use crate::touchpoint::engine::Operand;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisioningPlan {
    /// The profile the plan targets; `default` when absent.
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub operands: Vec<Operand>,
}

impl ProvisioningPlan {
    pub fn load(path: &Path) -> Result<ProvisioningPlan> {
        let parse_failed = |reason: String| ProvisorError::PlanParseFailed {
            path: path.display().to_string(),
            reason,
        };
        let contents =
            std::fs::read_to_string(path).map_err(|e| parse_failed(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| parse_failed(e.to_string()))
    }

    pub fn profile_id(&self) -> &str {
        self.profile.as_deref().unwrap_or("default")
    }
}
