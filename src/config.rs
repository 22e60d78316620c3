//! Kernel configuration parsing and validation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::kernel::{Kernel, KernelKind};
use crate::error::{Error, Result};

/// Which kernel to build, and with what support radius.
///
/// ```json
/// { "kind": "Quartic", "smoothing_radius": 0.05 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Kernel shape; defaults to `Quartic`.
    #[serde(default)]
    pub kind: KernelKind,
    /// Support radius `h` (> 0).
    pub smoothing_radius: f64,
}

impl KernelConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: KernelConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.smoothing_radius.is_finite() || self.smoothing_radius <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "smoothing_radius must be finite and > 0, got {}",
                self.smoothing_radius
            )));
        }
        Ok(())
    }

    /// Build the configured kernel.
    pub fn build(&self) -> Result<Kernel> {
        Kernel::new(self.kind, self.smoothing_radius)
    }
}
