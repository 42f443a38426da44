use crate::{error::Error, Index, Result};
use fabric_policy_controller_api::{GlobalSpec, INFRA_TYPE_ACI, INFRA_TYPE_DEFAULT};
use tracing::{debug, instrument};

/// Fabric-wide enforcement mode.
///
/// In `Aci` mode an external fabric enforces policy; verdicts computed here
/// are mode-independent, so flipping the mode never changes a classification.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FabricMode {
    #[default]
    Standalone,
    Aci,
}

// === impl Index ===

impl Index {
    /// Sets the fabric-wide mode. The single global object is named
    /// `global`.
    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub fn apply_global(&mut self, spec: GlobalSpec) -> Result<()> {
        if spec.name != "global" {
            return Err(Error::Validation(format!(
                "unknown global object: {:?}",
                spec.name
            )));
        }

        self.fabric_mode = match spec.network_infra_type.as_str() {
            INFRA_TYPE_ACI => FabricMode::Aci,
            "" | "stand-alone" | INFRA_TYPE_DEFAULT => FabricMode::Standalone,
            mode => {
                return Err(Error::Validation(format!(
                    "invalid network-infra-type: {mode:?}"
                )))
            }
        };
        debug!(mode = ?self.fabric_mode, "Set fabric mode");
        Ok(())
    }

    pub fn fabric_mode(&self) -> FabricMode {
        self.fabric_mode
    }
}
