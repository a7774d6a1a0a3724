//! Cloud provider backends: Amazon Braket and IBM Quantum.

use serde::{Deserialize, Serialize};

use crate::config::ConfigRecord;
use crate::kind::ConfigKind;
use crate::validate::{Issues, Validate};

fn default_local_device() -> String {
    "default".into()
}

/// Runs circuits on Amazon Braket devices and simulators.
///
/// A local configuration (`local: true`) uses only `local_device`; every
/// remote field must then be unset. A remote configuration must set all of
/// `device_type`, `provider`, `device`, `s3_bucket` and `s3_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BraketConfig {
    /// Run on a local simulator instead of the Braket service.
    pub local: bool,
    /// Local simulator to use.
    #[serde(default = "default_local_device")]
    pub local_device: String,
    /// Remote device class, e.g. `qpu` or `quantum-simulator`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Hardware provider, e.g. `ionq`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// The quantum computer or simulator to run on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// S3 bucket receiving task results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<String>,
    /// Key prefix inside `s3_bucket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_folder: Option<String>,
    /// Apply initial-state simplification before submission.
    #[serde(default)]
    pub simplify_initial: bool,
}

impl BraketConfig {
    /// A local-simulator configuration.
    pub fn local() -> Self {
        Self {
            local: true,
            local_device: default_local_device(),
            device_type: None,
            provider: None,
            device: None,
            s3_bucket: None,
            s3_folder: None,
            simplify_initial: false,
        }
    }

    fn remote_fields(&self) -> [(&'static str, Option<&String>); 5] {
        [
            ("device_type", self.device_type.as_ref()),
            ("provider", self.provider.as_ref()),
            ("device", self.device.as_ref()),
            ("s3_bucket", self.s3_bucket.as_ref()),
            ("s3_folder", self.s3_folder.as_ref()),
        ]
    }
}

impl Validate for BraketConfig {
    fn validate(&self, issues: &mut Issues) {
        let fields = self.remote_fields();
        if self.local {
            for (name, _) in fields.iter().filter(|(_, v)| v.is_some()) {
                issues.push(name, "must not be set when local is true");
            }
        } else {
            for (name, _) in fields.iter().filter(|(_, v)| v.is_none()) {
                issues.push(name, "field required when local is false");
            }
        }
    }
}

impl ConfigRecord for BraketConfig {
    const KIND: ConfigKind = ConfigKind::Braket;
    const FIELDS: &'static [&'static str] = &[
        "local",
        "local_device",
        "device_type",
        "provider",
        "device",
        "s3_bucket",
        "s3_folder",
        "simplify_initial",
    ];
}

/// Runs circuits on IBM quantum devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbmqConfig {
    /// The quantum computer or simulator to run on.
    pub backend_name: String,
    /// IBM Quantum service instance.
    pub instance: String,
    /// Service region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Poll and log job progress.
    #[serde(default)]
    pub monitor: bool,
    /// Apply classical postprocessing to results.
    #[serde(default)]
    pub postprocess: bool,
    /// Apply initial-state simplification before submission.
    #[serde(default)]
    pub simplify_initial: bool,
}

impl IbmqConfig {
    /// Configuration for `backend_name` on `instance` with default options.
    pub fn new(backend_name: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            instance: instance.into(),
            region: None,
            monitor: false,
            postprocess: false,
            simplify_initial: false,
        }
    }
}

impl Validate for IbmqConfig {
    fn validate(&self, issues: &mut Issues) {
        if self.backend_name.is_empty() {
            issues.push("backend_name", "must not be empty");
        }
    }
}

impl ConfigRecord for IbmqConfig {
    const KIND: ConfigKind = ConfigKind::Ibmq;
    const FIELDS: &'static [&'static str] = &[
        "backend_name",
        "instance",
        "region",
        "monitor",
        "postprocess",
        "simplify_initial",
    ];
}

/// Hosted simulator using the noise model of a specific IBM device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbmqEmulatorConfig {
    /// The device to emulate.
    pub backend_name: String,
    /// IBM Quantum service instance.
    pub instance: String,
    /// Service region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Simulator seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Apply classical postprocessing to results.
    #[serde(default)]
    pub postprocess: bool,
}

impl Validate for IbmqEmulatorConfig {
    fn validate(&self, issues: &mut Issues) {
        if self.backend_name.is_empty() {
            issues.push("backend_name", "must not be empty");
        }
    }
}

impl ConfigRecord for IbmqEmulatorConfig {
    const KIND: ConfigKind = ConfigKind::IbmqEmulator;
    const FIELDS: &'static [&'static str] =
        &["backend_name", "instance", "region", "seed", "postprocess"];
}
