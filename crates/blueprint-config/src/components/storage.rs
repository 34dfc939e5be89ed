// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage configuration data: the root volume, any additional EBS volumes,
//! and instance-store (ephemeral) device mappings.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The EBS volume types an instance volume can use.
///
/// Provisioned IOPS and throughput are only meaningful for a subset of these;
/// see [`VolumeType::supports_iops`] and [`VolumeType::supports_throughput`].
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    /// Previous-generation magnetic storage.
    Standard,

    /// General-purpose SSD, second generation.
    Gp2,

    /// General-purpose SSD with independently provisioned IOPS and
    /// throughput.
    Gp3,

    /// Provisioned-IOPS SSD, first generation.
    Io1,

    /// Provisioned-IOPS SSD, second generation.
    Io2,

    /// Cold HDD.
    Sc1,

    /// Throughput-optimized HDD.
    St1,
}

impl VolumeType {
    /// The token used for this type in rendered configuration text.
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeType::Standard => "standard",
            VolumeType::Gp2 => "gp2",
            VolumeType::Gp3 => "gp3",
            VolumeType::Io1 => "io1",
            VolumeType::Io2 => "io2",
            VolumeType::Sc1 => "sc1",
            VolumeType::St1 => "st1",
        }
    }

    /// Returns true if volumes of this type accept a provisioned IOPS value.
    pub fn supports_iops(&self) -> bool {
        matches!(self, VolumeType::Gp3 | VolumeType::Io1 | VolumeType::Io2)
    }

    /// Returns true if volumes of this type accept a provisioned throughput
    /// value.
    pub fn supports_throughput(&self) -> bool {
        matches!(self, VolumeType::Gp3)
    }
}

/// Attributes common to the root volume and every additional EBS volume.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, JsonSchema)]
pub struct VolumeSpec {
    /// Volume size in GiB. Must be positive.
    pub size: u32,

    /// The EBS volume type.
    pub volume_type: VolumeType,

    /// Provisioned IOPS. Ignored for volume types that don't support it.
    pub iops: Option<u32>,

    /// Provisioned throughput in MiB/s. Ignored for volume types that don't
    /// support it.
    pub throughput: Option<u32>,

    /// Whether the volume is encrypted at rest.
    pub encrypted: bool,

    /// The KMS key to encrypt with. Empty means the account default key;
    /// only meaningful when `encrypted` is set.
    pub kms_key_id: String,

    /// Whether the volume is deleted when the instance terminates.
    pub delete_on_termination: bool,

    /// Tags applied to this volume only (distinct from the instance-wide
    /// `volume_tags` map).
    pub tags: BTreeMap<String, String>,
}

impl Default for VolumeSpec {
    fn default() -> Self {
        Self {
            size: 8,
            volume_type: VolumeType::Gp3,
            iops: None,
            throughput: None,
            encrypted: false,
            kms_key_id: String::new(),
            delete_on_termination: true,
            tags: BTreeMap::new(),
        }
    }
}

/// An additional EBS volume attached alongside the root volume.
///
/// Device names must be unique across the instance's volume list; the editor
/// that constructs updates maintains that invariant.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, JsonSchema)]
pub struct EbsVolume {
    /// The device name slot this volume occupies (e.g. `/dev/sdf`).
    pub device_name: String,

    /// An existing snapshot to create the volume from.
    pub snapshot_id: Option<String>,

    #[serde(flatten)]
    pub spec: VolumeSpec,
}

/// An instance-store (ephemeral) device mapping.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct EphemeralDevice {
    /// The device name slot (e.g. `/dev/sdb`).
    pub device_name: String,

    /// The instance-store volume to map (e.g. `ephemeral0`).
    pub virtual_name: String,

    /// Suppresses the image's own mapping for this device name instead of
    /// attaching a volume.
    pub no_device: bool,
}
