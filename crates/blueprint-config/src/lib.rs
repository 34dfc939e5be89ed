// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The configuration model for a single compute-instance resource.
//!
//! An [`InstanceConfig`] is created fresh per editing session by [`build`],
//! which merges the fixed defaults, an optional seed name from the canvas,
//! and an optional partial override. Edits flow through [`apply`] as
//! [`ConfigPatch`] records: a shallow, top-level-only merge in which nested
//! records are replaced wholesale. A caller changing one field of a nested
//! record supplies the entire record with that field changed; there is no
//! deep merge.
//!
//! Everything here is pure and total: merging never fails, and updates
//! return new records rather than mutating in place.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

pub mod components;
pub mod validate;

pub use validate::{validate, ValidationError};

use components::advanced::{
    AutoRecovery, CapacityReservation, CpuOptions, CreditSpecification,
    LaunchTemplate, MarketOptions, MetadataOptions, PrivateDnsNameOptions,
    ShutdownBehavior, Tenancy, UserData,
};
use components::network::{NetworkInterfaceAttachment, PublicIpAssociation};
use components::storage::{EbsVolume, EphemeralDevice, VolumeSpec};

/// Properties of the selected machine image, resolved by the image picker.
/// Used only to filter compatible instance types; never rendered.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct ImageMetadata {
    pub platform: String,
    pub architecture: String,
}

/// Properties of the selected instance type, resolved by the size picker.
/// Display-only; never rendered.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, JsonSchema, Default,
)]
pub struct InstanceTypeMetadata {
    pub vcpus: u32,
    pub memory_gib: f64,
    pub hourly_price: f64,
}

/// The full description of one compute-instance resource being edited.
///
/// Deserialization fills absent fields from [`InstanceConfig::default`], so
/// documents saved by older editor versions keep loading as fields are
/// added.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, JsonSchema)]
#[serde(default)]
pub struct InstanceConfig {
    /// Display label for the resource. When non-empty it is also injected
    /// into the rendered tag map under the reserved `Name` key.
    pub name: String,

    /// How many copies of this instance the user asked for. The rendered
    /// text describes one; multiplicity is the caller's problem.
    pub number_of_instances: u32,

    /// The machine image to boot from.
    pub image_id: String,

    pub image_metadata: ImageMetadata,

    /// The instance size identifier (e.g. `m5.large`).
    pub instance_type: String,

    pub type_metadata: InstanceTypeMetadata,

    /// SSH key pair name. Empty means no key.
    pub key_name: String,

    /// The VPC the subnet picker filters by. Not itself rendered; the
    /// attachment is expressed through `subnet_id`.
    pub vpc_id: String,

    /// Target subnet. Empty means the provider's default.
    pub subnet_id: String,

    /// Target availability zone. Empty means unspecified.
    pub availability_zone: String,

    pub associate_public_ip: PublicIpAssociation,

    /// Security groups in attachment order. Duplicates are allowed and
    /// preserved.
    pub security_group_ids: Vec<String>,

    /// A fixed private IPv4 address on the primary interface.
    pub private_ip: Option<String>,

    /// The boot volume. Exactly one, always present.
    pub root_volume: VolumeSpec,

    /// Additional EBS volumes in attachment order, each on a distinct
    /// device name.
    pub extra_volumes: Vec<EbsVolume>,

    /// Instance-store device mappings in stored order.
    pub ephemeral_devices: Vec<EphemeralDevice>,

    /// IAM instance profile name. Empty means none.
    pub iam_instance_profile: String,

    /// Detailed CloudWatch monitoring.
    pub monitoring: bool,

    pub ebs_optimized: bool,

    pub tenancy: Tenancy,

    /// Dedicated host to place on; only meaningful under host tenancy.
    pub host_id: String,

    /// Host resource group ARN; only meaningful under host tenancy.
    pub host_resource_group_arn: String,

    /// Placement group name. Empty means none.
    pub placement_group: String,

    /// Partition within the placement group; only meaningful when the
    /// group's strategy is `partition`.
    pub placement_partition_number: Option<u32>,

    pub cpu_options: CpuOptions,

    /// Present only when the user explicitly chose a credit mode for a
    /// burstable instance family.
    pub credit_specification: Option<CreditSpecification>,

    /// Present only when the user opted into spot purchasing.
    pub market_options: Option<MarketOptions>,

    pub metadata_options: MetadataOptions,

    pub capacity_reservation: CapacityReservation,

    /// Run the instance in a Nitro enclave.
    pub enclave_enabled: bool,

    pub maintenance_auto_recovery: AutoRecovery,

    pub private_dns: PrivateDnsNameOptions,

    pub launch_template: LaunchTemplate,

    /// Secondary interface attachments in stored order.
    pub network_interfaces: Vec<NetworkInterfaceAttachment>,

    /// Free-form resource tags. The reserved `Name` key is layered on top of
    /// this map at render time; the stored map itself is never mutated.
    pub tags: BTreeMap<String, String>,

    /// Tags applied to all EBS volumes collectively, distinct from each
    /// volume's own tag map.
    pub volume_tags: BTreeMap<String, String>,

    pub shutdown_behavior: ShutdownBehavior,

    /// Termination protection.
    pub disable_api_termination: bool,

    /// Stop protection.
    pub disable_api_stop: bool,

    pub hibernation: bool,

    pub force_destroy: bool,

    /// Source/destination checking on the primary interface. Defaults to
    /// on; renders exactly when disabled.
    pub source_dest_check: bool,

    /// IPv6 addresses to assign on the primary interface.
    pub ipv6_address_count: u32,

    pub enable_primary_ipv6: bool,

    /// Fetch the Windows administrator password after launch.
    pub get_password_data: bool,

    pub user_data: UserData,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            number_of_instances: 1,
            image_id: String::new(),
            image_metadata: ImageMetadata::default(),
            instance_type: String::new(),
            type_metadata: InstanceTypeMetadata::default(),
            key_name: String::new(),
            vpc_id: String::new(),
            subnet_id: String::new(),
            availability_zone: String::new(),
            associate_public_ip: PublicIpAssociation::Inherit,
            security_group_ids: Vec::new(),
            private_ip: None,
            root_volume: VolumeSpec::default(),
            extra_volumes: Vec::new(),
            ephemeral_devices: Vec::new(),
            iam_instance_profile: String::new(),
            monitoring: false,
            ebs_optimized: false,
            tenancy: Tenancy::Shared,
            host_id: String::new(),
            host_resource_group_arn: String::new(),
            placement_group: String::new(),
            placement_partition_number: None,
            cpu_options: CpuOptions::default(),
            credit_specification: None,
            market_options: None,
            metadata_options: MetadataOptions::default(),
            capacity_reservation: CapacityReservation::default(),
            enclave_enabled: false,
            maintenance_auto_recovery: AutoRecovery::Default,
            private_dns: PrivateDnsNameOptions::default(),
            launch_template: LaunchTemplate::default(),
            network_interfaces: Vec::new(),
            tags: BTreeMap::new(),
            volume_tags: BTreeMap::new(),
            shutdown_behavior: ShutdownBehavior::Stop,
            disable_api_termination: false,
            disable_api_stop: false,
            hibernation: false,
            force_destroy: false,
            source_dest_check: true,
            ipv6_address_count: 0,
            enable_primary_ipv6: false,
            get_password_data: false,
            user_data: UserData::default(),
        }
    }
}

/// Deserializes a patch field so that an explicit `null` becomes
/// `Some(None)` ("clear the field") while an absent key stays `None`
/// ("leave the field alone").
fn patch_set<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A partial update to an [`InstanceConfig`].
///
/// One `Option` per top-level field: `None` leaves the current value alone,
/// `Some(v)` replaces it wholesale. Fields that are themselves optional on
/// the config use a second `Option` layer so a patch can distinguish
/// "leave alone" (`None`), "clear" (`Some(None)`), and "set"
/// (`Some(Some(v))`).
///
/// Nested records are replaced as units. There is deliberately no way to
/// express "change the root volume's size but keep its other fields": the
/// caller reads the current record, modifies it, and patches the whole
/// thing back. This keeps sibling fields from being dropped silently.
#[derive(Clone, Deserialize, Serialize, Debug, Default)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_metadata: Option<ImageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_metadata: Option<InstanceTypeMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associate_public_ip: Option<PublicIpAssociation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "patch_set"
    )]
    pub private_ip: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_volume: Option<VolumeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_volumes: Option<Vec<EbsVolume>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral_devices: Option<Vec<EphemeralDevice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebs_optimized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<Tenancy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_resource_group_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_group: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "patch_set"
    )]
    pub placement_partition_number: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_options: Option<CpuOptions>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "patch_set"
    )]
    pub credit_specification: Option<Option<CreditSpecification>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "patch_set"
    )]
    pub market_options: Option<Option<MarketOptions>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_options: Option<MetadataOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_reservation: Option<CapacityReservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclave_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_auto_recovery: Option<AutoRecovery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_dns: Option<PrivateDnsNameOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_template: Option<LaunchTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_interfaces: Option<Vec<NetworkInterfaceAttachment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_behavior: Option<ShutdownBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_api_termination: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_api_stop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hibernation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_destroy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dest_check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_primary_ipv6: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_password_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<UserData>,
}

macro_rules! merge_fields {
    ($next:ident, $patch:ident, { $($field:ident),* $(,)? }) => {
        $(
            if let Some(value) = $patch.$field {
                $next.$field = value;
            }
        )*
    };
}

/// Produces a complete config for a new editing session: fixed defaults,
/// then the seed name from the canvas node (if any), then the caller's
/// overrides (if any, e.g. when re-opening a previously saved resource).
/// Later layers win per top-level field.
pub fn build(
    seed_name: Option<&str>,
    overrides: Option<ConfigPatch>,
) -> InstanceConfig {
    let mut config = InstanceConfig::default();
    if let Some(seed) = seed_name {
        config.name = seed.to_string();
    }
    match overrides {
        Some(patch) => apply(&config, patch),
        None => config,
    }
}

/// Shallow-merges a patch into a config, returning a new record. Top-level
/// fields only; nested records in the patch replace their counterparts
/// wholesale.
pub fn apply(current: &InstanceConfig, patch: ConfigPatch) -> InstanceConfig {
    let mut next = current.clone();
    merge_fields!(next, patch, {
        name,
        number_of_instances,
        image_id,
        image_metadata,
        instance_type,
        type_metadata,
        key_name,
        vpc_id,
        subnet_id,
        availability_zone,
        associate_public_ip,
        security_group_ids,
        private_ip,
        root_volume,
        extra_volumes,
        ephemeral_devices,
        iam_instance_profile,
        monitoring,
        ebs_optimized,
        tenancy,
        host_id,
        host_resource_group_arn,
        placement_group,
        placement_partition_number,
        cpu_options,
        credit_specification,
        market_options,
        metadata_options,
        capacity_reservation,
        enclave_enabled,
        maintenance_auto_recovery,
        private_dns,
        launch_template,
        network_interfaces,
        tags,
        volume_tags,
        shutdown_behavior,
        disable_api_termination,
        disable_api_stop,
        hibernation,
        force_destroy,
        source_dest_check,
        ipv6_address_count,
        enable_primary_ipv6,
        get_password_data,
        user_data,
    });
    next
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::components::storage::VolumeType;

    #[test]
    fn defaults_are_the_documented_baseline() {
        let config = InstanceConfig::default();
        assert_eq!(config.number_of_instances, 1);
        assert!(config.source_dest_check);
        assert_eq!(config.root_volume.size, 8);
        assert_eq!(config.root_volume.volume_type, VolumeType::Gp3);
        assert!(config.root_volume.delete_on_termination);
        assert_eq!(
            config.associate_public_ip.as_bool(),
            None,
            "public-IP association must default to the tri-state inherit"
        );
        assert_eq!(config.metadata_options.http_put_response_hop_limit, 2);
        assert!(config.credit_specification.is_none());
        assert!(config.market_options.is_none());
    }

    #[test]
    fn build_layers_seed_name_then_overrides() {
        let config = build(Some("web-1"), None);
        assert_eq!(config.name, "web-1");

        let patch = ConfigPatch {
            name: Some("web-2".to_string()),
            instance_type: Some("m5.large".to_string()),
            ..Default::default()
        };
        let config = build(Some("web-1"), Some(patch));
        assert_eq!(config.name, "web-2", "override wins over seed name");
        assert_eq!(config.instance_type, "m5.large");
        assert_eq!(config.number_of_instances, 1, "defaults survive the merge");
    }

    #[test]
    fn apply_replaces_nested_records_wholesale() {
        let mut base = InstanceConfig::default();
        base.root_volume.encrypted = true;
        base.root_volume.kms_key_id = "key-1".to_string();

        let patch = ConfigPatch {
            root_volume: Some(VolumeSpec {
                size: 100,
                ..Default::default()
            }),
            ..Default::default()
        };
        let next = apply(&base, patch);
        assert_eq!(next.root_volume.size, 100);
        assert!(
            !next.root_volume.encrypted,
            "a nested record in the patch replaces the whole record; \
             siblings are not preserved"
        );
        assert_eq!(base.root_volume.kms_key_id, "key-1", "input not mutated");
    }

    #[test]
    fn apply_distinguishes_clear_from_leave_alone() {
        let base = apply(
            &InstanceConfig::default(),
            ConfigPatch {
                private_ip: Some(Some("10.0.0.5".to_string())),
                ..Default::default()
            },
        );
        assert_eq!(base.private_ip.as_deref(), Some("10.0.0.5"));

        let untouched = apply(&base, ConfigPatch::default());
        assert_eq!(untouched.private_ip.as_deref(), Some("10.0.0.5"));

        let cleared = apply(
            &base,
            ConfigPatch { private_ip: Some(None), ..Default::default() },
        );
        assert_eq!(cleared.private_ip, None);
    }

    #[test]
    fn patch_json_null_clears_but_absence_does_not() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"name": "db-1", "private_ip": null}"#)
                .unwrap();
        assert_eq!(patch.name.as_deref(), Some("db-1"));
        assert_eq!(patch.private_ip, Some(None));

        let patch: ConfigPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(patch.private_ip, None);
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = build(Some("api-server"), None);
        config.image_id = "ami-0abc".to_string();
        config.security_group_ids =
            vec!["sg-1".to_string(), "sg-1".to_string(), "sg-2".to_string()];
        config.extra_volumes.push(EbsVolume {
            device_name: "/dev/sdf".to_string(),
            snapshot_id: Some("snap-1".to_string()),
            spec: VolumeSpec { size: 200, ..Default::default() },
        });
        config.tags.insert("owner".to_string(), "alice".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let restored: InstanceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
        assert_eq!(
            restored.security_group_ids,
            vec!["sg-1", "sg-1", "sg-2"],
            "duplicate security groups are preserved, not deduplicated"
        );
    }
}
