// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Renders an [`InstanceConfig`] as one HCL `aws_instance` resource block.
//!
//! [`serialize`] is pure, deterministic, and total: it never fails, even on
//! a config that would not pass validation. Missing optional fields are
//! simply omitted; attributes and nested blocks that equal their implicit
//! defaults are left out so the output stays minimal and diff-friendly.
//!
//! Emission is driven by [`BLOCK_RULES`], an ordered table of
//! (predicate, renderer) pairs. The table order is the output order and is
//! load-bearing: renders of the same config must be byte-identical, and the
//! block sequence mirrors conventional resource layout. Each rule states its
//! own trigger, which is one of:
//!
//! - always (top-level attributes, the root volume),
//! - per element of a stored list (extra volumes, ephemeral devices,
//!   secondary interfaces),
//! - record present at all (credit specification, market options, launch
//!   template),
//! - some field differs from the record's default (CPU options, metadata
//!   options, capacity reservation, enclave, maintenance, private DNS).

use std::collections::BTreeMap;

use blueprint_config::components::advanced::{
    AutoRecovery, MetadataOptions, PrivateDnsNameOptions, ShutdownBehavior,
    Tenancy,
};
use blueprint_config::components::storage::VolumeSpec;
use blueprint_config::InstanceConfig;

mod writer;

use writer::HclWriter;

/// One entry in the emission table.
struct BlockRule {
    /// Stable identifier, for tests that exercise rules one at a time.
    #[allow(dead_code)]
    name: &'static str,

    applies: fn(&InstanceConfig) -> bool,

    render: fn(&mut HclWriter, &InstanceConfig),
}

const BLOCK_RULES: &[BlockRule] = &[
    BlockRule {
        name: "attributes",
        applies: |_| true,
        render: render_attributes,
    },
    BlockRule {
        name: "user_data",
        applies: |c| {
            !c.user_data.script.is_empty() || !c.user_data.base64.is_empty()
        },
        render: render_user_data,
    },
    BlockRule {
        name: "root_block_device",
        applies: |_| true,
        render: render_root_volume,
    },
    BlockRule {
        name: "ebs_block_device",
        applies: |c| !c.extra_volumes.is_empty(),
        render: render_extra_volumes,
    },
    BlockRule {
        name: "ephemeral_block_device",
        applies: |c| !c.ephemeral_devices.is_empty(),
        render: render_ephemeral_devices,
    },
    BlockRule {
        name: "cpu_options",
        applies: |c| c.cpu_options.is_customized(),
        render: render_cpu_options,
    },
    BlockRule {
        name: "credit_specification",
        applies: |c| c.credit_specification.is_some(),
        render: render_credit_specification,
    },
    BlockRule {
        name: "instance_market_options",
        applies: |c| c.market_options.is_some(),
        render: render_market_options,
    },
    BlockRule {
        name: "metadata_options",
        applies: |c| c.metadata_options != MetadataOptions::default(),
        render: render_metadata_options,
    },
    BlockRule {
        name: "capacity_reservation_specification",
        applies: |c| !c.capacity_reservation.is_default(),
        render: render_capacity_reservation,
    },
    BlockRule {
        name: "enclave_options",
        applies: |c| c.enclave_enabled,
        render: render_enclave_options,
    },
    BlockRule {
        name: "maintenance_options",
        applies: |c| c.maintenance_auto_recovery != AutoRecovery::Default,
        render: render_maintenance_options,
    },
    BlockRule {
        name: "private_dns_name_options",
        applies: |c| c.private_dns != PrivateDnsNameOptions::default(),
        render: render_private_dns_options,
    },
    BlockRule {
        name: "launch_template",
        applies: |c| c.launch_template.is_set(),
        render: render_launch_template,
    },
    BlockRule {
        name: "network_interface",
        applies: |c| !c.network_interfaces.is_empty(),
        render: render_network_interfaces,
    },
    BlockRule {
        name: "volume_tags",
        applies: |c| !c.volume_tags.is_empty(),
        render: |w, c| w.attr_map("volume_tags", &c.volume_tags),
    },
    BlockRule {
        name: "tags",
        applies: |c| !effective_tags(c).is_empty(),
        render: |w, c| w.attr_map("tags", &effective_tags(c)),
    },
];

/// Renders the config as declarative text. Always succeeds; callers gate on
/// the validator, not on this function.
pub fn serialize(config: &InstanceConfig) -> String {
    let mut w = HclWriter::new();
    w.open_block(&format!(
        "resource \"aws_instance\" \"{}\"",
        resource_label(&config.name)
    ));
    for rule in BLOCK_RULES {
        if (rule.applies)(config) {
            (rule.render)(&mut w, config);
        }
    }
    w.close_block();
    if config.number_of_instances > 1 {
        w.comment(&format!(
            "{} instances requested; this block describes one. Add a count \
             or for_each argument to create the rest.",
            config.number_of_instances
        ));
    }
    w.finish()
}

/// Derives the resource label from the display name: lowercased, with every
/// character outside `[a-z0-9_]` replaced by `_`. An empty name falls back
/// to `example`.
pub fn resource_label(name: &str) -> String {
    if name.is_empty() {
        return "example".to_string();
    }
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// The tag map as rendered: the stored free-form tags with the reserved
/// `Name` key layered on top when the display name is non-empty. A derived
/// view; the stored map is never touched.
pub fn effective_tags(config: &InstanceConfig) -> BTreeMap<String, String> {
    let mut tags = config.tags.clone();
    if !config.name.is_empty() {
        tags.insert("Name".to_string(), config.name.clone());
    }
    tags
}

fn enabled_str(value: bool) -> &'static str {
    if value {
        "enabled"
    } else {
        "disabled"
    }
}

/// Top-level scalar attributes, in fixed order, each emitted only when it
/// differs from its implicit default. `vpc_id` and the display metadata are
/// editor-side only and never appear here.
fn render_attributes(w: &mut HclWriter, c: &InstanceConfig) {
    if !c.image_id.is_empty() {
        w.attr_str("ami", &c.image_id);
    }
    if !c.instance_type.is_empty() {
        w.attr_str("instance_type", &c.instance_type);
    }
    if !c.key_name.is_empty() {
        w.attr_str("key_name", &c.key_name);
    }
    if !c.subnet_id.is_empty() {
        w.attr_str("subnet_id", &c.subnet_id);
    }
    if !c.availability_zone.is_empty() {
        w.attr_str("availability_zone", &c.availability_zone);
    }
    if let Some(associate) = c.associate_public_ip.as_bool() {
        w.attr_bool("associate_public_ip_address", associate);
    }
    if !c.security_group_ids.is_empty() {
        w.attr_list("vpc_security_group_ids", &c.security_group_ids);
    }
    if let Some(ip) = &c.private_ip {
        if !ip.is_empty() {
            w.attr_str("private_ip", ip);
        }
    }
    if !c.iam_instance_profile.is_empty() {
        w.attr_str("iam_instance_profile", &c.iam_instance_profile);
    }
    if c.monitoring {
        w.attr_bool("monitoring", true);
    }
    if c.ebs_optimized {
        w.attr_bool("ebs_optimized", true);
    }
    if c.disable_api_termination {
        w.attr_bool("disable_api_termination", true);
    }
    if c.disable_api_stop {
        w.attr_bool("disable_api_stop", true);
    }
    if c.shutdown_behavior != ShutdownBehavior::Stop {
        w.attr_str(
            "instance_initiated_shutdown_behavior",
            c.shutdown_behavior.as_str(),
        );
    }
    if c.hibernation {
        w.attr_bool("hibernation", true);
    }
    if c.force_destroy {
        w.attr_bool("force_destroy", true);
    }
    // The attribute's own default is true, so it renders exactly when
    // disabled.
    if !c.source_dest_check {
        w.attr_bool("source_dest_check", false);
    }
    if c.tenancy != Tenancy::Shared {
        w.attr_str("tenancy", c.tenancy.as_str());
        if c.tenancy == Tenancy::Host {
            if !c.host_id.is_empty() {
                w.attr_str("host_id", &c.host_id);
            }
            if !c.host_resource_group_arn.is_empty() {
                w.attr_str(
                    "host_resource_group_arn",
                    &c.host_resource_group_arn,
                );
            }
        }
    }
    if !c.placement_group.is_empty() {
        w.attr_str("placement_group", &c.placement_group);
        if let Some(partition) = c.placement_partition_number {
            w.attr_int("placement_partition_number", partition.into());
        }
    }
    if c.ipv6_address_count > 0 {
        w.attr_int("ipv6_address_count", c.ipv6_address_count.into());
    }
    if c.enable_primary_ipv6 {
        w.attr_bool("enable_primary_ipv6", true);
    }
    if c.get_password_data {
        w.attr_bool("get_password_data", true);
    }
}

/// The two user-data forms are mutually exclusive in the output regardless
/// of what the config holds: a plain script wins over a base64 override.
fn render_user_data(w: &mut HclWriter, c: &InstanceConfig) {
    if !c.user_data.script.is_empty() {
        w.attr_heredoc("user_data", &c.user_data.script);
        if c.user_data.replace_on_change {
            w.attr_bool("user_data_replace_on_change", true);
        }
    } else {
        w.attr_str("user_data_base64", &c.user_data.base64);
    }
}

fn render_volume_body(w: &mut HclWriter, spec: &VolumeSpec) {
    w.attr_str("volume_type", spec.volume_type.as_str());
    w.attr_int("volume_size", spec.size.into());
    // IOPS and throughput are silently dropped for types that don't take
    // them, whatever the record holds.
    if spec.volume_type.supports_iops() {
        if let Some(iops) = spec.iops {
            w.attr_int("iops", iops.into());
        }
    }
    if spec.volume_type.supports_throughput() {
        if let Some(throughput) = spec.throughput {
            w.attr_int("throughput", throughput.into());
        }
    }
    w.attr_bool("encrypted", spec.encrypted);
    if !spec.kms_key_id.is_empty() {
        w.attr_str("kms_key_id", &spec.kms_key_id);
    }
    w.attr_bool("delete_on_termination", spec.delete_on_termination);
    if !spec.tags.is_empty() {
        w.attr_map("tags", &spec.tags);
    }
}

fn render_root_volume(w: &mut HclWriter, c: &InstanceConfig) {
    w.open_block("root_block_device");
    render_volume_body(w, &c.root_volume);
    w.close_block();
}

fn render_extra_volumes(w: &mut HclWriter, c: &InstanceConfig) {
    for volume in &c.extra_volumes {
        w.open_block("ebs_block_device");
        w.attr_str("device_name", &volume.device_name);
        if let Some(snapshot) = &volume.snapshot_id {
            if !snapshot.is_empty() {
                w.attr_str("snapshot_id", snapshot);
            }
        }
        render_volume_body(w, &volume.spec);
        w.close_block();
    }
}

fn render_ephemeral_devices(w: &mut HclWriter, c: &InstanceConfig) {
    for device in &c.ephemeral_devices {
        w.open_block("ephemeral_block_device");
        w.attr_str("device_name", &device.device_name);
        if !device.virtual_name.is_empty() {
            w.attr_str("virtual_name", &device.virtual_name);
        }
        if device.no_device {
            w.attr_bool("no_device", true);
        }
        w.close_block();
    }
}

fn render_cpu_options(w: &mut HclWriter, c: &InstanceConfig) {
    w.open_block("cpu_options");
    if let Some(cores) = c.cpu_options.core_count {
        w.attr_int("core_count", cores.into());
    }
    if let Some(threads) = c.cpu_options.threads_per_core {
        w.attr_int("threads_per_core", threads.into());
    }
    if c.cpu_options.amd_sev_snp {
        w.attr_str("amd_sev_snp", "enabled");
    }
    if c.cpu_options.intel_sgx {
        w.attr_str("intel_sgx", "enabled");
    }
    w.close_block();
}

fn render_credit_specification(w: &mut HclWriter, c: &InstanceConfig) {
    if let Some(credit) = &c.credit_specification {
        w.open_block("credit_specification");
        w.attr_str("cpu_credits", credit.cpu_credits.as_str());
        w.close_block();
    }
}

fn render_market_options(w: &mut HclWriter, c: &InstanceConfig) {
    if let Some(market) = &c.market_options {
        w.open_block("instance_market_options");
        w.attr_str("market_type", market.market_type.as_str());
        if let Some(spot) = &market.spot_options {
            w.open_block("spot_options");
            w.attr_str(
                "spot_instance_type",
                spot.spot_instance_type.as_str(),
            );
            w.attr_str(
                "instance_interruption_behavior",
                spot.instance_interruption_behavior.as_str(),
            );
            if !spot.max_price.is_empty() {
                w.attr_str("max_price", &spot.max_price);
            }
            if !spot.valid_until.is_empty() {
                w.attr_str("valid_until", &spot.valid_until);
            }
            w.close_block();
        }
        w.close_block();
    }
}

/// Unlike the other differs-from-default blocks, every field is written once
/// the block renders at all, so the text reads as a complete policy.
fn render_metadata_options(w: &mut HclWriter, c: &InstanceConfig) {
    let m = &c.metadata_options;
    w.open_block("metadata_options");
    w.attr_str("http_tokens", m.http_tokens.as_str());
    w.attr_str("http_endpoint", enabled_str(m.http_endpoint_enabled));
    w.attr_int(
        "http_put_response_hop_limit",
        m.http_put_response_hop_limit.into(),
    );
    w.attr_str(
        "instance_metadata_tags",
        enabled_str(m.instance_metadata_tags_enabled),
    );
    w.attr_str(
        "http_protocol_ipv6",
        enabled_str(m.http_protocol_ipv6_enabled),
    );
    w.close_block();
}

fn render_capacity_reservation(w: &mut HclWriter, c: &InstanceConfig) {
    w.open_block("capacity_reservation_specification");
    if !c.capacity_reservation.target_id.is_empty() {
        w.open_block("capacity_reservation_target");
        w.attr_str(
            "capacity_reservation_id",
            &c.capacity_reservation.target_id,
        );
        w.close_block();
    } else {
        // The rule only fires for an explicit "none"; the "open" default
        // with no target says nothing at all.
        w.attr_str("capacity_reservation_preference", "none");
    }
    w.close_block();
}

fn render_enclave_options(w: &mut HclWriter, _c: &InstanceConfig) {
    w.open_block("enclave_options");
    w.attr_bool("enabled", true);
    w.close_block();
}

fn render_maintenance_options(w: &mut HclWriter, c: &InstanceConfig) {
    w.open_block("maintenance_options");
    w.attr_str("auto_recovery", c.maintenance_auto_recovery.as_str());
    w.close_block();
}

fn render_private_dns_options(w: &mut HclWriter, c: &InstanceConfig) {
    w.open_block("private_dns_name_options");
    w.attr_str("hostname_type", c.private_dns.hostname_type.as_str());
    w.attr_bool(
        "enable_resource_name_dns_a_record",
        c.private_dns.enable_a_record,
    );
    w.attr_bool(
        "enable_resource_name_dns_aaaa_record",
        c.private_dns.enable_aaaa_record,
    );
    w.close_block();
}

fn render_launch_template(w: &mut HclWriter, c: &InstanceConfig) {
    let template = &c.launch_template;
    w.open_block("launch_template");
    // ID and name are mutually exclusive; the ID wins when both are set.
    if !template.id.is_empty() {
        w.attr_str("id", &template.id);
    } else {
        w.attr_str("name", &template.name);
    }
    if !template.version.is_empty() {
        w.attr_str("version", &template.version);
    }
    w.close_block();
}

fn render_network_interfaces(w: &mut HclWriter, c: &InstanceConfig) {
    for interface in &c.network_interfaces {
        w.open_block("network_interface");
        w.attr_str(
            "network_interface_id",
            &interface.network_interface_id,
        );
        w.attr_int("device_index", interface.device_index.into());
        if interface.delete_on_termination {
            w.attr_bool("delete_on_termination", true);
        }
        w.close_block();
    }
}
