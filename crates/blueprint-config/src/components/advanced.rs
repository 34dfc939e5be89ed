// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Advanced instance settings. Every record here defaults to "not set": a
//! sub-record whose fields all equal their defaults must not appear in
//! rendered configuration text at all.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overrides for the instance's CPU shape.
///
/// Considered "customized" (and therefore rendered) only when a core count is
/// set, threads-per-core is explicitly 1, or a vendor feature flag is
/// enabled. Threads-per-core left at the platform default of 2 does not by
/// itself trigger rendering.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
pub struct CpuOptions {
    /// The number of physical cores to enable.
    pub core_count: Option<u32>,

    /// Threads per core; 1 disables hyperthreading.
    pub threads_per_core: Option<u32>,

    /// Enable AMD SEV-SNP memory encryption.
    pub amd_sev_snp: bool,

    /// Enable Intel SGX enclaves.
    pub intel_sgx: bool,
}

impl CpuOptions {
    pub fn is_customized(&self) -> bool {
        self.core_count.is_some()
            || self.threads_per_core == Some(1)
            || self.amd_sev_snp
            || self.intel_sgx
    }
}

/// The credit mode for burstable instance families.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum CpuCredits {
    #[default]
    Standard,
    Unlimited,
}

impl CpuCredits {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpuCredits::Standard => "standard",
            CpuCredits::Unlimited => "unlimited",
        }
    }
}

/// An explicit credit-mode choice for a burstable instance.
///
/// The record's presence on the config means "the user chose a mode"; its
/// absence means "let the platform decide". Presence alone triggers
/// rendering, regardless of the chosen value.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
pub struct CreditSpecification {
    pub cpu_credits: CpuCredits,
}

/// The purchasing market for the instance.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum MarketType {
    #[default]
    Spot,
    OnDemand,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Spot => "spot",
            MarketType::OnDemand => "on-demand",
        }
    }
}

/// How a spot request behaves.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum SpotInstanceType {
    #[default]
    OneTime,
    Persistent,
}

impl SpotInstanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotInstanceType::OneTime => "one-time",
            SpotInstanceType::Persistent => "persistent",
        }
    }
}

/// What happens to a spot instance when capacity is reclaimed.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum InterruptionBehavior {
    Hibernate,
    Stop,
    #[default]
    Terminate,
}

impl InterruptionBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterruptionBehavior::Hibernate => "hibernate",
            InterruptionBehavior::Stop => "stop",
            InterruptionBehavior::Terminate => "terminate",
        }
    }
}

/// Spot request parameters. Type and interruption behavior always render;
/// max price and valid-until render only when set.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct SpotOptions {
    pub spot_instance_type: SpotInstanceType,

    pub instance_interruption_behavior: InterruptionBehavior,

    /// Maximum hourly price, as a decimal string. Empty means the on-demand
    /// price caps the bid.
    pub max_price: String,

    /// RFC 3339 end time for a persistent request. Empty means no end time.
    pub valid_until: String,
}

/// Purchasing-market options. Absent from the config means "on-demand, say
/// nothing"; present means the block renders.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct MarketOptions {
    pub market_type: MarketType,

    pub spot_options: Option<SpotOptions>,
}

/// Whether IMDS requires session tokens.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpTokens {
    #[default]
    Required,
    Optional,
}

impl HttpTokens {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpTokens::Required => "required",
            HttpTokens::Optional => "optional",
        }
    }
}

/// Instance metadata service policy.
///
/// Renders only when some field differs from the defaults below, but when it
/// renders, every field is written out so the resulting text reads as a
/// complete policy.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
)]
pub struct MetadataOptions {
    pub http_tokens: HttpTokens,

    /// Whether the metadata endpoint is reachable at all.
    pub http_endpoint_enabled: bool,

    /// TTL for metadata responses; raise past 1 to let containers reach IMDS.
    pub http_put_response_hop_limit: u32,

    /// Expose the instance's tags through the metadata service.
    pub instance_metadata_tags_enabled: bool,

    /// Serve the metadata endpoint over IPv6 as well.
    pub http_protocol_ipv6_enabled: bool,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            http_tokens: HttpTokens::Required,
            http_endpoint_enabled: true,
            http_put_response_hop_limit: 2,
            instance_metadata_tags_enabled: false,
            http_protocol_ipv6_enabled: false,
        }
    }
}

/// Capacity-reservation preference.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPreference {
    /// Run in any open reservation that matches. This is the platform
    /// default, so it renders nothing on its own.
    #[default]
    Open,

    /// Never consume a reservation.
    None,
}

/// Capacity-reservation targeting. Renders only when the preference is
/// explicitly `none` or a specific reservation is targeted.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct CapacityReservation {
    pub preference: CapacityPreference,

    /// A specific reservation to target (e.g. `cr-0abc`). Empty means none.
    pub target_id: String,
}

impl CapacityReservation {
    pub fn is_default(&self) -> bool {
        self.preference == CapacityPreference::Open && self.target_id.is_empty()
    }
}

/// Automatic recovery behavior for the instance.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum AutoRecovery {
    #[default]
    Default,
    Disabled,
}

impl AutoRecovery {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoRecovery::Default => "default",
            AutoRecovery::Disabled => "disabled",
        }
    }
}

/// The hostname form used for the instance's private DNS name.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum HostnameType {
    /// Hostname derived from the private IPv4 address.
    #[default]
    IpName,

    /// Hostname derived from the instance ID.
    ResourceName,
}

impl HostnameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostnameType::IpName => "ip-name",
            HostnameType::ResourceName => "resource-name",
        }
    }
}

/// Private DNS name settings.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
pub struct PrivateDnsNameOptions {
    pub hostname_type: HostnameType,

    /// Respond to DNS A queries for the resource-based name.
    pub enable_a_record: bool,

    /// Respond to DNS AAAA queries for the resource-based name.
    pub enable_aaaa_record: bool,
}

/// A reference to a launch template to base the instance on.
///
/// ID and name are mutually exclusive; when both are set the ID wins.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct LaunchTemplate {
    /// The template ID (e.g. `lt-0abc`). Empty means unset.
    pub id: String,

    /// The template name. Empty means unset.
    pub name: String,

    /// The template version to use. Empty means the template's default
    /// version.
    pub version: String,
}

impl LaunchTemplate {
    pub fn is_set(&self) -> bool {
        !self.id.is_empty() || !self.name.is_empty()
    }
}

/// Where the instance runs relative to other tenants' hardware.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Tenancy {
    #[default]
    Shared,
    Dedicated,

    /// Requires a host ID; a host resource group may also be named.
    Host,
}

impl Tenancy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tenancy::Shared => "default",
            Tenancy::Dedicated => "dedicated",
            Tenancy::Host => "host",
        }
    }
}

/// What an OS-initiated shutdown does to the instance.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownBehavior {
    #[default]
    Stop,
    Terminate,
}

impl ShutdownBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownBehavior::Stop => "stop",
            ShutdownBehavior::Terminate => "terminate",
        }
    }
}

/// Boot-time script configuration.
///
/// The plain script and the base64 override are mutually exclusive in effect:
/// when both are set, only the plain script renders.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct UserData {
    /// A plain, possibly multi-line script. Rendered as a block literal.
    pub script: String,

    /// A pre-encoded base64 payload. Rendered as a quoted scalar.
    pub base64: String,

    /// Replace the instance (rather than rebooting it) when the script
    /// changes.
    pub replace_on_change: bool,
}
