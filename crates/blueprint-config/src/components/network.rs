// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network attachment data: public-IP association and secondary interface
//! attachments. The primary attachment (VPC, subnet, security groups) lives
//! directly on [`crate::InstanceConfig`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether the instance receives a public IP address on its primary
/// interface.
///
/// This is a tri-state, not a boolean: `Inherit` means the subnet's own
/// default applies and the attribute is left out of rendered text entirely.
#[derive(
    Clone, Copy, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema,
    Default,
)]
#[serde(rename_all = "snake_case")]
pub enum PublicIpAssociation {
    /// Follow the subnet's auto-assign setting.
    #[default]
    Inherit,

    /// Always assign a public IP.
    Enabled,

    /// Never assign a public IP.
    Disabled,
}

impl PublicIpAssociation {
    /// The explicit boolean value, or `None` when the subnet default applies.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PublicIpAssociation::Inherit => None,
            PublicIpAssociation::Enabled => Some(true),
            PublicIpAssociation::Disabled => Some(false),
        }
    }
}

/// A secondary network interface attached to the instance.
#[derive(
    Clone, Deserialize, Serialize, Debug, PartialEq, Eq, JsonSchema, Default,
)]
pub struct NetworkInterfaceAttachment {
    /// The existing interface to attach (e.g. `eni-0abc`).
    pub network_interface_id: String,

    /// The attachment slot; the primary interface occupies index 0.
    pub device_index: u32,

    /// Whether the attachment is deleted when the instance terminates.
    pub delete_on_termination: bool,
}
