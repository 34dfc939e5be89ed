// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pre-save validation. A non-empty result is the caller's signal to block
//! saving or rendering; nothing here is ever thrown.

use thiserror::Error;

use crate::InstanceConfig;

/// A user-facing validation failure. The `Display` strings are shown inline
/// next to the offending field by the editor.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Instance name is required")]
    MissingName,

    #[error("A machine image must be selected")]
    MissingImage,

    #[error("An instance type must be selected")]
    MissingInstanceType,
}

/// Checks the fields a config must have before it can be saved or rendered.
///
/// Structural invariants (device-name uniqueness across extra volumes, host
/// ID under host tenancy) are maintained by the editor that constructs
/// updates and are not re-checked here.
pub fn validate(config: &InstanceConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.name.trim().is_empty() {
        errors.push(ValidationError::MissingName);
    }
    if config.image_id.is_empty() {
        errors.push(ValidationError::MissingImage);
    }
    if config.instance_type.is_empty() {
        errors.push(ValidationError::MissingInstanceType);
    }
    errors
}

/// [`validate`], rendered to plain strings for callers that surface the
/// errors directly.
pub fn validate_messages(config: &InstanceConfig) -> Vec<String> {
    validate(config).iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::build;

    fn valid_config() -> InstanceConfig {
        let mut config = build(Some("db-1"), None);
        config.image_id = "ami-0abc".to_string();
        config.instance_type = "m5.large".to_string();
        config
    }

    #[test]
    fn complete_config_passes() {
        assert_eq!(validate(&valid_config()), Vec::new());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut config = valid_config();
        config.name = String::new();
        assert_eq!(validate(&config), vec![ValidationError::MissingName]);

        config.name = "   ".to_string();
        assert_eq!(
            validate(&config),
            vec![ValidationError::MissingName],
            "whitespace-only names are rejected"
        );
    }

    #[test]
    fn fresh_config_reports_every_missing_field() {
        let errors = validate(&build(None, None));
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingName,
                ValidationError::MissingImage,
                ValidationError::MissingInstanceType,
            ]
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let messages = validate_messages(&build(None, None));
        assert!(messages.iter().any(|m| m.contains("name")));
    }
}
