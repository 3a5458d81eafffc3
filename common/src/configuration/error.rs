// Copyright 2024. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub struct ConfigurationError {
    field: String,
    message: String,
}

impl ConfigurationError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, msg: M) -> Self {
        ConfigurationError {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "Invalid value for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigurationError {}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        use config::ConfigError;
        match err {
            ConfigError::FileParse { uri: Some(uri), cause } => Self::new(uri, cause.to_string()),
            ConfigError::Type { ref key, .. } => Self::new(format!("{:?}", key), err.to_string()),
            ConfigError::NotFound(key) => Self::new(key, "required key not found"),
            x => Self::new("", x.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        Self::new("", err.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn configuration_error() {
        let e = ConfigurationError::new("test", "is a string");
        assert_eq!(e.to_string(), "Invalid value for test: is a string");
        assert_eq!(e.field(), "test");
    }

    #[test]
    fn not_found_names_the_key() {
        let e = ConfigurationError::from(config::ConfigError::NotFound("ledger.tree_height".to_string()));
        assert_eq!(e.to_string(), "Invalid value for ledger.tree_height: required key not found");
    }
}
