use serde::{Deserialize, Serialize};

use crate::environment::Variable;

/// A value that is either written into the configuration or read from the environment
/// when the runtime configuration is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Secret {
    Plain(String),
    FromEnvironment {
        variable: Variable,
    },
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl Secret {
    pub fn from_environment(variable: &str) -> Self {
        Self::FromEnvironment {
            variable: variable.into(),
        }
    }
}
