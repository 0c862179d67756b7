//! Registry key types.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::registry::error::{RegistryError, RegistryResult};

/// A validated file name. The only rule is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileName(String);

impl FileName {
    pub fn new(name: impl Into<String>) -> RegistryResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// lets `HashMap<FileName, _>` be queried with a plain `&str`
impl Borrow<str> for FileName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
