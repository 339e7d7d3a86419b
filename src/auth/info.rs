//! Identity information returned by strategies.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

// == Info ==
/// Identity produced by a successful authentication.
///
/// The cache stores and returns it as-is and never looks inside.
pub trait Info: fmt::Debug + Send + Sync {
    /// Stable identifier of the user
    fn id(&self) -> &str;

    fn user_name(&self) -> &str;

    fn groups(&self) -> &[String] {
        &[]
    }

    fn extensions(&self) -> Option<&HashMap<String, Vec<String>>> {
        None
    }
}

// == Default User ==
/// Plain [`Info`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefaultUser {
    pub name: String,
    pub id: String,
    pub groups: Vec<String>,
    pub extensions: HashMap<String, Vec<String>>,
}

impl DefaultUser {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.extensions.insert(key.into(), values);
        self
    }
}

impl Info for DefaultUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn user_name(&self) -> &str {
        &self.name
    }

    fn groups(&self) -> &[String] {
        &self.groups
    }

    fn extensions(&self) -> Option<&HashMap<String, Vec<String>>> {
        Some(&self.extensions)
    }
}
