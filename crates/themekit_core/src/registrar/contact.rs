//! User contact-method filter.

use crate::manifest::sections::ContactMethodsSection;
use serde::Serialize;
use std::collections::BTreeMap;

/// Add/remove transformation over a user profile's contact methods.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ContactMethodDelta {
    add: Vec<(String, String)>,
    remove: Vec<String>,
}

impl ContactMethodDelta {
    pub fn new(add: Vec<(String, String)>, remove: Vec<String>) -> Self {
        Self { add, remove }
    }

    pub fn from_section(section: &ContactMethodsSection) -> Self {
        Self::new(section.add.clone(), section.remove.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    pub fn additions(&self) -> &[(String, String)] {
        &self.add
    }

    pub fn removals(&self) -> &[String] {
        &self.remove
    }

    /// Removes every listed id, then inserts every addition.
    ///
    /// An id present in both halves ends up with the added label.
    pub fn apply(&self, mut existing: BTreeMap<String, String>) -> BTreeMap<String, String> {
        for id in &self.remove {
            existing.remove(id);
        }
        for (id, label) in &self.add {
            existing.insert(id.clone(), label.clone());
        }
        existing
    }
}
