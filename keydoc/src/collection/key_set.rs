use crate::errors::KeydocResult;
use crate::store::Namespace;
use std::collections::HashSet;

/// Snapshot of every key stored in a namespace at one point in time.
///
/// The snapshot is built by driving a full key scan to completion; a scan
/// error fails the whole snapshot, partial results are never returned. It is
/// not a live index and goes stale as soon as another write lands.
#[derive(Clone, Debug, Default)]
pub struct KeySet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl KeySet {
    /// Scans `namespace` and materializes its keys in key order.
    pub fn load(namespace: &Namespace) -> KeydocResult<KeySet> {
        let ordered = namespace.keys()?.collect::<KeydocResult<Vec<String>>>()?;
        let members = ordered.iter().cloned().collect();
        Ok(KeySet { ordered, members })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Adds a key to this snapshot only; the store is not touched.
    ///
    /// Returns `false` if the key was already a member.
    pub fn claim(&mut self, key: &str) -> bool {
        if self.members.insert(key.to_string()) {
            self.ordered.push(key.to_string());
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_keys(self) -> Vec<String> {
        self.ordered
    }
}
