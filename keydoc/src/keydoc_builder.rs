use crate::collection::CollectionConfig;
use crate::errors::{KeydocError, KeydocResult};
use crate::keydoc::Keydoc;
use crate::keydoc_config::KeydocConfig;
use crate::store::StoreModule;

/// Builder for opening a [Keydoc] database.
///
/// Configuration errors are captured while building and returned by
/// [open_or_create](KeydocBuilder::open_or_create); the first error wins.
///
/// ```rust
/// use keydoc::collection::CollectionConfig;
/// use keydoc::keydoc::Keydoc;
///
/// let db = Keydoc::builder()
///     .collection("users", CollectionConfig::new("_id"))
///     .open_or_create()
///     .unwrap();
/// assert_eq!(db.collection_names(), vec!["users".to_string()]);
/// ```
#[derive(Default)]
pub struct KeydocBuilder {
    error: Option<KeydocError>,
    config: KeydocConfig,
}

impl KeydocBuilder {
    pub fn new() -> Self {
        KeydocBuilder {
            error: None,
            config: KeydocConfig::new(),
        }
    }

    /// Adds a collection keyed by `config.key()`.
    pub fn collection(mut self, name: &str, config: CollectionConfig) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.add_collection(name, config) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Adds every collection described by a JSON object, e.g.
    /// `{"users": {"key": "_id"}}`.
    pub fn collections_json(mut self, json: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.add_collections_json(json) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the store backend. Without a module the database is in-memory.
    pub fn load_module<T: StoreModule + 'static>(mut self, module: T) -> Self {
        if self.error.is_none() {
            self.config.load_module(module);
        }
        self
    }

    /// Opens the store and one namespace per configured collection.
    pub fn open_or_create(self) -> KeydocResult<Keydoc> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.validate()?;
        Keydoc::open(self.config)
    }
}
