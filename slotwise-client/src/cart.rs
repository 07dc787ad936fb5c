//! Local cart cache
//!
//! Process-scoped keyed store for cart contents: initialized from persisted
//! storage, written on every mutation, cleared on checkout or an explicit
//! clear. Storage access goes through the [`StorageBackend`] capability so
//! tests can substitute an in-memory double. Malformed cached JSON degrades
//! to an empty cart, never a crash.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shared::{CartLine, Product};

/// Keyed string storage capability
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<S: StorageBackend + ?Sized> StorageBackend for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory storage, used in tests and as a session-only fallback
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}

/// File-backed storage: one JSON file per key under a base directory
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.path(key), value))
        {
            tracing::warn!(key, error = %e, "failed to persist cart state");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, error = %e, "failed to remove cart state");
            }
        }
    }
}

/// Identity the storage key is derived from
#[derive(Debug, Clone, Default)]
pub struct CartKey {
    pub project: Option<String>,
    pub owner: Option<String>,
    /// Authenticated user; absent means guest
    pub user: Option<String>,
}

impl CartKey {
    /// Resolved storage key; falls back to the shared key when the tenant
    /// identity is unknown
    pub fn storage_key(&self) -> String {
        match &self.owner {
            Some(owner) => format!(
                "cart:{}:{}:{}",
                self.project.as_deref().unwrap_or("-"),
                owner,
                self.user.as_deref().unwrap_or("guest"),
            ),
            None => "cart:shared".to_string(),
        }
    }
}

/// Cart contents bound to one resolved storage key
pub struct CartStore<S: StorageBackend> {
    storage: S,
    key: String,
    lines: Vec<CartLine>,
}

impl<S: StorageBackend> CartStore<S> {
    /// Load the cart for a key, treating malformed cached JSON as empty
    pub fn load(storage: S, key: &CartKey) -> Self {
        let key = key.storage_key();
        let lines = match storage.get(&key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!(key, error = %e, "malformed cached cart, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self {
            storage,
            key,
            lines,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_cents(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total_cents).sum()
    }

    /// Add a product, merging with an existing line for the same product
    pub fn add(&mut self, product: &Product, quantity: u32) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price_cents: product.price_cents,
                quantity,
            }),
        }
        self.persist();
    }

    /// Set a line's quantity; zero removes the line
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            self.persist();
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Empty the cart and drop the persisted entry (checkout or explicit clear)
    pub fn clear(&mut self) {
        self.lines.clear();
        self.storage.remove(&self.key);
    }

    fn persist(&self) {
        match serde_json::to_string(&self.lines) {
            Ok(raw) => self.storage.set(&self.key, &raw),
            Err(e) => tracing::warn!(key = %self.key, error = %e, "failed to serialize cart"),
        }
    }
}
