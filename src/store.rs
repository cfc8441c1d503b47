//! Persistence contract for tagged images, plus an in-process implementation.
//!
//! Records are keyed by store-assigned, auto-incrementing ids. Updates replace
//! the whole record; there are no partial patches. Tag edits therefore go
//! through [`modify_tags`]: fetch, transform, write back.
//!
//! Two implementations live here: [`MemoryStore`] for a single session, and
//! [`KeyValueStore`], which lays records out as JSON strings over any
//! [`KeyValueStorage`] (the browser binds that to `localStorage`).

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;

use crate::consts::{CURRENT_ID_KEY, NEXT_ID_KEY, RECORD_KEY_PREFIX};
use crate::doc::{DraftTaggedImage, ImageId, Tag, TaggedImage};
use crate::error::{Error, Result};

/// A key-value store of tagged images.
pub trait TaggedImageStore {
    /// Persist a draft and return its new id.
    fn create(&self, draft: DraftTaggedImage) -> impl Future<Output = Result<ImageId>>;

    /// Every record, in ascending id order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<TaggedImage>>>;

    /// One record; [`Error::NotFound`] if absent.
    fn get_one(&self, id: ImageId) -> impl Future<Output = Result<TaggedImage>>;

    /// Replace the record stored under `id` and return it as stored.
    fn update_one(&self, record: TaggedImage, id: ImageId) -> impl Future<Output = Result<TaggedImage>>;

    /// Remove the record; [`Error::NotFound`] if absent.
    fn delete_one(&self, id: ImageId) -> impl Future<Output = Result<()>>;

    /// Id of the image the user last viewed, if remembered.
    fn current_id(&self) -> Option<ImageId>;

    /// Remember (or forget) the image the user is viewing.
    fn set_current_id(&self, id: Option<ImageId>);
}

/// Read-modify-write of one record's tags.
///
/// # Errors
///
/// Propagates store failures and errors from `transform`.
pub async fn modify_tags<S, F>(store: &S, id: ImageId, transform: F) -> Result<TaggedImage>
where
    S: TaggedImageStore,
    F: FnOnce(&[Tag]) -> Result<Vec<Tag>>,
{
    let TaggedImage { id: stored_id, image, tags } = store.get_one(id).await?;
    let tags = transform(&tags)?;
    log::debug!("store: writing {} tags to image {stored_id}", tags.len());
    store.update_one(TaggedImage { id: stored_id, image, tags }, id).await
}

/// Key-value key a record is stored under, e.g. `canvas-tagger:image:7`.
#[must_use]
pub fn record_key(id: ImageId) -> String {
    format!("{RECORD_KEY_PREFIX}{id}")
}

/// Inverse of [`record_key`]; `None` for keys that are not tagger records.
#[must_use]
pub fn parse_record_key(key: &str) -> Option<ImageId> {
    let digits = key.strip_prefix(RECORD_KEY_PREFIX)?;
    parse_id(digits)
}

/// Parse a stored id; anything but a plain decimal integer is `None`.
#[must_use]
pub fn parse_id(raw: &str) -> Option<ImageId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => None,
    }
}

/// In-memory store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<ImageId, TaggedImage>>,
    next_id: Cell<ImageId>,
    current_id: Cell<Option<ImageId>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            records: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            current_id: Cell::new(None),
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl TaggedImageStore for MemoryStore {
    async fn create(&self, draft: DraftTaggedImage) -> Result<ImageId> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.records.borrow_mut().insert(id, draft.with_id(id));
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<TaggedImage>> {
        Ok(self.records.borrow().values().cloned().collect())
    }

    async fn get_one(&self, id: ImageId) -> Result<TaggedImage> {
        self.records.borrow().get(&id).cloned().ok_or(Error::NotFound(id))
    }

    async fn update_one(&self, record: TaggedImage, id: ImageId) -> Result<TaggedImage> {
        let mut records = self.records.borrow_mut();
        let slot = records.get_mut(&id).ok_or(Error::NotFound(id))?;
        *slot = TaggedImage { id, ..record };
        Ok(slot.clone())
    }

    async fn delete_one(&self, id: ImageId) -> Result<()> {
        self.records.borrow_mut().remove(&id).map(|_| ()).ok_or(Error::NotFound(id))
    }

    fn current_id(&self) -> Option<ImageId> {
        self.current_id.get()
    }

    fn set_current_id(&self, id: Option<ImageId>) {
        self.current_id.set(id);
    }
}

// =============================================================
// Key-value layout
// =============================================================

/// Synchronous string key-value storage, shaped like the web `Storage` API.
pub trait KeyValueStorage {
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns a storage error if the value cannot be written, e.g. when the
    /// backend is full.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns a storage error if the key cannot be removed.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Every key currently stored, in any order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Tagged images over [`KeyValueStorage`].
///
/// Each record is one JSON value under [`record_key`]. The next id and the
/// last viewed id live under their own keys. The id counter is advanced
/// before a record is written, so a failed write leaves a gap in the ids and
/// never hands the same id out twice.
#[derive(Debug)]
pub struct KeyValueStore<K> {
    storage: K,
}

impl<K: KeyValueStorage> KeyValueStore<K> {
    #[must_use]
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn storage(&self) -> &K {
        &self.storage
    }

    fn write(&self, record: &TaggedImage) -> Result<()> {
        self.storage.set_item(&record_key(record.id), &serde_json::to_string(record)?)
    }

    fn next_id(&self) -> Result<ImageId> {
        Ok(self.storage.get_item(NEXT_ID_KEY)?.as_deref().and_then(parse_id).unwrap_or(1))
    }

    /// Ids of every stored record, ascending.
    fn ids(&self) -> Result<Vec<ImageId>> {
        let mut ids: Vec<ImageId> = self.storage.keys()?.iter().filter_map(|key| parse_record_key(key)).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn require(&self, id: ImageId) -> Result<String> {
        self.storage.get_item(&record_key(id))?.ok_or(Error::NotFound(id))
    }
}

impl<K: KeyValueStorage> TaggedImageStore for KeyValueStore<K> {
    async fn create(&self, draft: DraftTaggedImage) -> Result<ImageId> {
        let id = self.next_id()?;
        self.storage.set_item(NEXT_ID_KEY, &(id + 1).to_string())?;
        self.write(&draft.with_id(id))?;
        log::debug!("store: created record {id}");
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<TaggedImage>> {
        let mut records = Vec::new();
        for id in self.ids()? {
            records.push(serde_json::from_str(&self.require(id)?)?);
        }
        Ok(records)
    }

    async fn get_one(&self, id: ImageId) -> Result<TaggedImage> {
        Ok(serde_json::from_str(&self.require(id)?)?)
    }

    async fn update_one(&self, record: TaggedImage, id: ImageId) -> Result<TaggedImage> {
        self.require(id)?;
        let record = TaggedImage { id, ..record };
        self.write(&record)?;
        Ok(record)
    }

    async fn delete_one(&self, id: ImageId) -> Result<()> {
        self.require(id)?;
        self.storage.remove_item(&record_key(id))
    }

    fn current_id(&self) -> Option<ImageId> {
        match self.storage.get_item(CURRENT_ID_KEY) {
            Ok(raw) => raw.as_deref().and_then(parse_id),
            Err(e) => {
                log::warn!("store: {e}");
                None
            }
        }
    }

    fn set_current_id(&self, id: Option<ImageId>) {
        let result = match id {
            Some(id) => self.storage.set_item(CURRENT_ID_KEY, &id.to_string()),
            None => self.storage.remove_item(CURRENT_ID_KEY),
        };
        if let Err(e) = result {
            log::warn!("store: {e}");
        }
    }
}
