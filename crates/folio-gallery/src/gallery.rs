//! Read-only projection over the persisted collection.

use chrono::{DateTime, FixedOffset, Utc};
use folio_store::ImageCollection;
use folio_types::record::iso8601;
use folio_types::{human_size, ImageId, ImageRecord};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::DisplayConfig;
use crate::error::GalleryResult;

type SelectHook = Box<dyn FnMut(&ImageRecord) + Send>;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this image?";
pub const CLEAR_PROMPT: &str = "Are you sure you want to delete all images?";
pub const EMPTY_PLACEHOLDER: &str = "No images uploaded yet";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// One gallery tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub id: ImageId,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub size_label: String,
    #[serde(with = "iso8601")]
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_label: String,
    pub selected: bool,
}

/// Detail panel for one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageDetail {
    pub id: ImageId,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub size_label: String,
    pub uploaded_label: String,
    /// The data URI, for copying.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryView {
    /// Nothing stored: show [`EMPTY_PLACEHOLDER`] instead of a grid.
    Empty,
    Grid(Vec<ImageSummary>),
}

impl GalleryView {
    /// Line shown above the grid.
    pub fn header(&self) -> String {
        match self {
            Self::Empty => EMPTY_PLACEHOLDER.to_string(),
            Self::Grid(items) => format!("{} image(s) stored", items.len()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// Confirmed, but no record had that id.
    NotFound,
    /// The user declined.
    Cancelled,
    /// Deletion is turned off for this gallery.
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    /// The user declined.
    Cancelled,
    /// Confirmed, but the backend delete failed. The collection is unchanged.
    Failed,
}

/// Render an upload instant, e.g. `16 Oct 2025, 16:30`.
pub fn format_timestamp(at: &DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%-d %b %Y, %H:%M").to_string()
}

/// Gallery over an [`ImageCollection`].
///
/// Holds a transient copy of the collection which only changes on
/// [`refresh`](Self::refresh); writes made elsewhere are not noticed until
/// then. At most one record is selected.
pub struct Gallery {
    collection: ImageCollection,
    records: Vec<ImageRecord>,
    selected: Option<ImageId>,
    offset: FixedOffset,
    show_delete: bool,
    on_select: Option<SelectHook>,
}

impl Gallery {
    /// Build the gallery and load the collection once.
    pub fn new(collection: ImageCollection, display: &DisplayConfig) -> GalleryResult<Self> {
        let mut gallery = Self {
            collection,
            records: Vec::new(),
            selected: None,
            offset: display.utc_offset()?,
            show_delete: display.show_delete,
            on_select: None,
        };
        gallery.refresh();
        Ok(gallery)
    }

    /// Register the hook called with the full record on selection.
    pub fn on_select(mut self, hook: impl FnMut(&ImageRecord) + Send + 'static) -> Self {
        self.on_select = Some(Box::new(hook));
        self
    }

    /// Re-read the collection.
    pub fn refresh(&mut self) -> Vec<ImageSummary> {
        self.records = self.collection.list_all();
        debug!(count = self.records.len(), "gallery refreshed");
        self.summaries()
    }

    pub fn summaries(&self) -> Vec<ImageSummary> {
        self.records.iter().map(|r| self.summarize(r)).collect()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn show_delete(&self) -> bool {
        self.show_delete
    }

    pub fn view(&self) -> GalleryView {
        if self.records.is_empty() {
            GalleryView::Empty
        } else {
            GalleryView::Grid(self.summaries())
        }
    }

    /// Select a record from the current projection and emit it to the hook.
    pub fn select(&mut self, id: &str) -> Option<ImageRecord> {
        let record = self.records.iter().find(|r| r.id == id)?.clone();
        self.selected = Some(record.id.clone());
        if let Some(hook) = self.on_select.as_mut() {
            hook(&record);
        }
        Some(record)
    }

    pub fn selected_id(&self) -> Option<&ImageId> {
        self.selected.as_ref()
    }

    /// The selected record, if it is still in the projection.
    pub fn selected(&self) -> Option<&ImageRecord> {
        let id = self.selected.as_ref()?;
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn detail(&self, id: &str) -> Option<ImageDetail> {
        let record = self.records.iter().find(|r| r.id == id)?;
        Some(ImageDetail {
            id: record.id.clone(),
            name: record.name.clone(),
            mime_type: record.mime_type.clone(),
            size: record.size,
            size_label: human_size(record.size),
            uploaded_label: format_timestamp(&record.uploaded_at, &self.offset),
            data: record.data.clone(),
        })
    }

    /// Delete one record after confirmation, then refresh.
    ///
    /// The selection is not touched, even when it points at the deleted
    /// record.
    pub fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> GalleryResult<DeleteOutcome> {
        if !self.show_delete {
            return Ok(DeleteOutcome::Disabled);
        }
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        let removed = self.collection.remove_by_id(id)?;
        self.refresh();
        if removed {
            info!(id, "image deleted");
            Ok(DeleteOutcome::Removed)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    /// Clear the whole collection after confirmation. Drops the selection
    /// once the clear succeeds.
    pub fn clear_all(&mut self, confirm: &dyn Confirm) -> ClearOutcome {
        if !confirm.confirm(CLEAR_PROMPT) {
            debug!("clear cancelled");
            return ClearOutcome::Cancelled;
        }
        let cleared = self.collection.clear_all();
        self.refresh();
        if cleared {
            self.selected = None;
            ClearOutcome::Cleared
        } else {
            ClearOutcome::Failed
        }
    }

    fn summarize(&self, record: &ImageRecord) -> ImageSummary {
        ImageSummary {
            id: record.id.clone(),
            name: record.name.clone(),
            mime_type: record.mime_type.clone(),
            size: record.size,
            size_label: human_size(record.size),
            uploaded_at: record.uploaded_at,
            uploaded_label: format_timestamp(&record.uploaded_at, &self.offset),
            selected: self.selected.as_ref() == Some(&record.id),
        }
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("records", &self.records.len())
            .field("selected", &self.selected)
            .field("show_delete", &self.show_delete)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use folio_store::{InMemoryStore, KeyValueStore, DEFAULT_STORAGE_KEY};
    use folio_types::DataUri;
    use std::sync::{Arc, Mutex};

    fn record(id: &str, size: usize) -> ImageRecord {
        ImageRecord {
            id: ImageId::new(id),
            name: format!("{id}.png"),
            data: DataUri::encode("image/png", &vec![1u8; size]),
            size: size as u64,
            mime_type: "image/png".into(),
            uploaded_at: Utc.with_ymd_and_hms(2025, 10, 16, 9, 5, 0).unwrap(),
        }
    }

    fn seeded(ids: &[&str]) -> (Arc<InMemoryStore>, ImageCollection) {
        let store = Arc::new(InMemoryStore::new());
        let collection = ImageCollection::new(store.clone());
        for id in ids {
            collection.append(record(id, 2048)).unwrap();
        }
        (store, collection)
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    #[test]
    fn timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 10, 16, 9, 5, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_timestamp(&at, &utc), "16 Oct 2025, 09:05");
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(format_timestamp(&at, &wib), "16 Oct 2025, 16:05");
    }

    #[test]
    fn empty_collection_shows_placeholder() {
        let (_, c) = seeded(&[]);
        let gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        assert!(gallery.is_empty());
        assert_eq!(gallery.view(), GalleryView::Empty);
        assert_eq!(gallery.view().header(), "No images uploaded yet");
    }

    #[test]
    fn summaries_carry_display_fields() {
        let (_, c) = seeded(&["img_1", "img_2"]);
        let gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        let items = gallery.summaries();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "img_1");
        assert_eq!(items[0].size_label, "2.0 KB");
        assert_eq!(items[0].uploaded_label, "16 Oct 2025, 09:05");
        assert!(!items[0].selected);
        assert_eq!(gallery.view().header(), "2 image(s) stored");
    }

    #[test]
    fn configured_offset_applies() {
        let (_, c) = seeded(&["img_1"]);
        let display = DisplayConfig {
            utc_offset_minutes: 7 * 60,
            ..DisplayConfig::default()
        };
        let gallery = Gallery::new(c, &display).unwrap();
        assert_eq!(gallery.summaries()[0].uploaded_label, "16 Oct 2025, 16:05");
    }

    #[test]
    fn projection_is_stale_until_refresh() {
        let (_, c) = seeded(&["img_1"]);
        let mut gallery = Gallery::new(c.clone(), &DisplayConfig::default()).unwrap();
        c.append(record("img_2", 10)).unwrap();
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.refresh().len(), 2);
    }

    #[test]
    fn corrupt_storage_projects_empty() {
        let (store, c) = seeded(&[]);
        store.set(DEFAULT_STORAGE_KEY, "][").unwrap();
        let gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        assert_eq!(gallery.view(), GalleryView::Empty);
    }

    #[test]
    fn select_emits_full_record() {
        let (_, c) = seeded(&["img_1", "img_2"]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut gallery = Gallery::new(c, &DisplayConfig::default())
            .unwrap()
            .on_select(move |r| sink.lock().unwrap().push(r.clone()));

        let picked = gallery.select("img_2").unwrap();
        assert_eq!(picked.id, "img_2");
        assert_eq!(seen.lock().unwrap().as_slice(), &[picked.clone()]);
        assert_eq!(gallery.selected(), Some(&picked));

        let flags: Vec<bool> = gallery.summaries().iter().map(|s| s.selected).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn selection_is_exclusive() {
        let (_, c) = seeded(&["img_1", "img_2"]);
        let mut gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        gallery.select("img_1");
        gallery.select("img_2");
        let selected: Vec<_> = gallery
            .summaries()
            .into_iter()
            .filter(|s| s.selected)
            .map(|s| s.id)
            .collect();
        assert_eq!(selected, vec![ImageId::new("img_2")]);
    }

    #[test]
    fn select_unknown_keeps_selection() {
        let (_, c) = seeded(&["img_1"]);
        let mut gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        gallery.select("img_1");
        assert!(gallery.select("nope").is_none());
        assert_eq!(gallery.selected_id(), Some(&ImageId::new("img_1")));
    }

    #[test]
    fn delete_requires_confirmation() {
        let (_, c) = seeded(&["img_1"]);
        let mut gallery = Gallery::new(c.clone(), &DisplayConfig::default()).unwrap();
        assert_eq!(gallery.delete("img_1", &no).unwrap(), DeleteOutcome::Cancelled);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn delete_prompts_with_message() {
        let (_, c) = seeded(&["img_1"]);
        let mut gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        let asked = Mutex::new(String::new());
        let confirm = |prompt: &str| {
            *asked.lock().unwrap() = prompt.to_string();
            true
        };
        gallery.delete("img_1", &confirm).unwrap();
        assert_eq!(*asked.lock().unwrap(), DELETE_PROMPT);
    }

    #[test]
    fn confirmed_delete_removes_and_refreshes() {
        let (_, c) = seeded(&["img_1", "img_2", "img_3"]);
        let mut gallery = Gallery::new(c.clone(), &DisplayConfig::default()).unwrap();
        assert_eq!(gallery.delete("img_2", &yes).unwrap(), DeleteOutcome::Removed);
        assert_eq!(gallery.len(), 2);
        assert_eq!(c.len(), 2);
        assert!(gallery.records().iter().all(|r| r.id != "img_2"));
    }

    #[test]
    fn delete_unknown_id_reports_not_found() {
        let (_, c) = seeded(&["a", "b", "c"]);
        let mut gallery = Gallery::new(c.clone(), &DisplayConfig::default()).unwrap();
        assert_eq!(gallery.delete("zzz", &yes).unwrap(), DeleteOutcome::NotFound);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn deleting_selected_keeps_selection_id() {
        let (_, c) = seeded(&["img_1", "img_2"]);
        let mut gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        gallery.select("img_1");
        gallery.delete("img_1", &yes).unwrap();
        assert_eq!(gallery.selected_id(), Some(&ImageId::new("img_1")));
        assert!(gallery.selected().is_none());
    }

    #[test]
    fn delete_disabled_by_config() {
        let (_, c) = seeded(&["img_1"]);
        let display = DisplayConfig {
            show_delete: false,
            ..DisplayConfig::default()
        };
        let mut gallery = Gallery::new(c.clone(), &display).unwrap();
        assert!(!gallery.show_delete());
        assert_eq!(gallery.delete("img_1", &yes).unwrap(), DeleteOutcome::Disabled);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn clear_all_behind_confirmation() {
        let (_, c) = seeded(&["img_1", "img_2"]);
        let mut gallery = Gallery::new(c.clone(), &DisplayConfig::default()).unwrap();
        gallery.select("img_1");

        assert_eq!(gallery.clear_all(&no), ClearOutcome::Cancelled);
        assert_eq!(c.len(), 2);

        assert_eq!(gallery.clear_all(&yes), ClearOutcome::Cleared);
        assert!(c.is_empty());
        assert!(gallery.is_empty());
        assert!(gallery.selected_id().is_none());
    }

    /// Reads and writes work; deleting the entry always fails.
    struct StuckStore(InMemoryStore);

    impl KeyValueStore for StuckStore {
        fn get(&self, key: &str) -> folio_store::StoreResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> folio_store::StoreResult<()> {
            self.0.set(key, value)
        }

        fn remove(&self, _key: &str) -> folio_store::StoreResult<bool> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn usage(&self) -> folio_store::StoreResult<folio_store::StorageUsage> {
            self.0.usage()
        }
    }

    #[test]
    fn clear_all_reports_backend_failure() {
        let c = ImageCollection::new(Arc::new(StuckStore(InMemoryStore::new())));
        c.append(record("img_1", 8)).unwrap();
        let mut gallery = Gallery::new(c.clone(), &DisplayConfig::default()).unwrap();
        gallery.select("img_1");

        assert_eq!(gallery.clear_all(&no), ClearOutcome::Cancelled);
        assert_eq!(gallery.clear_all(&yes), ClearOutcome::Failed);
        assert_eq!(c.len(), 1);
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.selected_id(), Some(&ImageId::new("img_1")));
    }

    #[test]
    fn detail_exposes_data_uri() {
        let (_, c) = seeded(&["img_1"]);
        let gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        let detail = gallery.detail("img_1").unwrap();
        assert_eq!(detail.name, "img_1.png");
        assert_eq!(detail.size_label, "2.0 KB");
        assert!(detail.data.starts_with("data:image/png;base64,"));
        assert!(gallery.detail("missing").is_none());
    }

    #[test]
    fn summary_serializes_timestamp_as_iso() {
        let (_, c) = seeded(&["img_1"]);
        let gallery = Gallery::new(c, &DisplayConfig::default()).unwrap();
        let json = serde_json::to_value(&gallery.summaries()[0]).unwrap();
        assert_eq!(json["uploaded_at"], "2025-10-16T09:05:00.000Z");
        assert_eq!(json["size_label"], "2.0 KB");
    }
}
