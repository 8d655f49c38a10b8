//! The certificate tracker component.
//!
//! [`Tracker`] ties the record store to the form. It is either listing
//! records or editing a draft; the draft only exists while editing.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::certificate::Certificate;
use crate::error::{Error, Result};
use crate::form::{Draft, Field};
use crate::storage::Slot;
use crate::store::RecordStore;

/// What the tracker is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Showing the record list.
    #[default]
    Listing,
    /// Showing the record list and the add form.
    Editing,
}

/// Source of the current time, used to derive record ids.
pub type Clock = fn() -> DateTime<Utc>;

/// The certificate tracker: a record store plus an optional open form.
#[derive(Debug)]
pub struct Tracker<S> {
    store: RecordStore<S>,
    draft: Draft,
    mode: Mode,
    clock: Clock,
}

impl<S: Slot> Tracker<S> {
    /// Create a tracker over a loaded store, in listing mode.
    #[must_use]
    pub fn new(store: RecordStore<S>) -> Self {
        Self::with_clock(store, Utc::now)
    }

    /// Create a tracker with a custom clock.
    #[must_use]
    pub fn with_clock(store: RecordStore<S>, clock: Clock) -> Self {
        Self {
            store,
            draft: Draft::new(),
            mode: Mode::Listing,
            clock,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the add form is visible.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Records, newest first.
    #[must_use]
    pub fn records(&self) -> &[Certificate] {
        self.store.records()
    }

    /// The draft being edited. Holds defaults while listing.
    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Show the add form. Already-open forms keep their draft.
    pub fn open_form(&mut self) {
        if self.mode == Mode::Listing {
            debug!("Opening certificate form");
            self.mode = Mode::Editing;
        }
    }

    /// The "add" button: opens the form, or closes it (discarding the
    /// draft) if it is already open.
    pub fn toggle_form(&mut self) {
        match self.mode {
            Mode::Listing => self.open_form(),
            Mode::Editing => self.cancel(),
        }
    }

    /// Replace one draft field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormClosed`] if the form is not open.
    pub fn set_field(&mut self, field: Field) -> Result<()> {
        self.ensure_editing()?;
        self.draft.set(field);
        Ok(())
    }

    /// Attach file names to the draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormClosed`] if the form is not open.
    pub fn add_files<I, N>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.ensure_editing()?;
        self.draft.add_files(names);
        Ok(())
    }

    /// Detach the file at `index` from the draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormClosed`] if the form is not open, or
    /// [`Error::FileIndexOutOfRange`] for a bad index.
    pub fn remove_file(&mut self, index: usize) -> Result<String> {
        self.ensure_editing()?;
        self.draft.remove_file(index)
    }

    /// Turn the draft into a record, store it, and return to listing.
    ///
    /// On any error the draft, the store and the mode are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormClosed`] if the form is not open, a validation
    /// error for an invalid draft, or a storage error if persisting fails.
    pub fn submit(&mut self) -> Result<&Certificate> {
        self.ensure_editing()?;
        self.draft.validate()?;

        let id = self.store.next_id((self.clock)().timestamp_millis())?;
        let record = self.draft.to_certificate(id)?;
        self.store.append(record)?;

        self.draft = Draft::new();
        self.mode = Mode::Listing;
        Ok(&self.store.records()[0])
    }

    /// Discard the draft and return to listing.
    pub fn cancel(&mut self) {
        if self.mode == Mode::Editing {
            debug!("Discarding certificate draft");
        }
        self.draft = Draft::new();
        self.mode = Mode::Listing;
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.mode {
            Mode::Editing => Ok(()),
            Mode::Listing => Err(Error::FormClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::Status;
    use crate::config::CorruptPolicy;
    use crate::logging::init_test_logging;
    use crate::storage::MemorySlot;

    const KEY: &str = "certificates";

    fn fixed_clock() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).expect("valid timestamp")
    }

    fn tracker() -> Tracker<MemorySlot> {
        init_test_logging();
        let store = RecordStore::load(MemorySlot::new(), KEY, CorruptPolicy::Fail).unwrap();
        Tracker::with_clock(store, fixed_clock)
    }

    fn fill_required(tracker: &mut Tracker<MemorySlot>) {
        tracker
            .set_field(Field::Name("CompTIA Security+".to_string()))
            .unwrap();
        tracker
            .set_field(Field::Provider("CompTIA".to_string()))
            .unwrap();
    }

    #[test]
    fn test_initial_mode_is_listing() {
        let tracker = tracker();
        assert_eq!(tracker.mode(), Mode::Listing);
        assert!(tracker.records().is_empty());
    }

    #[test]
    fn test_toggle_form() {
        let mut tracker = tracker();
        tracker.toggle_form();
        assert!(tracker.is_editing());

        tracker.set_field(Field::Name("draft".to_string())).unwrap();
        tracker.toggle_form();
        assert_eq!(tracker.mode(), Mode::Listing);
        assert_eq!(tracker.draft(), &Draft::new());
    }

    #[test]
    fn test_edits_require_open_form() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.set_field(Field::Name("x".to_string())),
            Err(Error::FormClosed)
        ));
        assert!(matches!(tracker.add_files(["a.pdf"]), Err(Error::FormClosed)));
        assert!(matches!(tracker.remove_file(0), Err(Error::FormClosed)));
        assert!(matches!(tracker.submit(), Err(Error::FormClosed)));
    }

    #[test]
    fn test_submit_scenario() {
        let mut tracker = tracker();
        tracker.open_form();
        fill_required(&mut tracker);
        tracker.set_field(Field::Status(Status::Planned)).unwrap();
        tracker.set_field(Field::Progress(0)).unwrap();

        let record = tracker.submit().unwrap().clone();
        assert!(!record.id.is_empty());
        assert_eq!(record.id, "1700000000000");

        assert_eq!(tracker.records(), &[record.clone()]);
        assert_eq!(tracker.mode(), Mode::Listing);
        assert_eq!(tracker.draft(), &Draft::new());

        let slot = tracker.store().slot();
        assert_eq!(slot.writes(), 1);
        assert_eq!(
            slot.get(KEY).unwrap(),
            r#"[{"id":"1700000000000","name":"CompTIA Security+","provider":"CompTIA","status":"planned","progress":0,"studyMaterials":[],"notes":"","files":[]}]"#
        );
    }

    #[test]
    fn test_submit_prepends() {
        let mut tracker = tracker();
        for name in ["First", "Second"] {
            tracker.open_form();
            tracker.set_field(Field::Name(name.to_string())).unwrap();
            tracker.set_field(Field::Provider("P".to_string())).unwrap();
            let before = tracker.records().len();
            tracker.submit().unwrap();
            assert_eq!(tracker.records().len(), before + 1);
            assert_eq!(tracker.records()[0].name, name);
        }
        // Same clock reading, still distinct ids
        assert_ne!(tracker.records()[0].id, tracker.records()[1].id);
    }

    #[test]
    fn test_invalid_submit_keeps_state() {
        let mut tracker = tracker();
        tracker.open_form();
        tracker.set_field(Field::Provider("CompTIA".to_string())).unwrap();

        let err = tracker.submit().unwrap_err();
        assert!(err.is_validation_error());
        assert!(tracker.is_editing());
        assert_eq!(tracker.draft().provider, "CompTIA");
        assert!(tracker.records().is_empty());
        assert_eq!(tracker.store().slot().writes(), 0);
    }

    #[test]
    fn test_submit_with_files_and_materials() {
        let mut tracker = tracker();
        tracker.open_form();
        fill_required(&mut tracker);
        tracker.add_files(["a.pdf", "b.pdf"]).unwrap();
        tracker.remove_file(0).unwrap();
        tracker
            .set_field(Field::StudyMaterials("Book\n\nVideos".to_string()))
            .unwrap();
        tracker.set_field(Field::DateEarned(String::new())).unwrap();

        let record = tracker.submit().unwrap();
        assert_eq!(record.files, vec!["b.pdf"]);
        assert_eq!(record.study_materials, vec!["Book", "Videos"]);
        assert!(record.date_earned.is_none());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut tracker = tracker();
        tracker.open_form();
        fill_required(&mut tracker);
        tracker.cancel();

        assert_eq!(tracker.mode(), Mode::Listing);
        assert_eq!(tracker.draft(), &Draft::new());
        assert!(tracker.records().is_empty());
        assert_eq!(tracker.store().slot().writes(), 0);
    }

    #[test]
    fn test_open_form_keeps_existing_draft() {
        let mut tracker = tracker();
        tracker.open_form();
        tracker.set_field(Field::Name("Keep".to_string())).unwrap();
        tracker.open_form();
        assert_eq!(tracker.draft().name, "Keep");
    }
}
