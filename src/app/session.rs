//! Session
//!
//! One running instance of the app: navigator state, the two interactive
//! screens and the external collaborators they talk to.

use super::state::{AppState, Screen, Update};
use crate::booking::{BookingError, BookingForm, CalendarPicker};
use crate::content::{Catalog, DailyContent, DailySelector};
use crate::notify::{Notifier, NotifyError};
use crate::profile::{
    load_or_create, EditorError, EngageOutcome, Gesture, ProfileEditor, ProfileRecord,
    ProfileStore, StoreError, TriggerPolicy,
};
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Why a profile save did not fully complete
#[derive(Error, Debug)]
pub enum SaveError {
    /// Nothing was saved
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// The local record was updated but the store write failed
    #[error("Changes saved on this device but not stored remotely: {0}")]
    Persist(#[from] StoreError),
}

/// Settings that shape a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Record created when the store has none
    pub defaults: ProfileRecord,
    pub trigger: TriggerPolicy,
    pub selector: DailySelector,
    pub catalog: Catalog,
    /// Month the booking calendar opens on (default: current month)
    pub calendar: Option<CalendarPicker>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            defaults: ProfileRecord::default(),
            trigger: TriggerPolicy::default(),
            selector: DailySelector::default(),
            catalog: Catalog::builtin(),
            calendar: None,
        }
    }
}

pub struct Session {
    state: AppState,
    booking: BookingForm,
    editor: ProfileEditor,
    catalog: Catalog,
    selector: DailySelector,
    store: Arc<dyn ProfileStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Session {
    /// Load (or create) the profile and open on the welcome screen
    pub async fn start(
        store: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Self {
        Self::open(store, Some(notifier), options).await
    }

    /// Session that only views and edits the profile; booking submits fail
    pub async fn start_without_notifier(
        store: Arc<dyn ProfileStore>,
        options: SessionOptions,
    ) -> Self {
        Self::open(store, None, options).await
    }

    async fn open(
        store: Arc<dyn ProfileStore>,
        notifier: Option<Arc<dyn Notifier>>,
        options: SessionOptions,
    ) -> Self {
        tracing::info!(
            store = store.name(),
            notifier = notifier.as_ref().map(|n| n.name()).unwrap_or("none"),
            "Starting session"
        );

        let profile = load_or_create(store.as_ref(), &options.defaults).await;
        let booking = match options.calendar {
            Some(calendar) => BookingForm::with_calendar(calendar),
            None => BookingForm::new(),
        };

        Self {
            state: AppState::new(profile),
            booking,
            editor: ProfileEditor::new(options.trigger),
            catalog: options.catalog,
            selector: options.selector,
            store,
            notifier,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn get_started(&mut self) {
        self.state.apply(Update::GetStarted);
    }

    pub fn navigate(&mut self, screen: Screen) {
        self.state.apply(Update::Navigate(screen));
    }

    // ----- Home -----

    pub fn daily_content(&self, now: NaiveDateTime) -> DailyContent {
        self.selector.select(&self.catalog, now)
    }

    // ----- Book -----

    pub fn booking(&self) -> &BookingForm {
        &self.booking
    }

    pub fn booking_mut(&mut self) -> &mut BookingForm {
        &mut self.booking
    }

    pub async fn submit_booking(&mut self) -> Result<(), BookingError> {
        match &self.notifier {
            Some(notifier) => self.booking.submit(notifier.as_ref()).await,
            None => Err(BookingError::Delivery(NotifyError::NotConfigured(
                "no notifier in this session".to_string(),
            ))),
        }
    }

    // ----- Profile -----

    pub fn editor(&self) -> &ProfileEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ProfileEditor {
        &mut self.editor
    }

    /// Profile as the screen shows it: the draft while editing
    pub fn displayed_profile(&self) -> &ProfileRecord {
        self.editor.displayed(self.state.profile())
    }

    pub fn engage_avatar(&mut self, gesture: Gesture) -> EngageOutcome {
        self.editor.engage_avatar(gesture)
    }

    pub fn unlock_profile(&mut self, password: &str) -> Result<(), EditorError> {
        self.editor.submit_password(password, self.state.profile())
    }

    pub async fn replace_avatar(&mut self, path: &Path) -> Result<(), EditorError> {
        self.editor.replace_avatar(path).await
    }

    /// Commit the draft locally, then write it to the store once.
    ///
    /// A store failure is returned as [`SaveError::Persist`]; the local
    /// record keeps the new values.
    pub async fn save_profile(&mut self) -> Result<(), SaveError> {
        let record = self.editor.commit()?;
        self.state.apply(Update::ReplaceProfile(record.clone()));

        if let Err(e) = self.store.upsert(&record).await {
            tracing::error!(store = self.store.name(), error = %e, "Profile save failed");
            return Err(SaveError::Persist(e));
        }
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> Result<(), EditorError> {
        self.editor.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingRequest, TimeSlot};
    use crate::notify::NotifyError;
    use crate::profile::MemoryProfileStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingNotifier {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        fn name(&self) -> &str {
            "counting"
        }

        async fn send_booking(&self, _request: &BookingRequest) -> Result<(), NotifyError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn session_with(store: Arc<MemoryProfileStore>) -> (Session, Arc<CountingNotifier>) {
        let notifier = Arc::new(CountingNotifier::default());
        let options = SessionOptions {
            calendar: Some(CalendarPicker::for_month(2025, 3).unwrap()),
            ..SessionOptions::default()
        };
        let session = Session::start(store, notifier.clone(), options).await;
        (session, notifier)
    }

    #[tokio::test]
    async fn test_start_creates_profile_and_shows_welcome() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut session, _) = session_with(store.clone()).await;

        assert_eq!(session.screen(), Screen::Welcome);
        assert_eq!(store.upsert_count(), 1);
        assert_eq!(session.displayed_profile(), &ProfileRecord::default());

        session.get_started();
        assert_eq!(session.screen(), Screen::Home);
    }

    #[tokio::test]
    async fn test_daily_content_uses_configured_catalog() {
        let store = Arc::new(MemoryProfileStore::new());
        let (session, _) = session_with(store).await;

        let now = NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(session.daily_content(now).spotlight.name, "Sweet Potatoes");
    }

    #[tokio::test]
    async fn test_booking_through_session() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut session, notifier) = session_with(store).await;
        session.navigate(Screen::Book);

        let form = session.booking_mut();
        form.set_full_name("Asha Rao");
        form.set_email("asha@example.com");
        form.update_phone("98765 43210");
        form.select_date(3).unwrap();
        form.select_time_slot(TimeSlot::Evening4To5);

        session.submit_booking().await.unwrap();
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);
        assert!(session.booking().is_success_visible());
    }

    #[tokio::test]
    async fn test_save_updates_cache_and_store_once() {
        let store = Arc::new(MemoryProfileStore::with_record(ProfileRecord::default()));
        let (mut session, _) = session_with(store.clone()).await;
        session.navigate(Screen::Profile);

        assert_eq!(session.engage_avatar(Gesture::Tap), EngageOutcome::PromptOpened);
        session.unlock_profile("argps2025").unwrap();
        session.editor_mut().set_phone("9876543210").unwrap();
        session.save_profile().await.unwrap();

        assert!(session.editor().is_viewing());
        assert_eq!(session.state().profile().phone, "9876543210");
        assert_eq!(store.upsert_count(), 1);
        assert_eq!(store.snapshot().await.unwrap().phone, "9876543210");
    }

    #[tokio::test]
    async fn test_saved_password_gates_next_unlock() {
        let store = Arc::new(MemoryProfileStore::with_record(ProfileRecord::default()));
        let (mut session, _) = session_with(store.clone()).await;

        session.engage_avatar(Gesture::Tap);
        session.unlock_profile("argps2025").unwrap();
        session.editor_mut().set_password("n3w-pass").unwrap();
        session.save_profile().await.unwrap();
        assert_eq!(store.snapshot().await.unwrap().access_password, "n3w-pass");

        session.engage_avatar(Gesture::Tap);
        assert!(matches!(
            session.unlock_profile("argps2025"),
            Err(EditorError::WrongPassword)
        ));
        session.unlock_profile("n3w-pass").unwrap();
        assert!(session.editor().is_editing());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_local_value() {
        let store = Arc::new(MemoryProfileStore::with_record(ProfileRecord::default()));
        let (mut session, _) = session_with(store.clone()).await;

        session.engage_avatar(Gesture::Tap);
        session.unlock_profile("argps2025").unwrap();
        session.editor_mut().set_email("owner@argps.in").unwrap();

        store.set_fail_writes(true);
        let err = session.save_profile().await.unwrap_err();

        assert!(matches!(err, SaveError::Persist(StoreError::Unavailable)));
        assert_eq!(session.state().profile().email, "owner@argps.in");
        assert!(session.editor().is_viewing());
        assert_eq!(store.upsert_count(), 1);
        assert_eq!(
            store.snapshot().await.unwrap().email,
            ProfileRecord::default().email
        );
    }

    #[tokio::test]
    async fn test_cancel_leaves_profile_untouched() {
        let store = Arc::new(MemoryProfileStore::with_record(ProfileRecord::default()));
        let (mut session, _) = session_with(store.clone()).await;
        let before = session.state().profile().clone();

        session.engage_avatar(Gesture::Tap);
        session.unlock_profile("argps2025").unwrap();
        session.editor_mut().set_email("changed@example.com").unwrap();
        assert_eq!(session.displayed_profile().email, "changed@example.com");

        session.cancel_edit().unwrap();
        assert_eq!(session.state().profile(), &before);
        assert_eq!(store.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_session_without_notifier() {
        let store = Arc::new(MemoryProfileStore::with_record(ProfileRecord::default()));
        let mut session =
            Session::start_without_notifier(store.clone(), SessionOptions::default()).await;

        session.engage_avatar(Gesture::Tap);
        session.unlock_profile("argps2025").unwrap();
        session.editor_mut().set_phone("9876543210").unwrap();
        session.save_profile().await.unwrap();
        assert_eq!(store.snapshot().await.unwrap().phone, "9876543210");

        let err = session.submit_booking().await.unwrap_err();
        assert!(matches!(
            err,
            BookingError::Delivery(NotifyError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_save_without_unlock_is_rejected() {
        let store = Arc::new(MemoryProfileStore::new());
        let (mut session, _) = session_with(store.clone()).await;

        let err = session.save_profile().await.unwrap_err();
        assert!(matches!(err, SaveError::Editor(EditorError::NotEditing)));
        // Only the initial auto-create
        assert_eq!(store.upsert_count(), 1);
    }
}
