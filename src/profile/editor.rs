//! Profile editor state machine
//!
//! ```text
//!            engage avatar            correct password
//! Viewing ─────────────────> Prompt ───────────────────> Editing
//!    ^                         │  ^                         │
//!    │         dismiss         │  │ wrong password          │ save / cancel
//!    ├─────────────────────────┘  └──(stays in Prompt)      │
//!    └──────────────────────────────────────────────────────┘
//! ```
//!
//! The editor never touches the shared profile directly. Unlocking copies
//! the record into a [`Draft`]; [`ProfileEditor::commit`] hands the draft
//! back to the caller, which replaces the shared record and persists it.

use super::avatar::{encode_image_file, AvatarError};
use super::trigger::{Gesture, TriggerPolicy};
use super::ProfileRecord;
use std::path::Path;
use thiserror::Error;

/// Inline message shown under the password field
pub const WRONG_PASSWORD: &str = "Incorrect password. Please try again.";

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    #[error("The password prompt is not open")]
    NotPrompting,

    #[error("The profile is not being edited")]
    NotEditing,

    #[error(transparent)]
    Avatar(#[from] AvatarError),
}

/// Working copy of the profile while editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub profile: ProfileRecord,
    /// Password field shown as plain text instead of masked
    pub reveal_password: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Viewing,
    PasswordPrompt {
        error: Option<String>,
    },
    Editing(Draft),
}

/// What engaging the avatar did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngageOutcome {
    /// The password prompt is now open
    PromptOpened,
    /// Editing: the caller should let the user pick an image file
    ChooseImage,
    /// Gesture rejected by the policy, or the prompt is already open
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
    state: EditorState,
    policy: TriggerPolicy,
}

impl ProfileEditor {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            state: EditorState::Viewing,
            policy,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self.state, EditorState::Viewing)
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.state, EditorState::PasswordPrompt { .. })
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditorState::Editing(_))
    }

    /// Error currently shown in the password prompt
    pub fn prompt_error(&self) -> Option<&str> {
        match &self.state {
            EditorState::PasswordPrompt { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            EditorState::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    /// The record the screen should display: the draft while editing
    pub fn displayed<'a>(&'a self, record: &'a ProfileRecord) -> &'a ProfileRecord {
        self.draft().map(|d| &d.profile).unwrap_or(record)
    }

    pub fn engage_avatar(&mut self, gesture: Gesture) -> EngageOutcome {
        let outcome = match &self.state {
            EditorState::Viewing if self.policy.accepts(gesture) => EngageOutcome::PromptOpened,
            EditorState::Editing(_) => EngageOutcome::ChooseImage,
            _ => EngageOutcome::Ignored,
        };

        if outcome == EngageOutcome::PromptOpened {
            tracing::debug!("Opening admin password prompt");
            self.state = EditorState::PasswordPrompt { error: None };
        }
        outcome
    }

    /// Compare `attempt` with the record's password and unlock on a match.
    ///
    /// A mismatch keeps the prompt open with [`WRONG_PASSWORD`] shown. There
    /// is no attempt limit.
    pub fn submit_password(
        &mut self,
        attempt: &str,
        record: &ProfileRecord,
    ) -> Result<(), EditorError> {
        let EditorState::PasswordPrompt { error } = &mut self.state else {
            return Err(EditorError::NotPrompting);
        };

        if attempt != record.effective_password() {
            *error = Some(WRONG_PASSWORD.to_string());
            return Err(EditorError::WrongPassword);
        }

        tracing::info!("Profile unlocked for editing");
        self.state = EditorState::Editing(Draft {
            profile: record.clone(),
            reveal_password: false,
        });
        Ok(())
    }

    pub fn dismiss_prompt(&mut self) {
        if self.is_prompting() {
            self.state = EditorState::Viewing;
        }
    }

    fn draft_mut(&mut self) -> Result<&mut Draft, EditorError> {
        match &mut self.state {
            EditorState::Editing(draft) => Ok(draft),
            _ => Err(EditorError::NotEditing),
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), EditorError> {
        self.draft_mut()?.profile.email = email.into();
        Ok(())
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<(), EditorError> {
        self.draft_mut()?.profile.phone = phone.into();
        Ok(())
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> Result<(), EditorError> {
        self.draft_mut()?.profile.access_password = password.into();
        Ok(())
    }

    /// Flip masked/plain display of the password; returns the new setting
    pub fn toggle_password_visibility(&mut self) -> Result<bool, EditorError> {
        let draft = self.draft_mut()?;
        draft.reveal_password = !draft.reveal_password;
        Ok(draft.reveal_password)
    }

    pub fn set_avatar_image(&mut self, image: impl Into<String>) -> Result<(), EditorError> {
        self.draft_mut()?.profile.avatar_image = image.into();
        Ok(())
    }

    /// Encode the image at `path` into the draft's avatar.
    ///
    /// A read failure leaves the draft as it was.
    pub async fn replace_avatar(&mut self, path: &Path) -> Result<(), EditorError> {
        self.draft_mut()?;
        let data_url = encode_image_file(path).await?;
        self.set_avatar_image(data_url)
    }

    /// Leave editing and return the draft to be saved
    pub fn commit(&mut self) -> Result<ProfileRecord, EditorError> {
        match std::mem::take(&mut self.state) {
            EditorState::Editing(draft) => Ok(draft.profile.with_password_fallback()),
            other => {
                self.state = other;
                Err(EditorError::NotEditing)
            }
        }
    }

    /// Leave editing and drop the draft
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        if !self.is_editing() {
            return Err(EditorError::NotEditing);
        }
        tracing::debug!("Profile edit cancelled");
        self.state = EditorState::Viewing;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DEFAULT_ACCESS_PASSWORD;
    use std::io::Write;
    use std::time::Duration;

    fn unlocked(record: &ProfileRecord) -> ProfileEditor {
        let mut editor = ProfileEditor::default();
        assert_eq!(editor.engage_avatar(Gesture::Tap), EngageOutcome::PromptOpened);
        editor.submit_password("argps2025", record).unwrap();
        editor
    }

    #[test]
    fn test_starts_viewing() {
        let editor = ProfileEditor::default();
        assert!(editor.is_viewing());
        assert!(editor.draft().is_none());
    }

    #[test]
    fn test_wrong_password_stays_in_prompt() {
        let record = ProfileRecord::default();
        let mut editor = ProfileEditor::default();
        editor.engage_avatar(Gesture::Tap);

        let err = editor.submit_password("wrong", &record).unwrap_err();
        assert!(matches!(err, EditorError::WrongPassword));
        assert!(editor.is_prompting());
        assert_eq!(editor.prompt_error(), Some(WRONG_PASSWORD));
        assert!(editor.draft().is_none());

        // No lockout
        for _ in 0..10 {
            assert!(editor.submit_password("still wrong", &record).is_err());
        }
        editor.submit_password("argps2025", &record).unwrap();
        assert!(editor.is_editing());
    }

    #[test]
    fn test_correct_password_copies_record() {
        let record = ProfileRecord::default();
        let editor = unlocked(&record);

        let draft = editor.draft().unwrap();
        assert_eq!(draft.profile, record);
        assert!(!draft.reveal_password);
    }

    #[test]
    fn test_empty_stored_password_uses_fallback() {
        let record = ProfileRecord {
            access_password: String::new(),
            ..ProfileRecord::default()
        };
        let mut editor = ProfileEditor::default();
        editor.engage_avatar(Gesture::Tap);

        assert!(editor.submit_password("", &record).is_err());
        editor.submit_password(DEFAULT_ACCESS_PASSWORD, &record).unwrap();
        assert!(editor.is_editing());
    }

    #[test]
    fn test_stored_password_is_the_gate() {
        let record = ProfileRecord {
            access_password: "s3cret".to_string(),
            ..ProfileRecord::default()
        };
        let mut editor = ProfileEditor::default();
        editor.engage_avatar(Gesture::Tap);

        let err = editor.submit_password(DEFAULT_ACCESS_PASSWORD, &record).unwrap_err();
        assert!(matches!(err, EditorError::WrongPassword));
        assert!(editor.is_prompting());

        editor.submit_password("s3cret", &record).unwrap();
        assert_eq!(editor.draft().unwrap().profile.access_password, "s3cret");
    }

    #[test]
    fn test_dismiss_prompt() {
        let mut editor = ProfileEditor::default();
        editor.engage_avatar(Gesture::Tap);
        editor.dismiss_prompt();
        assert!(editor.is_viewing());
    }

    #[test]
    fn test_submit_without_prompt() {
        let mut editor = ProfileEditor::default();
        assert!(matches!(
            editor.submit_password("argps2025", &ProfileRecord::default()),
            Err(EditorError::NotPrompting)
        ));
        assert!(editor.is_viewing());
    }

    #[test]
    fn test_hold_policy_ignores_tap() {
        let mut editor = ProfileEditor::new(TriggerPolicy::Hold { hold_secs: 3 });
        assert_eq!(editor.engage_avatar(Gesture::Tap), EngageOutcome::Ignored);
        assert!(editor.is_viewing());

        assert_eq!(
            editor.engage_avatar(Gesture::Press(Duration::from_secs(4))),
            EngageOutcome::PromptOpened
        );
    }

    #[test]
    fn test_engage_while_editing_requests_image() {
        let mut editor = unlocked(&ProfileRecord::default());
        assert_eq!(editor.engage_avatar(Gesture::Tap), EngageOutcome::ChooseImage);
        assert!(editor.is_editing());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let record = ProfileRecord::default();
        let before = record.clone();
        let mut editor = unlocked(&record);

        editor.set_email("changed@example.com").unwrap();
        editor.set_phone("1112223333").unwrap();
        editor.set_password("new-pass").unwrap();
        editor.set_avatar_image("data:image/png;base64,aGk=").unwrap();
        editor.cancel().unwrap();

        assert!(editor.is_viewing());
        assert_eq!(record, before);
        assert_eq!(editor.displayed(&record), &before);
    }

    #[test]
    fn test_commit_returns_draft() {
        let record = ProfileRecord::default();
        let mut editor = unlocked(&record);

        editor.set_email("owner@argps.in").unwrap();
        assert_eq!(editor.displayed(&record).email, "owner@argps.in");
        assert!(editor.toggle_password_visibility().unwrap());

        let committed = editor.commit().unwrap();
        assert!(editor.is_viewing());
        assert_eq!(committed.email, "owner@argps.in");
        assert_eq!(committed.phone, record.phone);
    }

    #[test]
    fn test_commit_empty_password_falls_back() {
        let mut editor = unlocked(&ProfileRecord::default());
        editor.set_password("").unwrap();

        let committed = editor.commit().unwrap();
        assert_eq!(committed.access_password, DEFAULT_ACCESS_PASSWORD);
    }

    #[test]
    fn test_edits_rejected_outside_editing() {
        let mut editor = ProfileEditor::default();
        assert!(matches!(editor.set_email("x"), Err(EditorError::NotEditing)));
        assert!(matches!(editor.commit(), Err(EditorError::NotEditing)));
        assert!(matches!(editor.cancel(), Err(EditorError::NotEditing)));

        editor.engage_avatar(Gesture::Tap);
        assert!(matches!(editor.commit(), Err(EditorError::NotEditing)));
        assert!(editor.is_prompting());
    }

    #[tokio::test]
    async fn test_replace_avatar() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"hi").unwrap();

        let mut editor = unlocked(&ProfileRecord::default());
        editor.replace_avatar(file.path()).await.unwrap();

        let draft = editor.draft().unwrap();
        assert_eq!(draft.profile.avatar_image, "data:image/png;base64,aGk=");
        assert!(draft.profile.has_inline_avatar());
    }

    #[tokio::test]
    async fn test_replace_avatar_read_failure_keeps_draft() {
        let dir = tempfile::tempdir().unwrap();
        let record = ProfileRecord::default();
        let mut editor = unlocked(&record);
        editor.set_email("kept@example.com").unwrap();

        let err = editor
            .replace_avatar(&dir.path().join("missing.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, EditorError::Avatar(_)));
        let draft = editor.draft().unwrap();
        assert_eq!(draft.profile.avatar_image, record.avatar_image);
        assert_eq!(draft.profile.email, "kept@example.com");
    }
}
