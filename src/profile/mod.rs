//! Admin Profile
//!
//! The single profile record shown on the profile screen, the password-gated
//! editor that changes it, and the stores that keep it.
//!
//! ## Architecture
//!
//! - **ProfileRecord**: contact details, avatar and access password
//! - **ProfileEditor**: Viewing / PasswordPrompt / Editing state machine
//! - **ProfileStore**: upsert-by-id persistence (REST row, local file, memory)
//! - **avatar**: local image file to inline data URL

mod avatar;
mod editor;
mod store;
mod trigger;

pub use avatar::{encode_image_file, image_data_url, mime_for_path, AvatarError};
pub use editor::{Draft, EditorError, EditorState, EngageOutcome, ProfileEditor, WRONG_PASSWORD};
pub use store::{
    load_or_create, FileProfileStore, MemoryProfileStore, ProfileRow, ProfileStore,
    RestProfileStore, RestStoreConfig, StoreError,
};
pub use trigger::{Gesture, TriggerPolicy};

use serde::{Deserialize, Serialize};

/// Used whenever a record has no access password
pub const DEFAULT_ACCESS_PASSWORD: &str = "argps2025";

pub const DEFAULT_EMAIL: &str = "rithanya@example.com";

pub const DEFAULT_AVATAR_URL: &str = "https://images.unsplash.com/photo-1494790108377-be9c29b29330?ixlib=rb-4.0.3&auto=format&fit=crop&w=256&q=80";

/// The admin profile; exactly one exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub email: String,
    pub phone: String,
    /// Remote URL or inline `data:` URL
    pub avatar_image: String,
    pub access_password: String,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            phone: String::new(),
            avatar_image: DEFAULT_AVATAR_URL.to_string(),
            access_password: DEFAULT_ACCESS_PASSWORD.to_string(),
        }
    }
}

impl ProfileRecord {
    /// Replace an empty access password with [`DEFAULT_ACCESS_PASSWORD`]
    pub fn with_password_fallback(mut self) -> Self {
        if self.access_password.is_empty() {
            self.access_password = DEFAULT_ACCESS_PASSWORD.to_string();
        }
        self
    }

    /// The password the gate compares against
    pub fn effective_password(&self) -> &str {
        if self.access_password.is_empty() {
            DEFAULT_ACCESS_PASSWORD
        } else {
            &self.access_password
        }
    }

    /// Whether the avatar is stored inline rather than as a link
    pub fn has_inline_avatar(&self) -> bool {
        self.avatar_image.starts_with("data:")
    }
}
