//! What the managers need from the page around them.

use std::error::Error;

use async_trait::async_trait;
use model::{session::SessionHash, LngLat};

/// The pins drawn on the map widget.
pub trait MapOverlay {
    type Handle: Clone;

    fn add(&mut self, position: LngLat) -> Self::Handle;
    fn set_position(&mut self, handle: &Self::Handle, position: LngLat);
    fn remove(&mut self, handle: &Self::Handle);
}

/// Modal dialogs.
pub trait Notifier {
    fn alert(&self, message: &str);
    fn confirm(&self, question: &str) -> bool;
}

#[async_trait]
pub trait Clipboard: Send {
    async fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// The page address and its `session_hash` query parameter.
pub trait UrlState {
    fn session_hash(&self) -> Option<String>;
    /// Swaps the parameter in place, without adding a history entry.
    fn replace_session_hash(&mut self, session_hash: &SessionHash);
    fn origin(&self) -> String;
}
