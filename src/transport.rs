use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Outbound capability of the messaging platform.
///
/// The platform client (Telegram, Discord, a test double) lives behind this
/// trait; the managers never see anything more specific. Inbound traffic
/// arrives pre-parsed through [`crate::Assistant::handle_message`] and
/// [`crate::Assistant::handle_media_upload`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a text message to the owner
    async fn send(&self, owner_id: &str, text: &str) -> Result<()>;

    /// Deliver a file attachment; `location` is a local path or a URL the
    /// platform can fetch
    async fn send_file(&self, owner_id: &str, location: &str, display_name: &str) -> Result<()>;

    /// Resolve an opaque file handle to a fetchable URL
    async fn resolve_file_link(&self, file_ref: &str) -> Result<String>;
}

/// Shared transport handle passed to the managers
pub type SharedTransport = Arc<dyn Transport>;
