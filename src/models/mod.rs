pub mod media;
pub mod note;
pub mod reminder;

pub use media::{Media, MediaKind, MediaUpload};
pub use note::Note;
pub use reminder::{Recurrence, Reminder};
