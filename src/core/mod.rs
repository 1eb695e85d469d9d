pub mod bridge;
pub mod connection;

pub use crate::domain::model::{NoteCommand, SendNoteRequest, SendNoteResponse};
pub use crate::domain::ports::{LinkOpener, SerialLink};
pub use crate::utils::error::Result;
