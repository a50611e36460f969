pub mod backend;
pub mod commands;
pub mod config;
pub mod desk;
pub mod display;
pub mod editor;
pub mod error;
pub mod list;
pub mod model;
pub mod session;

// Re-export commonly used types for easier testing
pub use backend::{RecordStore, SessionService};
pub use desk::ReviewDesk;
pub use editor::{AnnotationEditor, EditorState};
pub use error::{BackendError, DeskError};
pub use list::{ListController, StatusFilter, PAGE_SIZE};
pub use model::{Annotation, AnnotationFields, DashboardRecord, DatasetMatch, Status};
