// Library surface for the binary, headless drivers and integration tests.
pub mod app_dirs;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod keys;
pub mod lesson;
pub mod metrics;
pub mod results;
pub mod rng;
pub mod runtime;
pub mod session;
pub mod store;

pub use error::{KeydrillError, Result};
pub use generator::generate_lesson;
pub use keys::normalize_key;
pub use lesson::{GeneratedTarget, LessonKind, LessonSpec};
pub use session::{Session, SessionRecord, Transition, TypingState};
