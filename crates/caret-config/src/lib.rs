pub mod config;
pub mod session;

pub use config::{EditorConfig, DEFAULT_WORD_SEPARATORS};
pub use session::{CursorSnapshot, PositionSnapshot, RangeSnapshot, SessionStore};
