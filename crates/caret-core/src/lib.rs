pub mod buffer;
pub mod columns;
pub mod commands;
pub mod context;
pub mod cursor;
pub mod lines;
pub mod model;
pub mod movement;
pub mod position;
pub mod session;
pub mod state;
pub mod view;
pub mod word;

pub use commands::{CursorMoveArgs, MoveDirection, MoveUnit, RawMoveArgs};
pub use context::{CursorConfig, CursorContext, EditorState};
pub use cursor::Cursor;
pub use lines::LineModel;
pub use model::{MarkerId, TextModel};
pub use position::{Position, Range, Selection, SelectionDirection};
pub use state::{CursorState, ModelState, PartialCursorState, SavedCursorState, ViewState};
pub use view::{CoordinatesConverter, FoldRange, ViewLayout, ViewModel, ViewOptions};
pub use word::{WordClassifier, WordNavigation};
