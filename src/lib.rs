//! kg - small terminal text editor
//!
//! 行ストア・シンタックスハイライト・アンドゥログ・キー入力デコーダを中心とした編集コア

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;
pub mod syntax;

// 編集層
pub mod editor;
pub mod search;

// 入力・表示層
pub mod input;
pub mod ui;

pub mod app;

// 公開API
pub use app::App;
pub use buffer::{Row, RowStore};
pub use config::Config;
pub use editor::{Cursor, Editor, UndoLog, UndoOp};
pub use error::{KgError, Result};
pub use input::{KeyCode, KeyDecoder};
pub use syntax::{color_for, select_profile, HighlightTag};
