//! UIモジュール
//!
//! ratatuiベースのターミナルUI機能

pub mod renderer;
pub mod terminal;
pub mod viewport;

// 公開API
pub use renderer::{draw_screen, ScreenView};
pub use terminal::{create_terminal, restore_terminal, RawModeGuard, ResizeFlag, ResizeWatcher};
pub use viewport::Viewport;
