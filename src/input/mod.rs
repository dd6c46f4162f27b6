//! 入力処理モジュール
//!
//! バイト入力源、エスケープシーケンスのデコード、ペースト判定、キーバインドを提供

pub mod decoder;
pub mod keybinding;
pub mod paste;
pub mod source;

// 公開API
pub use decoder::{transition, DecodeState, KeyCode, KeyDecoder, Transition};
pub use keybinding::{Command, KeyLookup, KeyMap};
pub use paste::PasteDetector;
pub use source::{ByteSource, ScriptedSource, StdinSource};
