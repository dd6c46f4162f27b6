//! キーバインド
//!
//! Emacs風のキー割り当て。`C-x` はプレフィックスとして次のキーと組み合わせる

use super::decoder::KeyCode;

/// 制御文字
pub mod ctrl {
    pub const SPACE: u8 = 0x00;
    pub const A: u8 = 0x01;
    pub const B: u8 = 0x02;
    pub const C: u8 = 0x03;
    pub const D: u8 = 0x04;
    pub const E: u8 = 0x05;
    pub const F: u8 = 0x06;
    pub const G: u8 = 0x07;
    pub const H: u8 = 0x08;
    pub const TAB: u8 = 0x09;
    pub const J: u8 = 0x0a;
    pub const K: u8 = 0x0b;
    pub const ENTER: u8 = 0x0d;
    pub const N: u8 = 0x0e;
    pub const P: u8 = 0x10;
    pub const S: u8 = 0x13;
    pub const V: u8 = 0x16;
    pub const W: u8 = 0x17;
    pub const X: u8 = 0x18;
    pub const Y: u8 = 0x19;
    pub const UNDERSCORE: u8 = 0x1f;
    pub const BACKSPACE: u8 = 0x7f;
}

/// 編集コマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// キー入力による文字挿入
    Insert(u8),
    InsertNewline,
    DeleteBackward,
    DeleteForward,
    KillLine,
    SetMark,
    KillRegion,
    CopyRegion,
    Yank,
    Undo,
    Search,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    WordForward,
    WordBackward,
    ParagraphForward,
    ParagraphBackward,
    PageUp,
    PageDown,
    Save,
    Quit,
    Cancel,
}

/// キー検索結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup {
    Command(Command),
    /// プレフィックスキー（続きを待つ）
    Prefix,
    /// 未割り当て
    Unbound,
}

/// キー割り当てとプレフィックス状態
#[derive(Debug, Default)]
pub struct KeyMap {
    pending_prefix: bool,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `C-x` の続きを待っているか
    pub fn is_pending(&self) -> bool {
        self.pending_prefix
    }

    pub fn reset(&mut self) {
        self.pending_prefix = false;
    }

    /// キーをコマンドに変換
    pub fn process(&mut self, key: KeyCode) -> KeyLookup {
        if std::mem::take(&mut self.pending_prefix) {
            return match key {
                KeyCode::Byte(ctrl::S) => KeyLookup::Command(Command::Save),
                KeyCode::Byte(ctrl::C) => KeyLookup::Command(Command::Quit),
                KeyCode::Byte(ctrl::G) | KeyCode::Escape => KeyLookup::Command(Command::Cancel),
                _ => KeyLookup::Unbound,
            };
        }

        if key == KeyCode::Byte(ctrl::X) {
            self.pending_prefix = true;
            return KeyLookup::Prefix;
        }

        match lookup_single(key) {
            Some(command) => KeyLookup::Command(command),
            None => KeyLookup::Unbound,
        }
    }
}

fn lookup_single(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Byte(byte) => return lookup_byte(byte),
        KeyCode::Escape => Command::Cancel,
        KeyCode::AltF | KeyCode::CtrlRight => Command::WordForward,
        KeyCode::AltB | KeyCode::CtrlLeft => Command::WordBackward,
        KeyCode::AltV | KeyCode::PageUp => Command::PageUp,
        KeyCode::AltW => Command::CopyRegion,
        KeyCode::ArrowUp => Command::MoveUp,
        KeyCode::ArrowDown => Command::MoveDown,
        KeyCode::ArrowLeft => Command::MoveLeft,
        KeyCode::ArrowRight => Command::MoveRight,
        KeyCode::Home => Command::LineStart,
        KeyCode::End => Command::LineEnd,
        KeyCode::Delete => Command::DeleteForward,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::CtrlUp => Command::ParagraphBackward,
        KeyCode::CtrlDown => Command::ParagraphForward,
        KeyCode::CtrlHome => Command::BufferStart,
        KeyCode::CtrlEnd => Command::BufferEnd,
    };
    Some(command)
}

fn lookup_byte(byte: u8) -> Option<Command> {
    let command = match byte {
        ctrl::A => Command::LineStart,
        ctrl::E => Command::LineEnd,
        ctrl::B => Command::MoveLeft,
        ctrl::F => Command::MoveRight,
        ctrl::N => Command::MoveDown,
        ctrl::P => Command::MoveUp,
        ctrl::D => Command::DeleteForward,
        ctrl::H | ctrl::BACKSPACE => Command::DeleteBackward,
        ctrl::K => Command::KillLine,
        ctrl::SPACE => Command::SetMark,
        ctrl::W => Command::KillRegion,
        ctrl::Y => Command::Yank,
        ctrl::UNDERSCORE => Command::Undo,
        ctrl::S => Command::Search,
        ctrl::V => Command::PageDown,
        ctrl::G => Command::Cancel,
        ctrl::ENTER | ctrl::J => Command::InsertNewline,
        ctrl::TAB => Command::Insert(byte),
        0x20..=0x7e | 0x80..=0xff => Command::Insert(byte),
        _ => return None,
    };
    Some(command)
}
