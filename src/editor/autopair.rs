//! 括弧・引用符の自動補完

use super::Editor;
use crate::error::Result;

/// 開き記号に対応する閉じ記号
pub fn closing_pair(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'[' => Some(b']'),
        b'(' => Some(b')'),
        b'"' => Some(b'"'),
        b'\'' => Some(b'\''),
        b'`' => Some(b'`'),
        b'<' => Some(b'>'),
        _ => None,
    }
}

/// 直後がこれらの文字なら閉じ記号を補う
fn allows_pair_before(next: Option<u8>) -> bool {
    match next {
        None => true,
        Some(byte) => byte.is_ascii_whitespace() || b",.()+-/*=~%[];{}".contains(&byte),
    }
}

impl Editor {
    /// キー入力による1文字挿入（自動補完あり）
    ///
    /// ペースト中と自動補完無効時は `insert_char` と同じ
    pub fn type_char(&mut self, ch: u8) -> Result<()> {
        self.insert_char(ch)?;

        if !self.auto_pair || self.paste_mode {
            return Ok(());
        }
        let Some(close) = closing_pair(ch) else {
            return Ok(());
        };

        let next = self
            .row_text(self.cursor.row)
            .and_then(|content| content.get(self.cursor.col).copied());
        if allows_pair_before(next) {
            self.insert_char(close)?;
            self.cursor.col -= 1;
        }
        Ok(())
    }
}
