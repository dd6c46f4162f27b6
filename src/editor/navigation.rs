//! カーソル移動

use super::{Cursor, Editor};

impl Editor {
    pub fn move_left(&mut self) {
        let Cursor { row, col } = self.cursor;
        if col > 0 {
            self.cursor.col = col - 1;
        } else if row > 0 {
            self.cursor = Cursor::new(row - 1, self.store.row_len(row - 1));
        }
    }

    pub fn move_right(&mut self) {
        let Cursor { row, col } = self.cursor;
        if row >= self.store.row_count() {
            return;
        }
        if col < self.store.row_len(row) {
            self.cursor.col = col + 1;
        } else {
            self.cursor = Cursor::new(row + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.row < self.store.row_count() {
            self.cursor.row += 1;
            self.clamp_col();
        }
    }

    pub fn move_line_start(&mut self) {
        self.cursor.col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor.col = self.store.row_len(self.cursor.row);
    }

    pub fn move_buffer_start(&mut self) {
        self.cursor = Cursor::default();
    }

    /// 最終行の行末へ
    pub fn move_buffer_end(&mut self) {
        let count = self.store.row_count();
        self.cursor = match count {
            0 => Cursor::default(),
            _ => Cursor::new(count - 1, self.store.row_len(count - 1)),
        };
    }

    /// 次の単語の末尾へ（空白区切り、行をまたぐ）
    pub fn move_word_forward(&mut self) {
        let mut pos = self.cursor;
        while let Some(byte) = self.byte_at(pos) {
            if !is_blank(byte) {
                break;
            }
            pos = self.step_forward(pos);
        }
        while let Some(byte) = self.byte_at(pos) {
            if is_blank(byte) {
                break;
            }
            pos = self.step_forward(pos);
        }
        self.cursor = pos;
    }

    /// 前の単語の先頭へ
    pub fn move_word_backward(&mut self) {
        let mut pos = self.cursor;
        while let Some(prev) = self.step_backward(pos) {
            if !self.byte_at(prev).map_or(true, is_blank) {
                break;
            }
            pos = prev;
        }
        while let Some(prev) = self.step_backward(pos) {
            if self.byte_at(prev).map_or(true, is_blank) {
                break;
            }
            pos = prev;
        }
        self.cursor = pos;
    }

    /// 次の空行へ（無ければ最終行の次）
    pub fn move_paragraph_forward(&mut self) {
        let count = self.store.row_count();
        let mut row = self.cursor.row;
        while row < count && self.is_blank_row(row) {
            row += 1;
        }
        while row < count && !self.is_blank_row(row) {
            row += 1;
        }
        self.cursor = Cursor::new(row, 0);
    }

    /// 前の空行へ（無ければ先頭行）
    pub fn move_paragraph_backward(&mut self) {
        let mut row = self.cursor.row.min(self.store.row_count());
        while row > 0 && self.is_blank_row(row - 1) {
            row -= 1;
        }
        while row > 0 && !self.is_blank_row(row - 1) {
            row -= 1;
        }
        self.cursor = Cursor::new(row.saturating_sub(1), 0);
    }

    pub fn page_up(&mut self, page_rows: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(page_rows.max(1));
        self.clamp_col();
    }

    pub fn page_down(&mut self, page_rows: usize) {
        self.cursor.row = (self.cursor.row + page_rows.max(1)).min(self.store.row_count());
        self.clamp_col();
    }

    fn clamp_col(&mut self) {
        self.cursor.col = self.cursor.col.min(self.store.row_len(self.cursor.row));
    }

    fn is_blank_row(&self, row: usize) -> bool {
        self.row_text(row)
            .map_or(true, |content| content.iter().all(|&byte| is_blank(byte)))
    }

    /// `pos` のバイト。行末は改行として扱い、仮想行は `None`
    fn byte_at(&self, pos: Cursor) -> Option<u8> {
        let content = self.row_text(pos.row)?;
        Some(content.get(pos.col).copied().unwrap_or(b'\n'))
    }

    fn step_forward(&self, pos: Cursor) -> Cursor {
        if pos.col < self.store.row_len(pos.row) {
            Cursor::new(pos.row, pos.col + 1)
        } else {
            Cursor::new(pos.row + 1, 0)
        }
    }

    fn step_backward(&self, pos: Cursor) -> Option<Cursor> {
        if pos.col > 0 {
            Some(Cursor::new(pos.row, pos.col - 1))
        } else if pos.row > 0 {
            Some(Cursor::new(pos.row - 1, self.store.row_len(pos.row - 1)))
        } else {
            None
        }
    }
}

fn is_blank(byte: u8) -> bool {
    byte.is_ascii_whitespace()
}
