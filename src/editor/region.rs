//! マークとリージョン（切り取り・コピー・貼り付け）
//!
//! 範囲全体を1つのアンドゥ操作として記録し、実際の編集は記録を抑止して行う

use super::{Cursor, Editor, UndoOp};
use crate::error::Result;

impl Editor {
    /// カーソル位置にマークを置く
    pub fn set_mark(&mut self) {
        self.mark = Some(self.cursor);
    }

    pub fn mark(&self) -> Option<Cursor> {
        self.mark
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    /// マークとカーソルの間（先頭, 末尾）。実在する行に収める
    pub fn region(&self) -> Option<(Cursor, Cursor)> {
        let mark = self.mark?;
        let (start, end) = if mark <= self.cursor {
            (mark, self.cursor)
        } else {
            (self.cursor, mark)
        };
        Some((self.clamp_to_text(start), self.clamp_to_text(end)))
    }

    fn clamp_to_text(&self, pos: Cursor) -> Cursor {
        let count = self.store.row_count();
        if count == 0 {
            return Cursor::default();
        }
        if pos.row >= count {
            return Cursor::new(count - 1, self.store.row_len(count - 1));
        }
        Cursor::new(pos.row, pos.col.min(self.store.row_len(pos.row)))
    }

    /// 範囲内のテキスト（行の区切りは改行）
    pub fn region_text(&self, start: Cursor, end: Cursor) -> Vec<u8> {
        let mut text = Vec::new();
        for row in start.row..=end.row {
            let Some(content) = self.row_text(row) else {
                break;
            };
            let from = if row == start.row { start.col } else { 0 };
            let to = if row == end.row { end.col } else { content.len() };
            if from < to {
                text.extend_from_slice(&content[from..to]);
            }
            if row != end.row {
                text.push(b'\n');
            }
        }
        text
    }

    /// リージョンを切り取る。マークが無ければ `None`
    pub fn kill_region(&mut self) -> Result<Option<usize>> {
        let Some((start, end)) = self.region() else {
            return Ok(None);
        };
        let text = self.region_text(start, end);
        let killed = text.len();

        self.cursor = start;
        self.without_recording(|editor| {
            for _ in 0..killed {
                editor.delete_forward()?;
            }
            Ok::<(), crate::error::KgError>(())
        })?;
        self.record(UndoOp::KillText {
            row: start.row,
            col: start.col,
            text: text.clone(),
        });

        self.kill_ring.push(text);
        self.mark = None;
        Ok(Some(killed))
    }

    /// リージョンをキルリングへコピーする。マークが無ければ `None`
    pub fn copy_region(&mut self) -> Result<Option<usize>> {
        let Some((start, end)) = self.region() else {
            return Ok(None);
        };
        let text = self.region_text(start, end);
        let copied = text.len();
        self.kill_ring.push(text);
        self.mark = None;
        Ok(Some(copied))
    }

    /// 最新のキルをカーソル位置に貼り付ける。キルリングが空なら `None`
    pub fn yank(&mut self) -> Result<Option<usize>> {
        let Some(text) = self.kill_ring.front().map(<[u8]>::to_vec) else {
            return Ok(None);
        };
        // 仮想行では最終行の行末から改行ごと貼り付け、1操作として記録する
        let count = self.store.row_count();
        let mut inserted = Vec::with_capacity(text.len() + 1);
        if self.cursor.row >= count && count > 0 {
            self.cursor = Cursor::new(count - 1, self.store.row_len(count - 1));
            inserted.push(b'\n');
        } else {
            self.ensure_cursor_row()?;
        }
        inserted.extend_from_slice(&text);

        let Cursor { row, col } = self.cursor;
        let col = col.min(self.store.row_len(row));
        self.cursor.col = col;

        self.without_recording(|editor| {
            for &byte in &inserted {
                if byte == b'\n' {
                    editor.insert_newline()?;
                } else {
                    editor.insert_char(byte)?;
                }
            }
            Ok::<(), crate::error::KgError>(())
        })?;
        self.record(UndoOp::YankText {
            row,
            col,
            text: inserted,
        });
        Ok(Some(text.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(lines: &[&str]) -> Editor {
        let mut editor = Editor::new();
        editor
            .load_rows("notes.txt", lines.iter().map(|line| line.as_bytes()), true)
            .unwrap();
        editor
    }

    fn lines(editor: &Editor) -> Vec<String> {
        editor
            .store()
            .rows()
            .iter()
            .map(|row| String::from_utf8_lossy(row.content()).into_owned())
            .collect()
    }

    #[test]
    fn no_mark_means_no_region() {
        let mut editor = editor_with(&["abc"]);
        assert_eq!(editor.kill_region().unwrap(), None);
        assert_eq!(editor.copy_region().unwrap(), None);
    }

    #[test]
    fn kill_region_is_one_undo_step() {
        let mut editor = editor_with(&["alpha", "beta", "gamma"]);
        editor.set_cursor(Cursor::new(0, 2));
        editor.set_mark();
        editor.set_cursor(Cursor::new(2, 1));

        assert_eq!(editor.kill_region().unwrap(), Some(10));
        assert_eq!(lines(&editor), vec!["alamma"]);
        assert_eq!(editor.kill_ring().front(), Some(&b"pha\nbeta\ng"[..]));
        assert_eq!(editor.history().depth(), 1);
        assert_eq!(editor.cursor(), Cursor::new(0, 2));

        editor.undo().unwrap();
        assert_eq!(lines(&editor), vec!["alpha", "beta", "gamma"]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn mark_after_cursor_is_ordered() {
        let mut editor = editor_with(&["hello world"]);
        editor.set_cursor(Cursor::new(0, 11));
        editor.set_mark();
        editor.set_cursor(Cursor::new(0, 6));
        assert_eq!(editor.copy_region().unwrap(), Some(5));
        assert_eq!(editor.kill_ring().front(), Some(&b"world"[..]));
        assert_eq!(lines(&editor), vec!["hello world"]);
        assert!(editor.history().is_empty());
    }

    #[test]
    fn yank_multiline_then_undo() {
        let mut editor = editor_with(&["ab", "cd"]);
        editor.set_cursor(Cursor::new(0, 1));
        editor.set_mark();
        editor.set_cursor(Cursor::new(1, 1));
        editor.copy_region().unwrap();

        editor.set_cursor(Cursor::new(1, 2));
        assert_eq!(editor.yank().unwrap(), Some(3));
        assert_eq!(lines(&editor), vec!["ab", "cdb", "c"]);
        assert_eq!(editor.cursor(), Cursor::new(2, 1));
        assert_eq!(editor.history().depth(), 1);

        editor.undo().unwrap();
        assert_eq!(lines(&editor), vec!["ab", "cd"]);
    }

    #[test]
    fn yank_on_virtual_line_adds_row() {
        let mut editor = editor_with(&["x"]);
        editor.set_mark();
        editor.set_cursor(Cursor::new(0, 1));
        editor.copy_region().unwrap();

        editor.set_cursor(Cursor::new(1, 0));
        editor.yank().unwrap();
        assert_eq!(lines(&editor), vec!["x", "x"]);
        assert_eq!(editor.cursor(), Cursor::new(1, 1));
        assert_eq!(editor.history().depth(), 1);

        editor.undo().unwrap();
        assert_eq!(lines(&editor), vec!["x"]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn yank_on_virtual_line_after_empty_row() {
        let mut editor = editor_with(&["ab", ""]);
        editor.set_mark();
        editor.set_cursor(Cursor::new(0, 2));
        editor.copy_region().unwrap();

        editor.set_cursor(Cursor::new(2, 0));
        editor.yank().unwrap();
        assert_eq!(lines(&editor), vec!["ab", "", "ab"]);
        assert_eq!(editor.history().depth(), 1);

        editor.undo().unwrap();
        assert_eq!(lines(&editor), vec!["ab", ""]);
    }

    #[test]
    fn yank_into_empty_buffer_creates_first_row() {
        let mut editor = editor_with(&["q"]);
        editor.set_mark();
        editor.set_cursor(Cursor::new(0, 1));
        editor.kill_region().unwrap();
        editor.delete_row(0).unwrap();
        assert!(editor.store().is_empty());

        editor.yank().unwrap();
        assert_eq!(lines(&editor), vec!["q"]);
        while editor.undo().is_ok() {}
        assert_eq!(lines(&editor), vec!["q"]);
    }

    #[test]
    fn empty_kill_ring_yanks_nothing() {
        let mut editor = editor_with(&["x"]);
        assert_eq!(editor.yank().unwrap(), None);
        assert!(editor.history().is_empty());
    }
}
