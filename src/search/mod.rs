//! インクリメンタル検索
//!
//! クエリ文字列をそのまま（正規表現なし）行ごとに探し、見つかった箇所を
//! `SearchMatch` で塗る。塗る前のハイライトは保存しておき、次のキーで戻す。

use crate::editor::{Cursor, Editor};
use crate::input::keybinding::ctrl;
use crate::input::KeyCode;
use crate::syntax::HighlightTag;

/// C-r（後方検索）
const CTRL_R: u8 = 0x12;

/// 検索方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// キー処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 検索を続ける
    Continue,
    /// 現在の一致位置で確定
    Accepted,
    /// 取り消してカーソルを元に戻した
    Cancelled,
}

/// 実行中の検索
#[derive(Debug)]
pub struct SearchSession {
    query: Vec<u8>,
    last_match: Option<usize>,
    direction: SearchDirection,
    saved_highlight: Option<(usize, Vec<HighlightTag>)>,
    origin: Cursor,
}

impl SearchSession {
    /// 現在のカーソル位置から検索を始める
    pub fn start(editor: &Editor) -> Self {
        Self {
            query: Vec::new(),
            last_match: None,
            direction: SearchDirection::Forward,
            saved_highlight: None,
            origin: editor.cursor(),
        }
    }

    pub fn query(&self) -> &[u8] {
        &self.query
    }

    /// ステータス行に表示するプロンプト
    pub fn prompt(&self) -> String {
        format!(
            "Search: {} (Use ESC/Arrows/Enter)",
            String::from_utf8_lossy(&self.query)
        )
    }

    /// キーを1つ処理する
    pub fn handle_key(&mut self, editor: &mut Editor, key: KeyCode) -> SearchOutcome {
        self.restore_highlight(editor);

        match key {
            KeyCode::Escape | KeyCode::Byte(ctrl::G) => {
                editor.set_cursor(self.origin);
                return SearchOutcome::Cancelled;
            }
            KeyCode::Byte(ctrl::ENTER) => return SearchOutcome::Accepted,
            KeyCode::Byte(ctrl::BACKSPACE) | KeyCode::Byte(ctrl::H) | KeyCode::Delete => {
                self.query.pop();
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
            KeyCode::ArrowRight | KeyCode::ArrowDown | KeyCode::Byte(ctrl::S) => {
                self.direction = SearchDirection::Forward;
            }
            KeyCode::ArrowLeft | KeyCode::ArrowUp | KeyCode::Byte(CTRL_R) => {
                self.direction = SearchDirection::Backward;
            }
            KeyCode::Byte(byte) if byte == b'\t' || (0x20..=0x7e).contains(&byte) || byte >= 0x80 => {
                self.query.push(byte);
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
            _ => return SearchOutcome::Continue,
        }

        if !self.query.is_empty() {
            self.search(editor);
        }
        SearchOutcome::Continue
    }

    fn search(&mut self, editor: &mut Editor) {
        let count = editor.store().row_count();
        if count == 0 {
            return;
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        // 初回は元の位置の行から探す
        let mut current = match self.last_match {
            Some(row) => row,
            None => (self.origin.row.min(count) + count - 1) % count,
        };
        for _ in 0..count {
            current = match self.direction {
                SearchDirection::Forward => (current + 1) % count,
                SearchDirection::Backward => (current + count - 1) % count,
            };
            let Some(row) = editor.store().row(current) else {
                continue;
            };
            let Some(col) = find_in_row(row.content(), &self.query) else {
                continue;
            };

            let rx_start = row.cx_to_rx(col);
            let rx_end = row.cx_to_rx(col + self.query.len());
            self.last_match = Some(current);
            editor.set_cursor(Cursor::new(current, col));
            if let Some(saved) = editor.store_mut().paint_match(current, rx_start, rx_end - rx_start) {
                self.saved_highlight = Some((current, saved));
            }
            return;
        }
        log::debug!("no match for {:?}", String::from_utf8_lossy(&self.query));
    }

    /// 塗った行のハイライトを戻す
    pub fn restore_highlight(&mut self, editor: &mut Editor) {
        if let Some((row, saved)) = self.saved_highlight.take() {
            editor.store_mut().restore_highlight(row, saved);
        }
    }
}

/// 行内で最初に一致する列
pub fn find_in_row(content: &[u8], query: &[u8]) -> Option<usize> {
    if query.is_empty() || query.len() > content.len() {
        return None;
    }
    content.windows(query.len()).position(|window| window == query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(lines: &[&str]) -> Editor {
        let mut editor = Editor::new();
        editor
            .load_rows("find.c", lines.iter().map(|line| line.as_bytes()), true)
            .unwrap();
        editor
    }

    fn type_query(session: &mut SearchSession, editor: &mut Editor, query: &[u8]) {
        for &byte in query {
            session.handle_key(editor, KeyCode::Byte(byte));
        }
    }

    #[test]
    fn find_in_row_literal() {
        assert_eq!(find_in_row(b"a.b.c", b".c"), Some(3));
        assert_eq!(find_in_row(b"abc", b"x"), None);
        assert_eq!(find_in_row(b"ab", b"abc"), None);
    }

    #[test]
    fn typing_moves_to_match_and_paints() {
        let mut editor = editor_with(&["int a;", "int foo;", "return foo;"]);
        let mut session = SearchSession::start(&editor);
        type_query(&mut session, &mut editor, b"foo");

        assert_eq!(editor.cursor(), Cursor::new(1, 4));
        let highlight = editor.store().row(1).unwrap().highlight();
        assert_eq!(&highlight[4..7], &[HighlightTag::SearchMatch; 3]);

        // 次の一致へ移ると前の行は元に戻る
        session.handle_key(&mut editor, KeyCode::ArrowDown);
        assert_eq!(editor.cursor(), Cursor::new(2, 7));
        let highlight = editor.store().row(1).unwrap().highlight();
        assert_eq!(highlight[0], HighlightTag::KeywordSecondary);
        assert!(!highlight.contains(&HighlightTag::SearchMatch));

        session.handle_key(&mut editor, KeyCode::ArrowUp);
        assert_eq!(editor.cursor(), Cursor::new(1, 4));
    }

    #[test]
    fn escape_restores_cursor_and_highlight() {
        let mut editor = editor_with(&["alpha", "beta"]);
        let mut session = SearchSession::start(&editor);
        type_query(&mut session, &mut editor, b"et");
        assert_eq!(editor.cursor(), Cursor::new(1, 1));

        assert_eq!(session.handle_key(&mut editor, KeyCode::Escape), SearchOutcome::Cancelled);
        assert_eq!(editor.cursor(), Cursor::new(0, 0));
        assert!(editor
            .store()
            .rows()
            .iter()
            .all(|row| !row.highlight().contains(&HighlightTag::SearchMatch)));
    }

    #[test]
    fn enter_accepts_match() {
        let mut editor = editor_with(&["x", "needle"]);
        let mut session = SearchSession::start(&editor);
        type_query(&mut session, &mut editor, b"need");
        assert_eq!(session.handle_key(&mut editor, KeyCode::Byte(b'\r')), SearchOutcome::Accepted);
        assert_eq!(editor.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn paint_accounts_for_tabs() {
        let mut editor = editor_with(&["\tkey"]);
        let mut session = SearchSession::start(&editor);
        type_query(&mut session, &mut editor, b"key");
        let highlight = editor.store().row(0).unwrap().highlight();
        assert_eq!(&highlight[8..11], &[HighlightTag::SearchMatch; 3]);
        assert_eq!(highlight[0], HighlightTag::Normal);
    }
}
