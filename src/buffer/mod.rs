//! 行ストア
//!
//! 文書の行を順序どおりに所有し、変更のたびに表示用テキストとハイライトを更新する

pub mod row;

pub use row::{Row, TAB_STOP};

use crate::error::{buffer::Result, BufferError};
use crate::syntax::{HighlightTag, Highlighter, SyntaxProfile};
use row::reserve;
use std::collections::VecDeque;

/// 行の順序付き集合
#[derive(Debug)]
pub struct RowStore {
    rows: Vec<Row>,
    /// 未保存の変更数（0 なら保存済み）
    dirty: usize,
    filename: Option<String>,
    highlighter: Highlighter,
    /// 読み込んだファイルが改行で終わっていたか
    trailing_newline: bool,
}

impl RowStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            filename: None,
            highlighter: Highlighter::default(),
            trailing_newline: true,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// 行の長さ（存在しない行は 0）
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn mark_dirty(&mut self) {
        self.dirty += 1;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = 0;
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// ファイル名を設定し、対応する言語プロファイルを選び直す
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        let filename = filename.into();
        self.set_profile(crate::syntax::select_profile(&filename));
        self.filename = Some(filename);
    }

    pub fn profile(&self) -> Option<&'static SyntaxProfile> {
        self.highlighter.profile()
    }

    /// 言語プロファイルを切り替えて全行をハイライトし直す
    pub fn set_profile(&mut self, profile: Option<&'static SyntaxProfile>) {
        self.highlighter = Highlighter::new(profile);
        let mut open = false;
        for row in &mut self.rows {
            open = self.highlighter.highlight_line(&row.rendered, open, &mut row.highlight);
            row.open_comment_at_end = open;
        }
    }

    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn set_trailing_newline(&mut self, trailing_newline: bool) {
        self.trailing_newline = trailing_newline;
    }

    fn check_row(&self, at: usize) -> Result<()> {
        if at >= self.rows.len() {
            return Err(BufferError::OutOfRange {
                index: at,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    /// `at` に行を挿入
    pub fn insert_row(&mut self, at: usize, bytes: &[u8]) -> Result<()> {
        if at > self.rows.len() {
            return Err(BufferError::OutOfRange {
                index: at,
                len: self.rows.len(),
            });
        }
        reserve(&mut self.rows, 1)?;

        let mut row = Row::new(at, bytes)?;
        // 次の行が直前に受け取っていた状態を記録しておき、変化した時だけ伝播させる
        row.open_comment_at_end = at > 0 && self.rows[at - 1].open_comment_at_end;
        self.rows.insert(at, row);
        self.renumber_from(at + 1);
        self.mark_dirty();
        self.rehighlight_from(at);
        Ok(())
    }

    /// `at` の行を削除して返す
    pub fn delete_row(&mut self, at: usize) -> Result<Row> {
        self.check_row(at)?;
        let removed = self.rows.remove(at);
        self.renumber_from(at);
        self.mark_dirty();
        if at < self.rows.len() {
            self.rehighlight_from(at);
        }
        Ok(removed)
    }

    /// 行 `at` の列 `col` に1バイト挿入
    pub fn insert_byte(&mut self, at: usize, col: usize, byte: u8) -> Result<()> {
        self.check_row(at)?;
        self.rows[at].insert_byte(col, byte)?;
        self.mark_dirty();
        self.rehighlight_from(at);
        Ok(())
    }

    /// 行 `at` の列 `col` のバイトを削除
    pub fn delete_byte(&mut self, at: usize, col: usize) -> Result<u8> {
        self.check_row(at)?;
        let byte = self.rows[at].delete_byte(col)?;
        self.mark_dirty();
        self.rehighlight_from(at);
        Ok(byte)
    }

    /// 行 `at` の末尾に追加
    pub fn append_to_row(&mut self, at: usize, bytes: &[u8]) -> Result<()> {
        self.check_row(at)?;
        self.rows[at].append(bytes)?;
        self.mark_dirty();
        self.rehighlight_from(at);
        Ok(())
    }

    /// 行 `at` を長さ `len` に切り詰め、切り取った部分を返す
    pub fn truncate_row(&mut self, at: usize, len: usize) -> Result<Vec<u8>> {
        self.check_row(at)?;
        let tail = self.rows[at].split_off(len)?;
        self.mark_dirty();
        self.rehighlight_from(at);
        Ok(tail)
    }

    /// 行 `at` を列 `col` で2行に分割
    pub fn split_row(&mut self, at: usize, col: usize) -> Result<()> {
        self.check_row(at)?;
        let tail = self.rows[at].content()[col.min(self.rows[at].len())..].to_vec();
        self.insert_row(at + 1, &tail)?;
        self.truncate_row(at, col.min(self.rows[at].len()))?;
        Ok(())
    }

    /// 行 `at` に次の行を連結し、次の行を削除
    pub fn join_rows(&mut self, at: usize) -> Result<()> {
        self.check_row(at + 1)?;
        let next = self.rows[at + 1].content.clone();
        self.append_to_row(at, &next)?;
        self.delete_row(at + 1)?;
        Ok(())
    }

    /// 全行を改行で連結（保存用）
    pub fn rows_to_text(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|row| row.len() + 1).sum();
        let mut text = Vec::with_capacity(total);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                text.push(b'\n');
            }
            text.extend_from_slice(&row.content);
        }
        if self.trailing_newline && !self.rows.is_empty() {
            text.push(b'\n');
        }
        text
    }

    /// 検索一致箇所を塗り、元のハイライトを返す
    pub fn paint_match(&mut self, at: usize, start: usize, len: usize) -> Option<Vec<HighlightTag>> {
        let row = self.rows.get_mut(at)?;
        let saved = row.highlight.clone();
        let end = (start + len).min(row.highlight.len());
        if start < end {
            row.highlight[start..end].fill(HighlightTag::SearchMatch);
        }
        Some(saved)
    }

    /// `paint_match` で保存したハイライトを戻す
    pub fn restore_highlight(&mut self, at: usize, saved: Vec<HighlightTag>) {
        if let Some(row) = self.rows.get_mut(at) {
            if saved.len() == row.rendered.len() {
                row.highlight = saved;
            }
        }
    }

    /// 行 `start` から再ハイライトし、行末のコメント状態が変わる限り後続行へ伝播
    ///
    /// 再帰ではなく作業キューで処理する
    pub fn rehighlight_from(&mut self, start: usize) {
        let mut pending = VecDeque::from([start]);
        let mut retagged = 0usize;

        while let Some(at) = pending.pop_front() {
            if at >= self.rows.len() {
                break;
            }
            let starts_in_comment = at > 0 && self.rows[at - 1].open_comment_at_end;
            let highlighter = &self.highlighter;
            let row = &mut self.rows[at];

            let was_open = row.open_comment_at_end;
            let now_open = highlighter.highlight_line(&row.rendered, starts_in_comment, &mut row.highlight);
            row.open_comment_at_end = now_open;
            retagged += 1;

            if now_open != was_open {
                pending.push_back(at + 1);
            }
        }

        if retagged > 1 {
            log::debug!("rehighlighted {} rows starting at {}", retagged, start);
        }
    }

    fn renumber_from(&mut self, start: usize) {
        for (index, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.index = index;
        }
    }
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}
