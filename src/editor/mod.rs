//! 編集ファサード
//!
//! すべての行変更はここを通り、アンドゥログへの記録と行ストアの更新を同時に行う。
//! 記録は行ストアの変更が成功した後に行うので、失敗した操作はログに残らない。

pub mod autopair;
pub mod history;
pub mod kill_ring;
pub mod navigation;
pub mod region;

pub use history::{UndoLog, UndoOp, UNDO_LIMIT};
pub use kill_ring::KillRing;

use crate::buffer::RowStore;
use crate::error::{buffer, BufferError, Result, UndoError};

/// カーソル位置（`row == row_count()` は最終行の次の仮想行）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// 1つの編集セッション
#[derive(Debug)]
pub struct Editor {
    store: RowStore,
    history: UndoLog,
    cursor: Cursor,
    kill_ring: KillRing,
    mark: Option<Cursor>,
    /// 直前のコマンドが行キルだったか（連続キルの連結用）
    kill_chain: bool,
    paste_mode: bool,
    auto_pair: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            store: RowStore::new(),
            history: UndoLog::new(),
            cursor: Cursor::default(),
            kill_ring: KillRing::new(),
            mark: None,
            kill_chain: false,
            paste_mode: false,
            auto_pair: true,
        }
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut RowStore {
        &mut self.store
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// カーソルを移動（バッファ内に収める）
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = self.clamp(cursor);
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn set_paste_mode(&mut self, paste_mode: bool) {
        self.paste_mode = paste_mode;
    }

    pub fn paste_mode(&self) -> bool {
        self.paste_mode
    }

    pub fn set_auto_pair(&mut self, auto_pair: bool) {
        self.auto_pair = auto_pair;
    }

    /// 行キル以外のコマンドで連続キルを打ち切る
    pub fn break_kill_chain(&mut self) {
        self.kill_chain = false;
    }

    /// 行をアンドゥ記録なしで読み込み、保存済み状態にする
    pub fn load_rows<I, R>(&mut self, filename: &str, rows: I, trailing_newline: bool) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        let mut store = RowStore::new();
        for (at, row) in rows.into_iter().enumerate() {
            store.insert_row(at, row.as_ref())?;
        }
        store.set_trailing_newline(trailing_newline);
        store.set_filename(filename);
        store.clear_dirty();

        self.store = store;
        self.history = UndoLog::new();
        self.history.mark_clean();
        self.cursor = Cursor::default();
        self.mark = None;
        Ok(())
    }

    /// 新規ファイル名を設定（内容は空のまま）
    pub fn set_filename(&mut self, filename: &str) {
        self.store.set_filename(filename);
    }

    /// 操作を記録
    pub fn record(&mut self, op: UndoOp) {
        log::trace!("record {:?}", op);
        self.history.push(op);
    }

    /// クロージャ実行中はアンドゥ記録を抑止する（複合編集用）
    pub fn without_recording<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.history.set_suppressed(true);
        let result = f(self);
        self.history.set_suppressed(previous);
        result
    }

    /// 保存成功後に呼ぶ
    pub fn mark_clean(&mut self) {
        self.history.mark_clean();
        self.store.clear_dirty();
    }

    /// 仮想行にいる場合は空行を追加してカーソル行を実在させる
    fn ensure_cursor_row(&mut self) -> Result<()> {
        let row = self.cursor.row;
        if row >= self.store.row_count() {
            let at = self.store.row_count();
            self.store.insert_row(at, b"")?;
            self.record(UndoOp::InsertRow { row: at });
            self.cursor = Cursor::new(at, 0);
        }
        Ok(())
    }

    /// カーソル位置に1バイト挿入
    pub fn insert_char(&mut self, ch: u8) -> Result<()> {
        self.ensure_cursor_row()?;
        let Cursor { row, col } = self.cursor;
        self.store.insert_byte(row, col, ch)?;
        self.record(UndoOp::InsertChar { row, col, ch });
        self.cursor.col += 1;
        Ok(())
    }

    /// 改行を挿入
    pub fn insert_newline(&mut self) -> Result<()> {
        let Cursor { row, col } = self.cursor;
        if row >= self.store.row_count() || col == 0 {
            let at = row.min(self.store.row_count());
            self.store.insert_row(at, b"")?;
            self.record(UndoOp::InsertRow { row: at });
            self.cursor = Cursor::new(at + 1, 0);
        } else {
            let col = col.min(self.store.row_len(row));
            self.store.split_row(row, col)?;
            self.record(UndoOp::SplitRow { row, col });
            self.cursor = Cursor::new(row + 1, 0);
        }
        Ok(())
    }

    /// カーソルの左を削除（行頭なら前の行に連結）
    pub fn delete_char(&mut self) -> Result<()> {
        let Cursor { row, col } = self.cursor;
        if row >= self.store.row_count() || (row == 0 && col == 0) {
            return Ok(());
        }

        if col == 0 {
            let prev_len = self.store.row_len(row - 1);
            self.join_with_next(row - 1)?;
            self.cursor = Cursor::new(row - 1, prev_len);
        } else {
            let col = col.min(self.store.row_len(row));
            let ch = self.store.delete_byte(row, col - 1)?;
            self.record(UndoOp::DeleteChar { row, col: col - 1, ch });
            self.cursor.col = col - 1;
        }
        Ok(())
    }

    /// カーソル位置を削除（行末なら次の行を連結）
    pub fn delete_forward(&mut self) -> Result<()> {
        let Cursor { row, col } = self.cursor;
        if row >= self.store.row_count() {
            return Ok(());
        }

        let len = self.store.row_len(row);
        if col < len {
            let ch = self.store.delete_byte(row, col)?;
            self.record(UndoOp::DeleteChar { row, col, ch });
        } else if row + 1 < self.store.row_count() {
            self.join_with_next(row)?;
            self.cursor.col = len;
        }
        Ok(())
    }

    /// カーソルから行末までを切り取る（行末なら次の行を連結）
    pub fn kill_line(&mut self) -> Result<()> {
        let Cursor { row, col } = self.cursor;
        if row >= self.store.row_count() {
            return Ok(());
        }

        let len = self.store.row_len(row);
        let killed = if col >= len {
            if row + 1 >= self.store.row_count() {
                return Ok(());
            }
            self.join_with_next(row)?;
            self.cursor.col = len;
            b"\n".to_vec()
        } else {
            let text = self.store.truncate_row(row, col)?;
            self.record(UndoOp::KillText {
                row,
                col,
                text: text.clone(),
            });
            text
        };

        if self.kill_chain {
            self.kill_ring.append_to_front(&killed);
        } else {
            self.kill_ring.push(killed);
        }
        self.kill_chain = true;
        Ok(())
    }

    /// 行全体を削除する（カーソルはその位置の行頭へ）
    pub fn delete_row(&mut self, row: usize) -> Result<()> {
        let removed = self.store.delete_row(row)?;
        self.record(UndoOp::DeleteRow {
            row,
            text: removed.content().to_vec(),
        });
        self.cursor = self.clamp(Cursor::new(row, 0));
        Ok(())
    }

    fn join_with_next(&mut self, row: usize) -> Result<()> {
        let col = self.store.row_len(row);
        let text = self
            .store
            .row(row + 1)
            .map(|next| next.content().to_vec())
            .unwrap_or_default();
        self.store.join_rows(row)?;
        self.record(UndoOp::JoinRow { row, col, text });
        Ok(())
    }

    /// 最新の操作を取り消す
    pub fn undo(&mut self) -> Result<()> {
        let op = self.history.pop().ok_or(UndoError::Empty)?;

        // 適用できない操作はバッファに触れずにログへ戻す
        if let Err(err) = check_inverse(&self.store, &op) {
            log::warn!("undo of {} rejected: {}", op.name(), err);
            self.history.restore(op);
            return Err(err.into());
        }
        // 確認後の失敗は確保失敗のみ。途中まで適用済みなので再試行させない
        if let Err(err) = apply_inverse(&mut self.store, &op) {
            log::error!("undo of {} failed midway: {}", op.name(), err);
            return Err(err.into());
        }

        self.store.mark_dirty();
        if self.history.is_at_clean_mark() {
            self.store.clear_dirty();
        }

        let (row, col) = op.anchor();
        self.cursor = self.clamp(Cursor::new(row, col));
        self.mark = None;
        Ok(())
    }

    /// カーソルをバッファ内に収める
    fn clamp(&self, cursor: Cursor) -> Cursor {
        let row = cursor.row.min(self.store.row_count());
        let col = cursor.col.min(self.store.row_len(row));
        Cursor { row, col }
    }

    /// 行をテキストとして取得（表示・テスト用）
    pub fn row_text(&self, row: usize) -> Option<&[u8]> {
        self.store.row(row).map(|row| row.content())
    }
}

/// 逆操作の前提（行・列の範囲、貼り付けた内容）を変更前に確かめる
fn check_inverse(store: &RowStore, op: &UndoOp) -> buffer::Result<()> {
    let count = store.row_count();
    let check_row = |row: usize, limit: usize| {
        if row < limit {
            Ok(())
        } else {
            Err(BufferError::OutOfRange { index: row, len: count })
        }
    };
    let check_col = |row: usize, col: usize, inclusive: bool| {
        let len = store.row_len(row);
        if col < len || (inclusive && col == len) {
            Ok(())
        } else {
            Err(BufferError::ColumnOutOfRange { row, col, len })
        }
    };

    match op {
        UndoOp::InsertChar { row, col, .. } => {
            check_row(*row, count)?;
            check_col(*row, *col, false)
        }
        UndoOp::DeleteChar { row, col, .. }
        | UndoOp::JoinRow { row, col, .. }
        | UndoOp::KillText { row, col, .. } => {
            check_row(*row, count)?;
            check_col(*row, *col, true)
        }
        UndoOp::InsertRow { row } => check_row(*row, count),
        UndoOp::DeleteRow { row, .. } => check_row(*row, count + 1),
        UndoOp::SplitRow { row, .. } => check_row(*row + 1, count),
        UndoOp::YankText { row, col, text } => {
            check_row(*row, count)?;
            check_col(*row, *col, true)?;
            if forward_text(store, *row, *col, text.len()).as_deref() == Some(text.as_slice()) {
                Ok(())
            } else {
                Err(BufferError::ColumnOutOfRange {
                    row: *row,
                    col: *col + text.len(),
                    len: store.row_len(*row),
                })
            }
        }
    }
}

/// `(row, col)` から前方へ `len` バイト（行の区切りは改行）。足りなければ `None`
fn forward_text(store: &RowStore, row: usize, col: usize, len: usize) -> Option<Vec<u8>> {
    let mut text = Vec::with_capacity(len);
    let (mut row, mut col) = (row, col);
    while text.len() < len {
        let content = store.row(row)?.content();
        if col < content.len() {
            let take = (len - text.len()).min(content.len() - col);
            text.extend_from_slice(&content[col..col + take]);
            col += take;
        } else {
            store.row(row + 1)?;
            text.push(b'\n');
            row += 1;
            col = 0;
        }
    }
    Some(text)
}

/// 記録された操作の逆操作を適用する
fn apply_inverse(store: &mut RowStore, op: &UndoOp) -> buffer::Result<()> {
    match op {
        UndoOp::InsertChar { row, col, .. } => {
            store.delete_byte(*row, *col)?;
        }
        UndoOp::DeleteChar { row, col, ch } => store.insert_byte(*row, *col, *ch)?,
        UndoOp::InsertRow { row } => {
            store.delete_row(*row)?;
        }
        UndoOp::DeleteRow { row, text } => store.insert_row(*row, text)?,
        UndoOp::SplitRow { row, .. } => store.join_rows(*row)?,
        UndoOp::JoinRow { row, col, text } => {
            store.insert_row(*row + 1, text)?;
            store.truncate_row(*row, *col)?;
        }
        UndoOp::KillText { row, col, text } => {
            insert_text(store, *row, *col, text)?;
        }
        UndoOp::YankText { row, col, text } => delete_text(store, *row, *col, text)?,
    }
    Ok(())
}

/// `(row, col)` からテキストを挿入し、挿入後の位置を返す（改行は行分割）
pub(crate) fn insert_text(
    store: &mut RowStore,
    row: usize,
    col: usize,
    text: &[u8],
) -> buffer::Result<(usize, usize)> {
    let (mut row, mut col) = (row, col);
    for &byte in text {
        if byte == b'\n' {
            store.split_row(row, col)?;
            row += 1;
            col = 0;
        } else {
            store.insert_byte(row, col, byte)?;
            col += 1;
        }
    }
    Ok((row, col))
}

/// `(row, col)` から `text` と同じ長さを前方へ削除する（改行は行連結）
pub(crate) fn delete_text(store: &mut RowStore, row: usize, col: usize, text: &[u8]) -> buffer::Result<()> {
    for &byte in text {
        if byte == b'\n' {
            store.join_rows(row)?;
        } else {
            store.delete_byte(row, col)?;
        }
    }
    Ok(())
}
