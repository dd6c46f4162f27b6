//! アンドゥログ
//!
//! 直近の操作が先頭に来る有界スタック。各操作は逆操作に必要なデータを自身で所有する。

use std::collections::VecDeque;

/// 保持する操作数の上限
pub const UNDO_LIMIT: usize = 1000;

/// 取り消し可能な編集操作
///
/// `(row, col)` は逆操作を適用する位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOp {
    /// 1バイト挿入
    InsertChar { row: usize, col: usize, ch: u8 },
    /// 1バイト削除
    DeleteChar { row: usize, col: usize, ch: u8 },
    /// 空行挿入
    InsertRow { row: usize },
    /// 行削除（削除した行の内容を保持）
    DeleteRow { row: usize, text: Vec<u8> },
    /// `row` を `col` で分割
    SplitRow { row: usize, col: usize },
    /// `row + 1` を `row` の末尾（長さ `col`）に連結
    JoinRow { row: usize, col: usize, text: Vec<u8> },
    /// 範囲削除（改行を含みうる）
    KillText { row: usize, col: usize, text: Vec<u8> },
    /// 範囲挿入（改行を含みうる）
    YankText { row: usize, col: usize, text: Vec<u8> },
}

impl UndoOp {
    /// 逆操作の適用位置
    pub fn anchor(&self) -> (usize, usize) {
        match *self {
            UndoOp::InsertChar { row, col, .. }
            | UndoOp::DeleteChar { row, col, .. }
            | UndoOp::SplitRow { row, col }
            | UndoOp::JoinRow { row, col, .. }
            | UndoOp::KillText { row, col, .. }
            | UndoOp::YankText { row, col, .. } => (row, col),
            UndoOp::InsertRow { row } | UndoOp::DeleteRow { row, .. } => (row, 0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UndoOp::InsertChar { .. } => "insert-char",
            UndoOp::DeleteChar { .. } => "delete-char",
            UndoOp::InsertRow { .. } => "insert-row",
            UndoOp::DeleteRow { .. } => "delete-row",
            UndoOp::SplitRow { .. } => "split-row",
            UndoOp::JoinRow { .. } => "join-row",
            UndoOp::KillText { .. } => "kill-text",
            UndoOp::YankText { .. } => "yank-text",
        }
    }
}

/// 有界のアンドゥスタック
#[derive(Debug)]
pub struct UndoLog {
    /// 先頭が最新
    ops: VecDeque<UndoOp>,
    limit: usize,
    /// 最後に保存した時点の深さ（None は一度も保存されていない）
    clean_mark: Option<usize>,
    suppressed: bool,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoLog {
    pub fn new() -> Self {
        Self::with_limit(UNDO_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            ops: VecDeque::new(),
            limit: limit.max(1),
            clean_mark: None,
            suppressed: false,
        }
    }

    /// 操作を記録する（抑止中は何もしない）
    pub fn push(&mut self, op: UndoOp) {
        if self.suppressed {
            return;
        }

        // 保存時点より下まで戻ってから新しく編集すると、保存時点には二度と戻れない
        if matches!(self.clean_mark, Some(mark) if mark > self.ops.len()) {
            self.clean_mark = None;
        }

        self.ops.push_front(op);
        if self.ops.len() > self.limit {
            let dropped = self.ops.len() - self.limit;
            self.ops.truncate(self.limit);
            self.clean_mark = self.clean_mark.and_then(|mark| mark.checked_sub(dropped));
            log::debug!("undo log trimmed {} oldest operations", dropped);
        }
    }

    /// 最新の操作を取り出す
    pub fn pop(&mut self) -> Option<UndoOp> {
        self.ops.pop_front()
    }

    /// 逆操作の適用に失敗した操作を戻す
    pub(crate) fn restore(&mut self, op: UndoOp) {
        self.ops.push_front(op);
    }

    /// 新しい順に操作を列挙
    pub fn iter(&self) -> impl Iterator<Item = &UndoOp> {
        self.ops.iter()
    }

    pub fn depth(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// 現在の深さを保存時点として記録
    pub fn mark_clean(&mut self) {
        self.clean_mark = Some(self.ops.len());
    }

    pub fn clean_mark(&self) -> Option<usize> {
        self.clean_mark
    }

    /// 現在の深さが保存時点と一致するか
    pub fn is_at_clean_mark(&self) -> bool {
        self.clean_mark == Some(self.ops.len())
    }

    /// 記録抑止を切り替え、直前の状態を返す
    pub fn set_suppressed(&mut self, suppressed: bool) -> bool {
        std::mem::replace(&mut self.suppressed, suppressed)
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// クロージャ実行中だけ記録を抑止する
    pub fn suppressed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.set_suppressed(true);
        let result = f(self);
        self.suppressed = previous;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(i: usize) -> UndoOp {
        UndoOp::InsertChar {
            row: i,
            col: 0,
            ch: b'x',
        }
    }

    #[test]
    fn bounded_at_limit_keeps_newest() {
        let mut log = UndoLog::new();
        for i in 0..1050 {
            log.push(op(i));
        }
        assert_eq!(log.depth(), UNDO_LIMIT);
        let rows: Vec<usize> = log.iter().map(|op| op.anchor().0).collect();
        let expected: Vec<usize> = (50..1050).rev().collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn suppression_skips_push() {
        let mut log = UndoLog::new();
        log.suppressed(|log| log.push(op(0)));
        assert!(log.is_empty());
        assert!(!log.is_suppressed());

        log.push(op(1));
        assert_eq!(log.depth(), 1);
    }

    #[test]
    fn nested_suppression_restores_outer_state() {
        let mut log = UndoLog::new();
        log.suppressed(|log| {
            log.suppressed(|log| log.push(op(0)));
            assert!(log.is_suppressed());
            log.push(op(1));
        });
        assert!(log.is_empty());
    }

    #[test]
    fn never_clean_until_marked() {
        let mut log = UndoLog::new();
        assert!(!log.is_at_clean_mark());
        log.mark_clean();
        assert!(log.is_at_clean_mark());
        log.push(op(0));
        assert!(!log.is_at_clean_mark());
        log.pop();
        assert!(log.is_at_clean_mark());
    }

    #[test]
    fn clean_mark_shifts_when_trimmed() {
        let mut log = UndoLog::with_limit(3);
        log.push(op(0));
        log.push(op(1));
        log.mark_clean();
        log.push(op(2));
        log.push(op(3));
        // 1件捨てられたので保存時点は深さ1に移る
        assert_eq!(log.clean_mark(), Some(1));
        log.push(op(4));
        log.push(op(5));
        assert_eq!(log.clean_mark(), None);
    }

    #[test]
    fn editing_below_clean_mark_forgets_it() {
        let mut log = UndoLog::new();
        log.push(op(0));
        log.push(op(1));
        log.mark_clean();
        log.pop();
        log.pop();
        log.push(op(2));
        log.push(op(3));
        assert_eq!(log.depth(), 2);
        assert!(!log.is_at_clean_mark());
    }

    #[test]
    fn anchors() {
        assert_eq!(UndoOp::InsertRow { row: 4 }.anchor(), (4, 0));
        let join = UndoOp::JoinRow {
            row: 1,
            col: 7,
            text: b"tail".to_vec(),
        };
        assert_eq!(join.anchor(), (1, 7));
        assert_eq!(join.name(), "join-row");
    }
}
