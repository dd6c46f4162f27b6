//! キルリング

use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 32;

/// Emacs風キルリング（バイト列、改行を含みうる）
#[derive(Debug)]
pub struct KillRing {
    entries: VecDeque<Vec<u8>>,
    capacity: usize,
}

impl Default for KillRing {
    fn default() -> Self {
        Self::new()
    }
}

impl KillRing {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 最大保持数を指定して作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// 新しいエントリを先頭に追加（空は無視、溢れたら最古を捨てる）
    pub fn push(&mut self, text: Vec<u8>) {
        if text.is_empty() {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(text);
    }

    /// 最新エントリの末尾に追記（連続した行キル用）
    pub fn append_to_front(&mut self, text: &[u8]) {
        if text.is_empty() {
            return;
        }
        match self.entries.front_mut() {
            Some(front) => front.extend_from_slice(text),
            None => self.entries.push_front(text.to_vec()),
        }
    }

    /// ヤンク対象（最新のキル）
    pub fn front(&self) -> Option<&[u8]> {
        self.entries.front().map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
