//! 行データ
//!
//! 保存用の生バイト列と、タブを展開した表示用バイト列を別々に保持する

use crate::error::{buffer::Result, BufferError};
use crate::syntax::HighlightTag;

/// タブストップ幅
pub const TAB_STOP: usize = 8;

/// 1行分のテキスト（改行は含まない）
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub(crate) index: usize,
    pub(crate) content: Vec<u8>,
    pub(crate) rendered: Vec<u8>,
    pub(crate) highlight: Vec<HighlightTag>,
    pub(crate) open_comment_at_end: bool,
}

impl Row {
    /// バイト列から行を作成（ハイライトは未計算で全て Normal）
    pub fn new(index: usize, bytes: &[u8]) -> Result<Self> {
        let mut content = Vec::new();
        reserve(&mut content, bytes.len())?;
        content.extend_from_slice(bytes);

        let mut row = Self {
            index,
            content,
            ..Self::default()
        };
        row.update_render()?;
        Ok(row)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 正のテキスト
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// タブ展開済みの表示用テキスト
    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    /// 表示用テキストと同じ長さのハイライト種別列
    pub fn highlight(&self) -> &[HighlightTag] {
        &self.highlight
    }

    pub fn open_comment_at_end(&self) -> bool {
        self.open_comment_at_end
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// 正のテキスト上の列を表示上の列に変換
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.content
            .iter()
            .take(cx)
            .fold(0, |rx, &byte| if byte == b'\t' { next_tab_stop(rx) } else { rx + 1 })
    }

    /// `at` に1バイト挿入（行末より先なら空白で埋める）
    pub(crate) fn insert_byte(&mut self, at: usize, byte: u8) -> Result<()> {
        if at > self.content.len() {
            let padding = at - self.content.len();
            reserve(&mut self.content, padding + 1)?;
            self.content.resize(at, b' ');
        } else {
            reserve(&mut self.content, 1)?;
        }
        self.content.insert(at, byte);
        self.update_render()
    }

    /// `at` の1バイトを削除して返す
    pub(crate) fn delete_byte(&mut self, at: usize) -> Result<u8> {
        if at >= self.content.len() {
            return Err(BufferError::ColumnOutOfRange {
                row: self.index,
                col: at,
                len: self.content.len(),
            });
        }
        let byte = self.content.remove(at);
        self.update_render()?;
        Ok(byte)
    }

    /// 行末に追加
    pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<()> {
        reserve(&mut self.content, bytes.len())?;
        self.content.extend_from_slice(bytes);
        self.update_render()
    }

    /// `len` 以降を切り取って返す
    pub(crate) fn split_off(&mut self, len: usize) -> Result<Vec<u8>> {
        if len > self.content.len() {
            return Err(BufferError::ColumnOutOfRange {
                row: self.index,
                col: len,
                len: self.content.len(),
            });
        }
        let tail = self.content.split_off(len);
        self.update_render()?;
        Ok(tail)
    }

    /// 表示用テキストを作り直す
    ///
    /// ハイライト列も同じ長さに揃える（内容は呼び出し側で再計算する）
    fn update_render(&mut self) -> Result<()> {
        let tabs = self.content.iter().filter(|&&byte| byte == b'\t').count();
        let mut rendered = Vec::new();
        reserve(&mut rendered, self.content.len() + tabs * (TAB_STOP - 1))?;

        for &byte in &self.content {
            if byte == b'\t' {
                let target = next_tab_stop(rendered.len());
                rendered.resize(target, b' ');
            } else {
                rendered.push(byte);
            }
        }

        self.highlight.clear();
        reserve(&mut self.highlight, rendered.len())?;
        self.highlight.resize(rendered.len(), HighlightTag::Normal);
        self.rendered = rendered;
        Ok(())
    }
}

fn next_tab_stop(col: usize) -> usize {
    (col / TAB_STOP + 1) * TAB_STOP
}

/// 確保失敗をエラーとして返す
pub(crate) fn reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| BufferError::AllocationFailure {
            requested: additional.saturating_mul(std::mem::size_of::<T>()),
        })
}
