//! ビューポート管理
//!
//! 画面に表示するテキスト領域のスクロール位置を管理する。
//! 列は表示上の列（タブ展開後）で数える。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// 表示の開始行
    row_offset: usize,
    /// 表示の開始列
    col_offset: usize,
    /// 表示可能な行数
    height: usize,
    /// 表示可能な列数
    width: usize,
}

impl Viewport {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            height: height.max(1),
            width: width.max(1),
        }
    }

    /// 端末全体のサイズから本文領域を決める（ステータス行とメッセージ行を除く）
    pub fn for_screen(cols: u16, rows: u16) -> Self {
        Self::new(usize::from(rows).saturating_sub(2), usize::from(cols))
    }

    /// ビューポートの寸法を更新
    pub fn set_dimensions(&mut self, height: usize, width: usize) {
        self.height = height.max(1);
        self.width = width.max(1);
    }

    /// カーソルが画面内に収まるようスクロールする
    ///
    /// 戻り値はスクロールが発生したかどうか
    pub fn ensure_visible(&mut self, row: usize, rx: usize) -> bool {
        let before = (self.row_offset, self.col_offset);

        if row < self.row_offset {
            self.row_offset = row;
        } else if row >= self.row_offset + self.height {
            self.row_offset = row + 1 - self.height;
        }

        if rx < self.col_offset {
            self.col_offset = rx;
        } else if rx >= self.col_offset + self.width {
            self.col_offset = rx + 1 - self.width;
        }

        before != (self.row_offset, self.col_offset)
    }

    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_visible_scrolls_up() {
        let mut viewport = Viewport::new(10, 80);
        assert!(!viewport.ensure_visible(5, 0));
        viewport.ensure_visible(30, 0);
        assert_eq!(viewport.row_offset(), 21);
        assert!(viewport.ensure_visible(3, 0));
        assert_eq!(viewport.row_offset(), 3);
    }

    #[test]
    fn test_ensure_visible_scrolls_down() {
        let mut viewport = Viewport::new(4, 80);
        viewport.ensure_visible(10, 0);
        assert_eq!(viewport.row_offset(), 7);
        assert!(viewport.row_offset() + viewport.height() > 10);
    }

    #[test]
    fn test_horizontal_scroll() {
        let mut viewport = Viewport::new(4, 10);
        viewport.ensure_visible(0, 25);
        assert_eq!(viewport.col_offset(), 16);
        viewport.ensure_visible(0, 2);
        assert_eq!(viewport.col_offset(), 2);
    }

    #[test]
    fn test_screen_reserves_two_lines() {
        let viewport = Viewport::for_screen(80, 24);
        assert_eq!(viewport.height(), 22);
        assert_eq!(viewport.width(), 80);
    }
}
