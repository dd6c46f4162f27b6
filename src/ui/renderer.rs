//! 画面描画
//!
//! 本文・ステータス行・メッセージ行を ratatui で描画する

use super::viewport::Viewport;
use crate::buffer::Row;
use crate::editor::Editor;
use crate::syntax::{color_for, HighlightTag};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// 描画に必要な状態
#[derive(Debug)]
pub struct ScreenView<'a> {
    pub editor: &'a Editor,
    pub viewport: &'a Viewport,
    /// メッセージ行（検索プロンプトや通知）
    pub message: Option<&'a str>,
}

/// 画面全体を描画
pub fn draw_screen(frame: &mut Frame<'_>, view: &ScreenView<'_>) {
    let chunks = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let text_area = chunks[0];
    let lines = text_lines(view.editor, view.viewport, text_area.height as usize);
    frame.render_widget(Paragraph::new(lines), text_area);

    let status = status_line(view.editor, chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().add_modifier(Modifier::REVERSED),
        ))),
        chunks[1],
    );

    let message = view.message.unwrap_or("");
    let message: String = message.chars().take(chunks[2].width as usize).collect();
    frame.render_widget(Paragraph::new(message), chunks[2]);

    if let Some((x, y)) = cursor_position(view.editor, view.viewport, text_area) {
        frame.set_cursor_position((x, y));
    }
}

/// 本文領域の各行
fn text_lines(editor: &Editor, viewport: &Viewport, height: usize) -> Vec<Line<'static>> {
    let store = editor.store();
    (0..height)
        .map(|screen_row| {
            let file_row = screen_row + viewport.row_offset();
            match store.row(file_row) {
                Some(row) => row_line(row, viewport.col_offset(), viewport.width()),
                None if store.is_empty() && screen_row == height / 3 => welcome_line(viewport.width()),
                None => Line::from(Span::styled("~", Style::default().fg(Color::Blue))),
            }
        })
        .collect()
}

fn welcome_line(width: usize) -> Line<'static> {
    let welcome = format!("kg editor -- version {}", env!("CARGO_PKG_VERSION"));
    let welcome: String = welcome.chars().take(width).collect();
    let padding = width.saturating_sub(welcome.len()) / 2;
    let mut text = String::from("~");
    text.push_str(&" ".repeat(padding.saturating_sub(1)));
    text.push_str(&welcome);
    Line::from(text)
}

/// 1行分を色付きのスパンに変換（同じ見た目の連続は1つにまとめる）
pub fn row_line(row: &Row, col_offset: usize, width: usize) -> Line<'static> {
    let rendered = row.rendered();
    let highlight = row.highlight();
    let start = col_offset.min(rendered.len());
    let end = (col_offset + width).min(rendered.len());

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut style: Option<Style> = None;

    for (&byte, &tag) in rendered[start..end].iter().zip(&highlight[start..end]) {
        let (symbol, cell_style) = if is_printable(byte) {
            (byte as char, tag_style(tag))
        } else {
            (control_symbol(byte), Style::default().add_modifier(Modifier::REVERSED))
        };

        if style != Some(cell_style) {
            if let Some(previous) = style {
                spans.push(Span::styled(std::mem::take(&mut text), previous));
            }
            style = Some(cell_style);
        }
        text.push(symbol);
    }
    if let Some(last) = style {
        spans.push(Span::styled(text, last));
    }
    Line::from(spans)
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// 制御文字は `@` からのオフセットで表示、それ以外は `?`
fn control_symbol(byte: u8) -> char {
    if byte <= 26 {
        (b'@' + byte) as char
    } else {
        '?'
    }
}

/// ハイライト種別の表示スタイル
pub fn tag_style(tag: HighlightTag) -> Style {
    Style::default().fg(ansi_color(color_for(tag)))
}

/// SGR 前景色コードを ratatui の色に変換
pub fn ansi_color(code: u8) -> Color {
    match code {
        30 => Color::Black,
        31 => Color::Red,
        32 => Color::Green,
        33 => Color::Yellow,
        34 => Color::Blue,
        35 => Color::Magenta,
        36 => Color::Cyan,
        _ => Color::White,
    }
}

/// ステータス行の文字列（幅に合わせて左右に振り分ける）
pub fn status_line(editor: &Editor, width: usize) -> String {
    let store = editor.store();
    let name: String = store.filename().unwrap_or("[No Name]").chars().take(20).collect();
    let left = format!(
        "{} - {} lines{}",
        name,
        store.row_count(),
        if store.is_dirty() { " (modified)" } else { "" }
    );
    let right = format!(
        "{} | {}/{}",
        store.profile().map_or("no ft", |profile| profile.name),
        editor.cursor().row + 1,
        store.row_count()
    );

    let mut line: String = left.chars().take(width).collect();
    let used = line.chars().count();
    if used + right.len() <= width {
        line.push_str(&" ".repeat(width - used - right.len()));
        line.push_str(&right);
    } else {
        line.push_str(&" ".repeat(width - used));
    }
    line
}

/// 画面上のカーソル位置
fn cursor_position(editor: &Editor, viewport: &Viewport, area: Rect) -> Option<(u16, u16)> {
    let cursor = editor.cursor();
    let rx = editor
        .store()
        .row(cursor.row)
        .map_or(0, |row| row.cx_to_rx(cursor.col));

    let y = cursor.row.checked_sub(viewport.row_offset())?;
    let x = rx.checked_sub(viewport.col_offset())?;
    if y >= area.height as usize || x >= area.width as usize {
        return None;
    }
    Some((area.x + x as u16, area.y + y as u16))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Cursor;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn spans_text(line: &Line<'_>) -> Vec<String> {
        line.spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn keywords_get_their_own_span() {
        let mut editor = Editor::new();
        editor.load_rows("a.c", [b"int x;".as_slice()], true).unwrap();
        let line = row_line(editor.store().row(0).unwrap(), 0, 80);

        assert_eq!(spans_text(&line), vec!["int", " x;"]);
        assert_eq!(line.spans[0].style.fg, Some(Color::Green));
        assert_eq!(line.spans[1].style.fg, Some(Color::White));
    }

    #[test]
    fn control_bytes_are_shown_reversed() {
        let mut editor = Editor::new();
        editor.load_rows("a.txt", [b"a\x01\xff".as_slice()], true).unwrap();
        let line = row_line(editor.store().row(0).unwrap(), 0, 80);

        assert_eq!(spans_text(&line), vec!["a", "A?"]);
        assert!(line.spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn horizontal_offset_clips_row() {
        let mut editor = Editor::new();
        editor.load_rows("a.txt", [b"abcdefgh".as_slice()], true).unwrap();
        let line = row_line(editor.store().row(0).unwrap(), 2, 3);
        assert_eq!(spans_text(&line), vec!["cde"]);

        let line = row_line(editor.store().row(0).unwrap(), 20, 3);
        assert!(line.spans.is_empty());
    }

    #[test]
    fn status_line_layout() {
        let mut editor = Editor::new();
        editor
            .load_rows("main.rs", [b"fn main() {}".as_slice(), b"".as_slice()], true)
            .unwrap();
        editor.insert_char(b' ').unwrap();

        let status = status_line(&editor, 50);
        assert_eq!(status.chars().count(), 50);
        assert!(status.starts_with("main.rs - 2 lines (modified)"));
        assert!(status.ends_with("Rust | 1/2"));
    }

    #[test]
    fn colors_follow_terminal_codes() {
        assert_eq!(ansi_color(color_for(HighlightTag::Comment)), Color::Cyan);
        assert_eq!(ansi_color(color_for(HighlightTag::SearchMatch)), Color::Blue);
        assert_eq!(ansi_color(color_for(HighlightTag::Number)), Color::Red);
        assert_eq!(ansi_color(color_for(HighlightTag::Normal)), Color::White);
    }

    #[test]
    fn draws_text_and_status_to_backend() {
        let mut editor = Editor::new();
        editor.load_rows("t.txt", [b"hello".as_slice()], true).unwrap();
        editor.set_cursor(Cursor::new(0, 3));
        let viewport = Viewport::for_screen(30, 6);

        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        terminal
            .draw(|frame| {
                draw_screen(
                    frame,
                    &ScreenView {
                        editor: &editor,
                        viewport: &viewport,
                        message: Some("saved"),
                    },
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: usize| -> String {
            buffer.content[y * 30..(y + 1) * 30]
                .iter()
                .map(|cell| cell.symbol())
                .collect()
        };
        assert!(row(0).starts_with("hello"));
        assert!(row(1).starts_with('~'));
        assert!(row(4).starts_with("t.txt - 1 lines"));
        assert!(row(5).starts_with("saved"));
    }
}
