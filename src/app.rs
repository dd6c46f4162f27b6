//! メインアプリケーション構造体
//!
//! 編集セッションの状態を1つにまとめ、キー読み取り・編集・描画のループを回す

use crate::config::Config;
use crate::editor::Editor;
use crate::error::{ErrorDisplay, InputError, KgError, Result, UiError};
use crate::file;
use crate::input::{ByteSource, Command, KeyCode, KeyDecoder, KeyLookup, KeyMap, PasteDetector};
use crate::search::{SearchOutcome, SearchSession};
use crate::ui::{draw_screen, ResizeFlag, ResizeWatcher, ScreenView, Viewport};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;

/// 編集セッション
pub struct App<S> {
    editor: Editor,
    decoder: KeyDecoder<S>,
    keymap: KeyMap,
    viewport: Viewport,
    search: Option<SearchSession>,
    message: Option<ErrorDisplay>,
    resize: Arc<ResizeFlag>,
    /// 未保存のまま終了しようとした直後か
    quit_pending: bool,
    running: bool,
}

impl<S: ByteSource> App<S> {
    pub fn new(config: &Config, source: S) -> Self {
        let paste = PasteDetector::new(config.paste_burst(), config.paste_reset());
        let mut editor = Editor::new();
        editor.set_auto_pair(config.auto_pair);

        Self {
            editor,
            decoder: KeyDecoder::with_paste_detector(source, config.escape_timeout(), paste),
            keymap: KeyMap::new(),
            viewport: Viewport::for_screen(80, 24),
            search: None,
            message: None,
            resize: ResizeFlag::new(),
            quit_pending: false,
            running: true,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// ファイルを開く（存在しなければ新規バッファ）
    pub fn open(&mut self, path: &str) -> Result<()> {
        file::open(&mut self.editor, path)
    }

    /// ステータスメッセージを設定
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(ErrorDisplay::info(message));
    }

    /// メッセージ行の内容（検索中はプロンプト）
    pub fn message(&self) -> Option<String> {
        if let Some(search) = &self.search {
            return Some(search.prompt());
        }
        self.message
            .as_ref()
            .filter(|display| !display.is_expired())
            .map(|display| display.message.clone())
    }

    pub fn resize_flag(&self) -> Arc<ResizeFlag> {
        Arc::clone(&self.resize)
    }

    /// 端末サイズに合わせて表示領域を更新
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let viewport = Viewport::for_screen(cols, rows);
        self.viewport.set_dimensions(viewport.height(), viewport.width());
    }

    /// カーソルが見えるようにスクロール
    pub fn scroll(&mut self) {
        let cursor = self.editor.cursor();
        let rx = self
            .editor
            .store()
            .row(cursor.row)
            .map_or(0, |row| row.cx_to_rx(cursor.col));
        self.viewport.ensure_visible(cursor.row, rx);
    }

    /// キーを1つ読んで処理する。タイムアウトなら `Ok(false)`
    pub fn step(&mut self) -> Result<bool> {
        match self.decoder.read_key()? {
            Some(key) => {
                self.handle_key(key);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 論理キーを処理する
    pub fn handle_key(&mut self, key: KeyCode) {
        self.editor.set_paste_mode(self.decoder.in_paste());

        if let Some(mut search) = self.search.take() {
            match search.handle_key(&mut self.editor, key) {
                SearchOutcome::Continue => self.search = Some(search),
                SearchOutcome::Accepted | SearchOutcome::Cancelled => {}
            }
            return;
        }

        match self.keymap.process(key) {
            KeyLookup::Command(command) => {
                if let Err(err) = self.execute(command) {
                    log::warn!("{:?} failed: {}", command, err);
                    self.message = Some(ErrorDisplay::new(&err));
                }
            }
            KeyLookup::Prefix => self.set_message("C-x-"),
            KeyLookup::Unbound => log::debug!("unbound key {:?}", key),
        }
    }

    /// コマンドを実行する
    pub fn execute(&mut self, command: Command) -> Result<()> {
        if command != Command::KillLine {
            self.editor.break_kill_chain();
        }
        if command != Command::Quit {
            self.quit_pending = false;
        }

        let editor = &mut self.editor;
        match command {
            Command::Insert(byte) => editor.type_char(byte)?,
            Command::InsertNewline => editor.insert_newline()?,
            Command::DeleteBackward => editor.delete_char()?,
            Command::DeleteForward => editor.delete_forward()?,
            Command::KillLine => editor.kill_line()?,
            Command::SetMark => {
                editor.set_mark();
                self.set_message("Mark set");
            }
            Command::KillRegion => {
                if editor.kill_region()?.is_none() {
                    self.set_message("No mark set");
                }
            }
            Command::CopyRegion => match editor.copy_region()? {
                Some(_) => self.set_message("Region copied"),
                None => self.set_message("No mark set"),
            },
            Command::Yank => {
                if editor.yank()?.is_none() {
                    self.set_message("Kill ring is empty");
                }
            }
            Command::Undo => editor.undo()?,
            Command::Search => self.search = Some(SearchSession::start(editor)),
            Command::MoveLeft => editor.move_left(),
            Command::MoveRight => editor.move_right(),
            Command::MoveUp => editor.move_up(),
            Command::MoveDown => editor.move_down(),
            Command::LineStart => editor.move_line_start(),
            Command::LineEnd => editor.move_line_end(),
            Command::BufferStart => editor.move_buffer_start(),
            Command::BufferEnd => editor.move_buffer_end(),
            Command::WordForward => editor.move_word_forward(),
            Command::WordBackward => editor.move_word_backward(),
            Command::ParagraphForward => editor.move_paragraph_forward(),
            Command::ParagraphBackward => editor.move_paragraph_backward(),
            Command::PageUp => editor.page_up(self.viewport.height()),
            Command::PageDown => editor.page_down(self.viewport.height()),
            Command::Save => {
                let written = file::save(editor)?;
                self.set_message(format!("{} bytes written to disk", written));
            }
            Command::Quit => {
                if editor.is_dirty() && !self.quit_pending {
                    self.quit_pending = true;
                    self.set_message("File has unsaved changes. Press C-x C-c again to quit.");
                } else {
                    self.running = false;
                }
            }
            Command::Cancel => {
                self.keymap.reset();
                editor.clear_mark();
                self.set_message("Quit");
            }
        }
        Ok(())
    }

    /// 画面を描画する
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.scroll();
        let message = self.message();
        terminal
            .draw(|frame| {
                draw_screen(
                    frame,
                    &ScreenView {
                        editor: &self.editor,
                        viewport: &self.viewport,
                        message: message.as_deref(),
                    },
                )
            })
            .map_err(|err| UiError::Io {
                message: err.to_string(),
            })?;
        Ok(())
    }

    /// 終了するまでメインループを回す
    ///
    /// 端末サイズは読み取りの合間に確認する
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut watcher = ResizeWatcher::new(self.resize_flag());

        while self.running {
            if let Ok(size) = terminal.size() {
                watcher.observe((size.width, size.height));
            }
            if self.resize.take() {
                if let Some((cols, rows)) = watcher.size() {
                    self.resize(cols, rows);
                }
            }

            self.draw(terminal)?;

            match self.step() {
                Ok(_) => {}
                Err(KgError::Input(InputError::Closed)) => {
                    log::info!("input closed, leaving");
                    return Err(InputError::Closed.into());
                }
                Err(err) => {
                    log::error!("{}", err);
                    self.message = Some(ErrorDisplay::new(&err));
                }
            }
        }
        Ok(())
    }
}
