//! 端末モード管理
//!
//! raw モードと代替画面はガードの生存期間だけ有効にする

use crate::error::UiError;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, IsTerminal, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 端末の raw モードと代替画面を保持するガード
///
/// 破棄時に元に戻すので、通常終了・エラー終了どちらでも端末が復元される
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn new() -> Result<Self, UiError> {
        if !std::io::stdin().is_terminal() || !stdout().is_terminal() {
            return Err(UiError::NotATerminal);
        }

        enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
        if let Err(err) = execute!(stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_error("enter alternate screen", err));
        }
        log::info!("terminal entered raw mode");
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        restore_terminal();
        log::info!("terminal restored");
    }
}

/// 端末状態を元に戻す（失敗しても続行）
///
/// パニックフックからも呼ばれる
pub fn restore_terminal() {
    let _ = execute!(stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// ratatui の端末を作成
pub fn create_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, UiError> {
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).map_err(|err| terminal_error("terminal init", err))?;
    terminal
        .clear()
        .map_err(|err| terminal_error("clear screen", err))?;
    Ok(terminal)
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> UiError {
    UiError::TerminalInit {
        message: format!("{}: {}", context, err),
    }
}

/// 端末サイズ変更の通知フラグ
///
/// 通知側はフラグを立てるだけで、編集状態には触れない。
/// メインループが読み取りの合間に `take` で取り出して画面寸法を更新する。
#[derive(Debug, Default)]
pub struct ResizeFlag {
    pending: AtomicBool,
}

impl ResizeFlag {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// 通知があれば取り出してフラグを下ろす
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// 端末サイズを読み取りの合間に確認し、変化したらフラグを立てる
#[derive(Debug)]
pub struct ResizeWatcher {
    flag: Arc<ResizeFlag>,
    last: Option<(u16, u16)>,
}

impl ResizeWatcher {
    pub fn new(flag: Arc<ResizeFlag>) -> Self {
        Self { flag, last: None }
    }

    /// 現在のサイズを記録（初回も変化として通知する）
    pub fn observe(&mut self, size: (u16, u16)) {
        if self.last != Some(size) {
            log::debug!("terminal size {:?}", size);
            self.last = Some(size);
            self.flag.notify();
        }
    }

    pub fn size(&self) -> Option<(u16, u16)> {
        self.last
    }
}
