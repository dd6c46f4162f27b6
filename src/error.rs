//! エラーハンドリングシステム
//!
//! kg エディタ全体で使用される統一されたエラー型とユーティリティを定義
//! コア内のエラーは致命的ではない。端末初期化失敗と読めない既存ファイルのみ終了扱い

use std::time::{Duration, Instant};
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KgError {
    /// バッファ操作エラー
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),

    /// アンドゥ操作エラー
    #[error("Undo failed: {0}")]
    Undo(#[from] UndoError),

    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// UI操作エラー
    #[error("UI operation failed: {0}")]
    Ui(#[from] UiError),

    /// 入力処理エラー
    #[error("Input processing failed: {0}")]
    Input(#[from] InputError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// バッファ操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Row index {index} out of range (rows: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Column {col} out of range on row {row} (length: {len})")]
    ColumnOutOfRange { row: usize, col: usize, len: usize },

    #[error("Allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },
}

/// アンドゥ固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    #[error("Nothing to undo")]
    Empty,
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("No file name")]
    NoFileName,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Not a regular file: {path}")]
    NotAFile { path: String },

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
}

/// UI操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Not a terminal")]
    NotATerminal,

    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    #[error("Terminal IO failed: {message}")]
    Io { message: String },
}

/// 入力処理固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Input stream closed")]
    Closed,

    #[error("Read failed: {message}")]
    Read { message: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
    Fatal,
}

/// ステータス行に表示するエラー情報
#[derive(Debug, Clone)]
pub struct ErrorDisplay {
    /// エラーメッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
    /// 表示開始時刻
    pub start_time: Instant,
    /// 表示持続時間（5秒）
    pub duration: Duration,
}

impl ErrorDisplay {
    pub fn new(error: &KgError) -> Self {
        let (message, level) = Self::format_error(error);
        Self {
            message,
            level,
            start_time: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    /// エラー以外の通知（保存完了など）
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ErrorLevel::Info,
            start_time: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    fn format_error(error: &KgError) -> (String, ErrorLevel) {
        match error {
            KgError::Undo(UndoError::Empty) => ("Nothing to undo".to_string(), ErrorLevel::Info),
            KgError::Buffer(BufferError::AllocationFailure { requested }) => (
                format!("Out of memory ({} bytes), edit aborted", requested),
                ErrorLevel::Warning,
            ),
            KgError::Buffer(err) => (err.to_string(), ErrorLevel::Error),
            KgError::File(FileError::NoFileName) => {
                ("No file name, cannot save".to_string(), ErrorLevel::Error)
            }
            KgError::File(FileError::Io { path, message }) => {
                (format!("Error writing {}: {}", path, message), ErrorLevel::Error)
            }
            KgError::File(err) => (err.to_string(), ErrorLevel::Error),
            KgError::Config(err) => (err.to_string(), ErrorLevel::Warning),
            KgError::Ui(UiError::NotATerminal) | KgError::Ui(UiError::TerminalInit { .. }) => {
                (error.to_string(), ErrorLevel::Fatal)
            }
            _ => (error.to_string(), ErrorLevel::Error),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// パニックハンドラの設定
///
/// 端末を raw モードのまま残さないよう、メッセージ出力前に端末状態を復元する
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        crate::ui::terminal::restore_terminal();

        let location = panic_info
            .location()
            .unwrap_or_else(|| std::panic::Location::caller());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}:{}: {}", location.file(), location.line(), message);
        eprintln!("PANIC at {}:{}: {}", location.file(), location.line(), message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, KgError>;

/// 各モジュール固有のResult型
pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

pub mod file {
    pub type Result<T> = std::result::Result<T, super::FileError>;
}

// std::io::Error から KgError への変換（端末入出力）
impl From<std::io::Error> for KgError {
    fn from(error: std::io::Error) -> Self {
        KgError::Ui(UiError::Io {
            message: error.to_string(),
        })
    }
}

impl FileError {
    /// パス付きで std::io::Error を変換
    pub fn from_io(path: &str, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => FileError::PermissionDenied {
                path: path.to_string(),
            },
            _ => FileError::Io {
                path: path.to_string(),
                message: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_empty_is_informational() {
        let display = ErrorDisplay::new(&KgError::Undo(UndoError::Empty));

        assert_eq!(display.level, ErrorLevel::Info);
        assert_eq!(display.message, "Nothing to undo");
        assert!(!display.is_expired());
    }

    #[test]
    fn test_error_display_expiry() {
        let error = KgError::File(FileError::NoFileName);
        let mut display = ErrorDisplay::new(&error);

        assert!(!display.is_expired());

        // 時間経過をシミュレート
        display.start_time = Instant::now() - Duration::from_secs(6);
        assert!(display.is_expired());
    }

    #[test]
    fn test_terminal_failure_is_fatal() {
        let display = ErrorDisplay::new(&KgError::Ui(UiError::NotATerminal));
        assert_eq!(display.level, ErrorLevel::Fatal);
    }

    #[test]
    fn test_permission_denied_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = FileError::from_io("secret.txt", &io);

        assert_eq!(
            error,
            FileError::PermissionDenied {
                path: "secret.txt".to_string()
            }
        );
    }

    #[test]
    fn test_out_of_range_message() {
        let error: KgError = BufferError::OutOfRange { index: 4, len: 2 }.into();
        assert!(error.to_string().contains("Row index 4 out of range"));
    }
}
