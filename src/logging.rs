//! ロギングシステム
//!
//! `log` クレートのバックエンドとして動作するファイルロガー。
//! raw モード中は標準エラー出力が画面を壊すため、出力先はファイルのみ

use crate::config::LoggingConfig;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// 設定ファイルの表記から変換（未知の値は None）
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }

    fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// ロガー
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    output_file: Option<PathBuf>,
    sink: Mutex<Option<File>>,
}

impl Logger {
    /// デフォルト構築（出力先なし）
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_file: None,
            sink: Mutex::new(None),
        }
    }

    /// ログレベルを取得
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path).ok();
        self.sink = Mutex::new(file);
        self.output_file = Some(path);
        self
    }

    /// 出力ファイルのパス
    pub fn output_file(&self) -> Option<&PathBuf> {
        self.output_file.as_ref()
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn format_line(level: LogLevel, target: &str, message: &str) -> String {
        format!("{}: {} in {}", level.tag(), message, target)
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut guard) = self.sink.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.output_file.is_some() && self.should_log(LogLevel::from_log(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format_line(
            LogLevel::from_log(record.level()),
            record.target(),
            &record.args().to_string(),
        );
        self.write_line(&line);
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.sink.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// 設定に従ってグローバルロガーを登録する
///
/// ファイル未指定ならログは無効。`KG_LOG` 環境変数が設定ファイルより優先される
pub fn init(config: &LoggingConfig) {
    let level = config.level();
    let path = std::env::var_os("KG_LOG")
        .map(PathBuf::from)
        .or_else(|| config.file_path());

    let Some(path) = path else {
        log::set_max_level(LevelFilter::Off);
        return;
    };

    let logger = Logger::new(level).with_file_output(path);
    // 二重登録（テスト等）は無視する
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level.to_filter());
    }
}
