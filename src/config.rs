//! ユーザー設定
//!
//! `$XDG_CONFIG_HOME/kg/config.json` を読み込む。ファイルが無ければ既定値

use crate::error::ConfigError;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// エディタ設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ESC 単独押下とみなすまでの読み取りタイムアウト（ミリ秒）
    pub escape_timeout_ms: u64,
    /// この間隔未満で連続したキーをペーストとみなす（ミリ秒）
    pub paste_burst_ms: u64,
    /// この間隔以上キー入力が空いたらペースト状態を解除（ミリ秒）
    pub paste_reset_ms: u64,
    /// 括弧・引用符の自動補完
    pub auto_pair: bool,
    /// ログ設定
    #[serde(flatten)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escape_timeout_ms: 100,
            paste_burst_ms: 30,
            paste_reset_ms: 1000,
            auto_pair: true,
            logging: LoggingConfig::default(),
        }
    }
}

/// ログ出力設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// ログファイル（`~` 展開あり）
    pub log_file: Option<String>,
    /// ログレベル名
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// ログレベル（不正な名前は info 扱い）
    pub fn level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }

    /// `~` を展開したログファイルパス
    pub fn file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(|raw| PathBuf::from(shellexpand::tilde(raw).into_owned()))
    }
}

impl Config {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kg").join("config.json"))
    }

    /// 既定パスから読み込む
    ///
    /// 読み込みに失敗した場合は既定値とエラーの組を返し、呼び出し側がステータス行に表示する
    pub fn load_default() -> (Self, Option<ConfigError>) {
        match Self::default_path() {
            Some(path) => match Self::load_from(&path) {
                Ok(config) => (config, None),
                Err(err) => (Self::default(), Some(err)),
            },
            None => (Self::default(), None),
        }
    }

    /// 指定パスから読み込む（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })
            }
        };
        let config: Config =
            serde_json::from_str(&content).map_err(|err| ConfigError::InvalidFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.escape_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "escape_timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if self.paste_reset_ms < self.paste_burst_ms {
            return Err(ConfigError::InvalidValue {
                key: "paste_reset_ms".to_string(),
                value: self.paste_reset_ms.to_string(),
            });
        }
        Ok(())
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    pub fn paste_burst(&self) -> Duration {
        Duration::from_millis(self.paste_burst_ms)
    }

    pub fn paste_reset(&self) -> Duration {
        Duration::from_millis(self.paste_reset_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.escape_timeout(), Duration::from_millis(100));
        assert_eq!(config.paste_burst(), Duration::from_millis(30));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"auto_pair": false, "log_level": "debug"}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert!(!config.auto_pair);
        assert_eq!(config.logging.level(), LogLevel::Debug);
        assert_eq!(config.paste_reset_ms, 1000);
    }

    #[test]
    fn malformed_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
    }

    #[test]
    fn inconsistent_paste_thresholds_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"paste_burst_ms": 50, "paste_reset_ms": 10}}"#).unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "paste_reset_ms"));
    }

    #[test]
    fn log_file_tilde_is_expanded() {
        let logging = LoggingConfig {
            log_file: Some("/tmp/kg.log".to_string()),
            log_level: "warn".to_string(),
        };
        assert_eq!(logging.file_path(), Some(PathBuf::from("/tmp/kg.log")));
        assert_eq!(logging.level(), LogLevel::Warning);
    }
}
