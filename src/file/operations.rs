//! ファイル操作コア機能
//!
//! 読み込みは行への分割、保存は行の連結を一度に書き出す

use crate::editor::Editor;
use crate::error::{file, FileError, Result};
use std::io::Write;
use std::path::Path;

/// 行に分割したファイル内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContent {
    pub rows: Vec<Vec<u8>>,
    /// 最終行が改行で終わっていたか
    pub trailing_newline: bool,
}

impl FileContent {
    /// `\n` で分割し、各行末の `\r` を取り除く
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self {
                rows: Vec::new(),
                trailing_newline: true,
            };
        }

        let trailing_newline = bytes.ends_with(b"\n");
        let body = if trailing_newline {
            &bytes[..bytes.len() - 1]
        } else {
            bytes
        };

        let rows = body
            .split(|&byte| byte == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
            .collect();

        Self {
            rows,
            trailing_newline,
        }
    }
}

/// ファイル読み込み処理
#[derive(Debug, Default)]
pub struct FileReader;

impl FileReader {
    pub fn new() -> Self {
        Self
    }

    /// ファイル内容を読み込む。存在しなければ `None`（新規ファイル）
    pub fn read_file(&self, path: &Path) -> file::Result<Option<FileContent>> {
        let display = path.display().to_string();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(FileError::from_io(&display, &err)),
        };

        if !metadata.is_file() {
            return Err(FileError::NotAFile { path: display });
        }

        let bytes = std::fs::read(path).map_err(|err| FileError::from_io(&display, &err))?;
        log::info!("read {} bytes from {}", bytes.len(), display);
        Ok(Some(FileContent::parse(&bytes)))
    }
}

/// ファイル保存処理
#[derive(Debug, Default)]
pub struct FileSaver;

impl FileSaver {
    pub fn new() -> Self {
        Self
    }

    /// 切り詰めてから一度に書き込み、書き込んだバイト数を返す
    pub fn save_file(&self, path: &Path, content: &[u8]) -> file::Result<usize> {
        let display = path.display().to_string();
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|err| FileError::from_io(&display, &err))?;

        file.write_all(content)
            .and_then(|()| file.flush())
            .map_err(|err| FileError::from_io(&display, &err))?;

        log::info!("wrote {} bytes to {}", content.len(), display);
        Ok(content.len())
    }
}

/// ファイルを開いてエディタに読み込む
///
/// 存在しないファイルは空のバッファとして開く
pub fn open(editor: &mut Editor, path: &str) -> Result<()> {
    match FileReader::new().read_file(Path::new(path))? {
        Some(content) => editor.load_rows(path, content.rows, content.trailing_newline),
        None => {
            log::info!("{} does not exist, starting a new buffer", path);
            editor.load_rows(path, Vec::<Vec<u8>>::new(), true)
        }
    }
}

/// バッファをファイル名に保存する
///
/// 失敗した場合はバッファと変更フラグに触れない
pub fn save(editor: &mut Editor) -> Result<usize> {
    let filename = editor
        .store()
        .filename()
        .map(str::to_string)
        .ok_or(FileError::NoFileName)?;

    let content = editor.store().rows_to_text();
    match FileSaver::new().save_file(Path::new(&filename), &content) {
        Ok(written) => {
            editor.mark_clean();
            Ok(written)
        }
        Err(err) => {
            log::warn!("save failed: {}", err);
            Err(err.into())
        }
    }
}
