//! ファイル操作モジュール

pub mod operations;

pub use operations::{open, save, FileContent, FileReader, FileSaver};
