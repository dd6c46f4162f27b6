//! バイト入力源
//!
//! デコーダは1バイトずつ、タイムアウト付きで読み取る

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// タイムアウト付きの1バイト読み取り
pub trait ByteSource {
    /// `timeout` 以内に届いた1バイトを返す。届かなければ `Ok(None)`
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// 標準入力（端末）からの読み取り
///
/// 読み取り専用スレッドがバイトをチャネルへ流し、メインスレッドは
/// `recv_timeout` で待つ。編集状態には一切触れない。
pub struct StdinSource {
    receiver: Receiver<io::Result<u8>>,
}

impl StdinSource {
    pub fn spawn() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("kg-stdin".to_string())
            .spawn(move || {
                let stdin = io::stdin();
                let mut lock = stdin.lock();
                let mut byte = [0u8; 1];
                loop {
                    let result = match lock.read(&mut byte) {
                        Ok(0) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
                        Ok(_) => Ok(byte[0]),
                        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                        Err(err) => Err(err),
                    };
                    let stop = result.is_err();
                    if sender.send(result).is_err() || stop {
                        break;
                    }
                }
            })?;
        Ok(Self { receiver })
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result.map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )),
        }
    }
}

/// 事前に用意したバイト列を返す入力源（`None` はタイムアウト）
///
/// 使い切った後は常にタイムアウトを返す
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// タイムアウトを挟まない連続したバイト列
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().copied().map(Some))
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().copied().map(Some));
    }

    pub fn push_timeout(&mut self) {
        self.script.push_back(None);
    }

    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        Ok(self.script.pop_front().flatten())
    }
}
