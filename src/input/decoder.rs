//! キー入力デコーダ
//!
//! 端末からのバイト列を論理キーに変換する有限状態機械。
//! 読み取りは毎回タイムアウト付きで、ESC の後に何も来なければ Escape キーとして扱う。
//! 解釈できないシーケンスは途中で打ち切り、Escape を返す。

use super::paste::PasteDetector;
use super::source::ByteSource;
use crate::error::InputError;
use std::io;
use std::time::{Duration, Instant};

const ESC: u8 = 0x1b;

/// 論理キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// 通常のバイト（制御文字を含む）
    Byte(u8),
    Escape,
    AltF,
    AltB,
    AltV,
    AltW,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    CtrlUp,
    CtrlDown,
    CtrlLeft,
    CtrlRight,
    CtrlHome,
    CtrlEnd,
}

/// デコーダの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    Normal,
    /// ESC を受信
    SawEsc,
    /// ESC `[` を受信
    SawCsi,
    /// ESC `[` 数字 を受信
    SawCsiDigit(u8),
    /// ESC `[` `1` `;` を受信（`ctrl` は続く `5` を受信済みか）
    SawCsiModifier { ctrl: bool },
    /// ESC `O` を受信
    SawSs3,
    /// 未知の CSI シーケンス。終端バイトまで読み捨てる
    SkipCsi,
}

/// 1バイト（またはタイムアウト）に対する遷移結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 次の状態へ
    Next(DecodeState),
    /// キーが確定
    Emit(KeyCode),
    /// 通常状態でのタイムアウト（キーなし）
    Idle,
}

/// 遷移表
///
/// `byte` が `None` の場合はタイムアウト
pub fn transition(state: DecodeState, byte: Option<u8>) -> Transition {
    use DecodeState::*;
    use KeyCode::*;
    use Transition::{Emit, Idle, Next};

    match (state, byte) {
        (Normal, None) => Idle,
        (Normal, Some(ESC)) => Next(SawEsc),
        (Normal, Some(b)) => Emit(Byte(b)),

        (SawEsc, Some(b'[')) => Next(SawCsi),
        (SawEsc, Some(b'O')) => Next(SawSs3),
        (SawEsc, Some(b'f')) => Emit(AltF),
        (SawEsc, Some(b'b')) => Emit(AltB),
        (SawEsc, Some(b'v')) => Emit(AltV),
        (SawEsc, Some(b'w')) => Emit(AltW),

        (SawCsi, Some(b @ b'0'..=b'9')) => Next(SawCsiDigit(b)),
        (SawCsi, Some(b'A')) => Emit(ArrowUp),
        (SawCsi, Some(b'B')) => Emit(ArrowDown),
        (SawCsi, Some(b'C')) => Emit(ArrowRight),
        (SawCsi, Some(b'D')) => Emit(ArrowLeft),
        (SawCsi, Some(b'H')) => Emit(Home),
        (SawCsi, Some(b'F')) => Emit(End),

        (SawCsiDigit(b'1'), Some(b';')) => Next(SawCsiModifier { ctrl: false }),
        (SawCsiDigit(digit), Some(b'~')) => match digit {
            b'1' | b'7' => Emit(Home),
            b'4' | b'8' => Emit(End),
            b'3' => Emit(Delete),
            b'5' => Emit(PageUp),
            b'6' => Emit(PageDown),
            _ => Emit(Escape),
        },

        (SawCsiModifier { ctrl: false }, Some(b'5')) => Next(SawCsiModifier { ctrl: true }),
        (SawCsiModifier { ctrl: true }, Some(b'A')) => Emit(CtrlUp),
        (SawCsiModifier { ctrl: true }, Some(b'B')) => Emit(CtrlDown),
        (SawCsiModifier { ctrl: true }, Some(b'C')) => Emit(CtrlRight),
        (SawCsiModifier { ctrl: true }, Some(b'D')) => Emit(CtrlLeft),
        (SawCsiModifier { ctrl: true }, Some(b'H')) => Emit(CtrlHome),
        (SawCsiModifier { ctrl: true }, Some(b'F')) => Emit(CtrlEnd),

        (SawSs3, Some(b'H')) => Emit(Home),
        (SawSs3, Some(b'F')) => Emit(End),

        // 未知の CSI はパラメータを読み捨て、終端バイトごと Escape にする
        (SawCsi | SawCsiDigit(_) | SawCsiModifier { .. } | SkipCsi, Some(b)) if is_csi_parameter(b) => {
            Next(SkipCsi)
        }

        // ESC 単独、途中で途切れたシーケンス、未知のシーケンス
        _ => Emit(Escape),
    }
}

/// CSI のパラメータ・中間バイト（終端バイトは 0x40..=0x7e）
fn is_csi_parameter(byte: u8) -> bool {
    (0x20..=0x3f).contains(&byte)
}

/// バイト入力源から論理キーを読み取る
pub struct KeyDecoder<S> {
    source: S,
    timeout: Duration,
    paste: PasteDetector,
}

impl<S: ByteSource> KeyDecoder<S> {
    pub fn new(source: S, timeout: Duration) -> Self {
        Self::with_paste_detector(source, timeout, PasteDetector::default())
    }

    pub fn with_paste_detector(source: S, timeout: Duration, paste: PasteDetector) -> Self {
        Self {
            source,
            timeout,
            paste,
        }
    }

    /// 次のキーを読み取る
    ///
    /// タイムアウトまでに何も届かなければ `Ok(None)`。
    /// 呼び出し側はその間に端末サイズ変更などを処理する。
    pub fn read_key(&mut self) -> Result<Option<KeyCode>, InputError> {
        let mut state = DecodeState::Normal;
        loop {
            let byte = self.source.read_byte(self.timeout).map_err(input_error)?;
            match transition(state, byte) {
                Transition::Next(next) => state = next,
                Transition::Idle => return Ok(None),
                Transition::Emit(key) => {
                    if key == KeyCode::Escape && state != DecodeState::SawEsc {
                        log::debug!("unrecognized escape sequence in state {:?}", state);
                    }
                    self.paste.observe(Instant::now());
                    return Ok(Some(key));
                }
            }
        }
    }

    /// 直近のキーがペーストの一部とみなされているか
    pub fn in_paste(&self) -> bool {
        self.paste.in_paste()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

fn input_error(err: io::Error) -> InputError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => InputError::Closed,
        _ => InputError::Read {
            message: err.to_string(),
        },
    }
}
