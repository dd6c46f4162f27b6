//! シンタックスハイライト
//!
//! 行の表示用バイト列から、バイトごとのハイライト種別を求める。
//! 行をまたぐ状態は「前の行末で複数行コメントが開いているか」のみ

pub mod profiles;

pub use profiles::{select_profile, PROFILES};

/// ハイライト種別（表示用バイト1つにつき1つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HighlightTag {
    #[default]
    Normal,
    NonPrintable,
    Comment,
    MlComment,
    KeywordPrimary,
    KeywordSecondary,
    String,
    Number,
    SearchMatch,
}

/// ハイライト種別を端末の前景色コード（SGR 30-37）に変換
pub fn color_for(tag: HighlightTag) -> u8 {
    match tag {
        HighlightTag::Comment | HighlightTag::MlComment => 36, // cyan
        HighlightTag::KeywordPrimary => 33,                    // yellow
        HighlightTag::KeywordSecondary => 32,                  // green
        HighlightTag::String => 35,                            // magenta
        HighlightTag::Number => 31,                            // red
        HighlightTag::SearchMatch => 34,                       // blue
        _ => 37,                                               // white
    }
}

/// 文字列・数値ハイライトの有効フラグ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightFlags {
    pub strings: bool,
    pub numbers: bool,
}

/// キーワードの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    Primary,
    Secondary,
}

impl KeywordClass {
    fn tag(self) -> HighlightTag {
        match self {
            KeywordClass::Primary => HighlightTag::KeywordPrimary,
            KeywordClass::Secondary => HighlightTag::KeywordSecondary,
        }
    }
}

/// 言語プロファイル（不変）
#[derive(Debug)]
pub struct SyntaxProfile {
    pub name: &'static str,
    pub filematch: &'static [&'static str],
    pub primary_keywords: &'static [&'static str],
    pub secondary_keywords: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    /// 複数行コメントの開始・終了（ちょうど2バイト）
    pub block_comment: Option<([u8; 2], [u8; 2])>,
    pub flags: HighlightFlags,
}

impl SyntaxProfile {
    /// ファイル名がこのプロファイルのパターンに一致するか
    pub fn matches_filename(&self, filename: &str) -> bool {
        self.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                filename.ends_with(pattern)
            } else {
                filename.contains(pattern)
            }
        })
    }

    /// キーワード種別を引く（完全一致）
    pub fn keyword_class(&self, token: &[u8]) -> Option<KeywordClass> {
        if self.primary_keywords.iter().any(|kw| kw.as_bytes() == token) {
            Some(KeywordClass::Primary)
        } else if self.secondary_keywords.iter().any(|kw| kw.as_bytes() == token) {
            Some(KeywordClass::Secondary)
        } else {
            None
        }
    }

    /// `text` 先頭から一致する最長のキーワードを探す
    ///
    /// 一致部分の直後がキーワード境界でなければ採用しない（`ifx` の `if` など）
    pub fn match_keyword(&self, text: &[u8]) -> Option<(usize, KeywordClass)> {
        let primary = self
            .primary_keywords
            .iter()
            .map(|kw| (kw.as_bytes(), KeywordClass::Primary));
        let secondary = self
            .secondary_keywords
            .iter()
            .map(|kw| (kw.as_bytes(), KeywordClass::Secondary));

        let mut best: Option<(usize, KeywordClass)> = None;
        for (kw, class) in primary.chain(secondary) {
            if kw.is_empty() || !text.starts_with(kw) {
                continue;
            }
            let bounded = text.get(kw.len()).map_or(true, |&next| is_keyword_boundary(next));
            if !bounded {
                continue;
            }
            if best.map_or(true, |(len, _)| kw.len() > len) {
                best = Some((kw.len(), class));
            }
        }
        best
    }
}

/// 走査中の区切り判定（コメント・数値・キーワード開始位置の判定に使う）
pub fn is_separator(byte: u8) -> bool {
    byte == 0 || byte.is_ascii_whitespace() || b",.()+-/*=~%[];".contains(&byte)
}

/// キーワード直後の境界判定
///
/// `is_separator` の集合に `{` `}` を加えたもの。`<` `>` はどちらにも含めない
pub fn is_keyword_boundary(byte: u8) -> bool {
    is_separator(byte) || byte == b'{' || byte == b'}'
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// 1行分の走査状態
#[derive(Debug)]
struct ScanState {
    prev_was_separator: bool,
    in_string: Option<u8>,
    in_comment: bool,
}

/// シンタックスハイライタ
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlighter {
    profile: Option<&'static SyntaxProfile>,
}

impl Highlighter {
    pub fn new(profile: Option<&'static SyntaxProfile>) -> Self {
        Self { profile }
    }

    /// ファイル名から選択したプロファイルで構築
    pub fn for_filename(filename: &str) -> Self {
        Self::new(select_profile(filename))
    }

    pub fn profile(&self) -> Option<&'static SyntaxProfile> {
        self.profile
    }

    /// 1行をハイライトし、行末で複数行コメントが開いたままかを返す
    ///
    /// `tags` は `rendered` と同じ長さに作り直される
    pub fn highlight_line(
        &self,
        rendered: &[u8],
        starts_in_comment: bool,
        tags: &mut Vec<HighlightTag>,
    ) -> bool {
        tags.clear();
        tags.resize(rendered.len(), HighlightTag::Normal);

        let Some(profile) = self.profile else {
            return false;
        };

        let mut state = ScanState {
            prev_was_separator: true,
            in_string: None,
            in_comment: starts_in_comment,
        };
        let mut i = 0;

        while i < rendered.len() {
            let byte = rendered[i];
            let rest = &rendered[i..];

            if state.in_string.is_none() && !state.in_comment && state.prev_was_separator {
                if let Some(marker) = profile.line_comment {
                    if rest.starts_with(marker.as_bytes()) {
                        tags[i..].fill(HighlightTag::Comment);
                        break;
                    }
                }
            }

            if state.in_comment {
                tags[i] = HighlightTag::MlComment;
                if let Some((_, end)) = profile.block_comment {
                    if rest.starts_with(&end) {
                        tags[i + 1] = HighlightTag::MlComment;
                        i += 2;
                        state.in_comment = false;
                        state.prev_was_separator = true;
                        continue;
                    }
                }
                state.prev_was_separator = false;
                i += 1;
                continue;
            }

            // 文字列の中でも開始記号はコメントを開く
            if let Some((start, _)) = profile.block_comment {
                if rest.starts_with(&start) {
                    tags[i] = HighlightTag::MlComment;
                    tags[i + 1] = HighlightTag::MlComment;
                    i += 2;
                    state.in_comment = true;
                    state.prev_was_separator = false;
                    continue;
                }
            }

            if profile.flags.strings {
                if let Some(quote) = state.in_string {
                    tags[i] = HighlightTag::String;
                    if byte == b'\\' && i + 1 < rendered.len() {
                        tags[i + 1] = HighlightTag::String;
                        i += 2;
                        continue;
                    }
                    if byte == quote {
                        state.in_string = None;
                    }
                    i += 1;
                    continue;
                }
                if byte == b'"' || byte == b'\'' {
                    state.in_string = Some(byte);
                    tags[i] = HighlightTag::String;
                    state.prev_was_separator = false;
                    i += 1;
                    continue;
                }
            }

            if !is_printable(byte) {
                tags[i] = HighlightTag::NonPrintable;
                state.prev_was_separator = false;
                i += 1;
                continue;
            }

            if profile.flags.numbers {
                let after_number = i > 0 && tags[i - 1] == HighlightTag::Number;
                if (byte.is_ascii_digit() && (state.prev_was_separator || after_number))
                    || (byte == b'.' && after_number)
                {
                    tags[i] = HighlightTag::Number;
                    state.prev_was_separator = false;
                    i += 1;
                    continue;
                }
            }

            if state.prev_was_separator {
                if let Some((len, class)) = profile.match_keyword(rest) {
                    tags[i..i + len].fill(class.tag());
                    i += len;
                    state.prev_was_separator = false;
                    continue;
                }
            }

            state.prev_was_separator = is_separator(byte);
            i += 1;
        }

        ends_with_open_comment(profile, rendered, tags, starts_in_comment)
    }
}

/// 行末で複数行コメントが開いたままか
///
/// 空行は直前の行の状態を引き継ぐ
fn ends_with_open_comment(
    profile: &SyntaxProfile,
    rendered: &[u8],
    tags: &[HighlightTag],
    starts_in_comment: bool,
) -> bool {
    let Some((_, end)) = profile.block_comment else {
        return false;
    };
    match tags.last() {
        None => starts_in_comment,
        Some(HighlightTag::MlComment) => !(rendered.len() >= 2 && rendered.ends_with(&end)),
        Some(_) => false,
    }
}
