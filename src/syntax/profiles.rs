//! 組み込み言語プロファイル
//!
//! 先頭から順にファイル名パターンを照合し、最初に一致したものを採用する。
//! `.` で始まるパターンは接尾辞、それ以外は部分文字列として照合

use super::{HighlightFlags, SyntaxProfile};

const C_STYLE: Option<([u8; 2], [u8; 2])> = Some((*b"/*", *b"*/"));

const ALL: HighlightFlags = HighlightFlags {
    strings: true,
    numbers: true,
};

/// 優先順位順のプロファイル一覧
pub static PROFILES: &[SyntaxProfile] = &[
    SyntaxProfile {
        name: "C/C++",
        filematch: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        primary_keywords: &[
            "auto", "break", "case", "continue", "default", "do", "else", "enum", "extern",
            "for", "goto", "if", "register", "return", "sizeof", "static", "struct", "switch",
            "typedef", "union", "volatile", "while", "NULL", "alignas", "alignof", "class",
            "constexpr", "const_cast", "delete", "dynamic_cast", "explicit", "export", "false",
            "friend", "inline", "mutable", "namespace", "new", "noexcept", "nullptr",
            "operator", "private", "protected", "public", "reinterpret_cast", "static_assert",
            "static_cast", "template", "this", "thread_local", "throw", "true", "try",
            "typeid", "typename", "virtual",
        ],
        secondary_keywords: &[
            "int", "long", "double", "float", "char", "unsigned", "signed", "void", "short",
            "const", "bool",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Python",
        filematch: &[".py", ".pyw", ".pyi", ".pyx"],
        primary_keywords: &[
            "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
            "except", "finally", "for", "from", "global", "if", "import", "in", "is",
            "lambda", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
            "async", "await", "nonlocal", "True", "False", "None",
        ],
        secondary_keywords: &[
            "abs", "all", "any", "bool", "bytes", "dict", "enumerate", "filter", "float",
            "int", "isinstance", "len", "list", "map", "max", "min", "open", "print", "range",
            "repr", "set", "sorted", "str", "sum", "super", "tuple", "type", "zip", "self",
            "cls",
        ],
        line_comment: Some("#"),
        block_comment: None,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Shell",
        filematch: &[
            ".sh", ".bash", ".zsh", ".ksh", ".csh", ".tcsh", ".profile", ".bashrc",
            ".bash_profile", ".zshrc", ".zshenv",
        ],
        primary_keywords: &[
            "if", "then", "else", "elif", "fi", "case", "esac", "for", "while", "until", "do",
            "done", "select", "function", "in", "time",
        ],
        secondary_keywords: &[
            "alias", "cd", "declare", "echo", "eval", "exec", "exit", "export", "local",
            "printf", "pwd", "read", "return", "set", "shift", "source", "test", "trap",
            "unset",
        ],
        line_comment: Some("#"),
        block_comment: None,
        flags: ALL,
    },
    SyntaxProfile {
        name: "JavaScript",
        filematch: &[".js", ".jsx", ".mjs", ".cjs"],
        primary_keywords: &[
            "break", "case", "catch", "class", "const", "continue", "debugger", "default",
            "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
            "import", "in", "instanceof", "let", "new", "return", "super", "switch", "this",
            "throw", "try", "typeof", "var", "void", "while", "with", "yield", "async",
            "await", "of", "true", "false", "null", "undefined",
        ],
        secondary_keywords: &[
            "Array", "Object", "String", "Number", "Boolean", "Date", "Math", "RegExp",
            "Error", "JSON", "console", "window", "document", "Promise", "Map", "Set",
            "Symbol",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Rust",
        filematch: &[".rs", ".rlib"],
        primary_keywords: &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else",
            "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop",
            "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self", "static",
            "struct", "super", "trait", "true", "type", "unsafe", "use", "where", "while",
        ],
        secondary_keywords: &[
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
            "usize", "f32", "f64", "bool", "char", "str", "String", "Vec", "HashMap",
            "HashSet", "BTreeMap", "Option", "Result", "Box", "Rc", "Arc", "RefCell",
            "Mutex",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Java",
        filematch: &[".java"],
        primary_keywords: &[
            "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
            "class", "const", "continue", "default", "do", "double", "else", "enum",
            "extends", "final", "finally", "float", "for", "if", "implements", "import",
            "instanceof", "int", "interface", "long", "new", "package", "private",
            "protected", "public", "return", "short", "static", "super", "switch",
            "synchronized", "this", "throw", "throws", "try", "void", "volatile", "while",
            "true", "false", "null",
        ],
        secondary_keywords: &[
            "String", "Object", "Class", "System", "Thread", "Exception", "ArrayList",
            "HashMap", "List", "Map", "Set",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "TypeScript",
        filematch: &[".ts", ".tsx"],
        primary_keywords: &[
            "break", "case", "catch", "class", "const", "continue", "default", "delete", "do",
            "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
            "instanceof", "let", "new", "return", "super", "switch", "this", "throw", "try",
            "typeof", "var", "void", "while", "yield", "async", "await", "of", "true",
            "false", "null", "undefined", "interface", "type", "enum", "namespace", "declare",
            "abstract", "implements", "private", "protected", "public", "readonly", "static",
            "as", "keyof",
        ],
        secondary_keywords: &[
            "string", "number", "boolean", "object", "any", "unknown", "never", "bigint",
            "symbol", "Array", "Promise", "Record", "Partial",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "C#",
        filematch: &[".cs", ".csx"],
        primary_keywords: &[
            "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char",
            "class", "const", "continue", "decimal", "default", "delegate", "do", "double",
            "else", "enum", "event", "false", "finally", "float", "for", "foreach", "if",
            "in", "int", "interface", "internal", "is", "long", "namespace", "new", "null",
            "object", "override", "private", "protected", "public", "readonly", "ref",
            "return", "static", "string", "struct", "switch", "this", "throw", "true", "try",
            "using", "var", "virtual", "void", "while", "async", "await",
        ],
        secondary_keywords: &[
            "String", "Object", "Int32", "Boolean", "DateTime", "List", "Dictionary", "Task",
            "Exception",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "PHP",
        filematch: &[".php", ".phtml"],
        primary_keywords: &[
            "abstract", "and", "array", "as", "break", "case", "catch", "class", "const",
            "continue", "default", "do", "echo", "else", "elseif", "extends", "final",
            "for", "foreach", "function", "global", "if", "implements", "include",
            "interface", "namespace", "new", "or", "private", "protected", "public",
            "require", "return", "static", "switch", "throw", "trait", "try", "use", "var",
            "while", "true", "false", "null",
        ],
        secondary_keywords: &[
            "strlen", "substr", "strpos", "explode", "implode", "count", "isset", "unset",
            "var_dump",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Ruby",
        filematch: &[".rb", ".rbw", ".rake", ".gemspec"],
        primary_keywords: &[
            "alias", "and", "begin", "break", "case", "class", "def", "defined", "do", "else",
            "elsif", "end", "ensure", "false", "for", "if", "in", "module", "next", "nil",
            "not", "or", "redo", "rescue", "retry", "return", "self", "super", "then", "true",
            "unless", "until", "when", "while", "yield", "require", "include",
        ],
        secondary_keywords: &[
            "puts", "print", "each", "map", "select", "reduce", "Array", "Hash", "String",
            "Integer", "Symbol",
        ],
        line_comment: Some("#"),
        block_comment: None,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Swift",
        filematch: &[".swift"],
        primary_keywords: &[
            "class", "deinit", "enum", "extension", "func", "import", "init", "let",
            "private", "protocol", "public", "static", "struct", "var", "break", "case",
            "continue", "default", "defer", "do", "else", "for", "guard", "if", "in",
            "return", "switch", "where", "while", "as", "catch", "false", "is", "nil",
            "self", "Self", "throw", "throws", "true", "try", "async", "await",
        ],
        secondary_keywords: &[
            "Int", "Double", "Float", "Bool", "String", "Array", "Dictionary", "Set",
            "Optional", "Result", "Error",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "SQL",
        filematch: &[".sql", ".ddl", ".dml"],
        primary_keywords: &[
            "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "DELETE",
            "CREATE", "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "PRIMARY", "FOREIGN", "KEY",
            "REFERENCES", "UNIQUE", "NOT", "NULL", "DEFAULT", "INT", "INTEGER", "VARCHAR",
            "TEXT", "AND", "OR", "IN", "LIKE", "IS", "JOIN", "ON", "GROUP", "BY", "ORDER",
            "LIMIT", "AS", "CASE", "WHEN", "THEN", "ELSE", "END", "COUNT", "BEGIN",
            "COMMIT", "ROLLBACK",
        ],
        secondary_keywords: &["TRUE", "FALSE", "UNKNOWN"],
        line_comment: Some("--"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Dart",
        filematch: &[".dart"],
        primary_keywords: &[
            "abstract", "as", "assert", "async", "await", "break", "case", "catch", "class",
            "const", "continue", "default", "do", "else", "enum", "extends", "false",
            "final", "finally", "for", "if", "implements", "import", "in", "is", "late",
            "new", "null", "required", "return", "static", "super", "switch", "this",
            "throw", "true", "try", "var", "void", "while", "with",
        ],
        secondary_keywords: &[
            "int", "double", "num", "String", "bool", "List", "Map", "Set", "Future",
            "Stream",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "HTML",
        filematch: &[".html", ".htm", ".xhtml"],
        primary_keywords: &[
            "<html>", "</html>", "<head>", "</head>", "<body>", "</body>", "<div>",
            "</div>", "<span>", "</span>", "<p>", "</p>", "<ul>", "</ul>", "<li>", "</li>",
            "<title>", "</title>", "<script>", "</script>", "<style>", "</style>",
        ],
        secondary_keywords: &["class", "id", "href", "src", "style", "type"],
        line_comment: Some("<!--"),
        block_comment: None,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Vue",
        filematch: &[".vue"],
        primary_keywords: &[
            "async", "await", "break", "case", "catch", "class", "const", "continue",
            "default", "do", "else", "export", "extends", "for", "from", "function", "if",
            "import", "in", "let", "new", "return", "switch", "this", "throw", "try", "var",
            "while", "<template>", "</template>", "<script>", "</script>", "<style>",
            "</style>",
        ],
        secondary_keywords: &[
            "ref", "reactive", "computed", "watch", "onMounted", "defineProps", "defineEmits",
            "data", "props", "methods", "true", "false", "null", "undefined",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
    SyntaxProfile {
        name: "Svelte",
        filematch: &[".svelte"],
        primary_keywords: &[
            "async", "await", "break", "case", "catch", "class", "const", "continue",
            "default", "do", "else", "export", "for", "from", "function", "if", "import",
            "in", "let", "new", "return", "switch", "this", "throw", "try", "var", "while",
            "<script>", "</script>", "<style>", "</style>",
        ],
        secondary_keywords: &[
            "onMount", "onDestroy", "tick", "writable", "readable", "derived", "true",
            "false", "null", "undefined",
        ],
        line_comment: Some("//"),
        block_comment: C_STYLE,
        flags: ALL,
    },
];

/// ファイル名からプロファイルを選択（一致なしなら None）
pub fn select_profile(filename: &str) -> Option<&'static SyntaxProfile> {
    PROFILES.iter().find(|profile| profile.matches_filename(filename))
}
