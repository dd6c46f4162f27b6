//! Editor undo property tests
//!
//! Every recorded edit is undone in reverse order and each intermediate
//! snapshot must be reproduced exactly.

use kg::Editor;
use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};

#[derive(Debug, Clone)]
enum Action {
    Type(u8),
    Insert(u8),
    Newline,
    Backspace,
    DeleteForward,
    KillLine,
    DeleteRow,
    SetMark,
    KillRegion,
    CopyRegion,
    Yank,
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordForward,
    BufferEnd,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => prop_oneof![b'a'..=b'z', Just(b' '), Just(b'('), Just(b'"')].prop_map(Action::Type),
        2 => (b'a'..=b'z').prop_map(Action::Insert),
        2 => Just(Action::Newline),
        2 => Just(Action::Backspace),
        1 => Just(Action::DeleteForward),
        1 => Just(Action::KillLine),
        1 => Just(Action::DeleteRow),
        1 => Just(Action::SetMark),
        1 => Just(Action::KillRegion),
        1 => Just(Action::CopyRegion),
        1 => Just(Action::Yank),
        1 => Just(Action::Left),
        1 => Just(Action::Right),
        1 => Just(Action::Up),
        1 => Just(Action::Down),
        1 => Just(Action::LineStart),
        1 => Just(Action::LineEnd),
        1 => Just(Action::WordForward),
        1 => Just(Action::BufferEnd),
    ]
}

fn initial_lines() -> impl Strategy<Value = Vec<Vec<u8>>> {
    proptest::collection::vec(
        proptest::collection::vec(prop_oneof![b'a'..=b'z', Just(b' '), Just(b'\t')], 0..12),
        0..5,
    )
}

fn snapshot(editor: &Editor) -> Vec<Vec<u8>> {
    editor
        .store()
        .rows()
        .iter()
        .map(|row| row.content().to_vec())
        .collect()
}

fn perform(editor: &mut Editor, action: &Action) -> kg::Result<()> {
    if !matches!(action, Action::KillLine) {
        editor.break_kill_chain();
    }
    match action {
        Action::Type(ch) => editor.type_char(*ch)?,
        Action::Insert(ch) => editor.insert_char(*ch)?,
        Action::Newline => editor.insert_newline()?,
        Action::Backspace => editor.delete_char()?,
        Action::DeleteForward => editor.delete_forward()?,
        Action::KillLine => editor.kill_line()?,
        Action::DeleteRow => {
            let row = editor.cursor().row;
            if row < editor.store().row_count() {
                editor.delete_row(row)?;
            }
        }
        Action::SetMark => editor.set_mark(),
        Action::KillRegion => {
            editor.kill_region()?;
        }
        Action::CopyRegion => {
            editor.copy_region()?;
        }
        Action::Yank => {
            editor.yank()?;
        }
        Action::Left => editor.move_left(),
        Action::Right => editor.move_right(),
        Action::Up => editor.move_up(),
        Action::Down => editor.move_down(),
        Action::LineStart => editor.move_line_start(),
        Action::LineEnd => editor.move_line_end(),
        Action::WordForward => editor.move_word_forward(),
        Action::BufferEnd => editor.move_buffer_end(),
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn undo_replays_every_snapshot_in_reverse(
        lines in initial_lines(),
        actions in proptest::collection::vec(action_strategy(), 0..60)
    ) {
        let mut editor = Editor::new();
        editor.load_rows("prop.c", &lines, true).unwrap();
        prop_assert!(!editor.is_dirty());

        // 各コマンド実行前のログの深さと内容
        let mut snapshots: Vec<(usize, Vec<Vec<u8>>)> = Vec::new();
        for action in &actions {
            let depth = editor.history().depth();
            if snapshots.last().map(|(d, _)| *d) != Some(depth) {
                snapshots.push((depth, snapshot(&editor)));
            }
            perform(&mut editor, action).unwrap();
        }

        while let Some((depth, expected)) = snapshots.pop() {
            while editor.history().depth() > depth {
                editor.undo().unwrap();
            }
            prop_assert_eq!(editor.history().depth(), depth);
            prop_assert_eq!(snapshot(&editor), expected);
        }

        prop_assert!(editor.history().is_empty());
        prop_assert_eq!(snapshot(&editor), lines);
        prop_assert!(!editor.is_dirty());
    }

    #[test]
    fn rows_stay_consistent_after_undo(
        lines in initial_lines(),
        actions in proptest::collection::vec(action_strategy(), 1..40)
    ) {
        let mut editor = Editor::new();
        editor.load_rows("prop.c", &lines, true).unwrap();

        for action in &actions {
            perform(&mut editor, action).unwrap();
        }
        while editor.undo().is_ok() {}

        for (i, row) in editor.store().rows().iter().enumerate() {
            prop_assert_eq!(row.index(), i);
            prop_assert_eq!(row.highlight().len(), row.rendered().len());
        }
    }
}
