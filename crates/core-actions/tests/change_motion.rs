mod common;
use common::*;

use core_actions::{
    Command, CommandError, CommandFlags, CommandResult, MotionArg, MotionKind, MotionResult,
    OperationKind, StoredCommand,
};
use core_state::RegisterShape;
use core_text::{Position, Span};
use pretty_assertions::assert_eq;

fn word_forward(start: usize, end: usize) -> Command {
    Command::ChangeMotion(MotionArg::Resolved(MotionResult {
        span: Span::new(start, end),
        is_forward: true,
        is_any_word: true,
        motion_kind: MotionKind::CharacterWiseExclusive,
        operation_kind: OperationKind::CharacterWise,
    }))
}

fn motion(span: Span, is_forward: bool, is_any_word: bool, line_wise: bool) -> Command {
    let (motion_kind, operation_kind) = if line_wise {
        (MotionKind::LineWise, OperationKind::LineWise)
    } else {
        (
            MotionKind::CharacterWiseInclusive,
            OperationKind::CharacterWise,
        )
    };
    Command::ChangeMotion(MotionArg::Resolved(MotionResult {
        span,
        is_forward,
        is_any_word,
        motion_kind,
        operation_kind,
    }))
}

#[test]
fn change_word_keeps_trailing_whitespace() {
    let mut h = Harness::new(&["foo bar"]);
    h.execute(word_forward(0, 4), none());
    assert_eq!(h.lines(), vec![" bar"]);
    assert_eq!(h.unnamed(), "foo");
    assert_eq!(h.caret(), Position::new(0, 0));
}

#[test]
fn change_word_over_only_whitespace_deletes_it() {
    let mut h = Harness::new(&["foo   bar"]).at(0, 3);
    h.execute(word_forward(3, 6), none());
    assert_eq!(h.lines(), vec!["foobar"]);
    assert_eq!(h.caret(), Position::new(0, 3));
}

#[test]
fn backward_motion_keeps_boundary_whitespace() {
    let mut h = Harness::new(&["foo bar "]).at(0, 8);
    h.execute(motion(Span::new(4, 8), false, true, false), none());
    assert_eq!(h.lines(), vec!["foo "]);
    assert_eq!(h.unnamed(), "bar ");
}

#[test]
fn forward_non_word_motion_takes_trailing_whitespace() {
    let mut h = Harness::new(&["ab  "]);
    h.execute(motion(Span::new(0, 4), true, false, false), none());
    assert_eq!(h.lines(), vec![""]);
    assert_eq!(h.unnamed(), "ab  ");
}

#[test]
fn line_wise_change_leaves_empty_line() {
    let mut h = Harness::new(&["one", "two", "three"]);
    h.execute(motion(Span::new(0, 8), true, false, true), none());
    assert_eq!(h.lines(), vec!["", "three"]);
    let reg = h.register(core_state::RegisterName::Unnamed);
    assert_eq!(reg.value, "one\ntwo\n");
    assert_eq!(reg.shape, RegisterShape::LineWise);
    assert_eq!(h.caret(), Position::new(0, 0));
}

#[test]
fn span_outside_buffer_is_an_error() {
    let mut h = Harness::new(&["short"]);
    let r = h.run(word_forward(2, 100), none());
    assert_eq!(
        r,
        CommandResult::Error(CommandError::InvalidMotion {
            start: 2,
            end: 100,
            len: 5
        })
    );
    assert_eq!(h.lines(), vec!["short"]);
    assert!(h.session.last_command().is_none());
}

#[test]
fn change_links_with_following_insertion_for_repeat() {
    let mut h = Harness::new(&["foo bar baz"]);
    h.run_with(
        word_forward(0, 4),
        none(),
        CommandFlags::REPEATABLE | CommandFlags::LINK_WITH_NEXT,
    );
    assert_eq!(h.lines(), vec![" bar baz"]);
    // Insert mode typed "qux" before leaving.
    h.state.buffer_mut().insert(0, "qux");
    h.executor().record_text_insertion("qux");
    let stored = h.session.last_command().cloned();
    assert!(matches!(stored, Some(StoredCommand::Linked(_, _))));

    h.state.caret = Position::new(0, 4);
    h.repeat(none());
    assert_eq!(h.lines(), vec!["qux qux baz"]);
    assert_eq!(h.caret(), Position::new(0, 6));
    assert_eq!(h.session.last_command().cloned(), stored);
}
