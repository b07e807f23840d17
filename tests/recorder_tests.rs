//! Recording scenarios: tap collapsing, overlapping keys, inserts, and
//! handing the result to the macro library.

use kmkpad::models::{CellPos, MacroAction, Project};
use kmkpad::recorder::{MacroRecorder, PhysicalKey, RecorderState};
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn tap(code: &str) -> MacroAction {
    MacroAction::Tap(code.to_string())
}

fn press(code: &str) -> MacroAction {
    MacroAction::Press(code.to_string())
}

fn release(code: &str) -> MacroAction {
    MacroAction::Release(code.to_string())
}

#[test]
fn test_quick_press_becomes_single_tap() {
    let a = PhysicalKey::new("A");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_down(&a, ms(0));
    rec.key_up(&a, ms(100));
    assert_eq!(rec.stop(), &[tap("KC.A")]);
}

#[test]
fn test_long_press_keeps_press_and_appends_release() {
    let a = PhysicalKey::new("A");
    let b = PhysicalKey::new("B");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_down(&a, ms(0));
    rec.key_down(&b, ms(10));
    rec.key_up(&b, ms(20));
    rec.key_up(&a, ms(300));
    assert_eq!(
        rec.stop(),
        &[press("KC.A"), tap("KC.B"), release("KC.A")]
    );
}

#[test]
fn test_overlapping_keys_are_tracked_independently() {
    let a = PhysicalKey::new("A");
    let b = PhysicalKey::new("B");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_down(&a, ms(0));
    rec.key_down(&b, ms(50));
    rec.key_up(&a, ms(100));
    rec.key_up(&b, ms(400));
    assert_eq!(
        rec.stop(),
        &[tap("KC.A"), press("KC.B"), release("KC.B")]
    );
}

#[test]
fn test_inserts_are_not_moved_by_later_collapse() {
    let shift = PhysicalKey::new("Shift");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_down(&shift, ms(0));
    rec.insert_text("hello");
    rec.insert_delay(25);
    rec.key_up(&shift, ms(150));
    assert_eq!(
        rec.sequence(),
        &[
            tap("KC.LSFT"),
            MacroAction::Text("hello".into()),
            MacroAction::Delay(25)
        ]
    );
}

#[test]
fn test_stop_with_held_key_keeps_unmatched_press() {
    let ctrl = PhysicalKey::new("Control");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_down(&ctrl, ms(0));
    assert_eq!(rec.pending_count(), 1);
    assert_eq!(rec.stop(), &[press("KC.LCTL")]);
    assert_eq!(rec.state(), RecorderState::Idle);
    assert_eq!(rec.pending_count(), 0);

    // events after stop are ignored
    assert!(!rec.key_up(&ctrl, ms(10)));
    assert_eq!(rec.sequence(), &[press("KC.LCTL")]);
}

#[test]
fn test_key_up_without_press_appends_release() {
    let a = PhysicalKey::new("A");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_up(&a, ms(5));
    assert_eq!(rec.sequence(), &[release("KC.A")]);
}

#[test]
fn test_keypad_and_main_block_are_distinct_keys() {
    let main_one = PhysicalKey::new("1");
    let pad_one = PhysicalKey::keypad("1");
    let mut rec = MacroRecorder::new();
    rec.start();
    rec.key_down(&main_one, ms(0));
    rec.key_down(&pad_one, ms(0));
    rec.key_up(&pad_one, ms(50));
    rec.key_up(&main_one, ms(500));
    assert_eq!(
        rec.stop(),
        &[press("KC.N1"), tap("KC.KP_1"), release("KC.N1")]
    );
}

#[test]
fn test_independent_recordings_share_nothing() {
    let a = PhysicalKey::new("A");
    let mut first = MacroRecorder::new();
    let mut second = MacroRecorder::new();
    first.start();
    second.start();
    first.key_down(&a, ms(0));
    second.key_up(&a, ms(10));
    first.key_up(&a, ms(20));
    assert_eq!(first.stop(), &[tap("KC.A")]);
    assert_eq!(second.stop(), &[release("KC.A")]);
}

#[test]
fn test_recording_is_stored_and_referenced() {
    let c = PhysicalKey::new("C");
    let ctrl = PhysicalKey::new("Control");
    let mut rec = MacroRecorder::with_threshold(ms(150));
    rec.start();
    rec.key_down(&ctrl, ms(0));
    rec.key_down(&c, ms(20));
    rec.key_up(&c, ms(60));
    rec.key_up(&ctrl, ms(400));
    rec.stop();

    let mut project = Project::new();
    let name = project.add_macro("copy", rec.into_sequence()).unwrap();
    project
        .keymap_mut()
        .set_cell(0, CellPos::new(0, 0), format!("MACRO({name})"));

    assert_eq!(
        project.macros().get("COPY"),
        Some(&[press("KC.LCTL"), tap("KC.C"), release("KC.LCTL")][..])
    );
    assert_eq!(project.keymap().count_macro_references("COPY"), 1);
}
