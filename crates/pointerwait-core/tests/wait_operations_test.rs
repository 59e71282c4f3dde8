//! Black-box checks of the four wait operations and the position accessors,
//! driven through the testing robot.

use pointerwait_core::{
    AbortSignal, EventFilter, InputSettings, LocalEventTarget, MoveFilter, Point, PointerButton,
    PointerEvent, PointerEventKind, PointerInput, WaitError,
};
use pointerwait_testing::{ManualTask, PointerRobot};

#[test]
fn move_updates_pointer_coordinates() {
    let mut robot = PointerRobot::launch();
    let input = robot.input();
    assert_eq!(input.get_pointer_position(), (0, 0));

    robot.move_pointer(10, 20);
    assert_eq!(input.get_pointer_x(), 10);
    assert_eq!(input.get_pointer_y(), 20);

    for (x, y) in [(3, 4), (-5, 600), (1920, 0)] {
        robot.move_pointer(x, y);
    }
    assert_eq!(input.get_pointer_position(), (1920, 0));
    assert_eq!(input.state().pointer_x(), 1920);
}

#[test]
fn pointer_down_ignores_other_buttons() {
    let mut robot = PointerRobot::launch();
    let mut task = ManualTask::new(robot.input().wait_for_pointer_down());
    assert!(!task.poll());
    assert_eq!(robot.listener_count(PointerEventKind::Down), 1);

    robot.press(PointerButton::Secondary);
    robot.press(PointerButton::Auxiliary);
    assert_eq!(task.wake_count(), 0);
    assert!(!task.poll());

    robot.press(PointerButton::Primary);
    assert_eq!(task.wake_count(), 1);
    assert!(task.poll());
    assert_eq!(robot.listener_count(PointerEventKind::Down), 0);

    // Listener is gone: another press has no observable effect.
    robot.release(PointerButton::Primary);
    robot.press(PointerButton::Primary);
    assert_eq!(task.wake_count(), 1);
}

#[test]
fn pointer_up_only_for_primary_release() {
    let mut robot = PointerRobot::launch();
    let mut task = ManualTask::new(robot.input().wait_for_pointer_up());
    assert!(!task.poll());

    robot.click(PointerButton::Secondary);
    assert!(!task.poll());
    robot.press(PointerButton::Primary);
    assert!(!task.poll());

    robot.release(PointerButton::Primary);
    assert!(task.poll());
    assert_eq!(robot.listener_count(PointerEventKind::Up), 0);
}

#[test]
fn right_button_down_uses_context_menu() {
    let mut robot = PointerRobot::launch();
    let baseline = robot.listener_count(PointerEventKind::ContextMenu);
    let mut task = ManualTask::new(robot.input().wait_for_right_button_down());
    assert!(!task.poll());

    // The press alone is not enough, the context-menu event completes it.
    robot.press(PointerButton::Secondary);
    assert!(!task.poll());
    robot.release(PointerButton::Secondary);

    let menu = robot.context_menu();
    assert!(task.poll());
    assert!(menu.is_default_prevented());
    assert_eq!(robot.listener_count(PointerEventKind::ContextMenu), baseline);
}

#[test]
fn right_button_down_accepts_keyboard_context_menu() {
    let mut robot = PointerRobot::launch();
    let mut task = ManualTask::new(robot.input().wait_for_right_button_down());
    assert!(!task.poll());

    // The menu key reports button 0; no button filter applies.
    robot.move_pointer(30, 40);
    let menu = robot.dispatch(
        PointerEvent::new(PointerEventKind::ContextMenu, Point::new(30, 40))
            .with_button(PointerButton::Primary),
    );
    assert!(task.poll());
    assert!(menu.is_default_prevented());
}

#[test]
fn context_menu_left_alone_when_suppression_disabled() {
    let mut robot =
        PointerRobot::launch_with_settings(InputSettings::new().with_context_menu_suppressed(false));
    let mut task = ManualTask::new(robot.input().wait_for_right_button_down());
    let menu = robot.right_click();
    assert!(task.poll());
    assert!(!menu.is_default_prevented());
}

#[test]
fn pointer_move_matches_any_movement_by_default() {
    let mut robot = PointerRobot::launch();
    let mut task = ManualTask::new(robot.input().wait_for_pointer_move());

    let movement = robot.move_pointer(8, 9);
    assert!(task.poll());
    assert!(movement.is_default_prevented());
    // Only the tracker remains on move.
    assert_eq!(robot.listener_count(PointerEventKind::Move), 1);
}

#[test]
fn pointer_move_with_held_filter_waits_for_drag() {
    let mut robot = PointerRobot::launch_with_settings(
        InputSettings::new().with_move_filter(MoveFilter::PrimaryButtonHeld),
    );
    let mut task = ManualTask::new(robot.input().wait_for_pointer_move());

    robot.move_pointer(1, 1);
    assert!(!task.poll());
    robot.press(PointerButton::Primary);
    robot.move_pointer(2, 2);
    assert!(task.poll());
}

#[test]
fn each_call_resolves_independently() {
    let mut robot = PointerRobot::launch();
    let input = robot.input();
    let mut first = ManualTask::new(input.wait_for_pointer_down());
    robot.click(PointerButton::Primary);
    let mut second = ManualTask::new(input.wait_for_pointer_down());

    assert!(first.poll());
    assert!(!second.poll());
    robot.click(PointerButton::Primary);
    assert!(second.poll());
    assert_eq!(first.wake_count(), 0);
}

#[test]
fn cancelled_wait_releases_listener() {
    let mut robot = PointerRobot::launch();
    let mut task = ManualTask::new(robot.input().wait_for_pointer_down());
    assert!(!task.poll());
    task.cancel();
    assert_eq!(robot.listener_count(PointerEventKind::Down), 0);

    robot.press(PointerButton::Primary);
    assert_eq!(task.wake_count(), 0);
}

#[test]
fn abort_signal_ends_pending_wait() {
    let robot = PointerRobot::launch();
    let signal = AbortSignal::new();
    let wait = robot.input().wait_for_pointer_up().abortable(&signal);
    let mut task = ManualTask::new(wait);
    assert!(!task.poll());

    signal.abort();
    assert_eq!(task.wake_count(), 1);
    assert!(task.poll());
    assert_eq!(task.take_output(), Some(Err(WaitError::Aborted)));
    assert_eq!(robot.listener_count(PointerEventKind::Up), 0);
}

#[test]
fn next_event_yields_payload() {
    let mut robot = PointerRobot::launch();
    robot.move_pointer(12, 34);
    let next = robot.input().next_event(
        PointerEventKind::Down,
        EventFilter::Button(PointerButton::Auxiliary),
    );
    let mut task = ManualTask::new(next);

    robot.press(PointerButton::Primary);
    robot.press(PointerButton::Auxiliary);
    assert!(task.poll());
    let event = task.take_output().expect("event delivered");
    assert_eq!(event.pointer_button(), Some(PointerButton::Auxiliary));
    assert_eq!((event.position.x, event.position.y), (12, 34));
}

#[test]
fn waits_outlive_the_input_that_created_them() {
    let target = LocalEventTarget::new();
    let input = PointerInput::install(target.clone(), InputSettings::default());
    let mut task = ManualTask::new(input.wait_for_pointer_down());
    drop(input);
    assert_eq!(target.listener_count(PointerEventKind::Move), 0);
    assert_eq!(target.listener_count(PointerEventKind::Down), 1);

    target.dispatch(&PointerEvent::new(PointerEventKind::Down, Point::new(1, 1)));
    assert!(task.poll());
    assert_eq!(target.total_listener_count(), 0);
}
