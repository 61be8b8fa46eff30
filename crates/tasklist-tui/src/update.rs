//! List reducer (update function).
//!
//! All state mutations happen here. The runtime calls
//! `update(state, store, event)` and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use tasklist_core::store::TaskStore;
use tasklist_types::TaskId;
use tokio_util::sync::CancellationToken;

use crate::common::{TimerId, TimerKind};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::ListState;

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: i32 = 3;

/// The main reducer function.
///
/// Takes the current state, the store (read-only) and an event, mutates
/// state, and returns effects for the runtime to execute.
pub fn update(state: &mut ListState, store: &dyn TaskStore, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Mount => mount(state),
        UiEvent::Unmount => unmount(state),
        UiEvent::Tick => {
            if state.is_loading {
                state.spinner_frame = state.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        UiEvent::FetchSettled => {
            if !state.mounted {
                return vec![];
            }
            tracing::debug!(error = store.error().is_some(), "fetch settled");
            schedule(state, TimerKind::LoadingFloor)
        }
        UiEvent::TaskCountChanged { count } => {
            state.selected = state.selected.min(count.saturating_sub(1));
            schedule(state, TimerKind::Padding)
        }
        UiEvent::TimerFired { kind, id } => on_timer_fired(state, kind, id),
        UiEvent::ToggleMenu(task_id) => toggle_menu(state, store, task_id),
        UiEvent::Terminal(event) => handle_terminal_event(state, store, &event),
    }
}

fn mount(state: &mut ListState) -> Vec<UiEffect> {
    if state.mounted {
        return vec![];
    }
    state.mounted = true;
    state.is_loading = true;
    tracing::info!("task list mounted");
    // Subscribe before fetching so the fetch's own count change is observed.
    vec![UiEffect::Subscribe, UiEffect::FetchTasks]
}

fn unmount(state: &mut ListState) -> Vec<UiEffect> {
    if !state.mounted {
        return vec![];
    }
    state.mounted = false;
    tracing::info!("task list unmounted");

    let mut effects = vec![UiEffect::Unsubscribe];
    for kind in TimerKind::ALL {
        if let Some(token) = state.timers.state_mut(kind).take() {
            effects.push(UiEffect::CancelTimer { kind, token });
        }
    }
    effects
}

/// Cancels the pending timer of `kind` and starts a fresh one.
///
/// Nothing is scheduled while unmounted.
fn schedule(state: &mut ListState, kind: TimerKind) -> Vec<UiEffect> {
    if !state.mounted {
        return vec![];
    }

    let mut effects = Vec::with_capacity(2);
    if let Some(token) = state.timers.state_mut(kind).take() {
        effects.push(UiEffect::CancelTimer { kind, token });
    }

    let delay = match kind {
        TimerKind::Padding | TimerKind::Scroll => state.config.debounce(),
        TimerKind::LoadingFloor => state.config.loading_floor(),
    };
    let id = state.timer_seq.next_id();
    let cancel = CancellationToken::new();
    state
        .timers
        .state_mut(kind)
        .on_started(id, cancel.clone());
    effects.push(UiEffect::StartTimer {
        kind,
        id,
        delay,
        cancel,
    });
    effects
}

fn on_timer_fired(state: &mut ListState, kind: TimerKind, id: TimerId) -> Vec<UiEffect> {
    if !state.timers.state_mut(kind).finish_if_active(id) {
        tracing::trace!(?kind, ?id, "ignoring stale timer");
        return vec![];
    }

    match kind {
        TimerKind::Padding => vec![UiEffect::RecomputePadding {
            padding: state.config.scrollbar_padding,
        }],
        TimerKind::Scroll => vec![UiEffect::ScrollToEnd],
        TimerKind::LoadingFloor => {
            state.is_loading = false;
            vec![]
        }
    }
}

/// Rechecks scrollbar padding and scrolls to the end once layout settles.
///
/// Opening the last row's menu grows the content after this call returns,
/// so both writes go through the debounce timers.
pub fn scroll_to_end_and_pad(state: &mut ListState) -> Vec<UiEffect> {
    let mut effects = schedule(state, TimerKind::Scroll);
    effects.extend(schedule(state, TimerKind::Padding));
    effects
}

/// Opens `task_id`'s action menu, or closes it if it is already open.
///
/// "Last task" is decided against the store order at the time of the call.
pub fn toggle_menu(state: &mut ListState, store: &dyn TaskStore, task_id: TaskId) -> Vec<UiEffect> {
    if state.is_open(&task_id) {
        state.open_task_id = None;
        state.extra_bottom_padding = 0;
        return vec![];
    }

    let is_last = store.last_task_id().as_ref() == Some(&task_id);
    let effects = if is_last {
        state.extra_bottom_padding = state.config.menu_padding;
        scroll_to_end_and_pad(state)
    } else {
        state.extra_bottom_padding = 0;
        vec![]
    };
    tracing::debug!(task = %task_id, is_last, "action menu opened");
    state.open_task_id = Some(task_id);
    effects
}

fn handle_terminal_event(
    state: &mut ListState,
    store: &dyn TaskStore,
    event: &Event,
) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, store, *key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => vec![UiEffect::ScrollBy { delta: WHEEL_STEP }],
            MouseEventKind::ScrollUp => vec![UiEffect::ScrollBy { delta: -WHEEL_STEP }],
            _ => vec![],
        },
        _ => vec![],
    }
}

fn handle_key(state: &mut ListState, store: &dyn TaskStore, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => {
            state.should_quit = true;
            vec![]
        }
        KeyCode::Char('q') => {
            state.should_quit = true;
            vec![]
        }
        KeyCode::Esc => match state.open_task_id.clone() {
            Some(open) => toggle_menu(state, store, open),
            None => {
                state.should_quit = true;
                vec![]
            }
        },
        KeyCode::Down | KeyCode::Char('j') => move_cursor(state, store, 1),
        KeyCode::Up | KeyCode::Char('k') => move_cursor(state, store, -1),
        KeyCode::PageDown => vec![UiEffect::ScrollPage { down: true }],
        KeyCode::PageUp => vec![UiEffect::ScrollPage { down: false }],
        KeyCode::Enter | KeyCode::Char(' ') => {
            if state.is_loading {
                return vec![];
            }
            match store.tasks().get(state.selected) {
                Some(task) => toggle_menu(state, store, task.id.clone()),
                None => vec![],
            }
        }
        _ => vec![],
    }
}

fn move_cursor(state: &mut ListState, store: &dyn TaskStore, step: isize) -> Vec<UiEffect> {
    let len = store.len();
    if state.is_loading || len == 0 {
        return vec![];
    }
    state.selected = state.selected.saturating_add_signed(step).min(len - 1);
    vec![UiEffect::RevealRow {
        index: state.selected,
    }]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tasklist_core::config::ListConfig;
    use tasklist_core::store::{MemoryTaskStore, TaskSource};
    use tasklist_types::TaskRef;

    use super::*;

    fn store_with(ids: &[&str]) -> MemoryTaskStore {
        let store = MemoryTaskStore::new(TaskSource::Inline(Vec::new()));
        store.set_tasks(ids.iter().map(|id| TaskRef::new(*id, id.to_uppercase())).collect());
        store
    }

    fn mounted_state() -> ListState {
        let mut state = ListState::new(ListConfig {
            menu_padding: 50,
            scrollbar_padding: 10,
            ..ListConfig::default()
        });
        state.mounted = true;
        state
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn started_timers(effects: &[UiEffect]) -> Vec<TimerKind> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                UiEffect::StartTimer { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    fn timer_id(state: &ListState, kind: TimerKind) -> TimerId {
        state.timers.state(kind).active.unwrap()
    }

    #[test]
    fn test_mount_subscribes_then_fetches() {
        let store = store_with(&[]);
        let mut state = ListState::default();

        let effects = update(&mut state, &store, UiEvent::Mount);

        assert!(state.mounted);
        assert!(state.is_loading);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Subscribe, UiEffect::FetchTasks]
        ));
    }

    #[test]
    fn test_second_mount_is_noop() {
        let store = store_with(&[]);
        let mut state = ListState::default();
        update(&mut state, &store, UiEvent::Mount);

        assert!(update(&mut state, &store, UiEvent::Mount).is_empty());
    }

    #[test]
    fn test_loading_clears_only_after_floor_timer() {
        let store = store_with(&["a"]);
        let mut state = ListState::default();
        update(&mut state, &store, UiEvent::Mount);

        let effects = update(&mut state, &store, UiEvent::FetchSettled);
        assert!(state.is_loading);
        match effects.as_slice() {
            [UiEffect::StartTimer { kind, delay, .. }] => {
                assert_eq!(*kind, TimerKind::LoadingFloor);
                assert_eq!(*delay, Duration::from_millis(500));
            }
            other => panic!("unexpected effects: {other:?}"),
        }

        let id = timer_id(&state, TimerKind::LoadingFloor);
        update(
            &mut state,
            &store,
            UiEvent::TimerFired {
                kind: TimerKind::LoadingFloor,
                id,
            },
        );
        assert!(!state.is_loading);
    }

    #[test]
    fn test_scenario_toggle_last_then_first_then_first() {
        let store = store_with(&["a", "b", "c"]);
        let mut state = mounted_state();

        let effects = toggle_menu(&mut state, &store, TaskId::new("c"));
        assert_eq!(state.open_task_id, Some(TaskId::new("c")));
        assert_eq!(state.extra_bottom_padding, 50);
        assert_eq!(
            started_timers(&effects),
            vec![TimerKind::Scroll, TimerKind::Padding]
        );

        let effects = toggle_menu(&mut state, &store, TaskId::new("a"));
        assert_eq!(state.open_task_id, Some(TaskId::new("a")));
        assert_eq!(state.extra_bottom_padding, 0);
        assert!(effects.is_empty());

        toggle_menu(&mut state, &store, TaskId::new("a"));
        assert_eq!(state.open_task_id, None);
        assert_eq!(state.extra_bottom_padding, 0);
    }

    #[test]
    fn test_double_toggle_returns_to_closed() {
        let store = store_with(&["a", "b", "c"]);
        for id in ["a", "b", "c"] {
            let mut state = mounted_state();
            toggle_menu(&mut state, &store, TaskId::new(id));
            toggle_menu(&mut state, &store, TaskId::new(id));
            assert_eq!(state.open_task_id, None, "task {id}");
            assert_eq!(state.extra_bottom_padding, 0, "task {id}");
        }
    }

    #[test]
    fn test_at_most_one_open_and_padding_tracks_last() {
        let store = store_with(&["a", "b", "c"]);
        let mut state = mounted_state();

        for id in ["c", "b", "c", "c", "a", "b", "b", "c"] {
            toggle_menu(&mut state, &store, TaskId::new(id));
            let last_open = state.open_task_id.as_ref() == Some(&TaskId::new("c"));
            assert_eq!(state.extra_bottom_padding != 0, last_open);
        }
    }

    #[test]
    fn test_last_is_decided_by_order_at_toggle_time() {
        let store = store_with(&["a", "b"]);
        let mut state = mounted_state();

        store.push(TaskRef::new("c", "C"));
        toggle_menu(&mut state, &store, TaskId::new("b"));

        assert_eq!(state.extra_bottom_padding, 0);
    }

    #[test]
    fn test_stale_id_opens_without_matching_rows() {
        let store = store_with(&["a"]);
        let mut state = mounted_state();

        toggle_menu(&mut state, &store, TaskId::new("gone"));

        assert_eq!(state.open_task_id, Some(TaskId::new("gone")));
        assert_eq!(state.extra_bottom_padding, 0);
    }

    #[test]
    fn test_rescheduling_cancels_previous_timer() {
        let store = store_with(&["a"]);
        let mut state = mounted_state();

        update(&mut state, &store, UiEvent::TaskCountChanged { count: 1 });
        let first = timer_id(&state, TimerKind::Padding);
        let effects = update(&mut state, &store, UiEvent::TaskCountChanged { count: 2 });

        assert!(matches!(
            effects.as_slice(),
            [
                UiEffect::CancelTimer {
                    kind: TimerKind::Padding,
                    ..
                },
                UiEffect::StartTimer {
                    kind: TimerKind::Padding,
                    ..
                }
            ]
        ));

        let stale = update(
            &mut state,
            &store,
            UiEvent::TimerFired {
                kind: TimerKind::Padding,
                id: first,
            },
        );
        assert!(stale.is_empty());

        let second = timer_id(&state, TimerKind::Padding);
        let fired = update(
            &mut state,
            &store,
            UiEvent::TimerFired {
                kind: TimerKind::Padding,
                id: second,
            },
        );
        assert!(matches!(
            fired.as_slice(),
            [UiEffect::RecomputePadding { padding: 10 }]
        ));
    }

    #[test]
    fn test_unmount_cancels_pending_timers_and_unsubscribes() {
        let store = store_with(&["a", "b"]);
        let mut state = mounted_state();
        toggle_menu(&mut state, &store, TaskId::new("b"));
        let pending = timer_id(&state, TimerKind::Padding);

        let effects = update(&mut state, &store, UiEvent::Unmount);

        assert!(matches!(effects.first(), Some(UiEffect::Unsubscribe)));
        let cancelled: Vec<_> = effects
            .iter()
            .filter_map(|effect| match effect {
                UiEffect::CancelTimer { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(cancelled, vec![TimerKind::Padding, TimerKind::Scroll]);
        assert!(!state.timers.is_any_pending());

        let late = update(
            &mut state,
            &store,
            UiEvent::TimerFired {
                kind: TimerKind::Padding,
                id: pending,
            },
        );
        assert!(late.is_empty());
    }

    #[test]
    fn test_nothing_scheduled_after_unmount() {
        let store = store_with(&["a"]);
        let mut state = mounted_state();
        update(&mut state, &store, UiEvent::Unmount);

        assert!(update(&mut state, &store, UiEvent::TaskCountChanged { count: 3 }).is_empty());
        assert!(update(&mut state, &store, UiEvent::FetchSettled).is_empty());
        assert!(update(&mut state, &store, UiEvent::Unmount).is_empty());
    }

    #[test]
    fn test_enter_toggles_selected_row() {
        let store = store_with(&["a", "b", "c"]);
        let mut state = mounted_state();

        update(&mut state, &store, key(KeyCode::Down));
        update(&mut state, &store, key(KeyCode::Enter));
        assert_eq!(state.open_task_id, Some(TaskId::new("b")));

        update(&mut state, &store, key(KeyCode::Esc));
        assert_eq!(state.open_task_id, None);
        assert!(!state.should_quit);

        update(&mut state, &store, key(KeyCode::Esc));
        assert!(state.should_quit);
    }

    #[test]
    fn test_cursor_is_clamped_and_revealed() {
        let store = store_with(&["a", "b"]);
        let mut state = mounted_state();

        update(&mut state, &store, key(KeyCode::Up));
        assert_eq!(state.selected, 0);
        update(&mut state, &store, key(KeyCode::Down));
        let effects = update(&mut state, &store, key(KeyCode::Down));
        assert_eq!(state.selected, 1);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::RevealRow { index: 1 }]
        ));

        update(&mut state, &store, UiEvent::TaskCountChanged { count: 1 });
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let store = store_with(&["a"]);
        let mut state = mounted_state();
        state.is_loading = true;

        assert!(update(&mut state, &store, key(KeyCode::Enter)).is_empty());
        assert_eq!(state.open_task_id, None);
    }

    #[test]
    fn test_tick_advances_spinner_only_while_loading() {
        let store = store_with(&[]);
        let mut state = mounted_state();
        state.is_loading = true;
        update(&mut state, &store, UiEvent::Tick);
        assert_eq!(state.spinner_frame, 1);

        state.is_loading = false;
        update(&mut state, &store, UiEvent::Tick);
        assert_eq!(state.spinner_frame, 1);
    }
}
