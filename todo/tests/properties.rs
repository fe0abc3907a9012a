//! Property tests for the todo reducer and storage format.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use composable_todo_core::reducer::Reducer;
use composable_todo_testing::{InMemoryStorage, SequentialIdGenerator};
use proptest::prelude::*;
use std::sync::Arc;
use todo::persistence::{load_todos, save_todos};
use todo::view;
use todo::{Filter, Todo, TodoAction, TodoEnvironment, TodoId, TodoReducer, TodoState};

fn env() -> TodoEnvironment {
    TodoEnvironment::new(
        Arc::new(SequentialIdGenerator::starting_at(1_000)),
        Arc::new(InMemoryStorage::new()),
    )
}

/// Apply `action`, dropping the persist effects
fn reduce(state: &mut TodoState, action: TodoAction, env: &TodoEnvironment) {
    let _effects = TodoReducer::new().reduce(state, action, env);
}

fn todo_strategy() -> impl Strategy<Value = (String, bool)> {
    ("[a-zA-Z0-9 <>&\"']{1,20}", any::<bool>())
}

fn list_strategy() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec(todo_strategy(), 0..20).prop_map(|items| {
        items
            .into_iter()
            .zip(1u64..)
            .filter_map(|((text, completed), id)| {
                let text = text.trim().to_string();
                (!text.is_empty()).then(|| Todo {
                    id: TodoId::new(id),
                    text,
                    completed,
                })
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = Filter> {
    prop::sample::select(Filter::ALL.to_vec())
}

proptest! {
    #[test]
    fn add_grows_list_by_one(todos in list_strategy(), text in "\\s*[a-z]{1,10}\\s*") {
        let mut state = TodoState::from_todos(todos.clone());
        let env = env();

        reduce(&mut state, TodoAction::AddTodo { text: text.clone() }, &env);

        prop_assert_eq!(state.count(), todos.len() + 1);
        let added = state.todos.last().unwrap();
        prop_assert_eq!(added.text.as_str(), text.trim());
        prop_assert!(!added.completed);
        prop_assert_eq!(&state.todos[..todos.len()], todos.as_slice());
    }

    #[test]
    fn blank_add_is_noop(todos in list_strategy(), blank in "[ \\t\\n]{0,5}") {
        let mut state = TodoState::from_todos(todos);
        let before = state.clone();

        reduce(&mut state, TodoAction::AddTodo { text: blank }, &env());

        prop_assert_eq!(state, before);
    }

    #[test]
    fn ids_stay_unique(todos in list_strategy(), adds in 1usize..10) {
        let mut state = TodoState::from_todos(todos);
        let env = TodoEnvironment::new(
            // Collides with the stored ids on purpose
            Arc::new(SequentialIdGenerator::new()),
            Arc::new(InMemoryStorage::new()),
        );

        for n in 0..adds {
            reduce(&mut state, TodoAction::AddTodo { text: format!("task {n}") }, &env);
        }

        let mut ids: Vec<TodoId> = state.todos.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), state.count());
    }

    #[test]
    fn toggle_twice_restores(todos in list_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!todos.is_empty());
        let id = todos[pick.index(todos.len())].id;
        let mut state = TodoState::from_todos(todos);
        let before = state.clone();
        let env = env();

        reduce(&mut state, TodoAction::ToggleTodo { id }, &env);
        prop_assert_ne!(&state, &before);
        reduce(&mut state, TodoAction::ToggleTodo { id }, &env);

        prop_assert_eq!(state, before);
    }

    #[test]
    fn delete_is_idempotent(todos in list_strategy(), raw_id in 0u64..25) {
        let id = TodoId::new(raw_id);
        let mut once = TodoState::from_todos(todos);
        let env = env();

        reduce(&mut once, TodoAction::DeleteTodo { id }, &env);
        let mut twice = once.clone();
        reduce(&mut twice, TodoAction::DeleteTodo { id }, &env);

        prop_assert!(!once.contains(id));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clear_completed_keeps_active_in_order(todos in list_strategy()) {
        let expected: Vec<Todo> = todos.iter().filter(|t| !t.completed).cloned().collect();
        let mut state = TodoState::from_todos(todos);

        reduce(&mut state, TodoAction::ClearCompleted, &env());

        prop_assert_eq!(state.completed_count(), 0);
        prop_assert_eq!(state.todos, expected);
    }

    #[test]
    fn remaining_ignores_filter(todos in list_strategy(), filter in filter_strategy()) {
        let incomplete = todos.iter().filter(|t| !t.completed).count();
        let mut state = TodoState::from_todos(todos);

        reduce(&mut state, TodoAction::SetFilter { filter }, &env());

        prop_assert_eq!(state.remaining_count(), incomplete);
        prop_assert_eq!(view::render(&state).remaining, view::remaining_label(incomplete));
    }

    #[test]
    fn rendered_rows_match_filter(todos in list_strategy(), filter in filter_strategy()) {
        let mut state = TodoState::from_todos(todos);
        state.filter = filter;

        let rows = view::render_list(&state);

        let expected: Vec<TodoId> = state.todos.iter().filter(|t| filter.matches(t)).map(|t| t.id).collect();
        let shown: Vec<TodoId> = rows.rows().iter().map(|r| r.id).collect();
        prop_assert_eq!(&shown, &expected);
        prop_assert_eq!(expected.is_empty(), rows == view::ListView::Placeholder);
    }

    #[test]
    fn save_then_load_round_trips(todos in list_strategy()) {
        let storage = InMemoryStorage::new();

        save_todos(&storage, &todos).unwrap();

        prop_assert_eq!(load_todos(&storage).unwrap(), todos);
    }
}
