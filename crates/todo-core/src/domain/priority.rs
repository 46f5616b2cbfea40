//! Todo prioritization (BR-012).
//!
//! Overdue items come first; within the same overdue tier dated items sort by
//! ascending due date and precede undated ones; creation time breaks the
//! remaining ties. The sort is stable, so true ties keep storage order.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate};

use super::Todo;

/// Current calendar date in server-local time.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// An incomplete todo whose due date is strictly before `today`.
///
/// Completed and undated todos are never overdue, and a todo due today is
/// not overdue yet.
pub fn is_overdue(todo: &Todo, today: NaiveDate) -> bool {
    !todo.is_completed && todo.due_date.is_some_and(|due| due < today)
}

/// BR-012 comparator.
pub fn compare(a: &Todo, b: &Todo, today: NaiveDate) -> Ordering {
    // `true` must sort first, hence the reversed operands.
    is_overdue(b, today)
        .cmp(&is_overdue(a, today))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Sort a slice in place by BR-012.
pub fn sort_todos(todos: &mut [Todo], today: NaiveDate) {
    todos.sort_by(|a, b| compare(a, b, today));
}

/// Owned variant of [`sort_todos`].
pub fn prioritize(mut todos: Vec<Todo>, today: NaiveDate) -> Vec<Todo> {
    sort_todos(&mut todos, today);
    todos
}
