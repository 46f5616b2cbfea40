//! Display classification - five disjoint buckets over a todo set.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Todo;

/// Display bucket of a single todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Overdue,
    DueToday,
    Upcoming,
    NoDueDate,
    Completed,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Overdue,
        Bucket::DueToday,
        Bucket::Upcoming,
        Bucket::NoDueDate,
        Bucket::Completed,
    ];

    /// First matching rule wins: completion, then missing date, then the
    /// date-only comparison against `today`.
    pub fn of(todo: &Todo, today: NaiveDate) -> Self {
        if todo.is_completed {
            return Bucket::Completed;
        }

        match todo.due_date.map(|due| due.cmp(&today)) {
            None => Bucket::NoDueDate,
            Some(Ordering::Less) => Bucket::Overdue,
            Some(Ordering::Equal) => Bucket::DueToday,
            Some(Ordering::Greater) => Bucket::Upcoming,
        }
    }
}

/// The partition produced by [`classify`]. Input order is preserved inside
/// each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoBuckets {
    pub overdue: Vec<Todo>,
    pub due_today: Vec<Todo>,
    pub upcoming: Vec<Todo>,
    pub no_due_date: Vec<Todo>,
    pub completed: Vec<Todo>,
}

impl TodoBuckets {
    pub fn get(&self, bucket: Bucket) -> &[Todo] {
        match bucket {
            Bucket::Overdue => &self.overdue,
            Bucket::DueToday => &self.due_today,
            Bucket::Upcoming => &self.upcoming,
            Bucket::NoDueDate => &self.no_due_date,
            Bucket::Completed => &self.completed,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<Todo> {
        match bucket {
            Bucket::Overdue => &mut self.overdue,
            Bucket::DueToday => &mut self.due_today,
            Bucket::Upcoming => &mut self.upcoming,
            Bucket::NoDueDate => &mut self.no_due_date,
            Bucket::Completed => &mut self.completed,
        }
    }

    /// Total number of todos across all buckets.
    pub fn len(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.get(*b).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `todos` into display buckets relative to `today`.
pub fn classify(todos: impl IntoIterator<Item = Todo>, today: NaiveDate) -> TodoBuckets {
    let mut buckets = TodoBuckets::default();
    for todo in todos {
        buckets.get_mut(Bucket::of(&todo, today)).push(todo);
    }
    buckets
}
