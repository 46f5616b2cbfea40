//! Domain entities - the core business objects and the rules over them.

mod classify;
mod priority;
mod todo;
mod user;

pub use classify::{Bucket, TodoBuckets, classify};
pub use priority::{compare, is_overdue, prioritize, sort_todos, today_local};
pub use todo::{MAX_TITLE_LEN, NewTodo, Todo, TodoPatch};
pub use user::User;
