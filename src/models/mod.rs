use sqlx::FromRow;

/// A single todo row. `id` is assigned by the store and never changes;
/// `title` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub completed: bool,
}
