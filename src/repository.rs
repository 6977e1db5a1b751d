use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Todo;

/// The four operations handlers need from the store. Kept behind a trait so
/// tests can substitute an in-memory store for Postgres.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos, most recently created first.
    async fn list(&self) -> Result<Vec<Todo>, AppError>;
    /// Persist a new todo with `completed = false` and return it with the
    /// id the store assigned.
    async fn create(&self, title: &str) -> Result<Todo, AppError>;
    /// Remove the todo with `id`. Missing rows are a no-op.
    async fn delete(&self, id: i32) -> Result<(), AppError>;
    /// Flip the completed flag on the todo with `id`. Missing rows are a
    /// no-op.
    async fn toggle_completed(&self, id: i32) -> Result<(), AppError>;
}

/// Titles are trimmed before storage and must be non-empty afterward.
fn validated_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".into()));
    }
    Ok(title)
}

/// Postgres-backed store. Every operation is a single statement; the
/// database's per-statement atomicity is the only isolation relied on.
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        let todos =
            sqlx::query_as::<_, Todo>("SELECT id, title, completed FROM todos ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(todos)
    }

    async fn create(&self, title: &str) -> Result<Todo, AppError> {
        let title = validated_title(title)?;
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title) VALUES ($1) RETURNING id, title, completed",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn toggle_completed(&self, id: i32) -> Result<(), AppError> {
        sqlx::query("UPDATE todos SET completed = NOT completed WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory stand-in used by tests; mirrors the row-level semantics of the
/// Postgres implementation, including id assignment.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTodoRepository {
    inner: std::sync::Mutex<MemoryState>,
}

#[cfg(test)]
#[derive(Default)]
struct MemoryState {
    next_id: i32,
    todos: Vec<Todo>,
}

#[cfg(test)]
#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut todos = inner.todos.clone();
        todos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(todos)
    }

    async fn create(&self, title: &str) -> Result<Todo, AppError> {
        let title = validated_title(title)?;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let todo = Todo {
            id: inner.next_id,
            title: title.to_owned(),
            completed: false,
        };
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.inner.lock().unwrap().todos.retain(|t| t.id != id);
        Ok(())
    }

    async fn toggle_completed(&self, id: i32) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(todo) = inner.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = !todo.completed;
        }
        Ok(())
    }
}
