pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Form, Router,
};
use config::Config;
use error::AppError;
use maud::{html, Markup, DOCTYPE};
use models::Todo;
use repository::{PgTodoRepository, TodoRepository};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

// === App State ===
#[derive(Clone)]
struct AppState {
    repo: Arc<dyn TodoRepository>,
}
impl AppState {
    fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let pool = db::connect(&config.database_url).await?;
    db::ensure_schema(&pool).await?;

    let state = AppState::new(Arc::new(PgTodoRepository::new(pool)));
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on http://localhost:{}", config.port);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", delete(delete_todo))
        .route("/todos/:id/toggle", put(toggle_todo))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Components ===
// the static page shell; the list fragment loads into #todo-list
fn shell() -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Todos" }
                script src="https://unpkg.com/htmx.org@1.9.10" {}
                link rel="stylesheet" href="/static/styles.css";
            }
            body {
                div class="container" {
                    h1 { "Todos" }
                    (new_todo_form())
                    div id="todo-list" hx-get="/todos" hx-trigger="load" {}
                }
            }
        }
    }
}

// an input box to create a new todo
fn new_todo_form() -> Markup {
    html! {
        form hx-post="/todos" hx-target="#todo-list" hx-swap="innerHTML" "hx-on::after-request"="this.reset()" {
            input type="text" name="title" placeholder="What needs doing?" required;
            button type="submit" { "Add" }
        }
    }
}

// the whole collection, newest first; every mutation swaps this fragment
// back in so the client always shows a consistent snapshot
fn todo_list(todos: &[Todo]) -> Markup {
    html! {
        ul class="todos" {
            @for todo in todos {
                (todo_row(todo))
            }
        }
    }
}

// a single line item in the todo list
fn todo_row(todo: &Todo) -> Markup {
    let toggle_path = format!("/todos/{}/toggle", todo.id);
    let delete_path = format!("/todos/{}", todo.id);
    html! {
        li class="todo" {
            label {
                input type="checkbox" checked[todo.completed] hx-put=(toggle_path) hx-target="#todo-list" hx-swap="innerHTML";
                span class=[todo.completed.then_some("done")] { (todo.title) }
            }
            button class="remove" hx-delete=(delete_path) hx-target="#todo-list" hx-swap="innerHTML" { "Remove" }
        }
    }
}

// === Routes ===
async fn index() -> Markup {
    shell()
}

async fn health() -> &'static str {
    "OK"
}

async fn list_todos(State(state): State<AppState>) -> Result<Markup, AppError> {
    refreshed_list(&state).await
}

#[derive(Deserialize)]
struct CreateTodo {
    #[serde(default)]
    title: String,
}
async fn create_todo(
    State(state): State<AppState>,
    Form(CreateTodo { title }): Form<CreateTodo>,
) -> Result<Markup, AppError> {
    state.repo.create(&title).await?;
    refreshed_list(&state).await
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    state.repo.toggle_completed(id).await?;
    refreshed_list(&state).await
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    state.repo.delete(id).await?;
    refreshed_list(&state).await
}

async fn refreshed_list(state: &AppState) -> Result<Markup, AppError> {
    Ok(todo_list(&state.repo.list().await?))
}
