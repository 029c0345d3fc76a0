//! Command-line front end for the todo list.
//!
//! Loads the configured owner's todos, applies one command, waits for the
//! service to answer and prints the resulting view.
//!
//! ```text
//! todos [list [all|active|completed] | add <title> | toggle <id> | toggle-all
//!        | rename <id> <title> | delete <id> | clear-completed]
//! ```

use anyhow::{Context, bail};
use std::time::Duration;
use todo_sync_runtime::Store;
use todos::{
    FilterMode, HttpTodoService, OperationKind, TodoAction, TodoConfig, TodoEnvironment, TodoId,
    TodoReducer, TodoState, TodoView,
};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

const USAGE: &str = "usage: todos [list [all|active|completed] | add <title> | toggle <id> | \
                     toggle-all | rename <id> <title> | delete <id> | clear-completed]";

/// Parse command-line arguments into the action to send after loading
fn parse_command(args: &[String]) -> anyhow::Result<TodoAction> {
    let parse_id = |raw: Option<&String>| -> anyhow::Result<TodoId> {
        let raw = raw.context(USAGE)?;
        raw.parse()
            .with_context(|| format!("'{raw}' is not a todo id"))
    };

    let action = match args.first().map(String::as_str) {
        None | Some("list") => {
            let filter = match args.get(1) {
                Some(raw) => raw.parse::<FilterMode>()?,
                None => FilterMode::All,
            };
            TodoAction::SetFilter { filter }
        },
        Some("add") => TodoAction::Create {
            title: args[1..].join(" "),
        },
        Some("toggle") => TodoAction::Toggle {
            id: parse_id(args.get(1))?,
        },
        Some("toggle-all") => TodoAction::ToggleAll,
        Some("rename") => TodoAction::Rename {
            id: parse_id(args.get(1))?,
            title: args.get(2..).map(|words| words.join(" ")).unwrap_or_default(),
        },
        Some("delete") => TodoAction::Delete {
            id: parse_id(args.get(1))?,
        },
        Some("clear-completed") => TodoAction::ClearCompleted,
        Some(other) => bail!("unknown command '{other}'\n{USAGE}"),
    };

    Ok(action)
}

fn print_view(view: &TodoView) {
    println!("Filter: {}", view.filter);
    for todo in &view.visible {
        let status = if todo.completed { "x" } else { " " };
        let busy = if view.is_busy(todo.id) { " (saving)" } else { "" };
        println!("  [{status}] {:>5}  {}{busy}", todo.id, todo.title);
    }
    if let Some(placeholder) = &view.placeholder {
        println!("  [ ]   ...  {} (adding)", placeholder.title);
    }
    if !view.has_todos {
        println!("  (no todos)");
    }

    println!(
        "\n{} active, {} completed{}",
        view.active_count,
        view.completed_count,
        if view.all_completed && view.has_todos {
            ", all done"
        } else {
            ""
        }
    );

    if let Some(message) = &view.notification {
        println!("\n! {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todos=debug,todo_sync_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    let config = TodoConfig::from_env().context("loading configuration")?;
    tracing::info!(api_url = %config.api_url, owner_id = %config.owner_id, "Starting");

    let environment = TodoEnvironment::new(HttpTodoService::new(config.api_url.clone()))
        .with_notification_timeout(config.notification_timeout);
    let store = Store::new(
        TodoState::new(config.owner_id),
        TodoReducer::new(),
        environment,
    );

    store
        .send_and_wait_for(
            TodoAction::Load,
            |action| {
                action
                    .settlement()
                    .is_some_and(|s| s.kind == OperationKind::Load)
            },
            SETTLE_TIMEOUT,
        )
        .await
        .context("loading todos")?;

    // Settlements are broadcast after they are reduced, so state read on
    // receipt is current
    let mut settlements = store.subscribe_actions();
    store.send(command).await?;
    tokio::time::timeout(SETTLE_TIMEOUT, async {
        while !store.state(TodoState::is_idle).await {
            match settlements.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => {},
                Err(RecvError::Closed) => break,
            }
        }
    })
    .await
    .context("waiting for the service to answer")?;

    let view = store.state(TodoView::derive).await;
    print_view(&view);

    // Drop the pending auto-clear timer so shutdown does not wait for it
    let mut dismissed = store.send(TodoAction::DismissNotification).await?;
    dismissed.wait().await;
    store.shutdown(store.default_shutdown_timeout()).await?;

    Ok(())
}
