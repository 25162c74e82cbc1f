//! `todos`: interactive task list.
//!
//! Reads commands from stdin and redraws the list on stdout after every
//! change, including the ones arriving later from the server. Logs go to
//! stderr; set `RUST_LOG` to adjust.
//!
//! ```text
//! TODOS_USER_ID=1868 todos            # talk to TODOS_API_URL
//! TODOS_USER_ID=1868 todos --offline  # in-memory collection
//! ```

use std::sync::Arc;
use tasklist_runtime::Store;
use tasklist_runtime::metrics::describe_store_metrics;
use todos::command::{Command, CommandError, HELP};
use todos::{
    HttpGateway, InMemoryGateway, TodoAction, TodoEnvironment, TodoGateway, TodoReducer, TodoState,
    TodosConfig, view,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todos=info,tasklist_runtime=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn redraw(store: &TodoStore) {
    let screen = store.state(view::render).await;
    println!("\n{screen}");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    init_tracing();
    describe_store_metrics();

    let offline = std::env::args().skip(1).any(|arg| arg == "--offline");
    let config = TodosConfig::from_env();
    config.validate()?;

    let Some(owner) = config.user_id else {
        println!("{}", view::render_user_warning());
        return Ok(());
    };

    let gateway: Arc<dyn TodoGateway> = if offline {
        info!(%owner, "Using in-memory collection");
        Arc::new(InMemoryGateway::new(owner))
    } else {
        info!(%owner, url = %config.api_url, "Using remote collection");
        Arc::new(HttpGateway::new(config.api_url.clone(), owner))
    };
    let env = TodoEnvironment::new(gateway, config.error_timeout);
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);

    // Redraw whenever an effect feeds a result back
    let mut results = store.subscribe_actions();
    let observer = store.clone();
    let redraw_task = tokio::spawn(async move {
        loop {
            match results.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => redraw(&observer).await,
                Err(RecvError::Closed) => break,
            }
        }
    });

    store.send(TodoAction::Load).await?;
    println!("{HELP}");
    redraw(&store).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::List) => redraw(&store).await,
            Ok(command) => {
                if let Some(action) = command.into_action() {
                    store.send(action).await?;
                    redraw(&store).await;
                }
            },
            Err(CommandError::Empty) => {},
            Err(error) => eprintln!("{error}"),
        }
    }

    info!("Shutting down");
    redraw_task.abort();
    store.shutdown(config.shutdown_timeout).await?;

    Ok(())
}
