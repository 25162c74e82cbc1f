//! Task-list client over a REST todo collection.
//!
//! Items are loaded for one owner, then created, renamed, toggled and
//! deleted with optimistic local updates. Each mutation marks its item
//! `Pending` until the server answers; failures roll back and show a
//! short-lived error banner.
//!
//! - [`types`]: items, actions and state
//! - [`gateway`]: the remote collection (HTTP and in-memory)
//! - [`reducer`]: the item store state machine
//! - [`filter`]: the All / Active / Completed view
//! - [`view`] and [`command`]: the text front end used by the `todos` binary
//!
//! # Quick Start
//!
//! ```no_run
//! use todos::{HttpGateway, TodoAction, TodoEnvironment, TodoReducer, TodoState, UserId};
//! use tasklist_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let owner = UserId::new(1868).ok_or("user id must be non-zero")?;
//! let env = TodoEnvironment::with_gateway(HttpGateway::new("http://localhost:3000", owner));
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! let mut handle = store.send(TodoAction::Load).await?;
//! handle.wait().await;
//!
//! store
//!     .send(TodoAction::AddItem { title: "Buy milk".to_string() })
//!     .await?
//!     .wait()
//!     .await;
//!
//! let active = store.state(|s| s.active_count).await;
//! println!("{active} items left");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod filter;
pub mod gateway;
pub mod reducer;
pub mod types;
pub mod view;

pub use config::{ConfigError, TodosConfig};
pub use filter::FilterState;
pub use gateway::{GatewayError, HttpGateway, InMemoryGateway, TodoGateway};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{
    ErrorKind, Item, ItemId, ItemPatch, ItemStatus, NewItem, TodoAction, TodoState, UserId,
};
