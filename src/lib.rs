//! Run script snippets through an external interpreter found on the search
//! path.
//!
//! ```no_run
//! # async fn demo() -> execjs::Result<()> {
//! let node = execjs::runtimes::node()?;
//! if let Some(ctx) = node.compile("function add(a, b) { return a + b; }") {
//!     let sum = ctx.call("add", &[1, 2]).await?;
//!     assert_eq!(sum, Some(serde_json::json!(3)));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod locator;
pub mod process;
pub mod runtime;
pub mod runtimes;
pub mod template;

pub use error::{Error, Result};
pub use execution::{decode, Context};
pub use locator::{find_executable, which};
pub use process::Transport;
pub use runtime::{ExternalRuntime, RuntimeBuilder};
pub use template::RunnerTemplate;
