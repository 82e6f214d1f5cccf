//! Known runtimes and auto-detection.

use std::{sync::Arc, time::Duration};

use crate::{
    error::Result,
    process::Transport,
    runtime::{ExternalRuntime, RuntimeBuilder},
};

mod node;

pub use node::{node, node_with, NODE_RUNNER};

/// Settings applied to every runtime built by this module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub transport: Transport,
    pub timeout: Option<Duration>,
}

impl Options {
    fn apply(&self, builder: RuntimeBuilder) -> RuntimeBuilder {
        let builder = builder.transport(self.transport);
        match self.timeout {
            Some(limit) => builder.timeout(limit),
            None => builder,
        }
    }
}

/// Names accepted by [`by_name`], in auto-detection order.
pub fn names() -> &'static [&'static str] {
    &["node"]
}

/// The runtime registered under `name`, whether or not it is installed.
pub fn by_name(name: &str, options: &Options) -> Option<Result<Arc<ExternalRuntime>>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "node" | "nodejs" | "node.js" => Some(node_with(options)),
        _ => None,
    }
}

/// The first known runtime that is available on this machine.
pub fn autodetect(options: &Options) -> Result<Option<Arc<ExternalRuntime>>> {
    for name in names() {
        if let Some(runtime) = by_name(name, options) {
            let runtime = runtime?;
            if runtime.is_available() {
                return Ok(Some(runtime));
            }
        }
    }
    Ok(None)
}
