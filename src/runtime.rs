//! External runtime descriptors.

use std::{
    ffi::OsString,
    fmt,
    sync::{Arc, OnceLock},
    time::Duration,
};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Error, Result},
    execution::Context,
    locator,
    process::Transport,
    template::RunnerTemplate,
};

/// A script runtime reachable as a command-line executable.
///
/// The binary is resolved once, when the runtime is built, and cached for
/// the lifetime of the value. Share it as `Arc<ExternalRuntime>`.
pub struct ExternalRuntime {
    name: String,
    command: Vec<String>,
    template: RunnerTemplate,
    transport: Transport,
    timeout: Option<Duration>,
    search_path: Option<OsString>,
    binary: OnceLock<Option<Vec<String>>>,
}

/// Options for an [`ExternalRuntime`] before its binary is resolved.
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    name: String,
    command: Vec<String>,
    template: String,
    transport: Transport,
    timeout: Option<Duration>,
    search_path: Option<OsString>,
}

impl RuntimeBuilder {
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Kill the subprocess and fail with [`Error::Timeout`] after `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Resolve the command against `path` instead of the `PATH` variable.
    pub fn search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Arc<ExternalRuntime>> {
        let template = RunnerTemplate::new(self.template)?;
        let runtime = ExternalRuntime {
            name: self.name,
            command: self.command,
            template,
            transport: self.transport,
            timeout: self.timeout,
            search_path: self.search_path,
            binary: OnceLock::new(),
        };
        match runtime.binary() {
            Some(binary) => debug!(runtime = %runtime.name, binary = ?binary, "runtime available"),
            None => debug!(runtime = %runtime.name, command = ?runtime.command, "runtime not found"),
        }
        Ok(Arc::new(runtime))
    }
}

impl ExternalRuntime {
    pub fn builder<I, S>(
        name: impl Into<String>,
        command: I,
        runner_template: impl Into<String>,
    ) -> RuntimeBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuntimeBuilder {
            name: name.into(),
            command: command.into_iter().map(Into::into).collect(),
            template: runner_template.into(),
            transport: Transport::default(),
            timeout: None,
            search_path: None,
        }
    }

    /// Build a pipe-transport runtime resolved against `PATH`.
    pub fn build<I, S>(
        name: impl Into<String>,
        command: I,
        runner_template: impl Into<String>,
    ) -> Result<Arc<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(name, command, runner_template).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn template(&self) -> &RunnerTemplate {
        &self.template
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_available(&self) -> bool {
        self.binary().is_some()
    }

    /// The resolved command: absolute program path followed by the fixed
    /// arguments. Computed once.
    pub fn binary(&self) -> Option<&[String]> {
        self.binary.get_or_init(|| self.resolve()).as_deref()
    }

    fn resolve(&self) -> Option<Vec<String>> {
        match &self.search_path {
            Some(path) => locator::which_in(&self.command, path),
            None => locator::which(&self.command),
        }
    }

    /// A context whose every call runs `preamble` first. `None` when the
    /// runtime is unavailable.
    pub fn compile(self: &Arc<Self>, preamble: impl Into<String>) -> Option<Context> {
        if !self.is_available() {
            return None;
        }
        Some(Context::new(Arc::clone(self), preamble.into()))
    }

    pub async fn exec(self: &Arc<Self>, source: &str) -> Result<Option<Value>> {
        self.empty_context()?.exec(source).await
    }

    pub async fn eval(self: &Arc<Self>, source: &str) -> Result<Option<Value>> {
        self.empty_context()?.eval(source).await
    }

    pub async fn call<T: Serialize>(
        self: &Arc<Self>,
        identifier: &str,
        args: &[T],
    ) -> Result<Option<Value>> {
        self.empty_context()?.call(identifier, args).await
    }

    fn empty_context(self: &Arc<Self>) -> Result<Context> {
        self.compile("").ok_or_else(|| self.unavailable())
    }

    pub(crate) fn unavailable(&self) -> Error {
        Error::RuntimeUnavailable {
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for ExternalRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalRuntime")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("transport", &self.transport)
            .field("timeout", &self.timeout)
            .field("binary", &self.binary.get())
            .finish_non_exhaustive()
    }
}
