//! Execution contexts: program generation and the one-shot run protocol.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    process::{self, Transport},
    runtime::ExternalRuntime,
};

pub mod decode;

pub use decode::decode;

/// A runtime bound to a preamble. Each call spawns a fresh process that runs
/// the preamble followed by the given source.
#[derive(Debug, Clone)]
pub struct Context {
    runtime: Arc<ExternalRuntime>,
    preamble: String,
    transport: Transport,
}

impl Context {
    pub(crate) fn new(runtime: Arc<ExternalRuntime>, preamble: String) -> Self {
        let transport = runtime.transport();
        Self {
            runtime,
            preamble,
            transport,
        }
    }

    pub fn runtime(&self) -> &ExternalRuntime {
        &self.runtime
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn is_available(&self) -> bool {
        self.runtime.is_available()
    }

    /// The exact program text `exec(source)` hands to the runtime.
    pub fn program(&self, source: &str) -> String {
        if self.preamble.is_empty() {
            self.runtime.template().render(source)
        } else {
            let joined = format!("{}\n{}", self.preamble, source);
            self.runtime.template().render(&joined)
        }
    }

    /// Run `source` as statements. A `return` value becomes the result.
    pub async fn exec(&self, source: &str) -> Result<Option<Value>> {
        let binary = self
            .runtime
            .binary()
            .ok_or_else(|| self.runtime.unavailable())?;
        let program = self.program(source);
        let output = process::run(binary, &program, self.transport, self.runtime.timeout()).await?;
        decode(&output)
    }

    /// Evaluate a single expression.
    pub async fn eval(&self, source: &str) -> Result<Option<Value>> {
        self.ensure_available()?;
        self.exec(&eval_source(source)).await
    }

    /// Apply the function named by `identifier` to `args`, each encoded as
    /// JSON.
    pub async fn call<T: Serialize>(&self, identifier: &str, args: &[T]) -> Result<Option<Value>> {
        self.ensure_available()?;
        let source = call_source(identifier, args)?;
        self.eval(&source).await
    }

    fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(self.runtime.unavailable())
        }
    }
}

/// `return eval("(<expr>)")`, with blank input evaluating `''`.
pub(crate) fn eval_source(expr: &str) -> String {
    let expr = if expr.trim().is_empty() { "''" } else { expr };
    let quoted = Value::String(format!("({})", expr)).to_string();
    format!("return eval({})", quoted)
}

pub(crate) fn call_source<T: Serialize>(identifier: &str, args: &[T]) -> Result<String> {
    let encoded = args
        .iter()
        .map(|arg| serde_json::to_string(arg).map_err(Error::Serialization))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{}.apply(this,[{}])", identifier, encoded.join(",")))
}
