mod cli;

use std::{
    fs,
    io::{self, Read},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context as _, Result};
use execjs::{
    config::Config,
    runtimes::{self, Options},
    ExternalRuntime,
};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // CLI flags take precedence over config file and environment
    let mut cfg = Config::load();
    if let Some(name) = args.runtime.as_deref() {
        cfg.set("EXECJS_RUNTIME", name);
    }
    if let Some(secs) = args.timeout {
        cfg.set("EXECJS_TIMEOUT", secs.to_string());
    }
    if args.tempfile {
        cfg.set("EXECJS_TRANSPORT", "tempfile");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cfg.log_filter()))
        .with_writer(io::stderr)
        .init();

    let options = Options {
        transport: cfg.transport(),
        timeout: cfg.timeout(),
    };

    if args.list_runtimes {
        list_runtimes(&options)?;
        return Ok(());
    }

    let runtime = select_runtime(&cfg, &options)?;

    let preamble = match args.preamble.as_deref() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading preamble: {}", path))?,
        None => String::new(),
    };
    let ctx = runtime
        .compile(preamble)
        .ok_or_else(|| anyhow!("{} runtime is not available on this system", runtime.name()))?;

    let result = if let Some(name) = args.call.as_deref() {
        let call_args: Vec<Value> = args.inputs.iter().map(|a| parse_arg(a)).collect();
        ctx.call(name, &call_args).await
    } else {
        let source = read_source(&args.inputs)?;
        if args.exec {
            ctx.exec(&source).await
        } else {
            ctx.eval(&source).await
        }
    };

    if let Some(value) = result.with_context(|| format!("running with {}", runtime.name()))? {
        println!("{}", value);
    }
    Ok(())
}

fn select_runtime(cfg: &Config, options: &Options) -> Result<Arc<ExternalRuntime>> {
    match cfg.runtime_name() {
        Some(name) => runtimes::by_name(&name, options)
            .ok_or_else(|| {
                anyhow!(
                    "unknown runtime: {} (known: {})",
                    name,
                    runtimes::names().join(", ")
                )
            })?
            .map_err(Into::into),
        None => runtimes::autodetect(options)?
            .ok_or_else(|| anyhow!("no JavaScript runtime found on PATH")),
    }
}

fn list_runtimes(options: &Options) -> Result<()> {
    for name in runtimes::names() {
        let Some(runtime) = runtimes::by_name(name, options) else {
            continue;
        };
        let runtime = runtime?;
        match runtime.binary() {
            Some(binary) => println!(
                "{} {} ({})",
                name.green(),
                runtime.name(),
                binary.join(" ")
            ),
            None => println!("{} {} (not installed)", name.red(), runtime.name()),
        }
    }
    Ok(())
}

/// Positional input, or stdin when nothing was given and stdin is piped.
fn read_source(inputs: &[String]) -> Result<String> {
    if !inputs.is_empty() {
        return Ok(inputs.join(" "));
    }
    if io::stdin().is_terminal() {
        bail!("Provide source as an argument or via stdin");
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
