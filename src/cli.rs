use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "execjs", about = "Run JavaScript through an installed runtime", version)]
#[command(group(ArgGroup::new("mode").args(["exec", "call", "list_runtimes"]).multiple(false)))]
pub struct Cli {
    /// Expression to evaluate (statements with --exec, arguments with --call).
    /// Source is read from stdin when omitted.
    #[arg(value_name = "INPUT", trailing_var_arg = true, allow_hyphen_values = true)]
    pub inputs: Vec<String>,

    /// Run SOURCE as statements; use `return` to produce a value.
    #[arg(short = 'x', long)]
    pub exec: bool,

    /// Call the named function; each INPUT is an argument, parsed as JSON or
    /// else taken as a string.
    #[arg(short = 'c', long, value_name = "NAME")]
    pub call: Option<String>,

    /// File whose code runs before SOURCE on every call.
    #[arg(short = 'p', long, value_name = "FILE")]
    pub preamble: Option<String>,

    /// Runtime to use (auto|node). Overrides EXECJS_RUNTIME.
    #[arg(short = 'r', long)]
    pub runtime: Option<String>,

    /// Kill the runtime after this many seconds (0 disables). Overrides EXECJS_TIMEOUT.
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Hand the program to the runtime through a temporary file instead of stdin.
    #[arg(long)]
    pub tempfile: bool,

    /// List known runtimes and whether they are installed.
    #[arg(short = 'l', long = "list-runtimes")]
    pub list_runtimes: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
