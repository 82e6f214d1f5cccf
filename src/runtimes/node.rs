use std::sync::Arc;

use super::Options;
use crate::{error::Result, runtime::ExternalRuntime};

const NODE_NAME: &str = "Node.js (V8)";

/// Runs the source as a function body and prints the envelope as the last
/// line of output.
pub const NODE_RUNNER: &str = r##"(function(program, execjs) { execjs(program) })(function() { #{source}
}, function(program) {
  var output;
  try {
    var result = program();
    if (typeof result == 'undefined') {
      output = '["ok"]';
    } else {
      try {
        output = JSON.stringify(['ok', result]);
      } catch (err) {
        output = JSON.stringify(['err', '' + err]);
      }
    }
  } catch (err) {
    output = JSON.stringify(['err', '' + err]);
  }
  process.stdout.write(output + '\n');
});
"##;

/// Node.js, found as `node` or, failing that, `nodejs`.
pub fn node() -> Result<Arc<ExternalRuntime>> {
    node_with(&Options::default())
}

pub fn node_with(options: &Options) -> Result<Arc<ExternalRuntime>> {
    let runtime = options
        .apply(ExternalRuntime::builder(NODE_NAME, ["node"], NODE_RUNNER))
        .build()?;
    if runtime.is_available() {
        return Ok(runtime);
    }
    options
        .apply(ExternalRuntime::builder(NODE_NAME, ["nodejs"], NODE_RUNNER))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::RunnerTemplate;

    #[test]
    fn test_node_runner_is_a_valid_template() {
        let template = RunnerTemplate::new(NODE_RUNNER).unwrap();
        let program = template.render("return 1");
        assert!(program.contains("function() { return 1\n}"));
        assert!(program.ends_with("});\n"));
    }
}
