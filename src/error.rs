//! Error type shared by every execution path.

use std::time::Duration;

use thiserror::Error;

/// Failures produced while locating, running or decoding an external runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// No executable could be resolved for the runtime's command.
    #[error("{name} runtime is not available on this system")]
    RuntimeUnavailable { name: String },

    /// The runner template did not contain exactly one `#{source}` marker.
    #[error("runner template must contain exactly one #{{source}} marker, found {markers}")]
    InvalidTemplate { markers: usize },

    /// The subprocess exited non-zero or could not be spawned at all.
    #[error("runtime process failed ({}): {stderr}", describe_code(.code))]
    Process { code: Option<i32>, stderr: String },

    /// The program ran to completion but reported a failure in its envelope.
    #[error("program error{}", describe_message(.message))]
    Program { message: Option<String> },

    /// A `call` argument could not be encoded as JSON.
    #[error("failed to serialize argument: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The output did not carry a result envelope where one was expected.
    #[error("could not decode result envelope: {reason}")]
    Decode { reason: String, line: String },

    #[error("runtime did not finish within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code".to_string(),
    }
}

fn describe_message(message: &Option<String>) -> String {
    match message.as_deref() {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_error_display() {
        let faceless = Error::Program { message: None };
        assert_eq!(faceless.to_string(), "program error");

        let with_message = Error::Program {
            message: Some("ReferenceError: x is not defined".into()),
        };
        assert_eq!(
            with_message.to_string(),
            "program error: ReferenceError: x is not defined"
        );
    }

    #[test]
    fn test_process_error_display() {
        let err = Error::Process {
            code: Some(3),
            stderr: "boom".into(),
        };
        assert_eq!(err.to_string(), "runtime process failed (exit code 3): boom");
    }

    #[test]
    fn test_template_error_display() {
        let err = Error::InvalidTemplate { markers: 2 };
        assert_eq!(
            err.to_string(),
            "runner template must contain exactly one #{source} marker, found 2"
        );
    }
}
