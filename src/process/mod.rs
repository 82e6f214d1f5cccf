//! Runtime subprocess management: spawn, feed the program, collect stdout.

use std::{future::Future, io::Write as _, process::Output, process::Stdio, time::Duration};

use tokio::{io::AsyncWriteExt, process::Command, time::timeout};
use tracing::debug;

use crate::error::{Error, Result};

/// How the rendered program reaches the interpreter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// Program text is written to the child's stdin.
    #[default]
    Pipe,
    /// Program text is written to a temporary file whose path is appended to
    /// the command line.
    Tempfile,
}

impl Transport {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pipe" | "stdin" => Some(Self::Pipe),
            "tempfile" | "file" => Some(Self::Tempfile),
            _ => None,
        }
    }
}

/// Run `program` through `binary` and return stdout of a successful exit.
pub async fn run(
    binary: &[String],
    program: &str,
    transport: Transport,
    deadline: Option<Duration>,
) -> Result<String> {
    if binary.is_empty() {
        return Err(Error::Process {
            code: None,
            stderr: "empty runtime command".into(),
        });
    }
    debug!(binary = %binary[0], ?transport, "spawning runtime");
    match transport {
        Transport::Pipe => run_with_pipe(binary, program, deadline).await,
        Transport::Tempfile => run_with_tempfile(binary, program, deadline).await,
    }
}

async fn run_with_pipe(binary: &[String], program: &str, deadline: Option<Duration>) -> Result<String> {
    let mut cmd = command(binary);
    cmd.stdin(Stdio::piped());
    let mut child = spawn(cmd, &binary[0])?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| std::io::Error::other("runtime stdin was not captured"))?;

    // stdout is drained while stdin is written; the child may produce output
    // before it has read the whole program.
    let write = async move {
        let written = stdin.write_all(program.as_bytes()).await;
        drop(stdin);
        match written {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    };
    let (written, output) =
        with_deadline(deadline, async move { tokio::join!(write, child.wait_with_output()) })
            .await?;

    let stdout = finish(output?)?;
    written?;
    Ok(stdout)
}

async fn run_with_tempfile(
    binary: &[String],
    program: &str,
    deadline: Option<Duration>,
) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("execjs")
        .suffix(".js")
        .tempfile()?;
    file.write_all(program.as_bytes())?;
    file.flush()?;

    let mut cmd = command(binary);
    cmd.arg(file.path()).stdin(Stdio::null());
    let child = spawn(cmd, &binary[0])?;
    let output = with_deadline(deadline, child.wait_with_output()).await??;
    drop(file);

    finish(output)
}

fn command(binary: &[String]) -> Command {
    let mut cmd = Command::new(&binary[0]);
    cmd.args(&binary[1..])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

fn spawn(mut cmd: Command, program: &str) -> Result<tokio::process::Child> {
    cmd.spawn().map_err(|e| Error::Process {
        code: None,
        stderr: format!("failed to spawn {}: {}", program, e),
    })
}

async fn with_deadline<F: Future>(deadline: Option<Duration>, fut: F) -> Result<F::Output> {
    match deadline {
        Some(limit) => timeout(limit, fut).await.map_err(|_| Error::Timeout(limit)),
        None => Ok(fut.await),
    }
}

fn finish(output: Output) -> Result<String> {
    debug!(status = ?output.status, stdout_len = output.stdout.len(), "runtime exited");
    if !output.status.success() {
        return Err(Error::Process {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_parse() {
        assert_eq!(Transport::parse("pipe"), Some(Transport::Pipe));
        assert_eq!(Transport::parse(" Tempfile "), Some(Transport::Tempfile));
        assert_eq!(Transport::parse("socket"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_pipe_feeds_program_on_stdin() {
        let binary = vec!["/bin/sh".to_string()];
        let out = run(&binary, "echo hello\n", Transport::Pipe, None)
            .await
            .unwrap();
        assert_eq!(out, "hello\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tempfile_passes_program_path() {
        let binary = vec!["/bin/sh".to_string()];
        let out = run(&binary, "echo from-file\n", Transport::Tempfile, None)
            .await
            .unwrap();
        assert_eq!(out, "from-file\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let binary = vec!["/bin/sh".to_string()];
        let err = run(&binary, "echo partial\necho boom >&2\nexit 3\n", Transport::Pipe, None)
            .await
            .unwrap_err();
        match err {
            Error::Process { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deadline_kills_child() {
        let binary = vec!["/bin/sh".to_string()];
        let limit = Duration::from_millis(200);
        let err = run(&binary, "sleep 5\n", Transport::Pipe, Some(limit))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == limit));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_process_error() {
        let binary = vec!["/definitely/not/here/runtime".to_string()];
        match run(&binary, "", Transport::Pipe, None).await {
            Err(Error::Process { code: None, stderr }) => assert!(!stderr.is_empty()),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
