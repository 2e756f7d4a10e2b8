//! Shell command data source.

use std::process::Stdio;

use super::SourceOutput;

/// Runs `command` through `sh -c` and returns stdout followed by stderr.
///
/// A non-zero exit keeps the captured output and sets the error to
/// `exit status N`.
pub async fn run_script(command: &str) -> SourceOutput {
    if command.trim().is_empty() {
        return SourceOutput::failed("empty command");
    }

    let child = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .env("TERM", "dumb")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();
    let child = match child {
        Ok(child) => child,
        Err(e) => return SourceOutput::failed(format!("Failed to execute '{command}': {e}")),
    };

    let output = match child.wait_with_output().await {
        Ok(output) => output,
        Err(e) => return SourceOutput::failed(format!("Failed to execute '{command}': {e}")),
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    let error = if output.status.success() {
        None
    } else {
        Some(match output.status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        })
    };

    SourceOutput {
        output: combined,
        error,
    }
}
