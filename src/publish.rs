use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::PublishTarget;
use crate::error::{IndexError, Result};

/// Runs a multi-line shell script and hands back its combined output.
pub trait ScriptRunner {
    fn run(&self, script: &str) -> io::Result<String>;
}

/// `bash -c <script>` inside a working directory.
pub struct BashRunner {
    dir: PathBuf,
}

impl BashRunner {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl ScriptRunner for BashRunner {
    fn run(&self, script: &str) -> io::Result<String> {
        let output = Command::new("bash")
            .arg("-c")
            .arg(script)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .output()?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "script exited with {}:\n{}",
                output.status,
                combined.trim_end()
            )));
        }
        Ok(combined)
    }
}

/// Quote `text` as a single-quoted shell word.
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// `text` bare when it is a plain ref-like word, quoted otherwise.
fn shell_word(text: &str) -> String {
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._/-@+:".contains(c));
    if plain { text.to_string() } else { shell_quote(text) }
}

pub fn commit_script(summary: &str, target: &PublishTarget) -> String {
    format!(
        "git add .\ngit commit -a -m {}\ngit push -u {} {}\n",
        shell_quote(summary),
        shell_word(&target.remote),
        shell_word(&target.branch)
    )
}

/// Stage, commit and push everything under the runner's directory.
pub fn publish(
    runner: &dyn ScriptRunner,
    summary: &str,
    target: &PublishTarget,
) -> Result<String> {
    let script = commit_script(summary, target);
    debug!(%script, "running commit script");
    runner.run(&script).map_err(IndexError::Publish)
}
