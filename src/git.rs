use std::path::PathBuf;
use std::process::Command;

/// Outcome of the describe query. `ok` mirrors the git exit status; the
/// text is whatever landed on stdout, trimmed.
#[derive(Debug, Clone)]
pub struct Describe {
    pub text: String,
    pub ok: bool,
}

/// The slice of version control the resolver needs.
pub trait Vcs {
    /// Full `HEAD` hash as reported by `git rev-parse`, empty when git
    /// cannot be run at all.
    fn head_hash(&self) -> String;

    /// Nearest-tag descriptive string (`git describe --tags --dirty --long`).
    fn describe(&self) -> Describe;
}

/// Runs the real `git` binary, optionally in another directory so callers
/// never have to change their own working directory.
pub struct GitCli {
    dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new(dir: Option<PathBuf>) -> GitCli {
        GitCli { dir }
    }

    fn capture(&self, args: &[&str]) -> (String, bool) {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        match cmd.output() {
            Ok(out) => (
                String::from_utf8_lossy(&out.stdout).trim().to_string(),
                out.status.success(),
            ),
            Err(_) => (String::new(), false),
        }
    }
}

impl Vcs for GitCli {
    fn head_hash(&self) -> String {
        self.capture(&["rev-parse", "HEAD"]).0
    }

    fn describe(&self) -> Describe {
        let (text, ok) = self.capture(&["describe", "--tags", "--dirty", "--long"]);
        Describe { text, ok }
    }
}
