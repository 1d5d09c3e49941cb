//! Ways of providing the child's standard input.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::{ReproError, Result};

/// How the child's stdin is set up.
#[derive(Debug, Default)]
pub enum Stdin {
    /// A fresh pipe that never receives data.
    Blocking,
    /// Inherit the terminal so the user can type input.
    #[default]
    Interactive,
    /// Pre-supplied content, served from a temp file that is kept afterwards.
    Literal(LiteralInput),
}

/// Content written to a temp file that backs the child's stdin.
#[derive(Debug)]
pub struct LiteralInput {
    file: File,
    path: PathBuf,
}

impl LiteralInput {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Stdin {
    /// Write `content` to a new temp file and use it as stdin.
    ///
    /// The file is not deleted when the run finishes, so it can be inspected.
    pub fn literal(content: impl AsRef<[u8]>) -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("crashrepro-stdin-")
            .tempfile()
            .map_err(|e| ReproError::Io(format!("failed to create stdin temp file: {}", e)))?;

        let (mut file, path) = temp.keep().map_err(|e| {
            ReproError::Io(format!("failed to keep stdin temp file: {}", e.error))
        })?;

        file.write_all(content.as_ref())
            .and_then(|_| file.flush())
            .and_then(|_| file.seek(SeekFrom::Start(0)).map(|_| ()))
            .map_err(|e| {
                ReproError::Io(format!(
                    "failed to write stdin temp file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Stdin::Literal(LiteralInput { file, path }))
    }

    /// The stdio handle to give the child.
    pub fn stdio(&self) -> Result<Stdio> {
        match self {
            Stdin::Blocking => Ok(Stdio::piped()),
            Stdin::Interactive => Ok(Stdio::inherit()),
            Stdin::Literal(input) => {
                let file = input.file.try_clone().map_err(|e| {
                    ReproError::Io(format!(
                        "failed to reopen stdin temp file '{}': {}",
                        input.path.display(),
                        e
                    ))
                })?;
                Ok(Stdio::from(file))
            }
        }
    }

    /// Annotate a command log line with where stdin comes from.
    pub fn annotate(&self, line: String) -> String {
        match self {
            Stdin::Blocking | Stdin::Interactive => line,
            Stdin::Literal(input) => format!("{} < {}", line, input.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_and_interactive_leave_log_unchanged() {
        assert_eq!(Stdin::Blocking.annotate("Running: cat".into()), "Running: cat");
        assert_eq!(
            Stdin::Interactive.annotate("Running: cat".into()),
            "Running: cat"
        );
    }

    #[test]
    fn default_is_interactive() {
        assert!(matches!(Stdin::default(), Stdin::Interactive));
    }

    #[test]
    fn literal_writes_content_to_kept_file() {
        let stdin = Stdin::literal("abc").unwrap();
        let Stdin::Literal(input) = &stdin else {
            panic!("expected literal stdin");
        };

        let path = input.path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");

        let line = stdin.annotate("Running: cat".into());
        assert_eq!(line, format!("Running: cat < {}", path.display()));

        drop(stdin);
        assert!(path.exists(), "temp file must survive for postmortem");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn literal_stdio_handles_share_one_offset() {
        use std::process::Command;

        let stdin = Stdin::literal("abc").unwrap();
        let read_with_cat = |stdin: &Stdin| {
            Command::new("cat")
                .stdin(stdin.stdio().unwrap())
                .output()
                .unwrap()
                .stdout
        };

        assert_eq!(read_with_cat(&stdin), b"abc");
        assert_eq!(read_with_cat(&stdin), b"");

        if let Stdin::Literal(input) = stdin {
            std::fs::remove_file(input.path()).unwrap();
        }
    }
}
