//! Machine-credentials (netrc) lookup
//!
//! Locates and parses the standard netrc file so Heroku credentials can be
//! picked up without explicit configuration. Only the entry matching the API
//! hostname is of interest; macro definitions are skipped.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the netrc file location.
pub const NETRC_PATH_ENV: &str = "NETRC_PATH";

#[cfg(windows)]
const NETRC_FILE: &str = "_netrc";
#[cfg(not(windows))]
const NETRC_FILE: &str = ".netrc";

/// One `machine` (or `default`) entry from a netrc file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    /// Machine name; `None` for a `default` entry.
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

/// Failures while reading or parsing a netrc file.
///
/// Callers treat these as non-fatal: the credential resolver logs a warning
/// and falls back to explicit configuration.
#[derive(Error, Debug)]
pub enum NetrcError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed netrc at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Resolve the netrc location: `NETRC_PATH` when set, else the dotfile in
/// the user's home directory.
pub fn default_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(NETRC_PATH_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::home_dir().map(|home| home.join(NETRC_FILE))
}

/// Look up the entry for `host` in the default netrc location.
///
/// No resolvable location at all is `Ok(None)`.
pub fn lookup(host: &str) -> Result<Option<Machine>, NetrcError> {
    match default_path() {
        Some(path) => lookup_at(&path, host),
        None => Ok(None),
    }
}

/// Look up the entry for `host` in the file at `path`.
///
/// Returns the `machine` entry whose name equals `host`, falling back to a
/// `default` entry when present. A missing file or a directory at `path`
/// counts as "no file" and yields `Ok(None)`; any other I/O failure or a
/// parse error is surfaced so the caller can fall back with a warning.
pub fn lookup_at(path: &Path, host: &str) -> Result<Option<Machine>, NetrcError> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(NetrcError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
        Ok(meta) if meta.is_dir() => return Ok(None),
        Ok(_) => {}
    }

    let contents = std::fs::read_to_string(path).map_err(|e| NetrcError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let machines = parse(&contents)?;

    let named = machines.iter().find(|m| m.name.as_deref() == Some(host));
    let fallback = machines.iter().find(|m| m.name.is_none());
    Ok(named.or(fallback).cloned())
}

/// Parse netrc contents into its entries.
///
/// Token-stream format: `machine <name>`, `default`, `login <value>`,
/// `password <value>`, `account <value>` (recognized, not stored) and
/// `macdef <name>` whose body runs through the next blank line. A value may
/// sit on the line after its keyword.
fn parse(contents: &str) -> Result<Vec<Machine>, NetrcError> {
    let mut machines: Vec<Machine> = Vec::new();
    let mut pending: Option<(&str, usize)> = None;
    let mut in_macdef = false;

    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;

        if in_macdef {
            if line.trim().is_empty() {
                in_macdef = false;
            }
            continue;
        }

        for token in line.split_whitespace() {
            if let Some((keyword, at)) = pending.take() {
                match keyword {
                    "machine" => machines.push(Machine {
                        name: Some(token.to_string()),
                        ..Machine::default()
                    }),
                    "login" => current(&mut machines, at)?.login = Some(token.to_string()),
                    "password" => current(&mut machines, at)?.password = Some(token.to_string()),
                    "account" => {
                        current(&mut machines, at)?;
                    }
                    "macdef" => {
                        in_macdef = true;
                    }
                    _ => {}
                }
                if in_macdef {
                    break;
                }
                continue;
            }

            match token {
                "machine" | "login" | "password" | "account" | "macdef" => {
                    pending = Some((token, line_no));
                }
                "default" => machines.push(Machine::default()),
                other => {
                    return Err(NetrcError::Malformed {
                        line: line_no,
                        message: format!("unexpected token `{other}`"),
                    });
                }
            }
        }
    }

    if let Some((keyword, line)) = pending {
        return Err(NetrcError::Malformed {
            line,
            message: format!("`{keyword}` is missing a value"),
        });
    }

    Ok(machines)
}

fn current(machines: &mut Vec<Machine>, line: usize) -> Result<&mut Machine, NetrcError> {
    machines.last_mut().ok_or_else(|| NetrcError::Malformed {
        line,
        message: "credential token before any machine or default entry".to_string(),
    })
}
