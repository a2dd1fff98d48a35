use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{IndexError, Result};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// `_` + `YYYY-MM-DD` + `-`
const PREFIX_LEN: usize = 12;

static NOTE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^_[0-9]{4}-[0-9]{2}-[0-9]{2}-").expect("static note prefix pattern")
});

/// A parsed `_YYYY-MM-DD-<name>.<ext>` file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteName {
    pub file_name: String,
    pub date: NaiveDate,
    pub realname: String,
}

impl NoteName {
    pub fn parse(file_name: &str) -> Result<Self> {
        let invalid = |reason: &str| IndexError::InvalidName {
            name: file_name.to_string(),
            reason: reason.to_string(),
        };
        if !NOTE_PREFIX.is_match(file_name) {
            return Err(invalid("expected a _YYYY-MM-DD- prefix"));
        }
        // The pattern only matched ASCII up to PREFIX_LEN, so slicing is safe.
        let date = NaiveDate::parse_from_str(&file_name[1..PREFIX_LEN - 1], DATE_FMT)
            .map_err(|e| invalid(&format!("bad date: {e}")))?;
        let realname = &file_name[PREFIX_LEN..];
        if realname.is_empty() {
            return Err(invalid("nothing after the date prefix"));
        }
        Ok(Self {
            file_name: file_name.to_string(),
            date,
            realname: realname.to_string(),
        })
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FMT).to_string()
    }

    /// Heading text for this note, decorated or not.
    pub fn title(&self, decorate: bool) -> String {
        if decorate {
            decorate_title(&self.realname)
        } else {
            self.realname.clone()
        }
    }
}

pub fn is_note_name(file_name: &str) -> bool {
    NOTE_PREFIX.is_match(file_name)
}

/// Drop the last extension and turn dashes into spaces:
/// `my-note-title.md` -> `my note title`.
pub fn decorate_title(realname: &str) -> String {
    let stem = match realname.rfind('.') {
        Some(idx) => &realname[..idx],
        None => realname,
    };
    stem.replace('-', " ")
}

/// First two lines of `content` concatenated, each without its `\n`.
/// Bytes that are not UTF-8 are replaced rather than rejected.
pub fn excerpt(path: &Path, content: &[u8]) -> Result<String> {
    let line = |l: &[u8]| {
        String::from_utf8_lossy(l.strip_suffix(b"\n").unwrap_or(l)).into_owned()
    };
    let mut lines = content.split_inclusive(|b| *b == b'\n');
    match (lines.next(), lines.next()) {
        (Some(first), Some(second)) => Ok(format!("{}{}", line(first), line(second))),
        (first, _) => Err(IndexError::MalformedNote {
            path: path.to_path_buf(),
            lines: usize::from(first.is_some()),
        }),
    }
}

/// Every regular file in `dir` with a `_YYYY-MM-DD-` prefix, sorted by file
/// name bytes. A prefixed name that does not parse fails the scan.
pub fn list_note_files(dir: &Path) -> Result<Vec<NoteName>> {
    let list_err = |source: io::Error| IndexError::ListDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut notes = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        if !entry.file_type().map_err(list_err)?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_note_name(&name) {
            continue;
        }
        notes.push(NoteName::parse(&name)?);
    }
    notes.sort_by(|a, b| a.file_name.as_bytes().cmp(b.file_name.as_bytes()));
    Ok(notes)
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Existing bytes at `path`, or `None` when the file does not exist yet.
pub fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(IndexError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn notes_dir() -> io::Result<PathBuf> {
    if let Ok(dir) = std::env::var("NOTE_INDEX_DIR") {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_dir()
}
