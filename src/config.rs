//! Index layout settings and the named presets.
//!
//! Resolution order is preset, then environment, then command-line flags.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_INDEX_FILE: &str = "README.md";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "master";

/// How the date shows up under each index heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMarker {
    Hidden,
    Plain,
    /// `*2023-01-01*`
    Emphasized,
}

impl DateMarker {
    pub fn render(self, date: &str) -> Option<String> {
        match self {
            DateMarker::Hidden => None,
            DateMarker::Plain => Some(date.to_string()),
            DateMarker::Emphasized => Some(format!("*{date}*")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLabels {
    pub previous: String,
    pub next: String,
    /// Back-link label; `None` leaves the back-link out of the footer.
    pub index: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Plain,
    Linked,
    Raw,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Plain, Preset::Linked, Preset::Raw];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Plain => "plain",
            Preset::Linked => "linked",
            Preset::Raw => "raw",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Unknown preset: {s} (expected plain|linked|raw)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Directory name prefixed to every "read more" link in the index.
    pub base_path: String,
    pub decorate_titles: bool,
    pub date_marker: DateMarker,
    pub labels: LinkLabels,
    /// Target of the footer back-link.
    pub index_href: String,
    pub index_file: String,
    pub index_title: String,
    /// Marker written before each index title, e.g. `####`.
    pub heading: String,
    pub read_more: String,
}

impl IndexConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Plain => Self {
                base_path: "golang".to_string(),
                decorate_titles: true,
                date_marker: DateMarker::Plain,
                labels: LinkLabels {
                    previous: "previous".to_string(),
                    next: "next".to_string(),
                    index: None,
                },
                index_href: DEFAULT_INDEX_FILE.to_string(),
                index_file: DEFAULT_INDEX_FILE.to_string(),
                index_title: "Index".to_string(),
                heading: "####".to_string(),
                read_more: "Read More".to_string(),
            },
            Preset::Linked => Self {
                base_path: ".".to_string(),
                decorate_titles: true,
                date_marker: DateMarker::Emphasized,
                labels: LinkLabels {
                    previous: "上一节".to_string(),
                    next: "下一节".to_string(),
                    index: Some("目录".to_string()),
                },
                index_href: "../.".to_string(),
                index_file: DEFAULT_INDEX_FILE.to_string(),
                index_title: "Index".to_string(),
                heading: "####".to_string(),
                read_more: "Read More".to_string(),
            },
            Preset::Raw => Self {
                base_path: ".".to_string(),
                decorate_titles: false,
                date_marker: DateMarker::Hidden,
                labels: LinkLabels {
                    previous: "previous".to_string(),
                    next: "next".to_string(),
                    index: Some("index".to_string()),
                },
                index_href: DEFAULT_INDEX_FILE.to_string(),
                index_file: DEFAULT_INDEX_FILE.to_string(),
                index_title: "Index".to_string(),
                heading: "#### ".to_string(),
                read_more: "Read More".to_string(),
            },
        }
    }

    /// Point read-more links at `base`. The linked layout's back-link follows
    /// the base directory as well.
    pub fn set_base_path(&mut self, base: &str) {
        if self.labels.index.is_some() && self.index_href.starts_with("../") {
            self.index_href = format!("../{base}");
        }
        self.base_path = base.to_string();
    }

    pub fn set_index_file(&mut self, file: &str) {
        if self.index_href == self.index_file {
            self.index_href = file.to_string();
        }
        self.index_file = file.to_string();
    }

    /// Relative link from the index to a rewritten note.
    pub fn note_href(&self, realname: &str) -> String {
        if self.base_path.is_empty() {
            realname.to_string()
        } else {
            format!("{}/{}", self.base_path.trim_end_matches('/'), realname)
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::preset(Preset::Plain)
    }
}

/// Where `git push` sends the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub remote: String,
    pub branch: String,
}

impl Default for PublishTarget {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

/// Config for `preset` (or `NOTE_INDEX_PRESET`, or plain) with the
/// `NOTE_INDEX_*` overrides read through `lookup` applied.
pub fn resolve(
    preset: Option<Preset>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(IndexConfig, PublishTarget), Box<dyn Error>> {
    let preset = match (preset, lookup("NOTE_INDEX_PRESET")) {
        (Some(p), _) => p,
        (None, Some(v)) => v.parse::<Preset>()?,
        (None, None) => Preset::Plain,
    };
    let mut config = IndexConfig::preset(preset);
    if let Some(base) = lookup("NOTE_INDEX_BASE") {
        config.set_base_path(&base);
    }

    let mut target = PublishTarget::default();
    if let Some(remote) = lookup("NOTE_INDEX_REMOTE") {
        target.remote = remote;
    }
    if let Some(branch) = lookup("NOTE_INDEX_BRANCH") {
        target.branch = branch;
    }
    Ok((config, target))
}
