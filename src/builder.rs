//! Index and note regeneration.
//!
//! A run lists the date-prefixed notes in a directory and writes each one to
//! its undated name with a title header and navigation footer. The index file
//! is written last. Notes whose output already matches what is on disk are
//! left alone, so rerunning without edits only touches the index.

use std::path::Path;

use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::error::Result;
use crate::note::{self, NoteName};

/// Outcome of one run. Owns everything the original global buffers held.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Notes in navigation order.
    pub notes: Vec<NoteName>,
    pub index: String,
    pub index_file: String,
    /// Rewritten (or, on a dry run, would-be rewritten) notes by `realname`.
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
}

impl BuildReport {
    /// Commit message: the index plus every changed note, `;`-terminated.
    pub fn change_summary(&self) -> String {
        let mut summary = format!("update {};", self.index_file);
        for name in &self.changed {
            summary.push_str(&format!("update {name};"));
        }
        summary
    }
}

/// Regenerate every note and the index under `dir`. With `dry_run` nothing is
/// written but the report still says what would change.
pub fn build(dir: &Path, config: &IndexConfig, dry_run: bool) -> Result<BuildReport> {
    let notes = note::list_note_files(dir)?;
    info!(count = notes.len(), dir = %dir.display(), "found notes");

    let mut report = BuildReport {
        index: index_header(config),
        index_file: config.index_file.clone(),
        ..Default::default()
    };

    for (pos, name) in notes.iter().enumerate() {
        let source = dir.join(&name.file_name);
        let body = note::read_file(&source)?;
        let excerpt = note::excerpt(&source, &body)?;
        report.index.push_str(&index_entry(config, name, &excerpt));

        let content = render_note(config, &notes, pos, &body);
        let target = dir.join(&name.realname);
        let existing = note::read_existing(&target)?;
        if existing.as_deref() == Some(content.as_slice()) {
            debug!(note = %name.realname, "unchanged");
            report.unchanged.push(name.realname.clone());
            continue;
        }

        if !dry_run {
            note::write_file(&target, &content)?;
        }
        debug!(note = %name.realname, dry_run, "rewritten");
        report.changed.push(name.realname.clone());
    }

    if !dry_run {
        note::write_file(&dir.join(&config.index_file), report.index.as_bytes())?;
    }
    report.notes = notes;
    Ok(report)
}

fn index_header(config: &IndexConfig) -> String {
    let underline = "-".repeat(config.index_title.chars().count().max(3));
    format!("{}\n{}\n\n", config.index_title, underline)
}

fn index_entry(config: &IndexConfig, name: &NoteName, excerpt: &str) -> String {
    let mut entry = format!("{}{}\n", config.heading, name.title(config.decorate_titles));
    if let Some(marker) = config.date_marker.render(&name.date_string()) {
        entry.push_str(&marker);
        entry.push('\n');
    }
    entry.push_str(&format!(
        "{}...[{}]({})\n\n",
        excerpt,
        config.read_more,
        config.note_href(&name.realname)
    ));
    entry
}

/// Full rewritten content for `notes[pos]`: header, original body bytes,
/// footer.
pub fn render_note(config: &IndexConfig, notes: &[NoteName], pos: usize, body: &[u8]) -> Vec<u8> {
    let name = &notes[pos];
    let mut out = format!("{}\n----\n\n", name.title(config.decorate_titles)).into_bytes();
    out.extend_from_slice(body);
    out.extend_from_slice(footer(config, notes, pos).as_bytes());
    out
}

/// Links heading, then the back-link, previous and next, each only when it
/// applies.
fn footer(config: &IndexConfig, notes: &[NoteName], pos: usize) -> String {
    let mut out = String::from("\n\nlinks\n-----\n");
    if let Some(label) = &config.labels.index {
        out.push_str(&format!("+ [{}]({})\n", label, config.index_href));
    }
    if let Some(prev) = pos.checked_sub(1).and_then(|i| notes.get(i)) {
        out.push_str(&nav_link(config, &config.labels.previous, prev));
    }
    if let Some(next) = notes.get(pos + 1) {
        out.push_str(&nav_link(config, &config.labels.next, next));
    }
    out
}

fn nav_link(config: &IndexConfig, label: &str, target: &NoteName) -> String {
    format!(
        "+ {}: [{}]({})\n",
        label,
        target.title(config.decorate_titles),
        target.realname
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &[u8]) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn names(list: &[&str]) -> Vec<NoteName> {
        list.iter().map(|n| NoteName::parse(n).unwrap()).collect()
    }

    #[test]
    fn intro_followup_example() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "_2023-01-01-intro.md", b"Line one\nLine two\nMore body\n");
        write(tmp.path(), "_2023-01-02-followup.md", b"First\nSecond\n");

        let report = build(tmp.path(), &IndexConfig::default(), false).unwrap();
        assert_eq!(report.changed, vec!["intro.md", "followup.md"]);

        let intro = fs::read_to_string(tmp.path().join("intro.md")).unwrap();
        assert_eq!(
            intro,
            "intro\n----\n\nLine one\nLine two\nMore body\n\n\nlinks\n-----\n+ next: [followup](followup.md)\n"
        );
        assert!(!intro.contains("previous"));

        let followup = fs::read_to_string(tmp.path().join("followup.md")).unwrap();
        assert!(followup.ends_with("+ previous: [intro](intro.md)\n"));
        assert!(!followup.contains("+ next"));

        let index = fs::read_to_string(tmp.path().join("README.md")).unwrap();
        assert_eq!(
            index,
            "Index\n-----\n\n\
             ####intro\n2023-01-01\nLine oneLine two...[Read More](golang/intro.md)\n\n\
             ####followup\n2023-01-02\nFirstSecond...[Read More](golang/followup.md)\n\n"
        );
        assert_eq!(
            report.change_summary(),
            "update README.md;update intro.md;update followup.md;"
        );
    }

    #[test]
    fn second_run_rewrites_nothing() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "_2023-01-01-intro.md", b"a\nb\n");
        write(tmp.path(), "_2023-01-02-followup.md", b"c\nd\n");
        let cfg = IndexConfig::preset(Preset::Linked);

        build(tmp.path(), &cfg, false).unwrap();
        fs::remove_file(tmp.path().join("README.md")).unwrap();
        let again = build(tmp.path(), &cfg, false).unwrap();

        assert!(again.changed.is_empty());
        assert_eq!(again.unchanged, vec!["intro.md", "followup.md"]);
        assert_eq!(again.change_summary(), "update README.md;");
        assert!(tmp.path().join("README.md").exists());
    }

    #[test]
    fn prev_next_follow_sort_order() {
        let notes = names(&[
            "_2023-01-01-a.md",
            "_2023-01-01-b.md",
            "_2023-01-01-c.md",
        ]);
        let cfg = IndexConfig::default();
        let text = |pos| String::from_utf8(render_note(&cfg, &notes, pos, b"x\ny\n")).unwrap();
        let (first, middle, last) = (text(0), text(1), text(2));

        assert!(!first.contains("previous:"));
        assert!(first.contains("+ next: [b](b.md)"));
        assert!(middle.contains("+ previous: [a](a.md)"));
        assert!(middle.contains("+ next: [c](c.md)"));
        assert!(last.contains("+ previous: [b](b.md)"));
        assert!(!last.contains("next:"));
    }

    #[test]
    fn single_note_keeps_empty_links_section() {
        let notes = names(&["_2023-01-01-only-one.md"]);
        let out = render_note(&IndexConfig::default(), &notes, 0, b"x\ny\n");
        assert_eq!(out, b"only one\n----\n\nx\ny\n\n\nlinks\n-----\n");
    }

    #[test]
    fn linked_preset_layout() {
        let notes = names(&["_2023-01-01-first-post.md", "_2023-01-05-second.md"]);
        let mut cfg = IndexConfig::preset(Preset::Linked);
        cfg.set_base_path("clang");
        let out = render_note(&cfg, &notes, 1, b"body\n");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "second\n----\n\nbody\n\n\nlinks\n-----\n+ [目录](../clang)\n+ 上一节: [first post](first-post.md)\n"
        );
        let entry = index_entry(&cfg, &notes[0], "l1l2");
        assert_eq!(
            entry,
            "####first post\n*2023-01-01*\nl1l2...[Read More](clang/first-post.md)\n\n"
        );
    }

    #[test]
    fn raw_preset_keeps_file_names() {
        let notes = names(&["_2023-01-01-first-post.md", "_2023-01-05-second.md"]);
        let cfg = IndexConfig::preset(Preset::Raw);
        let out = String::from_utf8(render_note(&cfg, &notes, 0, b"body\n")).unwrap();
        assert!(out.starts_with("first-post.md\n----\n\n"));
        assert!(out.contains("+ [index](README.md)\n"));
        assert!(out.contains("+ next: [second.md](second.md)\n"));
        let entry = index_entry(&cfg, &notes[0], "l1 l2");
        assert_eq!(
            entry,
            "#### first-post.md\nl1 l2...[Read More](./first-post.md)\n\n"
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "_2023-01-01-intro.md", b"a\nb\n");
        let report = build(tmp.path(), &IndexConfig::default(), true).unwrap();
        assert_eq!(report.changed, vec!["intro.md"]);
        assert!(!tmp.path().join("intro.md").exists());
        assert!(!tmp.path().join("README.md").exists());
        assert!(report.index.contains("####intro\n"));
    }

    #[test]
    fn short_note_aborts_after_earlier_writes() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "_2023-01-01-good.md", b"a\nb\n");
        write(tmp.path(), "_2023-01-02-short.md", b"just one line\n");
        let err = build(tmp.path(), &IndexConfig::default(), false).unwrap_err();
        assert!(err.to_string().contains("_2023-01-02-short.md"));
        assert!(tmp.path().join("good.md").exists());
        assert!(!tmp.path().join("README.md").exists());
    }

    #[test]
    fn non_utf8_body_is_copied_verbatim() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "_2023-01-01-latin.md", b"caf\xe9\nline two\n");
        let cfg = IndexConfig::default();

        let report = build(tmp.path(), &cfg, false).unwrap();
        assert_eq!(report.changed, vec!["latin.md"]);
        let out = fs::read(tmp.path().join("latin.md")).unwrap();
        assert_eq!(out, b"latin\n----\n\ncaf\xe9\nline two\n\n\nlinks\n-----\n");
        assert!(report.index.contains("caf\u{fffd}line two...[Read More](golang/latin.md)"));

        let again = build(tmp.path(), &cfg, false).unwrap();
        assert!(again.changed.is_empty());
    }

    #[test]
    fn impossible_date_fails_the_run() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "_2023-02-30-x.md", b"a\nb\n");
        let err = build(tmp.path(), &IndexConfig::default(), false).unwrap_err();
        assert!(matches!(err, crate::error::IndexError::InvalidName { .. }));
        assert!(err.to_string().contains("_2023-02-30-x.md"));
        assert!(!tmp.path().join("README.md").exists());
    }

    #[test]
    fn empty_directory_still_writes_index() {
        let tmp = tempdir().unwrap();
        let report = build(tmp.path(), &IndexConfig::default(), false).unwrap();
        assert!(report.notes.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.path().join("README.md")).unwrap(),
            "Index\n-----\n\n"
        );
    }
}
