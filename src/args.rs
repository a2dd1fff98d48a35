use std::error::Error;

use crate::config::{self, IndexConfig, Preset, PublishTarget};

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(
        &mut self,
        flag: &str,
    ) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Get next argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    fn unknown(&self, flag: &str) -> Box<dyn Error> {
        format!("Unknown flag for {}: {}", self.command_name, flag).into()
    }
}

/// Flags as typed on the command line, before presets and environment
/// are applied.
#[derive(Default, Debug)]
pub struct CliFlags {
    pub preset: Option<Preset>,
    pub base: Option<String>,
    pub index_file: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub dry_run: bool,
    pub no_publish: bool,
    pub verbose: bool,
}

/// Fully resolved settings for `build` and `list`
#[derive(Debug)]
pub struct BuildFlags {
    pub config: IndexConfig,
    pub target: PublishTarget,
    pub dry_run: bool,
    pub publish: bool,
    pub verbose: bool,
}

impl BuildFlags {
    pub fn new(config: IndexConfig, target: PublishTarget) -> Self {
        Self { config, target, dry_run: false, publish: true, verbose: false }
    }
}

impl CliFlags {
    /// Preset (flag over `NOTE_INDEX_PRESET`), then environment overrides,
    /// then the remaining flags.
    pub fn resolve(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<BuildFlags, Box<dyn Error>> {
        let (config, target) = config::resolve(self.preset, lookup)?;
        let mut flags = BuildFlags::new(config, target);
        if let Some(base) = &self.base {
            flags.config.set_base_path(base);
        }
        if let Some(file) = &self.index_file {
            flags.config.set_index_file(file);
        }
        if let Some(remote) = self.remote {
            flags.target.remote = remote;
        }
        if let Some(branch) = self.branch {
            flags.target.branch = branch;
        }
        flags.dry_run = self.dry_run;
        flags.publish = !self.no_publish;
        flags.verbose = self.verbose;
        Ok(flags)
    }
}

pub fn parse_build_flags(
    args: Vec<String>,
    command_name: &str,
) -> Result<CliFlags, Box<dyn Error>> {
    let mut flags = CliFlags::default();
    let mut parser = ArgParser::new(args, command_name);
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--preset" | "-p" => {
                flags.preset = Some(parser.extract_value(&arg)?.parse::<Preset>()?);
            }
            "--base" | "-b" => flags.base = Some(parser.extract_value(&arg)?),
            "--index" => flags.index_file = Some(parser.extract_value(&arg)?),
            "--remote" => flags.remote = Some(parser.extract_value(&arg)?),
            "--branch" => flags.branch = Some(parser.extract_value(&arg)?),
            "--dry-run" | "-n" => flags.dry_run = true,
            "--no-publish" => flags.no_publish = true,
            "--verbose" | "-v" => flags.verbose = true,
            other => return Err(parser.unknown(other)),
        }
    }
    Ok(flags)
}
