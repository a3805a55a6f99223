//! Translation key audit.
//!
//! Scans source trees for translation lookups and reports which keys of
//! the default locale are never referenced.

use crate::error::{CliError, CliResult};
use raidbot_i18n::{AuditReport, Catalog, KeyScanner, OutputFormat};
use std::path::PathBuf;

#[derive(Debug)]
pub struct AuditOptions {
    pub roots: Vec<PathBuf>,
    /// Replaces the default scanned extensions when non-empty
    pub extensions: Vec<String>,
    pub locales_dir: Option<PathBuf>,
    pub namespace: Option<String>,
    pub output: String,
    pub threshold: u32,
    pub verbose: bool,
    pub debug: bool,
}

pub fn execute(options: AuditOptions) -> CliResult<()> {
    let format: OutputFormat = options
        .output
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("unknown output format '{}'", options.output)))?;

    if options.debug {
        raidbot_log::set_debug(true);
    }

    let catalog = match options.locales_dir {
        Some(ref dir) => Catalog::load_from_dir(dir)?,
        None => Catalog::embedded()?,
    };

    let mut scanner = KeyScanner::new()?;
    if !options.extensions.is_empty() {
        scanner = scanner.with_extensions(options.extensions);
    }

    let report = run(
        &catalog,
        &scanner,
        &options.roots,
        options.namespace.as_deref(),
        options.threshold,
    )?;
    print!("{}", report.render(format, options.verbose)?);
    Ok(())
}

fn run(
    catalog: &Catalog,
    scanner: &KeyScanner,
    roots: &[PathBuf],
    namespace: Option<&str>,
    threshold: u32,
) -> CliResult<AuditReport> {
    for root in roots {
        if !root.exists() {
            return Err(CliError::InvalidArgument(format!(
                "source root {} does not exist",
                root.display()
            )));
        }
    }

    let mut report = AuditReport::audit(catalog, scanner, roots)?;
    if let Some(namespace) = namespace {
        report = report.only_namespace(namespace);
    }
    Ok(report.below_threshold(threshold))
}
