use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::cli::InsulationCli;
use crate::script::{self, Script};

/// Clothing scripts, relative to the installation directory.
pub const CLOTHING_SCRIPTS: &str = "media/scripts/clothing";
pub const INSULATION: &str = "Insulation";
pub const DEFAULT_INSULATION: &str = "1.0";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixReport {
    pub files_scanned: usize,
    pub files_patched: usize,
    pub items_patched: usize,
}

pub fn run(cli: &InsulationCli) -> Result<FixReport> {
    let scripts = cli.directory.join(CLOTHING_SCRIPTS);
    let report = fix_directory(&scripts)?;
    info!(
        "patched {} item(s) in {} of {} file(s)",
        report.items_patched, report.files_patched, report.files_scanned
    );
    Ok(report)
}

/// Patch every script file directly inside `dir`.
pub fn fix_directory(dir: &Utf8Path) -> Result<FixReport> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {dir}"))? {
        let entry = entry.with_context(|| format!("reading directory {dir}"))?;
        match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => entries.push(path),
            Err(path) => warn!("{} is not valid UTF-8, skipping", path.display()),
        }
    }
    entries.sort();

    let mut report = FixReport::default();
    for path in entries {
        let name = path.file_name().unwrap_or(path.as_str());
        if path.is_dir() {
            debug!("{name} is a directory, skipping");
            continue;
        }

        report.files_scanned += 1;
        let mut script = script::read(&path)?;
        let patched = fix_script(&mut script);
        if patched > 0 {
            script::write(&script, &path)?;
            report.files_patched += 1;
            report.items_patched += patched;
        } else {
            info!("all items in {name} already have insulation");
        }
    }
    Ok(report)
}

/// Add the default insulation to items lacking it; returns how many were patched.
pub fn fix_script(script: &mut Script) -> usize {
    let mut patched = 0;
    for (_, items) in script.iter_mut() {
        for (name, properties) in items.iter_mut() {
            if properties.contains_key(INSULATION) {
                debug!("{name} has insulation");
                continue;
            }
            properties.insert(INSULATION, DEFAULT_INSULATION.to_owned());
            patched += 1;
        }
    }
    patched
}
