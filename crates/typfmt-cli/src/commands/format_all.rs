use std::path::{Path, PathBuf};

use colored::Colorize;
use typfmt_core::{Config, Formatter};

use super::format::write_file;
use super::{Outcome, format_source, plural};

pub fn run(dir: &Path, config: Config, check: bool) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(format!("'{}' is not a directory", dir.display()));
    }

    let mut files = Vec::new();
    collect_typ_files(dir, &mut files)
        .map_err(|e| format!("cannot read '{}': {e}", dir.display()))?;
    files.sort();

    let formatter = Formatter::new(config);
    let (mut changed, mut unchanged, mut failed) = (0, 0, 0);

    for path in &files {
        let name = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{name}': {e}"))?;
        match format_source(&formatter, &source, &name) {
            Outcome::Unchanged => unchanged += 1,
            Outcome::Failed => failed += 1,
            Outcome::Changed(formatted) => {
                changed += 1;
                if check {
                    println!("{name}");
                } else {
                    write_file(path, &formatted)?;
                }
            }
        }
    }

    let verb = if check { "would reformat" } else { "formatted" };
    eprintln!(
        "  {} {changed} file{}, {} {unchanged} unchanged, {} {failed} failed",
        verb.green().bold(),
        plural(changed),
        "·".dimmed(),
        "·".dimmed(),
    );

    if failed > 0 {
        return Err(format!("{failed} file{} could not be formatted", plural(failed)));
    }
    if check && changed > 0 {
        return Err(format!("{changed} file{} would be reformatted", plural(changed)));
    }
    Ok(())
}

/// Every `.typ` file below `dir`, skipping hidden directories.
fn collect_typ_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if path.is_dir() {
            if !hidden {
                collect_typ_files(&path, files)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "typ") {
            files.push(path);
        }
    }
    Ok(())
}
