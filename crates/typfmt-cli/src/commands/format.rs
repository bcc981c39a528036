use std::io::{self, Read};
use std::path::{Path, PathBuf};

use colored::Colorize;
use typfmt_core::{Config, Formatter};

use super::{Outcome, format_source, plural};

/// Switches of the default command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub inplace: bool,
    pub check: bool,
    pub ast: bool,
    pub verbose: bool,
}

pub fn run(files: &[PathBuf], config: Config, options: Options) -> Result<(), String> {
    let formatter = Formatter::new(config);

    if files.is_empty() {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("cannot read stdin: {e}"))?;
        return run_stdin(&formatter, &source, options);
    }

    let mut changed = 0;
    let mut failed = 0;
    for path in files {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
        if options.ast {
            print!("{}", typfmt_syntax::parse(&source));
            continue;
        }

        let name = path.display().to_string();
        match format_source(&formatter, &source, &name) {
            Outcome::Failed => failed += 1,
            Outcome::Unchanged => {
                if options.verbose {
                    eprintln!("  {} {name}", "unchanged".dimmed());
                }
                if !options.check && !options.inplace {
                    print!("{source}");
                }
            }
            Outcome::Changed(formatted) => {
                changed += 1;
                if options.check {
                    println!("{name}");
                } else if options.inplace {
                    write_file(path, &formatted)?;
                    if options.verbose {
                        eprintln!("  {} {name}", "formatted".green());
                    }
                } else {
                    print!("{formatted}");
                }
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} file{} could not be formatted", plural(failed)));
    }
    if options.check && changed > 0 {
        return Err(format!("{changed} file{} would be reformatted", plural(changed)));
    }
    Ok(())
}

fn run_stdin(formatter: &Formatter, source: &str, options: Options) -> Result<(), String> {
    if options.ast {
        print!("{}", typfmt_syntax::parse(source));
        return Ok(());
    }
    match format_source(formatter, source, "<stdin>") {
        Outcome::Failed => Err("<stdin> could not be formatted".into()),
        Outcome::Unchanged => {
            if !options.check {
                print!("{source}");
            }
            Ok(())
        }
        Outcome::Changed(formatted) => {
            if options.check {
                println!("<stdin>");
                return Err("1 file would be reformatted".into());
            }
            print!("{formatted}");
            Ok(())
        }
    }
}

pub(super) fn write_file(path: &Path, text: &str) -> Result<(), String> {
    std::fs::write(path, text).map_err(|e| format!("cannot write '{}': {e}", path.display()))
}
