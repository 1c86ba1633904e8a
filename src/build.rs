//! `noxc build` / `noxc check` / `noxc ast`: locate .nox sources, run the
//! compiler, and surface errors with their source positions unmodified.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use walkdir::WalkDir;

/// Collect .nox source files: file arguments as-is, directories walked
/// recursively in file-name order so runs are reproducible.
fn collect_sources(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for raw in paths {
        let path = Path::new(raw);
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|e| e == "nox")
                {
                    sources.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            sources.push(path.to_path_buf());
        } else {
            anyhow::bail!("no such file or directory: '{raw}'");
        }
    }
    if sources.is_empty() {
        anyhow::bail!("no .nox sources found");
    }
    Ok(sources)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", path.display(), e))
}

fn report_error(path: &Path, err: &nox_compile::CompileError) {
    // The error display carries line, column, and message; pass it through.
    eprintln!("{} {}", format!("{}:", path.display()).red().bold(), err);
}

/// Where the compiled markup for `source` lands.
fn output_path(source: &Path, out_dir: Option<&str>) -> PathBuf {
    let target = source.with_extension("xml");
    match out_dir {
        Some(dir) => Path::new(dir).join(target.file_name().unwrap_or_default()),
        None => target,
    }
}

pub fn handle_build(paths: &[String], out_dir: Option<&str>, quiet: bool) -> Result<()> {
    let sources = collect_sources(paths)?;
    let mut failures = 0;

    for source in &sources {
        let text = read_source(source)?;
        match nox_compile::compile(&text) {
            Ok(xml) => {
                let target = output_path(source, out_dir);
                if let Some(dir) = target.parent() {
                    if !dir.as_os_str().is_empty() {
                        std::fs::create_dir_all(dir).map_err(|e| {
                            anyhow::anyhow!("Failed to create '{}': {}", dir.display(), e)
                        })?;
                    }
                }
                std::fs::write(&target, xml).map_err(|e| {
                    anyhow::anyhow!("Failed to write '{}': {}", target.display(), e)
                })?;
                if !quiet {
                    println!(
                        "{} {} -> {}",
                        "compiled".green(),
                        source.display(),
                        target.display()
                    );
                }
            }
            Err(err) => {
                report_error(source, &err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed to compile");
    }
    Ok(())
}

pub fn handle_check(paths: &[String], quiet: bool) -> Result<()> {
    let sources = collect_sources(paths)?;
    let mut failures = 0;

    for source in &sources {
        let text = read_source(source)?;
        match nox_compile::parse(&text) {
            Ok(_) => {
                if !quiet {
                    println!("{} {}", "ok".green(), source.display());
                }
            }
            Err(err) => {
                report_error(source, &err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed to parse");
    }
    Ok(())
}

pub fn handle_ast(file: &str, pretty: bool) -> Result<()> {
    let path = Path::new(file);
    let text = read_source(path)?;
    match nox_compile::parse(&text) {
        Ok(doc) => {
            let json = if pretty {
                serde_json::to_string_pretty(&doc)?
            } else {
                serde_json::to_string(&doc)?
            };
            println!("{json}");
            Ok(())
        }
        Err(err) => {
            report_error(path, &err);
            anyhow::bail!("failed to parse '{}'", path.display());
        }
    }
}
