//! The `build` subcommand
//!
//! Reads a project file listing declarations, comments and the indexes of
//! the modules this one links against, runs the full pipeline and writes
//! the resulting index.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use docgraph_core::{Database, Declaration, Location};

/// A module build description
#[derive(Debug, Deserialize)]
pub struct Project {
    /// Name of the module being documented
    pub module: String,
    /// Index files of dependency modules, in dependency order
    #[serde(default)]
    pub indexes: Vec<String>,
    /// Declarations in source order
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// Documentation comments in source order
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// One documentation comment with its source position
#[derive(Debug, Deserialize)]
pub struct Comment {
    pub text: String,
    pub file: String,
    #[serde(default = "one")]
    pub line: u32,
}

fn one() -> u32 {
    1
}

pub fn run(project_path: &Path, out: Option<&Path>, strict: bool) -> Result<()> {
    let file = File::open(project_path)
        .with_context(|| format!("cannot open project file {}", project_path.display()))?;
    let project: Project =
        serde_json::from_reader(BufReader::new(file)).context("cannot parse project file")?;

    let mut db = Database::new(&project.module);
    for index_path in &project.indexes {
        let resolved = resolve_relative(project_path, index_path);
        let file = File::open(&resolved)
            .with_context(|| format!("cannot open index {}", resolved.display()))?;
        db.load_index(BufReader::new(file))
            .with_context(|| format!("cannot load index {}", resolved.display()))?;
    }

    for declaration in &project.declarations {
        db.declare(declaration);
    }
    for comment in &project.comments {
        db.attach_comment(&comment.text, Location::new(&comment.file, comment.line, 1));
    }
    db.resolve_all();

    let diagnostics = db.take_diagnostics();
    for diagnostic in &diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    if strict && !diagnostics.is_empty() {
        bail!("{} warning(s) in strict mode", diagnostics.len());
    }

    let index = db.export_index();
    match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &index)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            serde_json::to_writer_pretty(stdout.lock(), &index)?;
            println!();
        }
    }
    Ok(())
}

/// Index paths in the project file are relative to the project file itself
fn resolve_relative(project_path: &Path, index_path: &str) -> std::path::PathBuf {
    let candidate = Path::new(index_path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    project_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(candidate)
}
