use monkey_common::error::{report_errors, ErrorS};
use monkey_interpreter::Interpreter;

use anyhow::{Context, Result};
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(about, author, disable_help_subcommand = true, propagate_version = true, version)]
pub enum Cmd {
    /// Run a program and print the value it evaluates to.
    Run { path: PathBuf },
    /// Print a program in canonical form.
    Fmt { path: PathBuf },
}

impl Cmd {
    pub fn run(&self) -> Result<ExitCode> {
        match self {
            Cmd::Run { path } => run(path),
            Cmd::Fmt { path } => fmt(path),
        }
    }
}

fn run(path: &Path) -> Result<ExitCode> {
    let source = read(path)?;
    match Interpreter::default().eval(&source) {
        Ok(object) => {
            println!("{object}");
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => report(path, &source, &errors),
    }
}

fn fmt(path: &Path) -> Result<ExitCode> {
    let source = read(path)?;
    match monkey_syntax::parse(&source) {
        Ok(program) => {
            println!("{program}");
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => report(path, &source, &errors),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("could not read file: {}", path.display()))
}

fn report(path: &Path, source: &str, errors: &[ErrorS]) -> Result<ExitCode> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    report_errors(&mut stderr, &path.display().to_string(), source, errors)
        .context("could not write diagnostics")?;
    Ok(ExitCode::FAILURE)
}
