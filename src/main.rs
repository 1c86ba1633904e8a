use anyhow::Result;
use clap::{Parser, Subcommand};

mod build;

#[derive(Parser)]
#[command(name = "noxc", version, about = "Compiler for the nox menu-layout format")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile .nox file(s) into engine XML
    Build {
        /// Files or directories to compile (directories are walked for .nox files)
        paths: Vec<String>,

        /// Write outputs into this directory instead of next to the sources
        #[arg(long)]
        out_dir: Option<String>,
    },

    /// Parse .nox file(s) and report errors without writing output
    Check {
        /// Files or directories to check
        paths: Vec<String>,
    },

    /// Dump the parsed document tree of a .nox file as JSON
    Ast {
        /// Path to the .nox file
        file: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { paths, out_dir } => {
            build::handle_build(&paths, out_dir.as_deref(), cli.quiet)
        }
        Commands::Check { paths } => build::handle_check(&paths, cli.quiet),
        Commands::Ast { file, pretty } => build::handle_ast(&file, pretty),
    }
}
