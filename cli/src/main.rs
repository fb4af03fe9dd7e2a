use std::{fs, process::exit};

mod args;
use args::{BundleCommand, CheckCommand, CliArguments, Command};
use clap::Parser;
use owo_colors::OwoColorize;

use minipack::bundler;
use minipack::error::BundleError;
use minipack::graph::ModuleGraph;
use minipack::module_resolver::{FileSystem, StandardFileSystem};

fn main() {
    env_logger::init();
    let cli_args = CliArguments::parse();

    match &cli_args.command {
        Command::Bundle(command) => bundle_command(command),
        Command::Check(command) => check_command(command),
    }
}

pub fn bundle_command(cli_args: &BundleCommand) {
    let filesystem = StandardFileSystem;

    let mut graph = ModuleGraph::build(&cli_args.common.entry, filesystem.clone())
        .unwrap_or_else(|e| report_and_exit(&e));

    let mut output_files = bundler::bundle(&mut graph).unwrap_or_else(|e| report_and_exit(&e));
    for file in &mut output_files {
        file.name = cli_args.name.clone();
    }

    for file in &output_files {
        let output_path = cli_args.out_dir.join(&file.name);
        filesystem
            .write_file(&output_path, &file.content)
            .unwrap_or_else(|e| report_and_exit(&e));
        println!("wrote {}", output_path.display());
    }
}

pub fn check_command(cli_args: &CheckCommand) {
    let filesystem = StandardFileSystem;

    let graph = ModuleGraph::build(&cli_args.common.entry, filesystem)
        .unwrap_or_else(|e| report_and_exit(&e));

    println!(
        "ok: {} modules reachable from '{}'",
        graph.modules.len(),
        graph.entry_module().path.display()
    );
}

fn report_and_exit(error: &BundleError) -> ! {
    // When the offending module is known, underline the faulty line.
    match error.file().and_then(|path| fs::read_to_string(path).ok()) {
        Some(source) => error.report(&source),
        None => eprintln!("{}: {}", "error".red().bold(), error),
    }
    exit(1);
}
