use std::{ffi::OsStr, path::PathBuf};

use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand, ValueHint};

/// The minipack bundler.
#[derive(Debug, Clone, Parser)]
#[clap(name = "minipack")]
pub struct CliArguments {
    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do.
#[derive(Debug, Clone, Subcommand)]
#[command()]
pub enum Command {
    /// Bundles an entry module and everything it imports into one artifact
    #[command(visible_alias = "b")]
    Bundle(BundleCommand),

    /// Resolves the module graph without writing any output
    #[command(visible_alias = "c")]
    Check(CheckCommand),
}

/// Bundles an entry module and everything it imports into one artifact
#[derive(Debug, Clone, Parser)]
pub struct BundleCommand {
    /// Shared arguments
    #[clap(flatten)]
    pub common: SharedArgs,

    /// Directory the bundle is written into
    #[clap(long, default_value = "build", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Name of the emitted file
    #[clap(long, default_value = "bundle.js")]
    pub name: String,
}

/// Resolves the module graph without writing any output
#[derive(Debug, Clone, Parser)]
pub struct CheckCommand {
    /// Shared arguments
    #[clap(flatten)]
    pub common: SharedArgs,
}

/// Common arguments of bundle and check.
#[derive(Debug, Clone, Args)]
pub struct SharedArgs {
    /// Path to the entry module
    #[clap(value_parser = make_entry_value_parser(), value_hint = ValueHint::FilePath)]
    pub entry: PathBuf,
}

/// The clap value parser used by `SharedArgs.entry`
fn make_entry_value_parser() -> impl TypedValueParser<Value = PathBuf> {
    clap::builder::OsStringValueParser::new().try_map(|value| {
        if value.is_empty() {
            return Err(clap::Error::new(clap::error::ErrorKind::InvalidValue));
        }
        let path = PathBuf::from(value);
        if path.extension() != Some(OsStr::new("js")) {
            let mut err = clap::Error::new(clap::error::ErrorKind::ValueValidation);
            err.insert(
                clap::error::ContextKind::InvalidValue,
                clap::error::ContextValue::String(
                    "Entry module must have .js extension".to_owned(),
                ),
            );
            return Err(err);
        }
        Ok(path)
    })
}
