//! Application startup: resolve directories and run the unpack pass
//!
//! ```ignore
//! mod bundle;
//!
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     unpack: resbundle::UnpackArgs,
//! }
//!
//! fn main() {
//!     let cli = Cli::parse();
//!     let dirs = resbundle::startup::init(
//!         resbundle::AppDirConfig::builder("myapp"),
//!         &cli.unpack,
//!         resbundle::Unpacker::new().archive(bundle::resource_archive()),
//!     );
//!     let settings = dirs.config_file("settings.toml");
//! }
//! ```

use crate::config::{AppDirConfig, AppDirConfigBuilder, UnpackArgs};
use crate::unpack::{UnpackOutcome, Unpacker};
use crate::utils::error::Result;
use tracing::error;

/// Parse the directive, resolve the directories and run the unpack pass.
///
/// The directive is checked first, so a malformed `--unpack` never reaches
/// the filesystem.
pub fn try_init(
    builder: AppDirConfigBuilder,
    args: &UnpackArgs,
    mut unpacker: Unpacker<'_>,
) -> Result<(AppDirConfig, UnpackOutcome)> {
    let directive = args.directive()?;
    let dirs = builder.with_args(args).build()?;
    let outcome = unpacker.run(&dirs, directive)?;
    Ok((dirs, outcome))
}

/// Like [`try_init`], but turns failures and `--unpack only` into process
/// exits: status 1 with a diagnostic on error, status 0 after
/// `Done unpacking` for `only`.
pub fn init(builder: AppDirConfigBuilder, args: &UnpackArgs, unpacker: Unpacker<'_>) -> AppDirConfig {
    match try_init(builder, args, unpacker) {
        Ok((_, outcome)) if outcome.should_exit() => {
            println!("Done unpacking");
            std::process::exit(0);
        }
        Ok((dirs, _)) => dirs,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
