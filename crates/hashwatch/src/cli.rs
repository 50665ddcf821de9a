use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hashwatch::Overrides;

#[derive(Clone, Debug, Parser)]
#[command(name = "hashwatch", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Configuration file (default: ./hashwatch.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Content store directory.
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Endpoint to poll.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Stay in the current directory instead of the executable's.
    #[arg(long, global = true)]
    pub no_anchor: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "r", name = "run", about = "Poll the endpoint for a number of passes")]
    Run(RunArg),
    #[command(name = "fix", about = "Rename stored items whose extension no longer matches detection")]
    Fix(FixArg),
    #[command(alias = "cfg", name = "config", about = "Print the effective configuration")]
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct RunArg {
    /// Number of download attempts to make.
    pub passes: u64,

    /// Seconds between passes; 0 disables the pause.
    #[arg(long)]
    pub delay: Option<u64>,

    /// Attempts per pass before counting a failure.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Count every collision as a repeat without reading the stored item.
    #[arg(long)]
    pub no_verify: bool,

    /// Print the final summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, Args)]
pub struct FixArg {
    /// Report renames without performing them.
    #[arg(long)]
    pub dry_run: bool,
}

impl App {
    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            endpoint: self.endpoint.clone(),
            cache_dir: self.cache.clone(),
            ..Overrides::default()
        };
        if let Commands::Run(arg) = &self.cmd {
            overrides.delay_secs = arg.delay;
            overrides.max_attempts = arg.attempts;
            overrides.verify_collisions = arg.no_verify.then_some(false);
        }
        overrides
    }

    /// Make user-supplied paths absolute so they survive anchoring.
    pub fn absolutize(&mut self) -> std::io::Result<()> {
        if let Some(path) = &self.config {
            self.config = Some(std::path::absolute(path)?);
        }
        if let Some(path) = &self.cache {
            self.cache = Some(std::path::absolute(path)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run() {
        let app = App::try_parse_from(["hashwatch", "run", "100", "--delay", "0", "--no-verify"]).unwrap();
        let Commands::Run(arg) = &app.cmd else {
            panic!("expected run");
        };
        assert_eq!(arg.passes, 100);

        let overrides = app.overrides();
        assert_eq!(overrides.delay_secs, Some(0));
        assert_eq!(overrides.max_attempts, None);
        assert_eq!(overrides.verify_collisions, Some(false));
    }

    #[test]
    fn verify_left_to_config_by_default() {
        let app = App::try_parse_from(["hashwatch", "run", "3"]).unwrap();
        assert_eq!(app.overrides().verify_collisions, None);
    }

    #[test]
    fn parse_fix_with_global_cache() {
        let app = App::try_parse_from(["hashwatch", "fix", "--dry-run", "--cache", "store"]).unwrap();
        assert!(matches!(app.cmd, Commands::Fix(FixArg { dry_run: true })));
        assert_eq!(app.overrides().cache_dir, Some(PathBuf::from("store")));
        assert_eq!(app.overrides().delay_secs, None);
    }

    #[test]
    fn passes_required() {
        assert!(App::try_parse_from(["hashwatch", "run"]).is_err());
    }

    #[test]
    fn absolutize_relative_paths() {
        let mut app = App::try_parse_from(["hashwatch", "--cache", "cache", "config"]).unwrap();
        app.absolutize().unwrap();
        assert!(app.cache.unwrap().is_absolute());
    }
}
