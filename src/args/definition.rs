//! Command-line argument definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// playlisting - keep Play Store listings in line with local words and images
#[derive(Parser, Debug)]
#[command(name = "playlisting")]
#[command(version)]
#[command(
    about = "Keep Play Store listing text and images in line with local words and images",
    long_about = None
)]
pub struct Args {
    /// Settings file (default: ~/.config/playlisting/settings.conf)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Google Play Developer service-account credentials (JSON key)
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Directory containing the meaning-ordered words files
    #[arg(long, global = true)]
    pub words: Option<PathBuf>,

    /// Images directory (one subdirectory per image category)
    #[arg(long, global = true)]
    pub images: Option<PathBuf>,

    /// Title substitution file (`original: alternate` lines)
    #[arg(long, global = true)]
    pub substitutions: Option<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show details, tracks, images and listings of a package
    Info {
        /// Package name (e.g. com.example.game)
        package: String,

        /// Only show these listing locales (comma-separated)
        #[arg(long, value_delimiter = ',')]
        locales: Vec<String>,
    },
    /// Update listing text and images of a package
    Update(UpdateArgs),
    /// List store distribution locales and whether local words cover them
    Locales {
        /// Look up one locale by display name or code instead of printing the table
        query: Option<String>,

        /// Base locale excluded from the translatable report
        #[arg(long, default_value = "en-US")]
        base: String,
    },
}

/// Flags of the `update` command.
#[derive(clap::Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct UpdateArgs {
    /// Package name (e.g. com.example.game)
    pub package: String,

    /// Only update these listing locales (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Only update text
    #[arg(long, conflicts_with = "images_only")]
    pub text_only: bool,

    /// Only update images
    #[arg(long)]
    pub images_only: bool,

    /// Show what would change without writing or committing
    #[arg(long)]
    pub dry_run: bool,

    /// Locales processed at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print the base listing before the summary
    #[arg(long)]
    pub show_base: bool,
}

impl UpdateArgs {
    /// Whether listing text is updated.
    #[must_use]
    pub const fn do_text(&self) -> bool {
        !self.images_only
    }

    /// Whether images are updated.
    #[must_use]
    pub const fn do_images(&self) -> bool {
        !self.text_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: `update` parses locales, work kinds and global flags after the subcommand.
    ///
    /// Inputs:
    /// - `playlisting update com.x --locales de-DE,fr-FR --text-only --words w -v`.
    ///
    /// Output:
    /// - Two locales, text only, words path set, verbose.
    fn parse_update_command() {
        let args = Args::try_parse_from([
            "playlisting",
            "update",
            "com.x",
            "--locales",
            "de-DE,fr-FR",
            "--text-only",
            "--words",
            "w",
            "-v",
        ])
        .expect("parse");
        assert!(args.verbose);
        assert_eq!(args.words, Some(PathBuf::from("w")));
        let Command::Update(update) = args.command else {
            panic!("expected update");
        };
        assert_eq!(update.package, "com.x");
        assert_eq!(update.locales, vec!["de-DE".to_string(), "fr-FR".to_string()]);
        assert!(update.do_text());
        assert!(!update.do_images());
    }

    #[test]
    /// What: `locales` takes an optional lookup query and a base locale.
    ///
    /// Inputs:
    /// - `playlisting locales German --base de-DE`.
    ///
    /// Output:
    /// - Query `German`, base `de-DE`.
    fn parse_locales_command() {
        let args = Args::try_parse_from(["playlisting", "locales", "German", "--base", "de-DE"])
            .expect("parse");
        let Command::Locales { query, base } = args.command else {
            panic!("expected locales");
        };
        assert_eq!(query.as_deref(), Some("German"));
        assert_eq!(base, "de-DE");
    }

    #[test]
    /// What: Text-only and images-only cannot be combined.
    ///
    /// Inputs:
    /// - Both flags on `update`.
    ///
    /// Output:
    /// - Parse error.
    fn parse_rejects_conflicting_work_kinds() {
        let res = Args::try_parse_from([
            "playlisting",
            "update",
            "com.x",
            "--text-only",
            "--images-only",
        ]);
        assert!(res.is_err());
    }
}
