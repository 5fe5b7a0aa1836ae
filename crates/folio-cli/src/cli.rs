use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_gallery::Theme;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: local image store for a portfolio site",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the upload size ceiling in megabytes
    #[arg(long, global = true)]
    pub max_size_mb: Option<u64>,

    /// Override the configured theme (light or dark)
    #[arg(long, global = true)]
    pub theme: Option<Theme>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store an image (only the first path is processed)
    Upload(UploadArgs),
    /// List stored images
    List(ListArgs),
    /// Show one image's details
    Show(ShowArgs),
    /// Write a stored image back to disk
    Export(ExportArgs),
    /// Delete one image
    Remove(RemoveArgs),
    /// Delete every image
    Clear(ClearArgs),
    /// Show storage usage
    Usage(UsageArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
    /// Also print the base64 data URI
    #[arg(long)]
    pub data: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    pub id: String,
    pub out: PathBuf,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct UsageArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_upload() {
        let cli = Cli::try_parse_from(["folio", "upload", "a.png", "b.jpg"]).unwrap();
        if let Command::Upload(args) = cli.command {
            assert_eq!(args.paths, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn upload_requires_a_path() {
        assert!(Cli::try_parse_from(["folio", "upload"]).is_err());
    }

    #[test]
    fn parse_list() {
        let cli = Cli::try_parse_from(["folio", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List(_)));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_show_with_data() {
        let cli = Cli::try_parse_from(["folio", "show", "img_1_abc", "--data"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.id, "img_1_abc");
            assert!(args.data);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_export() {
        let cli = Cli::try_parse_from(["folio", "export", "img_1_abc", "out.png"]).unwrap();
        if let Command::Export(args) = cli.command {
            assert_eq!(args.out, PathBuf::from("out.png"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_remove_yes() {
        let cli = Cli::try_parse_from(["folio", "remove", "img_1_abc", "-y"]).unwrap();
        if let Command::Remove(args) = cli.command {
            assert!(args.yes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_clear() {
        let cli = Cli::try_parse_from(["folio", "clear"]).unwrap();
        if let Command::Clear(args) = cli.command {
            assert!(!args.yes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "folio", "usage", "--format", "json", "--theme", "dark", "--max-size-mb", "2", "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Usage(_)));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.theme, Some(Theme::Dark));
        assert_eq!(cli.max_size_mb, Some(2));
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(Cli::try_parse_from(["folio", "list", "--theme", "sepia"]).is_err());
    }
}
