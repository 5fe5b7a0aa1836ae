use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::{ColoredString, Colorize};
use folio_gallery::{
    ClearOutcome, Confirm, DeleteOutcome, DisplayContext, GalleryConfig, GalleryView, ImageStore,
    PathFile,
};
use folio_types::{human_size, ImageRecord};
use serde_json::json;
use tracing::{debug, warn};

use crate::cli::*;

const DEFAULT_CONFIG: &str = "folio.toml";

/// Reads a yes/no answer from stdin. The prompt goes to stderr.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        ask(prompt, &mut io::stdin().lock(), &mut io::stderr())
    }
}

fn ask(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> bool {
    let _ = write!(out, "{prompt} [y/N] ");
    let _ = out.flush();
    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn always(_: &str) -> bool {
    true
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(always)
    } else {
        Box::new(StdinConfirm)
    }
}

/// Output settings for one invocation.
struct Output {
    format: OutputFormat,
    ctx: DisplayContext,
}

impl Output {
    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn accent(&self, s: &str) -> ColoredString {
        if self.ctx.theme().is_dark() {
            s.bright_cyan()
        } else {
            s.blue()
        }
    }

    fn print_json(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let out = Output {
        format: cli.format,
        ctx: DisplayContext::from_config(&config.display),
    };
    let store = ImageStore::open(config)?;
    debug!(?store, "store ready");

    match cli.command {
        Command::Upload(args) => cmd_upload(&store, args, &out).await,
        Command::List(_) => cmd_list(&store, &out),
        Command::Show(args) => cmd_show(&store, args, &out),
        Command::Export(args) => cmd_export(&store, args, &out).await,
        Command::Remove(args) => cmd_remove(&store, args, &out),
        Command::Clear(args) => cmd_clear(&store, args, &out),
        Command::Usage(_) => cmd_usage(&store, &out),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<GalleryConfig> {
    let mut config = match &cli.config {
        Some(path) => GalleryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).is_file() => GalleryConfig::load(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("loading config {DEFAULT_CONFIG}"))?,
        None => GalleryConfig::default(),
    };
    if let Some(mb) = cli.max_size_mb {
        config.max_size_mb = mb;
    }
    if let Some(theme) = cli.theme {
        config.display.theme = theme;
    }
    Ok(config)
}

async fn cmd_upload(store: &ImageStore, args: UploadArgs, out: &Output) -> anyhow::Result<()> {
    let mut paths = args.paths.into_iter();
    let Some(first) = paths.next() else {
        return Ok(());
    };
    let ignored = paths.count();
    if ignored > 0 {
        warn!(ignored, "only the first file is uploaded");
    }

    let source = PathFile::open(&first).await.map_err(|e| {
        warn!(path = %first.display(), error = %e, "cannot open file");
        anyhow!("Failed to read file")
    })?;
    let mut uploader = store.uploader();
    let record = uploader
        .submit(&source)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    if out.json() {
        return out.print_json(&serde_json::to_value(&record)?);
    }
    println!("{} Image uploaded successfully!", "✓".green().bold());
    print_record(&record, out);
    println!("  {}", uploader.hint().dimmed());
    Ok(())
}

fn cmd_list(store: &ImageStore, out: &Output) -> anyhow::Result<()> {
    let gallery = store.gallery()?;
    let view = gallery.view();
    if out.json() {
        let items = match &view {
            GalleryView::Empty => Vec::new(),
            GalleryView::Grid(items) => items.clone(),
        };
        return out.print_json(&serde_json::to_value(items)?);
    }
    println!("{}", view.header().bold());
    if let GalleryView::Grid(items) = view {
        for item in items {
            println!(
                "  {}  {}  {}  {}",
                out.accent(item.id.as_str()),
                item.name,
                item.size_label.dimmed(),
                item.uploaded_label.dimmed(),
            );
        }
    }
    Ok(())
}

fn cmd_show(store: &ImageStore, args: ShowArgs, out: &Output) -> anyhow::Result<()> {
    let mut gallery = store.gallery()?;
    if gallery.select(&args.id).is_none() {
        bail!("no image with id {}", args.id);
    }
    let mut detail = gallery
        .detail(&args.id)
        .ok_or_else(|| anyhow!("no image with id {}", args.id))?;
    if !args.data {
        detail.data.clear();
    }
    if out.json() {
        return out.print_json(&serde_json::to_value(&detail)?);
    }
    println!("{}", detail.name.bold());
    println!("  File Name: {}", detail.name);
    println!("  File Type: {}", detail.mime_type);
    println!("  File Size: {}", detail.size_label);
    println!("  Image ID:  {}", out.accent(detail.id.as_str()));
    println!("  Uploaded:  {}", detail.uploaded_label);
    if args.data {
        println!("\n{}", detail.data);
    }
    Ok(())
}

async fn cmd_export(store: &ImageStore, args: ExportArgs, out: &Output) -> anyhow::Result<()> {
    let uri = store.export(&args.id)?;
    tokio::fs::write(&args.out, uri.bytes())
        .await
        .with_context(|| format!("writing {}", args.out.display()))?;
    if out.json() {
        return out.print_json(&json!({
            "id": args.id,
            "path": args.out.display().to_string(),
            "mime_type": uri.mime_type(),
            "bytes": uri.bytes().len(),
        }));
    }
    println!(
        "{} Wrote {} ({}) to {}",
        "✓".green().bold(),
        human_size(uri.bytes().len() as u64),
        uri.mime_type(),
        args.out.display().to_string().bold(),
    );
    Ok(())
}

fn cmd_remove(store: &ImageStore, args: RemoveArgs, out: &Output) -> anyhow::Result<()> {
    let mut gallery = store.gallery()?;
    let outcome = gallery.delete(&args.id, confirmer(args.yes).as_ref())?;
    if out.json() {
        return out.print_json(&json!({
            "id": args.id,
            "outcome": format!("{outcome:?}").to_lowercase(),
        }));
    }
    match outcome {
        DeleteOutcome::Removed => println!("{} Deleted {}", "✓".green().bold(), out.accent(&args.id)),
        DeleteOutcome::NotFound => println!("No image with id {}", args.id.yellow()),
        DeleteOutcome::Cancelled => println!("Cancelled."),
        DeleteOutcome::Disabled => println!("{}", "Deletion is disabled.".yellow()),
    }
    Ok(())
}

fn cmd_clear(store: &ImageStore, args: ClearArgs, out: &Output) -> anyhow::Result<()> {
    let mut gallery = store.gallery()?;
    let before = gallery.len();
    match gallery.clear_all(confirmer(args.yes).as_ref()) {
        ClearOutcome::Failed => bail!("Failed to clear images"),
        ClearOutcome::Cancelled if out.json() => {
            out.print_json(&json!({ "cleared": false, "removed": 0 }))
        }
        ClearOutcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        ClearOutcome::Cleared if out.json() => {
            out.print_json(&json!({ "cleared": true, "removed": before }))
        }
        ClearOutcome::Cleared => {
            println!("{} Cleared {} image(s)", "✓".green().bold(), before);
            Ok(())
        }
    }
}

fn cmd_usage(store: &ImageStore, out: &Output) -> anyhow::Result<()> {
    let usage = store.usage()?;
    let images = store.collection().len();
    if out.json() {
        return out.print_json(&json!({
            "images": images,
            "used_bytes": usage.used_bytes,
            "capacity": usage.capacity,
            "remaining": usage.remaining(),
            "entries": usage.entries,
        }));
    }
    println!("{} image(s) stored", images.to_string().bold());
    match usage.capacity {
        Some(cap) => println!(
            "  {} used of {} ({} free)",
            human_size(usage.used_bytes),
            human_size(cap),
            human_size(usage.remaining().unwrap_or(0)),
        ),
        None => println!("  {} used (unbounded)", human_size(usage.used_bytes)),
    }
    Ok(())
}

fn print_record(record: &ImageRecord, out: &Output) {
    println!("  Name: {}", record.name.bold());
    println!("  Type: {}", record.mime_type);
    println!("  Size: {}", record.size_label());
    println!("  ID:   {}", out.accent(record.id.as_str()));
}
