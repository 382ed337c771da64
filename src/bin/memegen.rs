use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansCondensed-Bold.ttf");

#[derive(Parser, Debug)]
#[command(name = "memegen", version, about = "Caption images and GIFs")]
struct Cli {
    /// Input image path (png, jpeg or gif), or `-` for stdin.
    #[arg(long)]
    img: String,

    /// Top caption.
    #[arg(long)]
    top: Option<String>,

    /// Bottom caption.
    #[arg(long)]
    btm: Option<String>,

    /// Shake the image.
    #[arg(long, default_value_t = false)]
    shake: bool,

    /// Add the trigger banner (implies --shake).
    #[arg(long, default_value_t = false)]
    trigger: bool,

    /// Reduce animations from composited frames (slower, serial).
    #[arg(long, default_value_t = false)]
    max_quality: bool,

    /// Bound on the longer output side, in px.
    #[arg(long, default_value_t = memegen::DEFAULT_MAX_DIMENSION)]
    max_size: u32,

    /// Font file to caption with instead of the bundled one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Decal image for --trigger instead of the stock banner.
    #[arg(long)]
    decal: Option<PathBuf>,

    /// Seed for the shake and trigger offsets.
    #[arg(long)]
    seed: Option<u64>,

    /// Override rayon worker threads (defaults to MEMEGEN_THREADS, then all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Output path; defaults to `memegen.<ext>` in the temp dir.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let blank = |t: &Option<String>| t.as_deref().is_none_or(|s| s.trim().is_empty());
    if blank(&cli.top) && blank(&cli.btm) && !cli.shake && !cli.trigger {
        anyhow::bail!("nothing to do: pass --top, --btm, --shake or --trigger");
    }

    let font = match &cli.font {
        Some(path) => memegen::FontAsset::from_path(path)?,
        None => memegen::FontAsset::from_bytes(BUNDLED_FONT.to_vec())?,
    };
    let ctx = match &cli.decal {
        Some(path) => memegen::RenderContext::with_decal(font, memegen::Decal::from_path(path)?),
        None => memegen::RenderContext::new(font)?,
    };

    let request = memegen::RenderRequest {
        top: cli.top.clone(),
        bottom: cli.btm.clone(),
        effect: memegen::Effect::from_flags(cli.shake, cli.trigger),
        quality: if cli.max_quality {
            memegen::Quality::Maximum
        } else {
            memegen::Quality::Standard
        },
        max_dimension: cli.max_size,
        seed: cli.seed,
    };
    let mut threading = memegen::RenderThreading::from_env();
    if cli.threads.is_some() {
        threading.threads = cli.threads;
    }

    let bytes = read_input(&cli.img)?;
    let decoded = memegen::decode(&bytes)?;
    tracing::debug!(format = ?decoded.format(), "decoded input");
    let rendered = memegen::render(&ctx, &request, decoded, &threading)?;
    let encoded = rendered.encode()?;

    let out = cli
        .out
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(format!("memegen.{}", rendered.extension())));
    write_output(&out, &encoded)?;
    println!("{}", out.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn read_input(img: &str) -> anyhow::Result<Vec<u8>> {
    if img == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("read image from stdin")?;
        return Ok(buf);
    }
    std::fs::read(img).with_context(|| format!("read image '{img}'"))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write output '{}'", path.display()))
}
