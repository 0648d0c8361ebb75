use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "brandcanvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a creative and print the compliance result as JSON.
    Check(CheckArgs),
    /// Export a creative to every format from pre-rendered stage captures.
    Export(ExportArgs),
    /// Write the failing demo creative.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input creative JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Studio config JSON (rules, export settings, viewport).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input creative JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory holding one stage capture per format, named `<FORMAT_KEY>.png`.
    #[arg(long)]
    frames: PathBuf,

    /// Output directory for the artifacts.
    #[arg(long)]
    out: PathBuf,

    /// Requested codec; PNG falls back to JPEG when over budget.
    #[arg(long, value_enum, default_value_t = CodecChoice::Png)]
    codec: CodecChoice,

    /// Byte budget in KiB, overriding the config.
    #[arg(long)]
    budget_kb: Option<usize>,

    /// Studio config JSON (rules, export settings, viewport).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output creative JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Png,
    Jpeg,
}

impl From<CodecChoice> for brandcanvas::Codec {
    fn from(c: CodecChoice) -> Self {
        match c {
            CodecChoice::Png => brandcanvas::Codec::Png,
            CodecChoice::Jpeg => brandcanvas::Codec::Jpeg,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Export(args) => cmd_export(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandcanvas=info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<brandcanvas::StudioConfig> {
    match path {
        Some(p) => brandcanvas::StudioConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(brandcanvas::StudioConfig::default()),
    }
}

fn open_studio(
    in_path: &Path,
    config: brandcanvas::StudioConfig,
) -> anyhow::Result<brandcanvas::Studio> {
    let creative = brandcanvas::Creative::from_json_file(in_path)
        .with_context(|| format!("load creative '{}'", in_path.display()))?;
    Ok(brandcanvas::Studio::from_creative(config, creative)?)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let studio = open_studio(&args.in_path, config)?;

    let result = studio.compliance();
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("serialize compliance result")?
    );

    Ok(if result.status == brandcanvas::Status::Fail {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<ExitCode> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(kb) = args.budget_kb {
        config.export.byte_budget = kb.saturating_mul(1024);
    }

    let mut surface = brandcanvas::RasterSurface::new(config.viewport);
    for key in brandcanvas::FormatKey::ALL {
        let path = args.frames.join(format!("{key}.png"));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read stage capture '{}'", path.display()))?;
        surface
            .insert_encoded_capture(key, &bytes)
            .with_context(|| format!("load stage capture '{}'", path.display()))?;
    }

    let studio = open_studio(&args.in_path, config)?;
    let mut sink = brandcanvas::DirArtifacts::new(&args.out);
    let report = studio.export_all(args.codec.into(), &mut surface, &mut sink)?;

    for line in report.summary_lines() {
        println!("{line}");
    }
    eprintln!("wrote {} artifacts to {}", sink.written().len(), args.out.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<ExitCode> {
    let studio = brandcanvas::Studio::default();
    studio.load_demo()?;
    let json = studio.snapshot().to_json_pretty()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json)
        .with_context(|| format!("write creative '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(ExitCode::SUCCESS)
}
