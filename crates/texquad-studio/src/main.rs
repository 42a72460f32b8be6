use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use texquad_engine::logging::{init_logging, LoggingConfig};
use texquad_engine::shader::{EmitConfig, GlslVersion, Precision, Program, ShaderLibrary, ShaderSources, Target};

/// Renders the textured quad stages for every configured target.
#[derive(Debug, Parser)]
#[command(name = "texquad-studio", version)]
struct Args {
    /// Directory the variant files are written into.
    #[arg(long, default_value = "shaders")]
    out: PathBuf,

    /// Print a single target (e.g. `glsl120`, `glsl300es`, `wgsl`) to stdout
    /// instead of writing files.
    #[arg(long, value_parser = parse_target, conflicts_with = "select")]
    target: Option<Target>,

    /// Print the GLSL variant picked for a detected `#version` (e.g. "330 core").
    #[arg(long, value_parser = parse_version)]
    select: Option<GlslVersion>,

    /// Fragment float precision on ES targets.
    #[arg(long, value_parser = parse_precision, default_value = "mediump")]
    precision: Precision,

    /// Log filter in `env_logger` syntax; falls back to `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

fn parse_target(s: &str) -> Result<Target, String> {
    Target::from_tag(s).ok_or_else(|| format!("unknown target `{s}`"))
}

fn parse_version(s: &str) -> Result<GlslVersion, String> {
    GlslVersion::parse(s).map_err(|e| e.to_string())
}

fn parse_precision(s: &str) -> Result<Precision, String> {
    Precision::parse(s).ok_or_else(|| format!("unknown precision `{s}` (lowp, mediump, highp)"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let program = Program::textured_quad();
    let mut config = EmitConfig { precision: args.precision, ..EmitConfig::default() };
    if let Some(target) = args.target {
        config.targets = vec![target];
    }
    let library = ShaderLibrary::build(&program, &config);

    if let Some(detected) = args.select {
        let sources = library
            .select(detected)
            .with_context(|| format!("no shader variant compatible with GLSL {detected}"))?;
        print_sources(sources);
        return Ok(());
    }

    if let Some(target) = args.target {
        let sources = library.get(target).with_context(|| format!("target {target} was not rendered"))?;
        print_sources(sources);
        return Ok(());
    }

    fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;
    for sources in library.variants() {
        for (name, contents) in sources.files() {
            let path = args.out.join(&name);
            fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_sources(sources: &ShaderSources) {
    for (name, contents) in sources.files() {
        println!("// {name}");
        println!("{contents}");
    }
}
