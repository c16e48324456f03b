use crate::config::load_config;
use crate::layout::layout_connections;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_layouts_at, write_output_png, write_output_svg};
use crate::topology::{StaticTraffic, Topology};
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wmr", version, about = "Network weathermap renderer")]
pub struct Args {
    /// Topology file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted.
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config file (theme, themeVariables, render, colors)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write computed link geometry as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Log level or filter directive, written to stderr
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = load_config(args.config.as_deref())?;
    let topology = read_topology(args.input.as_deref())?;
    let source = StaticTraffic::from_topology(&topology);
    let data = topology.resolve(&source, config.colors.as_ref())?;
    info!(
        title = %data.title,
        devices = data.devices.len(),
        connections = data.connections.len(),
        "rendering weathermap"
    );

    let layouts = layout_connections(&data);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &data, &layouts)?;
        info!(path = %path.display(), "wrote layout dump");
    }

    let svg = render_layouts_at(&data, &layouts, &config.theme, Utc::now());
    match resolve_format(args.output_format, args.output.as_deref()) {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))
}

fn read_topology(path: Option<&Path>) -> Result<Topology> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(Topology::load(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(Topology::parse(&buf)?)
}

fn resolve_format(explicit: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    if let Some(format) = explicit {
        return format;
    }
    let is_png = output
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if is_png {
        OutputFormat::Png
    } else {
        OutputFormat::Svg
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(
            resolve_format(None, Some(Path::new("map.PNG"))),
            OutputFormat::Png
        );
        assert_eq!(
            resolve_format(None, Some(Path::new("map.svg"))),
            OutputFormat::Svg
        );
        assert_eq!(resolve_format(None, None), OutputFormat::Svg);
        assert_eq!(
            resolve_format(Some(OutputFormat::Svg), Some(Path::new("map.png"))),
            OutputFormat::Svg
        );
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("out.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }

    #[test]
    fn args_parse_long_flags() {
        let args = Args::try_parse_from([
            "wmr",
            "-i",
            "topo.json5",
            "--outputFormat",
            "png",
            "-o",
            "out.png",
            "--log-level",
            "debug",
        ])
        .expect("args should parse");
        assert_eq!(args.output_format, Some(OutputFormat::Png));
        assert_eq!(args.log_level, "debug");
    }
}
