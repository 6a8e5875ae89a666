use anyhow::{Context, Result, bail};
use cellcast_export::{ExportConfig, Exporter, OutputFormat};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cellcast", version, about = "Export annotated workbooks to config files")]
struct Cli {
    /// Input workbooks, separated by `,` `;` `|` or whitespace. May be repeated.
    #[arg(short = 'p', long = "path")]
    paths: Vec<String>,

    /// Output folder.
    #[arg(short = 'f', long)]
    folder: Option<PathBuf>,

    /// Output format: json, xml, lua or ycl.
    #[arg(short = 'e', long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Sign tokens to export, e.g. `client` or `client/server`.
    #[arg(short = 's', long)]
    sign: Option<String>,

    /// Suffix appended to every root name.
    #[arg(short = 't', long)]
    suffix: Option<String>,

    /// Write a schema manifest to this path.
    #[arg(short = 'c', long)]
    manifest: Option<PathBuf>,

    /// YAML file with export settings; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    raw.parse().map_err(|e: cellcast_export::ExportError| e.to_string())
}

impl Cli {
    /// File settings first, then flags on top.
    fn export_config(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_yaml_file(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?,
            None => ExportConfig::default(),
        };
        if !self.paths.is_empty() {
            config.inputs = self
                .paths
                .iter()
                .flat_map(|raw| ExportConfig::split_inputs(raw))
                .collect();
        }
        if let Some(folder) = &self.folder {
            config.folder = folder.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.sign.is_some() {
            config.sign = self.sign.clone();
        }
        if self.suffix.is_some() {
            config.suffix = self.suffix.clone();
        }
        if self.manifest.is_some() {
            config.manifest = self.manifest.clone();
        }
        if config.inputs.is_empty() {
            bail!("no input workbooks; pass -p or set `inputs` in --config");
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.export_config()?;
    let inputs = config.inputs.len();
    let summary = Exporter::new(config).run().context("export failed")?;
    tracing::info!(
        inputs,
        written = summary.written.len(),
        manifest = summary.manifest.is_some(),
        "export finished"
    );
    Ok(())
}
