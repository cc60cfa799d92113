//! Command-line interface for ddms

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use ddms::components::{Resource, ResourceBuilder};
#[cfg(feature = "cli")]
use ddms::output::IndexLevel;
#[cfg(feature = "cli")]
use ddms::validators::{Builder, Component};
#[cfg(feature = "cli")]
use ddms::{Config, NamespaceKind, VersionContext};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "ddms")]
#[command(author, version, about = "DDMS metadata validation and conversion tool", long_about = None)]
struct Cli {
    /// JSON configuration file (prefixes, output options, parse limits)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a DDMS record and list its warnings
    Validate {
        /// Path to the DDMS record
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Render a DDMS record as XML, HTML or text
    Render {
        /// Path to the DDMS record
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: RenderFormat,

        /// Numbering of repeated entries in HTML and text output
        #[arg(long, value_enum)]
        index_level: Option<IndexArg>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-validate a DDMS record under another version
    Convert {
        /// Path to the DDMS record
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target DDMS version, e.g. 4.1
        #[arg(short, long)]
        to: String,

        /// Write the converted record as a JSON builder snapshot instead of XML
        #[arg(long)]
        json: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the supported DDMS versions and their namespaces
    Versions,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum RenderFormat {
    Xml,
    Html,
    Text,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexArg {
    Never,
    WhenMultiple,
    Always,
}

#[cfg(feature = "cli")]
impl From<IndexArg> for IndexLevel {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Never => IndexLevel::Never,
            IndexArg::WhenMultiple => IndexLevel::WhenMultiple,
            IndexArg::Always => IndexLevel::Always,
        }
    }
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Validate { file } => cmd_validate(&config, file),
        Commands::Render {
            file,
            format,
            index_level,
            output,
        } => cmd_render(config, file, format, index_level, output),
        Commands::Convert {
            file,
            to,
            json,
            output,
        } => cmd_convert(&config, file, to, json, output),
        Commands::Versions => cmd_versions(),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
type CliResult = Result<(), Box<dyn std::error::Error>>;

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::from_json_str(&fs::read_to_string(path)?)?),
        None => Ok(Config::default()),
    }
}

#[cfg(feature = "cli")]
fn load(config: &Config, file: &Path) -> Result<Resource, Box<dyn std::error::Error>> {
    let xml = fs::read_to_string(file)?;
    Ok(Resource::from_xml_with(&xml, config)?)
}

#[cfg(feature = "cli")]
fn write_output(output: Option<PathBuf>, content: &str) -> CliResult {
    match output {
        Some(path) => fs::write(path, content)?,
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_validate(config: &Config, file: PathBuf) -> CliResult {
    let resource = match load(config, &file) {
        Ok(resource) => resource,
        Err(e) => {
            println!("✗ Document is invalid");
            println!();
            println!("Errors:");
            println!("  - {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Document is valid DDMS {}", resource.version());
    if !resource.warnings().is_empty() {
        println!();
        println!("Warnings:");
        for warning in resource.warnings() {
            println!("  - {} ({})", warning.text, warning.locator);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_render(
    mut config: Config,
    file: PathBuf,
    format: RenderFormat,
    index_level: Option<IndexArg>,
    output: Option<PathBuf>,
) -> CliResult {
    if let Some(level) = index_level {
        config = config.with_index_level(level.into());
    }
    let resource = load(&config, &file)?;
    let rendered = match format {
        RenderFormat::Xml => resource.to_xml_with(&config),
        RenderFormat::Html => resource.to_html_with(&config),
        RenderFormat::Text => resource.to_text_with(&config),
    };
    write_output(output, rendered.trim_end())
}

#[cfg(feature = "cli")]
fn cmd_convert(config: &Config, file: PathBuf, to: String, json: bool, output: Option<PathBuf>) -> CliResult {
    let target = VersionContext::resolve(&to)?;
    let resource = load(config, &file)?;
    let converted = ResourceBuilder::from(&resource)
        .commit(target)?
        .ok_or("the record has no content to convert")?;

    if json {
        let builder = ResourceBuilder::from(&converted);
        return write_output(output, &ddms::validators::snapshot(&builder)?);
    }
    write_output(output, &converted.to_xml_with(config))
}

#[cfg(feature = "cli")]
fn cmd_versions() -> CliResult {
    for ctx in VersionContext::catalog() {
        println!("DDMS {}", ctx.version());
        for kind in [NamespaceKind::Ddms, NamespaceKind::Ism, NamespaceKind::Ntk, NamespaceKind::Gml] {
            if let Some(uri) = ctx.namespace(kind) {
                println!("  {:<5} {}", kind.default_prefix(), uri);
            }
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
