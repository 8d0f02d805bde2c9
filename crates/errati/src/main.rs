//! Errati CLI: build a registry from a dictionary and dump it
use anyhow::{Context, Result};
use clap::Parser;
use errati::{AliasSpec, Errati, FieldConfig, Reflow, SetupConfig, SetupOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "errati")]
#[command(version, about = "Build error types from a dictionary and print the registry")]
struct Cli {
    /// Setup config file (YAML, or JSON by extension)
    #[arg(short, long)]
    config: Option<String>,

    /// Bundled dictionary to parse (http-short, http-full, short, full)
    #[arg(short, long)]
    dictionary: Option<String>,

    /// Alias naming transform (camelcase, underscore, nospace)
    #[arg(short, long)]
    reflow: Option<String>,

    /// Alias field, optionally with a prefix: `code=code_`
    #[arg(short, long = "field", value_name = "FIELD[=PREFIX]")]
    fields: Vec<String>,

    /// Indentation used by the dump
    #[arg(long)]
    indent: Option<String>,

    /// Only count aliases starting with this prefix
    #[arg(long)]
    prefix: Option<String>,

    /// List bundled dictionaries and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for name in errati_dictionaries::names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut options = match &cli.config {
        Some(path) => SetupConfig::load(path)
            .and_then(SetupConfig::into_options)
            .with_context(|| format!("loading {}", path))?,
        None => SetupOptions::new(),
    };

    if let Some(name) = &cli.dictionary {
        options = options.bundled(name.as_str());
    }
    if let Some(reflow) = &cli.reflow {
        options = options.reflow(Reflow::named(reflow));
    }
    if !cli.fields.is_empty() {
        options.fields = field_config(options.fields, &cli.fields);
    }
    debug!("Setup options: {:?}", options);

    let mut errati = Errati::new();
    let registry = errati.setup(options)?;

    print!("{}", registry.dump(cli.indent.as_deref()));
    println!("{} aliases", registry.count(cli.prefix.as_deref()));
    Ok(())
}

/// Replace the alias descriptors with the ones given on the command line
fn field_config(base: FieldConfig, specs: &[String]) -> FieldConfig {
    specs.iter().fold(
        FieldConfig {
            aliases: Vec::new(),
            ..base
        },
        |config, spec| match spec.split_once('=') {
            Some((field, prefix)) => config.alias(field, AliasSpec::Prefix(prefix.to_string())),
            None => config.alias(spec.as_str(), true),
        },
    )
}
