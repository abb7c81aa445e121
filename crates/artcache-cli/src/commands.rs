use anyhow::{bail, Context};
use artcache::{ArtifactCache, CacheConfig, CompileSpec, Package, PackageArtifact};
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let cache = ArtifactCache::from_config(&config);
    match cli.command {
        Command::Key(args) => cmd_key(&cache, &args, &cli.format),
        Command::Put(args) => cmd_put(&cache, &args, &cli.format),
        Command::Get(args) => cmd_get(&cache, &args, &cli.format),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CacheConfig> {
    let mut config = match &cli.config {
        Some(path) => CacheConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CacheConfig::default(),
    };
    if let Some(dir) = &cli.dir {
        config.dir = dir.clone();
    }
    tracing::debug!(dir = %config.dir.display(), "cache configured");
    Ok(config)
}

fn build_artifact(args: &ArtifactArgs) -> PackageArtifact {
    let mut artifact = PackageArtifact::new(&args.path);
    if let Some(fingerprint) = &args.fingerprint {
        artifact = artifact.with_compile_spec(CompileSpec::for_package(Package::new(fingerprint)));
    }
    for (alg, digest) in &args.checksums {
        artifact.checksums.insert(alg, digest);
    }
    artifact
}

#[derive(Serialize)]
struct Report {
    fingerprint: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
}

fn print_json(report: &Report) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn cmd_key(cache: &ArtifactCache, args: &ArtifactArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let artifact = build_artifact(args);
    let report = Report {
        fingerprint: cache.fingerprint(&artifact),
        key: cache.key(&artifact).to_hex(),
        path: None,
        bytes: None,
    };
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!("Fingerprint: {}", report.fingerprint.cyan());
            println!("Key: {}", report.key.yellow());
            Ok(())
        }
    }
}

fn cmd_put(cache: &ArtifactCache, args: &ArtifactArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let artifact = build_artifact(args);
    let (key, bytes) = cache
        .put(&artifact)
        .with_context(|| format!("caching {}", args.path.display()))?;
    let report = Report {
        fingerprint: cache.fingerprint(&artifact),
        key: key.to_hex(),
        path: Some(cache.dir().join(key.to_hex()).display().to_string()),
        bytes: Some(bytes),
    };
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!("{} Cached {} ({} bytes)", "✓".green().bold(), args.path.display(), bytes);
            println!("  Key: {}", key.short_hex().yellow());
            Ok(())
        }
    }
}

fn cmd_get(cache: &ArtifactCache, args: &ArtifactArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let artifact = build_artifact(args);
    let key = cache.key(&artifact);
    let path = match cache.get(&artifact) {
        Ok(path) => path,
        Err(e) if e.is_not_found() => {
            if let OutputFormat::Text = format {
                println!("{} {} not cached", "✗".red().bold(), args.path.display());
            }
            bail!("cache miss for key {}", key.short_hex());
        }
        Err(e) => return Err(e).context("looking up artifact"),
    };
    let report = Report {
        fingerprint: cache.fingerprint(&artifact),
        key: key.to_hex(),
        path: Some(path.display().to_string()),
        bytes: None,
    };
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
