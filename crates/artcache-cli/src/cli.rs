use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "artcache",
    about = "Content-addressed cache for build artifacts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Cache directory (overrides the config file)
    #[arg(long, global = true, env = "ARTCACHE_DIR")]
    pub dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the fingerprint and cache key of an artifact
    Key(ArtifactArgs),
    /// Store an artifact file in the cache
    Put(ArtifactArgs),
    /// Look up the cached copy of an artifact
    Get(ArtifactArgs),
}

#[derive(Args)]
pub struct ArtifactArgs {
    /// Path of the artifact file
    pub path: PathBuf,

    /// Package fingerprint from the artifact's compiled spec
    #[arg(long)]
    pub fingerprint: Option<String>,

    /// Checksum as ALGORITHM=DIGEST (repeatable)
    #[arg(long = "checksum", value_parser = parse_checksum)]
    pub checksums: Vec<(String, String)>,
}

fn parse_checksum(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((alg, digest)) if !alg.is_empty() && !digest.is_empty() => {
            Ok((alg.to_string(), digest.to_string()))
        }
        _ => Err(format!("expected ALGORITHM=DIGEST, got `{s}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_put_with_checksums() {
        let cli = Cli::try_parse_from([
            "artcache",
            "--dir",
            "/tmp/cache",
            "put",
            "/tmp/build/foo-1.0.pkg",
            "--checksum",
            "sha256=abc123",
            "--checksum",
            "md5=ff",
        ])
        .unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/cache")));
        match cli.command {
            Command::Put(args) => {
                assert_eq!(args.path, PathBuf::from("/tmp/build/foo-1.0.pkg"));
                assert_eq!(
                    args.checksums,
                    vec![
                        ("sha256".to_string(), "abc123".to_string()),
                        ("md5".to_string(), "ff".to_string())
                    ]
                );
                assert!(args.fingerprint.is_none());
            }
            _ => panic!("expected put"),
        }
    }

    #[test]
    fn rejects_malformed_checksum() {
        assert!(parse_checksum("sha256").is_err());
        assert!(parse_checksum("=abc").is_err());
        assert!(parse_checksum("sha256=").is_err());
        assert_eq!(
            parse_checksum("sha256=a=b").unwrap(),
            ("sha256".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["artcache", "get", "x.pkg", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
