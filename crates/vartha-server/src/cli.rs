use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "vartha-server")]
#[command(author, version, about = "Telugu news text classification API", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", env = "VARTHA_CONFIG")]
    pub config: PathBuf,

    /// Listen address (overrides config)
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port (overrides config)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Artifact directory (overrides config)
    #[arg(short, long, env = "VARTHA_MODELS_DIR")]
    pub models_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "vartha-server",
            "--config",
            "/etc/vartha.yaml",
            "-P",
            "9000",
            "--models-dir",
            "/srv/models",
            "-v",
        ]);
        assert_eq!(cli.config, PathBuf::from("/etc/vartha.yaml"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.models_dir, Some(PathBuf::from("/srv/models")));
        assert!(cli.listen.is_none());
        assert!(cli.verbose);
    }
}
