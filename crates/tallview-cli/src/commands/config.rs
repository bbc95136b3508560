use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tallview_core::config::ViewerConfig;

use super::load_config;

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file to resolve; omitted keys take their default values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the resolved config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print the effective viewer config, either the defaults or a file with
/// its missing keys filled in.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => "defaults".to_string(),
    };
    let text = render_config(&source, &config)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Config from {source} saved to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// TOML for `config` headed by a comment naming where it came from and the
/// frame interval it resolves to.
fn render_config(source: &str, config: &ViewerConfig) -> Result<String> {
    let body = toml::to_string_pretty(config).context("Failed to serialize config")?;
    Ok(format!(
        "# tallview config ({source}), frame interval {} ms\n{body}",
        config.frame_interval().as_millis()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallview_core::config::FlingConfig;
    use tallview_core::decode::PixelFormat;

    #[test]
    fn test_partial_file_is_completed_with_defaults() {
        let partial: ViewerConfig =
            toml::from_str("pixel_format = \"Rgba8888\"\n[fling]\nfriction = 2.5\n").unwrap();
        let text = render_config("partial.toml", &partial).unwrap();
        assert!(text.starts_with("# tallview config (partial.toml)"));

        let resolved: ViewerConfig = toml::from_str(&text).unwrap();
        assert_eq!(resolved.pixel_format, PixelFormat::Rgba8888);
        assert_eq!(resolved.fling.friction, 2.5);
        assert_eq!(resolved.fling.max_velocity, FlingConfig::default().max_velocity);
        assert_eq!(resolved.frame_interval_ms, ViewerConfig::default().frame_interval_ms);
        assert!(text.contains("max_velocity"));
    }

    #[test]
    fn test_zero_frame_interval_reported_as_one_ms() {
        let config = ViewerConfig {
            frame_interval_ms: 0,
            ..ViewerConfig::default()
        };
        let text = render_config("defaults", &config).unwrap();
        assert!(text.starts_with("# tallview config (defaults), frame interval 1 ms\n"));
    }
}
