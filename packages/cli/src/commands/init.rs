use anyhow::Result;
use clap::Args;
use colored::Colorize;
use commonplace_editor::{BridgeMode, ShimConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Bridge mode (lines, paragraph)
    #[arg(short, long, default_value = "lines")]
    pub mode: String,

    /// Id of the container element
    #[arg(short, long, default_value = "editor")]
    pub container_id: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mode = match args.mode.as_str() {
        "lines" => BridgeMode::Lines,
        "paragraph" => BridgeMode::Paragraph,
        other => {
            return Err(anyhow::anyhow!(
                "Invalid mode: {}. Use: lines or paragraph",
                other
            ))
        }
    };

    let config = ShimConfig {
        container_id: args.container_id,
        mode,
        ..ShimConfig::default()
    };
    config.validate()?;

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Host hooks:");
    println!("  inbound:  window.{}(text)", config.inbound_hook);
    println!("  outbound: window.{}(text)", config.outbound_hook);

    Ok(())
}
