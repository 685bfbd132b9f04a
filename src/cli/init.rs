//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::config::{Config, ImageStoreConfig};
use crate::error::Result;

/// Run the init command
///
/// Existing settings at the target path are kept; only the API key and the
/// image store are prompted for.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let theme = ColorfulTheme::default();
    let path = Config::resolve_path(opts.config_ref())?;

    println!("{}", "Welcome to Good Badger!".bold().green());
    println!("Let's set up your configuration.\n");

    let mut config = Config::load_from(path.clone()).unwrap_or_default();

    let api_key: String = Password::with_theme(&theme)
        .with_prompt("Enter your OpenAI API key")
        .interact()?;
    config.openai_api_key = Some(api_key.trim().to_string());

    let stores = ["Inline (data URLs, nothing leaves your machine)", "Amazon S3"];
    let choice = Select::with_theme(&theme)
        .with_prompt("Where should badge images be stored?")
        .items(&stores)
        .default(0)
        .interact()?;

    config.image_store = if choice == 0 {
        ImageStoreConfig::Inline
    } else {
        prompt_s3(&theme)?
    };

    config.validate()?;
    config.save_to(path.clone())?;

    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        path.display()
    );

    if matches!(config.image_store, ImageStoreConfig::S3 { .. }) && !cfg!(feature = "s3") {
        println!(
            "{} This build has no S3 support; rebuild with `--features s3`.",
            "⚠".yellow()
        );
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "goodbadger status".cyan());
    println!("  {} - Make a badge step by step", "goodbadger create".cyan());

    Ok(())
}

fn prompt_s3(theme: &ColorfulTheme) -> Result<ImageStoreConfig> {
    let bucket: String = Input::with_theme(theme)
        .with_prompt("Bucket name")
        .interact_text()?;

    let prefix: String = Input::with_theme(theme)
        .with_prompt("Key prefix")
        .default("badges".to_string())
        .interact_text()?;

    let region: String = Input::with_theme(theme)
        .with_prompt("Region (blank for the AWS default chain)")
        .allow_empty(true)
        .interact_text()?;

    let public_base_url: String = Input::with_theme(theme)
        .with_prompt("Public base URL for uploaded objects")
        .interact_text()?;

    Ok(ImageStoreConfig::S3 {
        bucket: bucket.trim().to_string(),
        prefix: prefix.trim().to_string(),
        region: Some(region.trim().to_string()).filter(|r| !r.is_empty()),
        public_base_url: public_base_url.trim().trim_end_matches('/').to_string(),
    })
}
