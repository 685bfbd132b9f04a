//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::{Config, ImageStoreConfig};
use crate::error::Result;

/// Display where configuration comes from and whether it is usable
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Good Badger Configuration Status".bold());

    let path = Config::resolve_path(opts.config_ref())?;
    if path.exists() {
        println!("Config file: {}", path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            path.display().to_string().cyan(),
            "(not found, using defaults)".dimmed()
        );
    }

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            println!("\nRun {} to create a configuration file.\n", "goodbadger init".cyan());
            return Ok(());
        }
    };
    println!();

    match config.validate() {
        Ok(()) => println!("{} Configuration valid", "✓".green()),
        Err(e) => println!("{} {}", "✗".red(), e),
    }

    if config.openai_api_key.is_some() {
        println!("{} OpenAI API key configured", "✓".green());
    } else {
        println!("{} OpenAI API key not configured", "✗".red());
        println!("  → Run 'goodbadger init' or set OPENAI_API_KEY");
    }

    println!("{} Registry: {}", "○".dimmed(), config.registry_url);
    println!(
        "{} Models: {} (text), {} (image)",
        "○".dimmed(),
        config.text_model,
        config.image_model
    );

    match &config.image_store {
        ImageStoreConfig::Inline => println!("{} Image store: inline", "○".dimmed()),
        ImageStoreConfig::S3 { bucket, prefix, .. } => {
            println!("{} Image store: s3://{}/{}", "○".dimmed(), bucket, prefix);
            if !cfg!(feature = "s3") {
                println!("  {} built without the `s3` feature", "⚠".yellow());
            }
        }
    }

    println!("{} Server address: {}", "○".dimmed(), config.server.address());
    println!();

    Ok(())
}
