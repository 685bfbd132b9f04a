//! Serve command implementation

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::server;

pub async fn run(opts: &GlobalOptions, port: Option<u16>) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    if let Some(port) = port {
        ctx.config.server.port = port;
    }

    eprintln!(
        "{} Listening on {} (Ctrl+C to stop)",
        "→".cyan(),
        ctx.config.server.address().bold()
    );
    server::start_server(&ctx.config).await
}
