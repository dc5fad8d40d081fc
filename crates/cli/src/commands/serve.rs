//! Serve command

use anyhow::Result;
use clap::Args;
use std::net::SocketAddr;
use tracing::info;

use super::Context;

#[derive(Args)]
pub struct ServeArgs {
    /// Web server bind address (defaults to `web.listen` from the config)
    #[arg(long)]
    pub addr: Option<String>,
}

pub async fn execute(args: ServeArgs, ctx: Context) -> Result<()> {
    let addr: SocketAddr = match args.addr {
        Some(addr) => addr.parse()?,
        None => ctx.config.web.socket_addr()?,
    };

    info!("Serving qaboard on http://{}", addr);
    qaboard_web::server::serve(addr, ctx.config).await
}
