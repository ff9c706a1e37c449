mod config;
mod listener;
mod net;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::Ipv4Addr;
use tokio::signal;
use tracing::info;

#[derive(Parser)]
#[command(name = "udpspy")]
#[command(version = "0.1.0")]
#[command(about = "📡 Print every UDP datagram that arrives on a local endpoint")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind a UDP endpoint and print every datagram until Ctrl-C
    Listen {
        #[arg(short = 'a', long, default_value = config::DEFAULT_BIND_ADDR)]
        bind_address: Ipv4Addr,

        #[arg(short = 'p', long, default_value_t = config::DEFAULT_BIND_PORT)]
        bind_port: u16,
    },

    /// Fire test datagrams at a listening endpoint
    Send {
        #[arg(short = 'e', long, help = "Peer address, e.g. 192.168.2.10:40000")]
        peer: String,

        #[arg(short, long, default_value = config::DEFAULT_SEND_MESSAGE)]
        message: String,

        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    match cli.command {
        Commands::Listen { bind_address, bind_port } => {
            listen(bind_address, bind_port).await?;
        }
        Commands::Send { peer, message, count } => {
            net::send_datagrams(&peer, message.as_bytes(), count).await?;
            info!("✅ Done");
        }
    }

    Ok(())
}

async fn listen(bind_address: Ipv4Addr, bind_port: u16) -> Result<()> {
    let listener = listener::Listener::bind(bind_address, bind_port).await?;
    println!("Listening on UDP {} …", listener.local_addr());

    let mut stats = listener::SessionStats::default();
    tokio::select! {
        res = listener.run(&mut stats) => res?,
        _ = signal::ctrl_c() => {
            println!("\nInterrupted by user, exiting.");
        }
    }

    listener.shutdown();
    stats.print_summary();
    Ok(())
}
