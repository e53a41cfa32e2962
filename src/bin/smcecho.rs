//! SMC echo sample tool.
//!
//! Exercises the AF_SMC socket wrapper: `-s` runs an echo server, `-c`
//! connects, sends one line and prints the reply.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use clap::Parser;
use smc_wire::socket;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// SMC echo client/server sample
#[derive(Parser, Debug)]
#[command(name = "smcecho", version, about)]
struct Args {
    /// Run server
    #[arg(short = 's')]
    server: bool,

    /// Run client
    #[arg(short = 'c')]
    client: bool,

    /// Server/client address
    #[arg(short = 'a', default_value = "127.0.0.1")]
    address: String,

    /// Server/client port
    #[arg(short = 'p', default_value_t = 50000)]
    port: u16,
}

/// Echo all bytes received on conn back to the sender.
fn echo(conn: TcpStream) -> std::io::Result<u64> {
    let mut reader = conn.try_clone()?;
    let mut writer = conn;
    std::io::copy(&mut reader, &mut writer)
}

fn run_server(address: &str) -> Result<(), socket::SocketError> {
    let listener = socket::listen(address)?;
    info!(%address, "listening for SMC connections");

    loop {
        let (conn, peer) = listener.accept()?;
        std::thread::spawn(move || {
            info!(%peer, "new client connection");
            match echo(conn) {
                Ok(written) => info!("echoed {} bytes to client", written),
                Err(e) => error!("echo failed: {}", e),
            }
        });
    }
}

fn run_client(address: &str) -> Result<(), socket::SocketError> {
    let mut conn = socket::dial(address)?;
    info!("connected to server");

    let text = "Hello, world\n";
    conn.write_all(text.as_bytes())?;
    info!("sent {} bytes to server: {}", text.len(), text.trim_end());

    let mut reply = String::new();
    BufReader::new(&conn).read_line(&mut reply)?;
    info!("read {} bytes from server: {}", reply.len(), reply.trim_end());
    Ok(())
}

fn main() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    // bracket IPv6 literals so host and port split cleanly
    let address = if args.address.contains(':') {
        format!("[{}]:{}", args.address, args.port)
    } else {
        format!("{}:{}", args.address, args.port)
    };

    let result = if args.server {
        run_server(&address)
    } else if args.client {
        run_client(&address)
    } else {
        error!("specify -s (server) or -c (client)");
        std::process::exit(2);
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
