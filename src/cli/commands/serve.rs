//! Web server command.

use std::net::{SocketAddr, ToSocketAddrs};

use console::style;

use crate::config::Config;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Start the web server.
pub async fn cmd_serve(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or(&config.server.bind);
    let (host, port) = parse_bind_address(bind);
    let addr = resolve(&host, port)?;

    if std::env::var(&config.gemini.credentials_env).is_err() {
        eprintln!(
            "{} {} is not set; analysis requests will fail",
            style("!").yellow(),
            config.gemini.credentials_env
        );
    }

    println!(
        "{} Starting plainpolicy at http://{}",
        style("→").cyan(),
        addr
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(config, addr).await
}

fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve bind address {}:{}", host, port))
}

/// Parse a bind address that can be:
/// - Just a port: "3000" -> 127.0.0.1:3000
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3000
/// - Host and port: "0.0.0.0:3000" -> 0.0.0.0:3000
fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return (DEFAULT_HOST.to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}
