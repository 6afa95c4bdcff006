use std::time::{Duration, SystemTime};

use clap::Parser;
use tracing::Level;

use hopchain::{
    client::UpdatePathClient, server::ExpiresServer, Chain, Connection, Context, Request,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Names of the client hops, in chain order
    #[arg(default_values_t = vec!["nsc".to_string(), "nsmgr".to_string(), "nse".to_string()])]
    hops: Vec<String>,
    /// Lease granted by the server side element, in seconds (0 disables it)
    #[arg(long, default_value_t = 30)]
    ttl: u64,
    /// Call deadline, in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout: u64,
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::TRACE).init();

    let cli = Cli::parse();

    let mut chain = Chain::default();
    for (i, hop) in cli.hops.iter().enumerate() {
        if i > 0 {
            chain = chain.with(ExpiresServer::new(Duration::from_secs(cli.ttl)));
        }
        chain = chain.with(UpdatePathClient::new(hop.as_str()));
    }

    let timeout = Duration::from_millis(cli.timeout);

    println!("\n=== REQUEST ===");
    let connection = match chain.request(&Context::with_timeout(timeout), Request::default()) {
        Ok(connection) => connection,
        Err(error) => {
            println!("Request failed: {}", error);
            return;
        }
    };
    print_connection(&connection);

    println!("\n=== REFRESH ===");
    let connection = match chain.request(&Context::with_timeout(timeout), connection.into()) {
        Ok(connection) => connection,
        Err(error) => {
            println!("Refresh failed: {}", error);
            return;
        }
    };
    print_connection(&connection);

    println!("\n=== CLOSE ===");
    match chain.close(&Context::with_timeout(timeout), connection) {
        Ok(()) => println!("Closed"),
        Err(error) => println!("Close failed: {}", error),
    }
}

fn print_connection(connection: &Connection) {
    println!("Connection id: {:?}", connection.id);

    let path = match &connection.path {
        Some(path) => path,
        None => return,
    };

    let now = SystemTime::now();
    for (i, segment) in path.segments.iter().enumerate() {
        let lease = segment
            .expires
            .and_then(|expires| expires.to_system_time())
            .and_then(|time| time.duration_since(now).ok());

        println!(
            "{} [{}] {} {} lease: {:?}",
            if i as u32 == path.index { "*" } else { " " },
            i,
            segment.name,
            segment.id,
            lease
        );
    }
}
