//! Log in to a CBS switch, run one initialization pass and print the result
//! as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example initialize -- --host 192.168.1.254 --user cisco --password cisco
//! ```
//!
//! Set `RUST_LOG=debug` to watch the session, `RUST_LOG=trace` for raw reads.

use std::env;
use std::time::Duration;

use cbscrape::{Initializer, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut session = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .password(&args.password)
        .command_timeout(Duration::from_secs(args.timeout))
        .build()?;

    let outcome = session.connect().await;
    eprintln!("{}: {}", args.host, outcome);
    if !outcome.is_established() {
        std::process::exit(1);
    }

    let mut initializer = Initializer::new(&mut session);
    initializer.initialize().await;
    let report = initializer.into_report();

    if args.validate {
        let synced = match session.connected() {
            Ok(mut handle) => handle.validate().await,
            Err(_) => false,
        };
        eprintln!("console synchronised: {synced}");
    }
    session.disconnect().await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: String,
    timeout: u64,
    validate: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "192.168.1.254".to_string();
        let mut port = 22u16;
        let mut user = "cisco".to_string();
        let mut password = env::var("CBS_PASSWORD").unwrap_or_default();
        let mut timeout = 10u64;
        let mut validate = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = args[i].clone();
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(10);
                    }
                }
                "--validate" => validate = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            timeout,
            validate,
        }
    }

    fn print_help() {
        println!(
            r#"cbscrape initialize example

USAGE:
    cargo run --example initialize -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Switch address [default: 192.168.1.254]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Login user name [default: cisco]
    -P, --password <PASS>    Login password [default: $CBS_PASSWORD]
    -t, --timeout <SECS>     Per-read command timeout [default: 10]
    --validate               Probe the prompt after the pass
    --help                   Print this help message
"#
        );
    }
}
