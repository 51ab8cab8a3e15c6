use std::io::{self, BufRead, Write};
use tokio::net::TcpStream;

use kvlite::connection::Connection;
use kvlite::resp::RespValue;

#[tokio::main]
async fn main() -> io::Result<()> {
    let mut host = "127.0.0.1".to_string();
    let mut port = 6379u16;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    if let Ok(p) = args[i + 1].parse() {
                        port = p;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    let addr = format!("{host}:{port}");
    let mut conn = Connection::new(TcpStream::connect(&addr).await?);
    eprintln!("Connected to {addr}");

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        print!("kvlite> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            break; // EOF
        }

        // One bulk string per whitespace-separated token
        let tokens: Vec<RespValue> = line
            .split_whitespace()
            .map(|t| RespValue::bulk_string(t.as_bytes().to_vec()))
            .collect();
        if tokens.is_empty() {
            continue;
        }

        conn.write_value(&RespValue::array(tokens)).await?;

        match conn.read_value().await {
            Ok(Some(response)) => println!("{response}"),
            Ok(None) => {
                eprintln!("Connection closed by server");
                break;
            }
            Err(e) => {
                eprintln!("Protocol error: {e}");
                break;
            }
        }
    }

    Ok(())
}
