use kvlite::store::{HashTable, INITIAL_CAPACITY, new_shared_store};
use rand::Rng;
use redis::Commands;
use std::time::Instant;
use tokio::net::TcpListener;

async fn start_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let store = new_shared_store(INITIAL_CAPACITY);

    tokio::spawn(async move {
        let _ = kvlite::server::serve(listener, store, std::future::pending::<()>()).await;
    });
    port
}

fn get_client(port: u16) -> redis::Connection {
    let client = redis::Client::open(format!("redis://127.0.0.1:{port}/")).unwrap();
    client.get_connection().unwrap()
}

fn bench_set_get(conn: &mut redis::Connection, iterations: usize) -> (f64, f64) {
    // Benchmark SET
    let start = Instant::now();
    for i in 0..iterations {
        let _: () = conn
            .set(format!("bench_key_{i}"), format!("value_{i}"))
            .unwrap();
    }
    let set_elapsed = start.elapsed();
    let set_ops = iterations as f64 / set_elapsed.as_secs_f64();

    // Benchmark GET
    let start = Instant::now();
    for i in 0..iterations {
        let _: String = conn.get(format!("bench_key_{i}")).unwrap();
    }
    let get_elapsed = start.elapsed();
    let get_ops = iterations as f64 / get_elapsed.as_secs_f64();

    (set_ops, get_ops)
}

fn bench_random_get(conn: &mut redis::Connection, iterations: usize) -> f64 {
    let mut rng = rand::thread_rng();
    let start = Instant::now();
    for _ in 0..iterations {
        let i = rng.gen_range(0..iterations * 2);
        let _: Option<String> = conn.get(format!("bench_key_{i}")).unwrap();
    }
    let elapsed = start.elapsed();
    iterations as f64 / elapsed.as_secs_f64()
}

/// In-process table inserts, including every resize along the way.
fn bench_table_insert(iterations: usize) -> f64 {
    let keys: Vec<String> = (0..iterations).map(|i| format!("table_key_{i}")).collect();
    let start = Instant::now();
    let mut table = HashTable::new();
    for (i, key) in keys.into_iter().enumerate() {
        table.insert(key, i);
    }
    let elapsed = start.elapsed();
    assert_eq!(table.len(), iterations);
    iterations as f64 / elapsed.as_secs_f64()
}

#[tokio::main]
async fn main() {
    let port = start_server().await;

    tokio::task::spawn_blocking(move || {
        let mut conn = get_client(port);
        let iterations = 10_000;

        println!("=== kvlite Benchmark ({iterations} operations) ===\n");

        let (set_ops, get_ops) = bench_set_get(&mut conn, iterations);
        println!("SET:    {set_ops:>10.0} ops/sec");
        println!("GET:    {get_ops:>10.0} ops/sec");

        let rand_ops = bench_random_get(&mut conn, iterations);
        println!("RGET:   {rand_ops:>10.0} ops/sec (50% misses)");

        let table_ops = bench_table_insert(iterations * 100);
        println!("TABLE:  {table_ops:>10.0} inserts/sec (in-process)");

        println!("\n=== Done ===");
    })
    .await
    .unwrap();
}
