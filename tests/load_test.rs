//! Load testing over a real socket.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use resource_server::ServerConfig;

mod common;

#[tokio::test]
async fn test_concurrent_writes_get_unique_ids() {
    let (addr, shutdown) = common::start_server(ServerConfig::default()).await;
    let base = format!("http://{}", addr);

    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let start = Instant::now();

    let mut handles = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let base = base.clone();
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for i in 0..requests_per_task {
                let res = client
                    .post(format!("{}/set_data", base))
                    .json(&serde_json::json!({ "data": format!("{task}-{i}") }))
                    .send()
                    .await
                    .expect("Server unreachable");
                assert_eq!(res.status(), 200);
                let body: serde_json::Value = res.json().await.unwrap();
                ids.push((body["id"].as_u64().unwrap(), format!("{task}-{i}")));
            }
            ids
        }));
    }

    let mut written = Vec::new();
    for handle in handles {
        written.extend(handle.await.unwrap());
    }
    let elapsed = start.elapsed();
    println!("{} writes in {:?}", total_requests, elapsed);

    let unique: HashSet<u64> = written.iter().map(|(id, _)| *id).collect();
    assert_eq!(unique.len(), total_requests);
    assert_eq!(unique.iter().min(), Some(&1));
    assert_eq!(unique.iter().max(), Some(&(total_requests as u64)));

    // Spot-check reads through the same server.
    for (id, data) in written.iter().step_by(50) {
        let res = client
            .get(format!("{}/get_data", base))
            .query(&[("id", id)])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["data"], data.as_str());
    }

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let (addr, shutdown) = common::start_server(ServerConfig::default()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{}/get_data?id=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    drop(res);
    drop(client);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    assert!(fresh
        .get(format!("http://{}/get_data?id=1", addr))
        .send()
        .await
        .is_err());
}
