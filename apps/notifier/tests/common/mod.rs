#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

/// Canned HTTP upstream: answers each connection with the next response in
/// line and records the raw request it got.
pub struct FakeUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                seen.lock().unwrap().push(request);

                let reply = format!(
                    "HTTP/1.1 {status} {}\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{body}",
                    if status == 200 { "OK" } else { "Error" },
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);

        let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&data[..head_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= head_end + 4 + content_length {
            break;
        }
    }

    String::from_utf8_lossy(&data).into_owned()
}

/// A `TIME_SERIES_DAILY` body from `(date, open, close, volume)` rows.
pub fn daily_series(rows: &[(&str, &str, &str, &str)]) -> String {
    let series: serde_json::Map<String, serde_json::Value> = rows
        .iter()
        .map(|(date, open, close, volume)| {
            (
                date.to_string(),
                serde_json::json!({
                    "1. open": open,
                    "2. high": close,
                    "3. low": open,
                    "4. close": close,
                    "5. volume": volume,
                }),
            )
        })
        .collect();

    serde_json::json!({
        "Meta Data": { "2. Symbol": "TEST" },
        "Time Series (Daily)": series,
    })
    .to_string()
}

pub fn sent_message(chat_id: i64, text: &str) -> String {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": 1,
            "date": 1_600_000_000,
            "chat": { "id": chat_id, "type": "group" },
            "text": text,
        }
    })
    .to_string()
}

/// JSON body of a recorded request.
pub fn request_json(request: &str) -> serde_json::Value {
    let body = request.split("\r\n\r\n").nth(1).unwrap_or_default();
    serde_json::from_str(body).unwrap()
}
