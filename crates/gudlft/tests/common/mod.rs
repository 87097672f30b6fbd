#![allow(dead_code)]

use std::fmt::Write as _;
use std::net::SocketAddr;

use chrono::NaiveDateTime;
use gudlft::model::DATE_FORMAT;
use gudlft::{build_router, AppState, BookingRules, Club, Competition, Dataset};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub struct HttpResponse {
    pub status: u16,
    pub head: String,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).expect("valid date")
}

pub fn fixed_now() -> NaiveDateTime {
    at("2025-06-01 12:00:00")
}

pub fn sample_dataset() -> Dataset {
    Dataset::new(
        vec![
            Club::new("Simply Lift", "john@simplylift.co", 13),
            Club::new("Iron Temple", "admin@irontemple.com", 20),
            Club::new("Club Zero", "zero@test.com", 0),
            Club::new("Rich Club", "rich@test.com", 100),
        ],
        vec![
            Competition::new("Spring Festival", at("2020-03-27 10:00:00"), 25),
            Competition::new("Fall Classic", at("2099-10-22 13:30:00"), 13),
            Competition::new("Final Showdown", at("2099-12-01 09:00:00"), 30),
        ],
    )
}

pub fn sample_state() -> AppState {
    AppState::new(sample_dataset(), BookingRules::default()).with_clock(fixed_now)
}

pub async fn spawn_app(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

fn form_encode(pairs: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        for (j, part) in [key, value].into_iter().enumerate() {
            if j > 0 {
                out.push('=');
            }
            for byte in part.bytes() {
                match byte {
                    b' ' => out.push('+'),
                    b if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') => {
                        out.push(char::from(b));
                    }
                    b => write!(out, "%{b:02X}").expect("write to string"),
                }
            }
        }
    }
    out
}

async fn send_raw(addr: SocketAddr, request: String) -> HttpResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    HttpResponse {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

pub async fn get(addr: SocketAddr, path: &str) -> HttpResponse {
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    send_raw(addr, request).await
}

pub async fn post_form(addr: SocketAddr, path: &str, form: &[(&str, &str)]) -> HttpResponse {
    let body = form_encode(form);
    let request = format!(
        "POST {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    send_raw(addr, request).await
}

pub async fn purchase(
    addr: SocketAddr,
    club: &str,
    competition: &str,
    places: &str,
) -> HttpResponse {
    post_form(
        addr,
        "/purchasePlaces",
        &[("club", club), ("competition", competition), ("places", places)],
    )
    .await
}
