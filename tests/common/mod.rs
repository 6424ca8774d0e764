#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub const HEADER: &str = "Geoname ID;Name;ASCII Name;Alternate Names;Feature Class;Feature Code;Country Code;Country name EN;Country Code 2;Admin1 Code;Admin2 Code;Admin3 Code;Admin4 Code;Population;Elevation;DIgital Elevation Model;Timezone;Modification date;LABEL EN;Coordinates";

pub fn feed_row(id: i64, country_code: &str, country_name: &str, population: i64) -> String {
    format!(
        "{id};Place {id};Place {id};;P;PPL;{country_code};{country_name};;00;;;;{population};;35;Europe/Paris;2024-03-01;{country_name};43.7, 7.4"
    )
}

pub fn feed(rows: &[String]) -> String {
    let mut lines = vec![HEADER.to_string()];
    lines.extend(rows.iter().cloned());
    lines.join("\n") + "\n"
}

/// France with one megacity, Monaco without.
pub fn fr_mc_feed() -> String {
    feed(&[
        feed_row(1, "FR", "France", 500),
        feed_row(2, "FR", "France", 2_000_000),
        feed_row(3, "FR", "France", 12_000_000),
        feed_row(4, "MC", "Monaco", 100),
        feed_row(5, "MC", "Monaco", 200),
    ])
}

/// Serve exactly one HTTP response on a random local port and return its URL.
pub fn serve_once(status: &str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/exports/csv", listener.local_addr().unwrap());
    let status = status.to_string();

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            respond(stream, &status, &body);
        }
    });

    url
}

fn respond(mut stream: TcpStream, status: &str, body: &[u8]) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut line = String::new();
    // Drain the request head
    while reader.read_line(&mut line).unwrap_or(0) > 0 {
        if line == "\r\n" {
            break;
        }
        line.clear();
    }

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/csv; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// A local URL nobody is listening on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/exports/csv", addr)
}

/// In-memory log sink usable as a `MakeWriter`.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
