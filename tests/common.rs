use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// A recap command isolated from the caller's environment
pub fn recap() -> Command {
    let mut cmd = cargo_bin_cmd!("recap");
    cmd.env_remove("RECAP_CONFIG")
        .env_remove("RECAP_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RECAP_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Vault fixture: a transcript directory and a few existing notes
pub struct Vault {
    pub root: PathBuf,
    pub config: PathBuf,
}

impl Vault {
    pub fn new(dir: &Path, extra_config: &str) -> Self {
        let root = dir.join("vault");
        fs::create_dir_all(root.join("ChatGPT conversations/ChatGPT")).unwrap();
        fs::create_dir_all(root.join("Topics")).unwrap();
        fs::write(root.join("Topics/Focus.md"), "").unwrap();
        fs::write(root.join("Topics/Sleep Hygiene.md"), "").unwrap();

        let config = dir.join("recap.toml");
        fs::write(
            &config,
            format!("vault_dir = {:?}\n{extra_config}", root.display().to_string()),
        )
        .unwrap();

        Self { root, config }
    }

    pub fn add_transcript(&self, name: &str, content: &str) {
        fs::write(self.root.join("ChatGPT conversations/ChatGPT").join(name), content).unwrap();
    }

    pub fn summaries(&self) -> PathBuf {
        self.root.join("ChatGPT summaries")
    }

    pub fn ledger(&self) -> PathBuf {
        self.config.parent().unwrap().join("processed.log")
    }
}

/// Serve the same chat completion to every request; returns the base URL
/// and a counter of requests answered
#[allow(dead_code)]
pub fn serve_completions(content_json: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
    let served = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&served);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            read_request(&mut stream);

            let body = format!(
                r#"{{"choices":[{{"message":{{"role":"assistant","content":{content_json}}}}}]}}"#
            );
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    (base_url, served)
}

fn read_request(stream: &mut TcpStream) {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            return;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let n = stream.read(&mut buf).unwrap_or(0);
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }
}
