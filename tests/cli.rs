//! End-to-end runs of the binary against a fake dashboard API.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn template_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("peerPayload.json")
}

/// The binary run from an empty directory so no stray config or .env is picked up.
fn vpnpeer_gen(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vpnpeer-gen").unwrap();
    cmd.current_dir(workdir.path())
        .env("RUST_LOG", "info")
        .env("VPNPEER_TEMPLATE_PATH", template_path())
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("HTTPS_PROXY")
        .env_remove("https_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy");
    cmd
}

/// Answers one request with `status_line` and `body`; yields the raw request.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = socket.read(&mut buf).unwrap();
            raw.extend_from_slice(&buf[..n]);
            if n == 0 || request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (format!("http://{}/api/v1", addr), handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..split]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    raw.len() >= split + 4 + content_length
}

#[test]
fn dry_run_prints_branch_peers() {
    let dir = TempDir::new().unwrap();
    vpnpeer_gen(&dir)
        .env("VPNPEER_DRY_RUN", "true")
        .write_stdin("3\nbranch\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "branch0""#))
        .stdout(predicate::str::contains(r#""name": "branch2""#))
        .stdout(predicate::str::contains(r#""peerId": "1002""#))
        .stdout(predicate::str::contains("10.0.3.0/24"))
        .stdout(predicate::str::contains("10.0.0.0/24").not());
}

#[test]
fn out_of_range_count_exits_with_one() {
    let dir = TempDir::new().unwrap();
    vpnpeer_gen(&dir)
        .write_stdin("65536\nbranch\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("65536"));
}

#[test]
fn non_numeric_count_exits_with_one() {
    let dir = TempDir::new().unwrap();
    vpnpeer_gen(&dir)
        .write_stdin("many\nbranch\n")
        .assert()
        .code(1);
}

#[test]
fn missing_template_exits_with_one() {
    let dir = TempDir::new().unwrap();
    vpnpeer_gen(&dir)
        .env("VPNPEER_TEMPLATE_PATH", dir.path().join("peerPayload.json"))
        .write_stdin("3\nbranch\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn accepted_submission_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = serve_once("200 OK", "[]");

    vpnpeer_gen(&dir)
        .env("VPNPEER_BASE_URL", &base_url)
        .env("M_API_KEY", "abc123")
        .env("M_ORG_ID", "549236")
        .write_stdin("2\nsite\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Status Code: 200"))
        .stderr(predicate::str::contains("created successfully"));

    let request = server.join().unwrap();
    assert!(request.starts_with(
        "PUT /api/v1/organizations/549236/appliance/vpn/thirdPartyVPNPeers"
    ));
    assert!(request.contains(r#""name":"site1""#));
}

#[test]
fn rejected_submission_still_exits_zero() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = serve_once("400 Bad Request", r#"{"errors":["Invalid peer"]}"#);

    vpnpeer_gen(&dir)
        .env("VPNPEER_BASE_URL", &base_url)
        .write_stdin("1\nbranch\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Status Code: 400"))
        .stderr(predicate::str::contains("Invalid peer"));

    server.join().unwrap();
}

#[test]
fn rejected_submission_fails_when_asked() {
    let dir = TempDir::new().unwrap();
    let (base_url, server) = serve_once("400 Bad Request", r#"{"errors":["Invalid peer"]}"#);

    vpnpeer_gen(&dir)
        .env("VPNPEER_BASE_URL", &base_url)
        .env("VPNPEER_FAIL_ON_REJECT", "true")
        .write_stdin("1\nbranch\n")
        .assert()
        .code(2);

    server.join().unwrap();
}
