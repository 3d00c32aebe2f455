//! End-to-end tests for `roam serve`: a real session over TCP and graceful
//! shutdown on SIGTERM and SIGINT.

#![cfg(unix)]

mod common;

use std::io::{Read, Write};
use std::net::TcpStream;
use std::process::{Child, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use common::{TestEnv, VALID_TOKEN, free_port};

struct Server {
    child: Child,
    port: u16,
}

impl Server {
    fn start(env: &TestEnv, extra: &[&str]) -> Self {
        Self::start_with_env(env, extra, &[])
    }

    fn start_with_env(env: &TestEnv, extra: &[&str], vars: &[(&str, &str)]) -> Self {
        let port = free_port();
        let child = env
            .roam_process()
            .envs(vars.iter().copied())
            .args(["serve", "--host", "127.0.0.1", "--port", &port.to_string()])
            .args(extra)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        Self { child, port }
    }

    fn connect(&self) -> TcpStream {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match TcpStream::connect(("127.0.0.1", self.port)) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(Duration::from_secs(10)))
                        .unwrap();
                    return stream;
                }
                Err(e) if Instant::now() > deadline => panic!("server never listened: {e}"),
                Err(_) => thread::sleep(Duration::from_millis(50)),
            }
        }
    }

    fn terminate(&self) {
        self.signal("-TERM");
    }

    fn signal(&self, flag: &str) {
        let status = std::process::Command::new("kill")
            .args([flag, &self.child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
    }

    /// Wait for exit and collect stdout and stderr.
    fn wait(mut self) -> (std::process::ExitStatus, String, String) {
        let status = self.child.wait().unwrap();
        let mut stdout = String::new();
        if let Some(mut out) = self.child.stdout.take() {
            out.read_to_string(&mut stdout).unwrap();
        }
        let mut stderr = String::new();
        if let Some(mut err) = self.child.stderr.take() {
            err.read_to_string(&mut stderr).unwrap();
        }
        (status, stdout, stderr)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

fn open_session(stream: &mut TcpStream, command: &[&str]) -> String {
    let handshake = serde_json::json!({
        "user": "alice",
        "term": "xterm-256color",
        "width": 100,
        "height": 30,
        "command": command,
    });
    stream
        .write_all(format!("{}\n", handshake).as_bytes())
        .unwrap();
    read_until(stream, "press q to quit")
}

fn read_until(stream: &mut TcpStream, needle: &str) -> String {
    let mut seen = Vec::new();
    let mut buf = [0u8; 1024];
    while !String::from_utf8_lossy(&seen).contains(needle) {
        let n = stream.read(&mut buf).unwrap();
        assert!(n > 0, "session closed before {needle:?}");
        seen.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&seen).into_owned()
}

#[test]
fn test_session_shows_dashboard_and_quits() {
    let env = TestEnv::new();
    let server = Server::start(&env, &["--address", "http://h:1"]);
    let mut stream = server.connect();

    let screen = open_session(&mut stream, &[]);
    assert!(screen.starts_with("\x1b[?1049h"));
    assert!(screen.contains("http://h:1"));

    stream.write_all(b"q").unwrap();
    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).unwrap();
    assert!(String::from_utf8_lossy(&rest).ends_with("\x1b[?1049l"));

    server.terminate();
    let (status, _, _) = server.wait();
    assert!(status.success());
}

#[test]
fn test_session_override_token() {
    let env = TestEnv::new();
    let server = Server::start(&env, &[]);

    let mut valid = server.connect();
    let screen = open_session(&mut valid, &[VALID_TOKEN]);
    assert!(screen.contains("1111...5555"));

    let mut invalid = server.connect();
    let screen = open_session(&mut invalid, &["nope"]);
    assert!(screen.contains("warning: token must be 36 characters, got 4"));

    server.terminate();
    let (status, _, stderr) = server.wait();
    assert!(status.success());
    assert!(stderr.contains("override token rejected"));
}

#[test]
fn test_sigterm_drains_sessions_and_exits_cleanly() {
    let env = TestEnv::new();
    let server = Server::start(&env, &[]);
    let mut stream = server.connect();
    open_session(&mut stream, &[]);

    server.terminate();

    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).unwrap();
    assert!(String::from_utf8_lossy(&rest).ends_with("\x1b[?1049l"));

    let (status, _, stderr) = server.wait();
    assert!(status.success(), "stderr: {stderr}");
    assert!(stderr.contains("session connected"));
    assert!(stderr.contains("session disconnected"));
    assert!(stderr.contains("session server stopped"));
}

#[test]
fn test_sigint_right_after_listening_exits_cleanly() {
    let env = TestEnv::new();
    let server = Server::start(&env, &[]);
    drop(server.connect());

    server.signal("-INT");

    let (status, _, stderr) = server.wait();
    assert!(status.success(), "stderr: {stderr}");
    assert!(stderr.contains("received interrupt"));
    assert!(stderr.contains("session server stopped"));
}

#[test]
fn test_legacy_warning_printed_on_serve_start() {
    let env = TestEnv::new();
    let server = Server::start_with_env(&env, &[], &[("ROAM_ADDR", "http://legacy:4646")]);
    server.connect();

    server.terminate();
    let (status, stdout, _) = server.wait();
    assert!(status.success());
    assert!(stdout.starts_with("warning: use of ROAM_ADDR"));
    assert!(stdout.contains("NOMAD_ADDR"));
}
