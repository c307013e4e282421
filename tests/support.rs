use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server answering every request with `status`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(status: u16) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream, status));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Like [`spawn_http_server`], but skips when sockets are not permitted.
///
/// # Errors
///
/// Returns an error for any other listener failure.
pub fn spawn_http_server_or_skip(status: u16) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server(status) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, status: u16) {
    drop(stream.set_nonblocking(false));
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    let response = format!(
        "HTTP/1.1 {} Status\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
        status
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Writes a TOML config with one `local` exchange whose endpoints all point
/// at `url`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_config(dir: &Path, url: &str) -> Result<String, String> {
    let path = dir.join("latprobe.toml");
    let content = format!(
        r#"
[measurement]
timeout = "2s"
requests = 2
retries = 2

[storage]
data_dir = "{data}"

[report]
reports_dir = "{reports}"
chart_width = 640
chart_height = 360

[exchanges.local]
name = "Local"
description = "Local test exchange"

[exchanges.local.endpoints.market_data]
url = "{url}/ticker"

[exchanges.local.endpoints.book]
url = "{url}/book"
"#,
        data = dir.join("data").display(),
        reports = dir.join("reports").display(),
        url = url
    );
    std::fs::write(&path, content).map_err(|err| format!("write config failed: {}", err))?;
    Ok(path.to_string_lossy().into_owned())
}

/// Run the `latprobe` binary in `cwd` and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_latprobe<I, S>(cwd: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = latprobe_bin()?;
    Command::new(bin)
        .current_dir(cwd)
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("LATPROBE_LOG")
        .env_remove("NO_COLOR")
        .output()
        .map_err(|err| format!("run latprobe failed: {}", err))
}

fn latprobe_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_latprobe").map_or_else(
        || Err("CARGO_BIN_EXE_latprobe missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
