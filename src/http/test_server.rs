use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Local HTTP server answering each connection with the next scripted status.
/// The last status repeats once the script runs out.
pub(crate) struct ScriptedServer {
    pub(crate) url: String,
    hits: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScriptedServer {
    pub(crate) fn start(statuses: &[u16]) -> Result<Self, String> {
        Self::start_with_delay(statuses, Duration::ZERO)
    }

    pub(crate) fn start_with_delay(statuses: &[u16], delay: Duration) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind test server failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("server addr failed: {}", err))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| format!("set_nonblocking failed: {}", err))?;

        let script = Arc::new(Mutex::new(statuses.iter().copied().collect::<VecDeque<u16>>()));
        let hits = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let thread_hits = Arc::clone(&hits);
        let thread_stop = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        thread_hits.fetch_add(1, Ordering::Relaxed);
                        let status = next_status(&script);
                        thread::spawn(move || handle_client(stream, status, delay));
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            url: format!("http://{}", addr),
            hits,
            stop,
            thread: Some(handle),
        })
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

fn next_status(script: &Mutex<VecDeque<u16>>) -> u16 {
    let Ok(mut queue) = script.lock() else {
        return 500;
    };
    if queue.len() > 1 {
        queue.pop_front().unwrap_or(500)
    } else {
        queue.front().copied().unwrap_or(200)
    }
}

fn handle_client(stream: TcpStream, status: u16, delay: Duration) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if line == "\r\n" || line == "\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
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

/// Returns a URL on a port with nothing listening.
pub(crate) fn refused_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}", addr))
}
