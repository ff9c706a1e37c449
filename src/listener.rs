use crate::config;
use anyhow::{Context, Result};
use colored::*;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, error};

/// One received datagram, decoded for display and then forgotten.
pub struct DatagramEvent {
    pub len: usize,
    pub sender: SocketAddr,
    pub text: String,
    pub replacements: usize,
}

impl DatagramEvent {
    pub fn new(payload: &[u8], sender: SocketAddr) -> Self {
        let (text, replacements) = decode_lossy(payload);
        Self {
            len: payload.len(),
            sender,
            text,
            replacements,
        }
    }

    /// The three-line block printed for every datagram.
    pub fn render(&self) -> String {
        format!(
            "Received {} bytes from {}:\n{}\n{}\n",
            self.len,
            format_sender(&self.sender),
            self.text,
            config::separator()
        )
    }
}

/// Decode a payload as UTF-8, substituting U+FFFD for each invalid
/// sequence. Returns the display string and how many substitutions
/// were made. Never fails, whatever the bytes are.
pub fn decode_lossy(payload: &[u8]) -> (String, usize) {
    let mut out = String::with_capacity(payload.len());
    let mut replacements = 0;
    let mut rest = payload;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap());
                out.push('\u{FFFD}');
                replacements += 1;

                // error_len is None only when the payload ends mid-sequence.
                let skip = e.error_len().unwrap_or(after.len());
                rest = &after[skip..];
                if rest.is_empty() {
                    break;
                }
            }
        }
    }

    (out, replacements)
}

/// Sender tuple in the reference tool's rendering: ('10.0.0.5', 12345)
pub fn format_sender(addr: &SocketAddr) -> String {
    format!("('{}', {})", addr.ip(), addr.port())
}

/// Running counters for the session summary printed at shutdown.
#[derive(Default)]
pub struct SessionStats {
    pub datagrams: usize,
    pub bytes: usize,
    pub undecodable: usize,
}

impl SessionStats {
    pub fn record(&mut self, event: &DatagramEvent) {
        self.datagrams += 1;
        self.bytes += event.len;
        if event.replacements > 0 {
            self.undecodable += 1;
        }
    }

    pub fn print_summary(&self) {
        println!("\n{}", "📊 Session Summary".bold().underline().blue());
        println!("{}", "────────────────────────────".blue());
        println!("{} {}", "📦 Datagrams received: ".cyan(), self.datagrams.to_string().bold());
        println!("{} {}", "📨 Payload bytes:      ".cyan(), self.bytes.to_string().bold());
        println!("{} {}", "❗ With invalid UTF-8:  ".red(), self.undecodable.to_string().bold());
        println!("{}", "────────────────────────────".blue());
    }
}

/// Owns the bound UDP socket for the lifetime of the receive loop.
pub struct Listener {
    socket: UdpSocket,
    local: SocketAddr,
}

impl Listener {
    /// Bind to the requested endpoint. An address that is in use or not
    /// assigned to a local interface fails here, before any receive.
    pub async fn bind(address: Ipv4Addr, port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((address, port))
            .await
            .with_context(|| format!("failed to bind UDP socket to {}:{}", address, port))?;
        let local = socket.local_addr()?;
        debug!("🔌 bound UDP socket to {}", local);
        Ok(Self { socket, local })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// One blocking receive. The buffer must be large enough for a full
    /// datagram; anything beyond it would be truncated by the OS.
    pub async fn recv_event(&self, buf: &mut [u8]) -> std::io::Result<DatagramEvent> {
        let (len, sender) = self.socket.recv_from(buf).await?;
        Ok(DatagramEvent::new(&buf[..len], sender))
    }

    /// Receive loop: one datagram at a time, fully printed before the
    /// next receive is issued. Only cancellation ends it.
    pub async fn run(&self, stats: &mut SessionStats) -> Result<()> {
        let mut buf = vec![0u8; config::MAX_DATAGRAM_SIZE];
        loop {
            match self.recv_event(&mut buf).await {
                Ok(event) => {
                    print!("{}", event.render());
                    stats.record(&event);
                }
                Err(e) => {
                    error!("❌ UDP recv error: {}", e);
                    continue;
                }
            }
        }
    }

    /// Consuming the listener closes the socket; the port is immediately
    /// rebindable afterwards.
    pub fn shutdown(self) {
        debug!("🔌 closing UDP socket bound to {}", self.local);
        drop(self.socket);
    }
}
