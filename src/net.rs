use anyhow::{Context, Result};
use tokio::net::UdpSocket;
use tracing::debug;

/// Fire `count` copies of the payload at a peer from an ephemeral port.
/// Companion to the listen mode, for exercising it end to end.
pub async fn send_datagrams(peer: &str, payload: &[u8], count: u32) -> Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("failed to bind ephemeral UDP socket")?;
    debug!("🔌 sending from {}", socket.local_addr()?);

    socket
        .connect(peer)
        .await
        .with_context(|| format!("failed to resolve peer {}", peer))?;

    for i in 1..=count {
        let n = socket
            .send(payload)
            .await
            .with_context(|| format!("failed to send datagram {} of {}", i, count))?;
        println!("📤 Sent {} bytes to {}", n, peer);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reaches_local_listener() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer = receiver.local_addr().unwrap().to_string();

        send_datagrams(&peer, b"ping", 1).await.unwrap();

        let mut buf = [0u8; 64];
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");
    }

    #[tokio::test]
    async fn test_send_repeats_payload() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer = receiver.local_addr().unwrap().to_string();

        send_datagrams(&peer, b"x", 3).await.unwrap();

        let mut buf = [0u8; 64];
        for _ in 0..3 {
            let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"x");
        }
    }

    #[tokio::test]
    async fn test_send_to_unresolvable_peer_fails() {
        let result = send_datagrams("not-an-endpoint", b"ping", 1).await;
        assert!(result.is_err());
    }
}
