use std::net::Ipv4Addr;

pub const DEFAULT_BIND_ADDR: &str = "192.168.2.10";
pub const DEFAULT_BIND_PORT: u16 = 40000;

// Largest payload a single UDP/IPv4 datagram can carry.
pub const MAX_DATAGRAM_SIZE: usize = 65535;

pub const SEPARATOR_WIDTH: usize = 40;
pub const SEPARATOR_CHAR: char = '-';

pub const DEFAULT_SEND_MESSAGE: &str = "hello";

pub fn separator() -> String {
    SEPARATOR_CHAR.to_string().repeat(SEPARATOR_WIDTH)
}

pub fn default_bind_addr() -> Ipv4Addr {
    DEFAULT_BIND_ADDR.parse().expect("default bind address is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_shape() {
        let sep = separator();
        assert_eq!(sep.len(), 40);
        assert!(sep.chars().all(|c| c == '-'));
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(default_bind_addr(), Ipv4Addr::new(192, 168, 2, 10));
        assert_eq!(DEFAULT_BIND_PORT, 40000);
    }

    #[test]
    fn test_max_datagram_size() {
        assert_eq!(MAX_DATAGRAM_SIZE, u16::MAX as usize);
    }
}
