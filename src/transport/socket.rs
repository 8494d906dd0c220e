//! TCP connection setup for the plotting backend.

use std::net::{TcpStream, ToSocketAddrs};

use tracing::{debug, instrument};

use super::{TransportConfig, TransportError};

/// Resolve the configured endpoint and connect to the first address that accepts.
#[instrument(level = "debug", skip(config), fields(endpoint = %config.endpoint()))]
pub(crate) fn connect(config: &TransportConfig) -> Result<TcpStream, TransportError> {
    let endpoint = config.endpoint();
    let addrs = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            endpoint: endpoint.clone(),
            source,
        })?;

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                configure(&stream, config)?;
                debug!(%addr, "connected to plot backend");
                return Ok(stream);
            }
            Err(source) => {
                debug!(%addr, error = %source, "connect attempt failed");
                last_error = Some(TransportError::Connect { addr, source });
            }
        }
    }

    Err(last_error.unwrap_or(TransportError::NoAddress { endpoint }))
}

fn configure(stream: &TcpStream, config: &TransportConfig) -> Result<(), TransportError> {
    stream
        .set_nodelay(config.nodelay)
        .map_err(TransportError::Configure)?;
    stream
        .set_write_timeout(config.write_timeout)
        .map_err(TransportError::Configure)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Duration;

    #[test]
    fn test_connect_applies_options() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = TransportConfig {
            write_timeout: Some(Duration::from_secs(2)),
            ..TransportConfig::new("127.0.0.1", port)
        };
        let stream = connect(&config).unwrap();

        assert!(stream.nodelay().unwrap());
        assert_eq!(stream.write_timeout().unwrap(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_connect_refused_is_reported() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = connect(&TransportConfig::new("127.0.0.1", port));
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }
}
