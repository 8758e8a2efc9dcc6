use std::net::TcpStream;

/// Serves one accepted client on the listener thread.
///
/// The stream already carries the exchange timeout. The listener does not
/// accept the next client until `handle` returns.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    fn handle(&self, stream: TcpStream);
}
