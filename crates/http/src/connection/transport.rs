//! The byte transport a session runs on.
//!
//! Every operation completes asynchronously and reports its outcome exactly once.
//! A session never has more than one of them outstanding.

use std::io;
use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Reads some bytes into the spare capacity of `buf`, returning how many.
    ///
    /// `Ok(0)` means the peer closed its side of the stream.
    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize>;

    /// Writes all of `bytes`; a partial write is reported as an error.
    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Releases the underlying connection.
    async fn close(&mut self) -> io::Result<()>;

    fn local_addr(&self) -> SocketAddr;

    fn remote_addr(&self) -> SocketAddr;
}

/// [`Transport`] over any tokio byte stream, such as a [`TcpStream`].
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: S,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl<S> StreamTransport<S> {
    pub fn new(stream: S, local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self { stream, local_addr, remote_addr }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl StreamTransport<TcpStream> {
    pub fn from_tcp(stream: TcpStream) -> io::Result<Self> {
        let local_addr = stream.local_addr()?;
        let remote_addr = stream.peer_addr()?;
        Ok(Self::new(stream, local_addr, remote_addr))
    }
}

impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        self.stream.read_buf(buf).await
    }

    async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn stream_transport_over_duplex() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let (client, server) = duplex(64);
        let mut transport = StreamTransport::new(server, addr, addr);
        let mut client = client;

        client.write_all(b"ping").await.unwrap();
        let mut buf = BytesMut::with_capacity(16);
        let n = Transport::read(&mut transport, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");

        Transport::write_all(&mut transport, b"pong").await.unwrap();
        let mut reply = [0u8; 4];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(&reply, b"pong");

        Transport::close(&mut transport).await.unwrap();
        let mut rest = Vec::new();
        assert_eq!(client.read_to_end(&mut rest).await.unwrap(), 0);
        assert_eq!(Transport::local_addr(&transport), addr);
    }
}
