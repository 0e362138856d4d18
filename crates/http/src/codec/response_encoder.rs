use crate::codec::header::HeaderEncoder;
use crate::protocol::{Response, SendError};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;

/// Serializes a [`Response`] into its exact wire bytes.
///
/// The head and the body can also be produced separately with
/// [`ResponseEncoder::encode_head`], which is how a session writes them as two
/// consecutive operations.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Writes the status line, the headers and the terminating blank line.
    pub fn encode_head(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), SendError> {
        self.header_encoder.encode(response, dst)
    }

    /// Convenience for encoding a whole response into a fresh buffer.
    pub fn serialize(response: &Response) -> Result<Bytes, SendError> {
        let mut dst = BytesMut::new();
        <Self as Encoder<&Response>>::encode(&mut Self::new(), response, &mut dst)?;
        Ok(dst.freeze())
    }
}

impl Encoder<&Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode_head(response, dst)?;
        if let Some(body) = response.body() {
            dst.extend_from_slice(body);
        }
        Ok(())
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Response>>::encode(self, &response, dst)
    }
}
