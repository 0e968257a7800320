use bytes::{Buf, BytesMut};

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{SiloMessage, MAX_MESSAGE_SIZE};

const FRAME_HEADER: usize = 5;

/// Codec for framed stream messages: `[4 bytes len BE][1 byte tag][bincode]`.
///
/// `len` counts the tag byte plus the payload.
pub struct WireCodec;

impl WireCodec {
    pub fn encode(msg: &SiloMessage) -> ProtocolResult<Vec<u8>> {
        let payload =
            bincode::serialize(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let len = (payload.len() + 1) as u32;
        let mut buf = Vec::with_capacity(FRAME_HEADER + payload.len());
        buf.extend_from_slice(&len.to_be_bytes());
        buf.push(msg.type_tag());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Decode one complete frame. Returns (message, bytes_consumed).
    pub fn decode(data: &[u8]) -> ProtocolResult<(SiloMessage, usize)> {
        match Self::frame_len(data)? {
            Some(total) => Ok((Self::decode_body(&data[4..total])?, total)),
            None => Err(ProtocolError::FramingError(format!(
                "incomplete frame: have {} bytes",
                data.len()
            ))),
        }
    }

    /// Decode the next frame from a streaming buffer, consuming it.
    ///
    /// Returns `Ok(None)` while the buffer holds less than a full frame.
    pub fn decode_from(buf: &mut BytesMut) -> ProtocolResult<Option<SiloMessage>> {
        let Some(total) = Self::frame_len(buf)? else {
            return Ok(None);
        };
        let msg = Self::decode_body(&buf[4..total])?;
        buf.advance(total);
        Ok(Some(msg))
    }

    /// Total frame length if `data` holds a whole frame.
    fn frame_len(data: &[u8]) -> ProtocolResult<Option<usize>> {
        if data.len() < 4 {
            return Ok(None);
        }
        let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if len < 1 {
            return Err(ProtocolError::FramingError("zero-length frame".into()));
        }
        if len - 1 > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: len - 1,
                max: MAX_MESSAGE_SIZE,
            });
        }
        let total = 4 + len;
        Ok((data.len() >= total).then_some(total))
    }

    /// `body` is the tag byte followed by the payload.
    fn decode_body(body: &[u8]) -> ProtocolResult<SiloMessage> {
        let tag = body[0];
        let msg: SiloMessage = bincode::deserialize(&body[1..])
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        if msg.type_tag() != tag {
            return Err(ProtocolError::InvalidMessageType(tag));
        }
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::*;
    use silo_crypto::SigningKey;
    use silo_store::{Header, Object};
    use silo_types::{ContainerId, ObjectId};

    fn object() -> Object {
        let key = SigningKey::generate();
        let header = Header::new(ContainerId::from_hash([1; 32]), key.verifying_key().to_owner_id());
        Object::signed(header, b"first".to_vec(), &key).unwrap()
    }

    #[test]
    fn put_init_roundtrip() {
        let msg = SiloMessage::Put(PutRequest::init(object(), None));
        let encoded = WireCodec::encode(&msg).unwrap();
        let (decoded, consumed) = WireCodec::decode(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, msg);
    }

    #[test]
    fn type_tags_unique() {
        let msgs = [
            SiloMessage::Put(PutRequest::chunk(vec![])),
            SiloMessage::PutResponse(PutResponse { id: ObjectId::null() }),
            SiloMessage::Get(GetPart::Chunk(vec![])),
            SiloMessage::RangeChunk(vec![]),
            SiloMessage::Error(ErrorResponse::new("x", "y")),
        ];
        let mut tags: Vec<u8> = msgs.iter().map(|m| m.type_tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), msgs.len());
    }

    #[test]
    fn decode_from_waits_for_full_frames() {
        let a = WireCodec::encode(&SiloMessage::Put(PutRequest::chunk(b"abc".to_vec()))).unwrap();
        let b = WireCodec::encode(&SiloMessage::RangeChunk(b"def".to_vec())).unwrap();
        let mut stream: Vec<u8> = a.clone();
        stream.extend_from_slice(&b);

        let mut buf = BytesMut::new();
        let mut out = Vec::new();
        // Feed three bytes at a time, as a network read might.
        for piece in stream.chunks(3) {
            buf.extend_from_slice(piece);
            while let Some(msg) = WireCodec::decode_from(&mut buf).unwrap() {
                out.push(msg);
            }
        }
        assert!(buf.is_empty());
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], SiloMessage::RangeChunk(b"def".to_vec()));
    }

    #[test]
    fn decode_truncated() {
        let err = WireCodec::decode(&[0, 0, 0]).unwrap_err();
        assert!(matches!(err, ProtocolError::FramingError(_)));
    }

    #[test]
    fn decode_zero_length() {
        let data = [0u8, 0, 0, 0, 0];
        let err = WireCodec::decode(&data).unwrap_err();
        assert!(matches!(err, ProtocolError::FramingError(_)));
    }

    #[test]
    fn oversized_frame_rejected_before_buffering() {
        let mut buf = BytesMut::from(&[0xFFu8, 0xFF, 0xFF, 0xFF][..]);
        assert!(matches!(
            WireCodec::decode_from(&mut buf),
            Err(ProtocolError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn tag_mismatch_rejected() {
        let mut encoded = WireCodec::encode(&SiloMessage::RangeChunk(vec![1])).unwrap();
        encoded[4] = 9;
        assert!(matches!(
            WireCodec::decode(&encoded),
            Err(ProtocolError::InvalidMessageType(9))
        ));
    }
}
