//! Binary snapshot adapter
//!
//! ## Frame Format
//! ```text
//! ┌───────────┬─────────┬─────────┬──────────────────────────────┐
//! │ Magic (4) │ CRC (4) │ Len (4) │ bincode(key → Encoded map)   │
//! └───────────┴─────────┴─────────┴──────────────────────────────┘
//! ```
//! CRC32 covers the payload only. All integers are big-endian.

use std::collections::BTreeMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::Encoded;
use crate::error::{KvError, Result};
use crate::store::{ImportOptions, Store};

/// Frame magic
pub const MAGIC: [u8; 4] = *b"AKV1";

/// Header size: magic + crc + length
pub const HEADER_SIZE: usize = 12;

/// Encode a snapshot into a checksummed frame
pub fn encode_snapshot(entries: &BTreeMap<String, Encoded>) -> Result<Bytes> {
    let payload = bincode::serialize(entries)?;
    let len = u32::try_from(payload.len())
        .map_err(|_| KvError::Codec(format!("Snapshot too large: {} bytes", payload.len())))?;

    let mut frame = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    frame.put_slice(&MAGIC);
    frame.put_u32(crc32fast::hash(&payload));
    frame.put_u32(len);
    frame.put_slice(&payload);

    Ok(frame.freeze())
}

/// Decode a frame, rejecting bad magic, oversized payloads, or CRC mismatch
pub fn decode_snapshot(bytes: &[u8], max_frame_size: u32) -> Result<BTreeMap<String, Encoded>> {
    if bytes.len() < HEADER_SIZE {
        return Err(KvError::Codec(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut buf = bytes;
    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if magic != MAGIC {
        return Err(KvError::Codec(format!("Bad magic: {:02x?}", magic)));
    }

    let expected_crc = buf.get_u32();
    let len = buf.get_u32();

    if len > max_frame_size {
        return Err(KvError::Codec(format!(
            "Payload too large: {} bytes (max {})",
            len, max_frame_size
        )));
    }

    let len = len as usize;
    if buf.remaining() != len {
        return Err(KvError::Codec(format!(
            "Payload length mismatch: header says {}, got {}",
            len,
            buf.remaining()
        )));
    }

    let actual_crc = crc32fast::hash(buf);
    if actual_crc != expected_crc {
        return Err(KvError::Codec(format!(
            "CRC mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }

    Ok(bincode::deserialize(buf)?)
}

impl Store {
    /// Export every key as a binary snapshot frame
    pub fn export_binary(&self) -> Result<Bytes> {
        encode_snapshot(&self.export())
    }

    /// Import a binary snapshot frame
    pub fn import_binary(&self, bytes: &[u8], opts: ImportOptions) -> Result<()> {
        let entries = decode_snapshot(bytes, self.config().max_frame_size)?;
        self.import(entries, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;

    fn sample() -> BTreeMap<String, Encoded> {
        let mut entries = BTreeMap::new();
        entries.insert("greeting".to_string(), Encoded::new("string", Datum::from("hi")));
        entries.insert(
            "todo".to_string(),
            Encoded::new("list", Datum::from(vec!["a", "b"])),
        );
        entries
    }

    #[test]
    fn test_frame_layout() {
        let frame = encode_snapshot(&sample()).unwrap();
        assert_eq!(&frame[..4], &MAGIC);
        let len = u32::from_be_bytes([frame[8], frame[9], frame[10], frame[11]]) as usize;
        assert_eq!(frame.len(), HEADER_SIZE + len);
    }

    #[test]
    fn test_decode_restores_entries() {
        let frame = encode_snapshot(&sample()).unwrap();
        let decoded = decode_snapshot(&frame, u32::MAX).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let mut frame = encode_snapshot(&sample()).unwrap().to_vec();
        let last = frame.len() - 1;
        frame[last] ^= 0xff;

        let err = decode_snapshot(&frame, u32::MAX).unwrap_err();
        assert!(err.to_string().contains("CRC mismatch"));
    }

    #[test]
    fn test_truncated_frame_rejected() {
        let frame = encode_snapshot(&sample()).unwrap();
        assert!(decode_snapshot(&frame[..frame.len() - 1], u32::MAX).is_err());
        assert!(decode_snapshot(&frame[..5], u32::MAX).is_err());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let frame = encode_snapshot(&sample()).unwrap();
        let err = decode_snapshot(&frame, 4).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut frame = encode_snapshot(&sample()).unwrap().to_vec();
        frame[0] = b'X';
        assert!(decode_snapshot(&frame, u32::MAX).is_err());
    }
}
