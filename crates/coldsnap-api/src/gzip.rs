//! Gzip and deflate helpers for request and response bodies.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use flate2::write::GzEncoder;

use crate::error::{ApiError, ApiResult};

/// Compress bytes into a gzip stream.
///
/// # Errors
///
/// Returns [`ApiError::Compression`] if the encoder fails.
pub fn compress(data: &[u8]) -> ApiResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|source| ApiError::Compression {
            operation: "compress",
            source,
        })?;
    encoder.finish().map_err(|source| ApiError::Compression {
        operation: "compress",
        source,
    })
}

/// Compress a UTF-8 string into a gzip stream.
///
/// # Errors
///
/// See [`compress`].
pub fn compress_str(data: &str) -> ApiResult<Vec<u8>> {
    compress(data.as_bytes())
}

/// Decompress a gzip stream.
///
/// # Errors
///
/// Returns [`ApiError::Compression`] if `data` is not a valid gzip stream.
pub fn decompress(data: &[u8]) -> ApiResult<Vec<u8>> {
    read_all(GzDecoder::new(data), "decompress")
}

/// Decompress a gzip stream into a UTF-8 string.
///
/// # Errors
///
/// Returns [`ApiError::Compression`] if the stream is invalid or the payload
/// is not UTF-8.
pub fn decompress_to_string(data: &[u8]) -> ApiResult<String> {
    let bytes = decompress(data)?;
    String::from_utf8(bytes).map_err(|err| ApiError::Compression {
        operation: "decode",
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
    })
}

/// Inflate a `deflate` content-encoded body.
///
/// Servers disagree on whether `deflate` means zlib-wrapped or raw; a zlib
/// header is tried first and raw deflate is the fallback.
///
/// # Errors
///
/// Returns [`ApiError::Compression`] if neither form decodes.
pub fn inflate(data: &[u8]) -> ApiResult<Vec<u8>> {
    read_all(ZlibDecoder::new(data), "inflate")
        .or_else(|_| read_all(DeflateDecoder::new(data), "inflate"))
}

fn read_all(mut reader: impl Read, operation: &'static str) -> ApiResult<Vec<u8>> {
    let mut output = Vec::new();
    reader
        .read_to_end(&mut output)
        .map_err(|source| ApiError::Compression { operation, source })?;
    Ok(output)
}
