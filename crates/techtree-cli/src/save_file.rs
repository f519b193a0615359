//! Reading game save files.
//!
//! Saves are JSON, stored either plain or compressed. The compression is
//! recognised from the leading bytes rather than the file extension.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::{GzDecoder, ZlibDecoder};
use techtree_logic::FinishedResearch;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompress (if needed) and decode a save into text.
pub fn decode<R: Read>(mut reader: R) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut text = String::new();
    if bytes.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut text)?;
    } else if is_zlib_header(&bytes) {
        ZlibDecoder::new(bytes.as_slice()).read_to_string(&mut text)?;
    } else {
        text = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    }
    Ok(text)
}

/// Deflate method with a valid header checksum (RFC 1950).
fn is_zlib_header(bytes: &[u8]) -> bool {
    match bytes {
        [cmf, flg, ..] => {
            (cmf & 0x0f) == 8 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0
        }
        _ => false,
    }
}

/// Finished technologies and projects of the human player in a save.
pub fn read_finished_research(path: &Path) -> Result<FinishedResearch> {
    let file = File::open(path).with_context(|| format!("opening save {}", path.display()))?;
    let text = decode(BufReader::new(file))
        .with_context(|| format!("decoding save {}", path.display()))?;
    let finished = FinishedResearch::from_save_json(&text)
        .with_context(|| format!("reading finished research from {}", path.display()))?;
    log::debug!(
        "save lists {} technologies and {} projects",
        finished.technologies.len(),
        finished.projects.len()
    );
    Ok(finished)
}
