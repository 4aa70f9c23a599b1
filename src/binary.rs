// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary persistence for the occurrence and LCP tables.
//!
//! Each persisted structure is a self-contained section:
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ HEADER (16 bytes)                          │
//! │   magic: [u8; 4] = "FMSQ"                  │
//! │   version: u8 = 1                          │
//! │   kind: u8 (occ / lcp values / lcp x)      │
//! │   mode: i8 (lcp storage mode, 0 for occ)   │
//! │   reserved: u8                             │
//! │   elements: u64 LE                         │
//! ├────────────────────────────────────────────┤
//! │ PAYLOAD (elements * element size)          │
//! ├────────────────────────────────────────────┤
//! │ FOOTER (8 bytes)                           │
//! │   crc32: u32 LE over header + payload      │
//! │   magic: [u8; 4] = "QSMF"                  │
//! └────────────────────────────────────────────┘
//! ```
//!
//! The element size is fixed by the kind and mode, so a load can validate
//! the element count against the sequence length before touching the
//! payload. Any mismatch, bad magic or CRC failure is reported as
//! `InvalidData`; a truncated or corrupted file never yields a partial
//! structure.
//!
//! The sequence itself and its manifest travel as a JSON sidecar
//! ([`write_manifest`] / [`read_manifest`]); the raw text is cheap to
//! re-encode and keeping it human-readable aids debugging.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;
use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, SeqEntry};
use crate::lcp::{LcpMode, LcpTable};
use crate::occ::OccTable;

/// Section magic: "FMSQ".
pub const MAGIC: [u8; 4] = *b"FMSQ";

/// Footer magic: "QSMF" (reversed, marks a complete section).
pub const FOOTER_MAGIC: [u8; 4] = *b"QSMF";

/// Current format version.
pub const VERSION: u8 = 1;

const HEADER_SIZE: usize = 16;
const FOOTER_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Occ = 0,
    LcpValues = 1,
    LcpExceptions = 2,
}

impl SectionKind {
    fn from_byte(b: u8) -> Option<SectionKind> {
        match b {
            0 => Some(SectionKind::Occ),
            1 => Some(SectionKind::LcpValues),
            2 => Some(SectionKind::LcpExceptions),
            _ => None,
        }
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Write one framed section: header, payload, CRC footer.
fn write_section<W: Write>(
    w: &mut W,
    kind: SectionKind,
    mode: i8,
    elements: u64,
    payload: &[u8],
) -> io::Result<()> {
    let mut header = [0u8; HEADER_SIZE];
    header[..4].copy_from_slice(&MAGIC);
    header[4] = VERSION;
    header[5] = kind as u8;
    header[6] = mode as u8;
    header[8..16].copy_from_slice(&elements.to_le_bytes());

    let mut hasher = Crc32Hasher::new();
    hasher.update(&header);
    hasher.update(payload);

    w.write_all(&header)?;
    w.write_all(payload)?;
    w.write_all(&hasher.finalize().to_le_bytes())?;
    w.write_all(&FOOTER_MAGIC)?;
    Ok(())
}

/// Element width implied by a section's kind and stored mode byte.
fn element_size(kind: SectionKind, mode: i8) -> io::Result<usize> {
    match kind {
        SectionKind::Occ => Ok(8),
        SectionKind::LcpExceptions => Ok(16),
        SectionKind::LcpValues => match LcpMode::from_code(mode) {
            Some(m) => Ok(lcp_element_size(m)),
            None => Err(invalid(format!("unknown lcp mode {}", mode))),
        },
    }
}

/// Read one framed section, validating magic, version, kind, element count
/// and the CRC before returning the payload.
fn read_section<R: Read>(r: &mut R, kind: SectionKind) -> io::Result<(i8, u64, Vec<u8>)> {
    let mut header = [0u8; HEADER_SIZE];
    r.read_exact(&mut header)?;
    if header[..4] != MAGIC {
        return Err(invalid(format!(
            "invalid section magic: expected FMSQ, got {:?}",
            &header[..4]
        )));
    }
    if header[4] != VERSION {
        return Err(invalid(format!(
            "unsupported format version {} (expected {})",
            header[4], VERSION
        )));
    }
    match SectionKind::from_byte(header[5]) {
        Some(k) if k == kind => {}
        _ => {
            return Err(invalid(format!(
                "wrong section kind {} (expected {})",
                header[5], kind as u8
            )))
        }
    }
    let mode = header[6] as i8;
    let elements = u64::from_le_bytes(header[8..16].try_into().expect("8 header bytes"));

    let payload_len = (elements as usize)
        .checked_mul(element_size(kind, mode)?)
        .ok_or_else(|| invalid(format!("element count {} overflows", elements)))?;
    let mut payload = vec![0u8; payload_len];
    r.read_exact(&mut payload)?;

    let mut footer = [0u8; FOOTER_SIZE];
    r.read_exact(&mut footer)?;
    if footer[4..] != FOOTER_MAGIC {
        return Err(invalid(format!(
            "invalid footer magic: expected QSMF, got {:?}",
            &footer[4..]
        )));
    }
    let stored = u32::from_le_bytes(footer[..4].try_into().expect("4 crc bytes"));
    let mut hasher = Crc32Hasher::new();
    hasher.update(&header);
    hasher.update(&payload);
    let computed = hasher.finalize();
    if stored != computed {
        return Err(invalid(format!(
            "CRC mismatch: stored {:08x}, computed {:08x}",
            stored, computed
        )));
    }
    Ok((mode, elements, payload))
}

fn u64s_to_bytes(values: &[u64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn bytes_to_u64s(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().expect("chunk of 8")))
        .collect()
}

// =============================================================================
// OCC TABLE
// =============================================================================

impl OccTable {
    /// Persist the checkpoint array followed by the `less` array.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut payload = u64s_to_bytes(self.checkpoints());
        payload.extend(u64s_to_bytes(self.less_table()));
        let elements = (self.checkpoints().len() + self.less_table().len()) as u64;
        write_section(w, SectionKind::Occ, 0, elements, &payload)
    }

    /// Load a table persisted by [`OccTable::write_to`]. The BWT is supplied
    /// by the caller (it is rebuilt from the position array); the element
    /// count is validated against its length and `occrate` before use.
    pub fn read_from<R: Read>(
        r: &mut R,
        bwt: Vec<u8>,
        alphabet: &Alphabet,
        occrate: usize,
    ) -> io::Result<OccTable> {
        let regulars = alphabet.regulars();
        let rows = bwt.len().div_ceil(occrate);
        let expected = (regulars * rows + regulars) as u64;
        let (_, elements, payload) = read_section(r, SectionKind::Occ)?;
        if elements != expected {
            return Err(invalid(format!(
                "occ table holds {} elements, expected {} for n={} occrate={}",
                elements,
                expected,
                bwt.len(),
                occrate
            )));
        }
        let values = bytes_to_u64s(&payload);
        let (checkpoints, less) = values.split_at(regulars * rows);
        Ok(OccTable::from_parts(
            bwt,
            alphabet,
            occrate,
            checkpoints.to_vec(),
            less.to_vec(),
        ))
    }
}

// =============================================================================
// LCP TABLE
// =============================================================================

fn lcp_element_size(mode: LcpMode) -> usize {
    match mode {
        LcpMode::Full => 8,
        LcpMode::Byte | LcpMode::ByteRaw => 1,
        LcpMode::Word | LcpMode::WordRaw => 2,
    }
}

impl LcpTable {
    /// Persist the compact value array to `fv` and, for modes with
    /// exceptions, the interleaved `(rank, value)` exception stream to `fx`.
    pub fn write_to<W: Write>(&self, fv: &mut W, fx: Option<&mut W>) -> io::Result<()> {
        let mode = self.mode();
        let payload = self.raw_bytes();
        write_section(
            fv,
            SectionKind::LcpValues,
            mode.code(),
            self.len() as u64,
            &payload,
        )?;
        if let Some(fx) = fx {
            if !mode.has_exceptions() {
                return Err(invalid(format!(
                    "lcp mode {} has no exception stream",
                    mode.code()
                )));
            }
            let (xind, xval) = self.raw_parts();
            let mut xpayload = Vec::with_capacity(xind.len() * 16);
            for (&i, &v) in xind.iter().zip(xval) {
                xpayload.extend_from_slice(&i.to_le_bytes());
                xpayload.extend_from_slice(&v.to_le_bytes());
            }
            write_section(
                fx,
                SectionKind::LcpExceptions,
                mode.code(),
                xind.len() as u64,
                &xpayload,
            )?;
        } else if mode.has_exceptions() {
            return Err(invalid(format!(
                "lcp mode {} requires an exception stream",
                mode.code()
            )));
        }
        Ok(())
    }

    /// Load a table persisted by [`LcpTable::write_to`]. Validates the
    /// stored mode against `mode`, the value count against `n`, and that an
    /// exception stream is present exactly for the modes that use one.
    pub fn read_from<R: Read>(
        fv: &mut R,
        fx: Option<&mut R>,
        mode: LcpMode,
        n: usize,
    ) -> io::Result<LcpTable> {
        let (stored_mode, elements, payload) =
            read_section(fv, SectionKind::LcpValues)?;
        if stored_mode != mode.code() {
            return Err(invalid(format!(
                "lcp value stream has mode {}, expected {}",
                stored_mode,
                mode.code()
            )));
        }
        if elements as usize != n {
            return Err(invalid(format!(
                "lcp table holds {} values, expected {}",
                elements, n
            )));
        }
        let (xind, xval) = match (fx, mode.has_exceptions()) {
            (Some(fx), true) => {
                let (xmode, xcount, xpayload) = read_section(fx, SectionKind::LcpExceptions)?;
                if xmode != mode.code() {
                    return Err(invalid(format!(
                        "lcp exception stream has mode {}, expected {}",
                        xmode,
                        mode.code()
                    )));
                }
                let mut xind = Vec::with_capacity(xcount as usize);
                let mut xval = Vec::with_capacity(xcount as usize);
                for pair in xpayload.chunks_exact(16) {
                    xind.push(u64::from_le_bytes(pair[..8].try_into().expect("8 bytes")));
                    xval.push(i64::from_le_bytes(pair[8..].try_into().expect("8 bytes")));
                }
                if !xind.windows(2).all(|w| w[0] < w[1]) {
                    return Err(invalid(
                        "lcp exception ranks are not strictly ascending".to_string(),
                    ));
                }
                (xind, xval)
            }
            (None, false) => (Vec::new(), Vec::new()),
            (Some(_), false) => {
                return Err(invalid(format!(
                    "lcp mode {} must not carry an exception stream",
                    mode.code()
                )))
            }
            (None, true) => {
                return Err(invalid(format!(
                    "lcp mode {} requires an exception stream",
                    mode.code()
                )))
            }
        };
        Ok(LcpTable::from_raw(mode, payload, xind, xval))
    }
}

// =============================================================================
// MANIFEST SIDECAR
// =============================================================================

#[derive(Serialize, Deserialize)]
struct ManifestSidecar {
    alphabet: Alphabet,
    manifest: Vec<SeqEntry>,
}

/// Write the alphabet and manifest as a JSON sidecar.
pub fn write_manifest<W: Write>(
    w: &mut W,
    alphabet: &Alphabet,
    manifest: &[SeqEntry],
) -> io::Result<()> {
    let sidecar = ManifestSidecar {
        alphabet: alphabet.clone(),
        manifest: manifest.to_vec(),
    };
    serde_json::to_writer_pretty(w, &sidecar)
        .map_err(|e| invalid(format!("manifest serialization failed: {}", e)))
}

/// Read a sidecar written by [`write_manifest`], validating the alphabet.
pub fn read_manifest<R: Read>(r: &mut R) -> io::Result<(Alphabet, Vec<SeqEntry>)> {
    let sidecar: ManifestSidecar = serde_json::from_reader(r)
        .map_err(|e| invalid(format!("manifest deserialization failed: {}", e)))?;
    sidecar
        .alphabet
        .validate()
        .map_err(|e| invalid(format!("manifest carries an invalid alphabet: {}", e)))?;
    Ok((sidecar.alphabet, sidecar.manifest))
}
