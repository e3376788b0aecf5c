//! NumPy `.npy` serialization of raw bytes.
//!
//! Writes format version 1.0 holding a one-dimensional `uint8` array, the
//! same bytes `numpy.save` produces for `np.frombuffer(data, np.uint8)`.

const MAGIC: &[u8] = b"\x93NUMPY";
const VERSION: [u8; 2] = [1, 0];

/// Magic, version and the little-endian u16 header length.
const PREAMBLE_LEN: usize = MAGIC.len() + 2 + 2;

/// Header plus preamble is padded to a multiple of this.
const ALIGNMENT: usize = 64;

/// Serialize `data` as a 1-D `uint8` `.npy` file.
pub fn npy_u8(data: &[u8]) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '|u1', 'fortran_order': False, 'shape': ({},), }}",
        data.len()
    );
    // +1 for the terminating newline
    let unpadded = PREAMBLE_LEN + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(PREAMBLE_LEN + header.len() + data.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(data);
    out
}
