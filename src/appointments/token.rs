use rand::{rngs::OsRng, RngCore};

const ID_BYTES: usize = 20; // 160 bits
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fresh appointment id: 160 bits from the OS RNG in base 36.
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    encode_base36(&bytes)
}

/// Big-endian bytes to base 36 by repeated long division.
pub fn encode_base36(bytes: &[u8]) -> String {
    let mut digits = bytes.to_vec();
    let mut out = Vec::new();

    while digits.iter().any(|&b| b != 0) {
        let mut rem = 0u32;
        for d in digits.iter_mut() {
            let acc = (rem << 8) | u32::from(*d);
            *d = (acc / 36) as u8;
            rem = acc % 36;
        }
        out.push(ALPHABET[rem as usize]);
    }

    if out.is_empty() {
        return "0".to_string();
    }
    out.iter().rev().map(|&b| char::from(b)).collect()
}
