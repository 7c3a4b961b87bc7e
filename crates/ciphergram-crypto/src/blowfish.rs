//! Blowfish block cipher.
//!
//! 64-bit blocks, 16 Feistel rounds, an 18-word subkey array and four
//! key-dependent S-boxes. Blocks are processed independently (no chaining).

use std::fmt;

use crate::{
    blowfish_tables::{P_INIT, S_INIT},
    cipher::{BLOCK_SIZE, BlockCipher, Padded, check_layout, padding_for},
    error::{CipherError, ConfigError},
};

/// Shortest accepted key, in bytes.
pub const MIN_KEY_LEN: usize = 8;

/// Longest accepted key, in bytes.
pub const MAX_KEY_LEN: usize = 56;

const ROUNDS: usize = 16;

/// Filler byte appended to the final block.
const FILLER: u8 = 0;

/// Blowfish keyed with a fixed key.
///
/// The key schedule runs once in [`Blowfish::new`]; the key itself is not
/// retained.
#[derive(Clone)]
pub struct Blowfish {
    p: [u32; ROUNDS + 2],
    s: [[u32; 256]; 4],
}

impl Blowfish {
    /// Expand `key` into subkeys and S-boxes.
    pub fn new(key: &[u8]) -> Result<Self, ConfigError> {
        if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&key.len()) {
            return Err(ConfigError::InvalidKeyLength {
                min: MIN_KEY_LEN,
                max: MAX_KEY_LEN,
                actual: key.len(),
            });
        }

        let mut cipher = Self { p: P_INIT, s: S_INIT };

        let mut key_bytes = key.iter().copied().cycle();
        for subkey in &mut cipher.p {
            let word = (0..4).fold(0u32, |acc, _| (acc << 8) | u32::from(key_bytes.next().unwrap_or(0)));
            *subkey ^= word;
        }

        let (mut left, mut right) = (0u32, 0u32);
        for i in (0..ROUNDS + 2).step_by(2) {
            (left, right) = cipher.encrypt_words(left, right);
            cipher.p[i] = left;
            cipher.p[i + 1] = right;
        }
        for sbox in 0..4 {
            for i in (0..256).step_by(2) {
                (left, right) = cipher.encrypt_words(left, right);
                cipher.s[sbox][i] = left;
                cipher.s[sbox][i + 1] = right;
            }
        }

        Ok(cipher)
    }

    fn round(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        let h = self.s[0][usize::from(a)].wrapping_add(self.s[1][usize::from(b)]);
        (h ^ self.s[2][usize::from(c)]).wrapping_add(self.s[3][usize::from(d)])
    }

    fn encrypt_words(&self, mut left: u32, mut right: u32) -> (u32, u32) {
        for i in 0..ROUNDS {
            left ^= self.p[i];
            right ^= self.round(left);
            (left, right) = (right, left);
        }
        (left, right) = (right, left);
        right ^= self.p[ROUNDS];
        left ^= self.p[ROUNDS + 1];
        (left, right)
    }

    fn decrypt_words(&self, mut left: u32, mut right: u32) -> (u32, u32) {
        for i in (2..ROUNDS + 2).rev() {
            left ^= self.p[i];
            right ^= self.round(left);
            (left, right) = (right, left);
        }
        (left, right) = (right, left);
        right ^= self.p[1];
        left ^= self.p[0];
        (left, right)
    }

    /// Encrypt one 8-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let (l, r) = split(block);
        let (l, r) = self.encrypt_words(l, r);
        join(block, l, r);
    }

    /// Decrypt one 8-byte block in place.
    pub fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let (l, r) = split(block);
        let (l, r) = self.decrypt_words(l, r);
        join(block, l, r);
    }
}

fn split(block: &[u8; BLOCK_SIZE]) -> (u32, u32) {
    let [a, b, c, d, e, f, g, h] = *block;
    (u32::from_be_bytes([a, b, c, d]), u32::from_be_bytes([e, f, g, h]))
}

fn join(block: &mut [u8; BLOCK_SIZE], left: u32, right: u32) {
    block[..4].copy_from_slice(&left.to_be_bytes());
    block[4..].copy_from_slice(&right.to_be_bytes());
}

impl BlockCipher for Blowfish {
    fn encrypt(&self, plaintext: &[u8]) -> Padded {
        let padding = padding_for(plaintext.len());

        let mut ciphertext = Vec::with_capacity(plaintext.len() + padding);
        ciphertext.extend_from_slice(plaintext);
        ciphertext.resize(plaintext.len() + padding, FILLER);

        for chunk in ciphertext.chunks_exact_mut(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.encrypt_block(&mut block);
            chunk.copy_from_slice(&block);
        }

        Padded { ciphertext, padding }
    }

    fn decrypt(&self, ciphertext: &[u8], padding: usize) -> Result<Vec<u8>, CipherError> {
        check_layout(ciphertext.len(), padding)?;

        let mut plaintext = ciphertext.to_vec();
        for chunk in plaintext.chunks_exact_mut(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.decrypt_block(&mut block);
            chunk.copy_from_slice(&block);
        }

        let len = ciphertext.len() - padding;
        if plaintext[len..].iter().any(|&b| b != FILLER) {
            return Err(CipherError::InvalidFiller);
        }

        plaintext.truncate(len);
        Ok(plaintext)
    }
}

impl fmt::Debug for Blowfish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blowfish").field("schedule", &"<redacted>").finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hex_literal::hex;

    use super::*;

    fn encrypt_one(key: &[u8], plaintext: [u8; 8]) -> [u8; 8] {
        let cipher = Blowfish::new(key).unwrap();
        let mut block = plaintext;
        cipher.encrypt_block(&mut block);
        block
    }

    #[test]
    fn known_answer_zero_key() {
        assert_eq!(encrypt_one(&[0; 8], [0; 8]), hex!("4ef997456198dd78"));
    }

    #[test]
    fn known_answer_ones_key() {
        assert_eq!(encrypt_one(&[0xff; 8], [0xff; 8]), hex!("51866fd5b85ecb8a"));
    }

    #[test]
    fn known_answer_mixed_key() {
        assert_eq!(
            encrypt_one(&hex!("0123456789abcdef"), hex!("1111111111111111")),
            hex!("61f9c3802281b096")
        );
    }

    #[test]
    fn block_decrypt_inverts_encrypt() {
        let cipher = Blowfish::new(b"correct horse battery").unwrap();
        let original = *b"8 bytes!";
        let mut block = original;
        cipher.encrypt_block(&mut block);
        assert_ne!(block, original);
        cipher.decrypt_block(&mut block);
        assert_eq!(block, original);
    }

    #[test]
    fn key_length_bounds() {
        assert!(matches!(Blowfish::new(b""), Err(ConfigError::InvalidKeyLength { actual: 0, .. })));
        assert!(matches!(Blowfish::new(&[1; 7]), Err(ConfigError::InvalidKeyLength { .. })));
        assert!(matches!(Blowfish::new(&[1; 57]), Err(ConfigError::InvalidKeyLength { .. })));
        assert!(Blowfish::new(&[1; 8]).is_ok());
        assert!(Blowfish::new(&[1; 56]).is_ok());
    }

    #[test]
    fn empty_plaintext_emits_one_block() {
        let cipher = Blowfish::new(b"01234567").unwrap();
        let padded = cipher.encrypt(b"");
        assert_eq!(padded.ciphertext.len(), BLOCK_SIZE);
        assert_eq!(padded.padding, BLOCK_SIZE);
        assert_eq!(cipher.decrypt(&padded.ciphertext, padded.padding).unwrap(), b"");
    }

    #[test]
    fn identical_blocks_encrypt_identically() {
        let cipher = Blowfish::new(b"01234567").unwrap();
        let padded = cipher.encrypt(b"abcdefghabcdefgh");
        assert_eq!(padded.ciphertext[..8], padded.ciphertext[8..]);
    }

    #[test]
    fn decrypt_rejects_bad_layout() {
        let cipher = Blowfish::new(b"01234567").unwrap();
        assert_eq!(cipher.decrypt(&[], 0), Err(CipherError::EmptyCiphertext));
        assert_eq!(cipher.decrypt(&[0; 9], 0), Err(CipherError::UnalignedCiphertext { len: 9 }));
        assert_eq!(
            cipher.decrypt(&[0; 16], 8),
            Err(CipherError::InvalidPadding { padding: 8, len: 16 })
        );
    }

    #[test]
    fn corrupted_filler_is_rejected() {
        let cipher = Blowfish::new(b"01234567").unwrap();
        let empty = cipher.encrypt(b"");

        for index in 0..BLOCK_SIZE {
            let mut ciphertext = empty.ciphertext.clone();
            ciphertext[index] ^= 0x01;
            assert_eq!(cipher.decrypt(&ciphertext, empty.padding), Err(CipherError::InvalidFiller));
        }

        // Filler in the final block of a longer message is checked too.
        let padded = cipher.encrypt(b"nine byte");
        assert_eq!(padded.padding, 7);
        let mut ciphertext = padded.ciphertext.clone();
        ciphertext[BLOCK_SIZE] ^= 0x80;
        assert_eq!(cipher.decrypt(&ciphertext, padded.padding), Err(CipherError::InvalidFiller));
    }

    #[test]
    fn foreign_key_fails_filler_check() {
        let padded = Blowfish::new(b"01234567").unwrap().encrypt(b"");
        let other = Blowfish::new(b"76543210").unwrap();
        assert_eq!(other.decrypt(&padded.ciphertext, padded.padding), Err(CipherError::InvalidFiller));
    }

    #[test]
    fn debug_redacts_schedule() {
        let cipher = Blowfish::new(b"01234567").unwrap();
        assert_eq!(format!("{cipher:?}"), r#"Blowfish { schedule: "<redacted>" }"#);
    }
}
