//! Modular arithmetic over `u64`.
//!
//! Products are computed in `u128`, so every function is exact for any
//! modulus that fits in a `u64`.

/// Witnesses that make Miller-Rabin deterministic for every `u64`.
const MILLER_RABIN_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// `a * b mod m`.
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    debug_assert!(m > 0);
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

/// `a - b mod m`, for `a, b < m`.
pub fn sub_mod(a: u64, b: u64, m: u64) -> u64 {
    debug_assert!(a < m && b < m);
    if a >= b { a - b } else { m - (b - a) }
}

/// `base^exp mod m` by square-and-multiply.
pub fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }

    let mut result = 1;
    let mut base = base % m;

    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }

    result
}

/// Interprets `bytes` as a big-endian integer and reduces it modulo `m`.
pub fn reduce_be_bytes(bytes: &[u8], m: u64) -> u64 {
    let m = u128::from(m);
    bytes.iter().fold(0u128, |acc, &b| ((acc << 8) | u128::from(b)) % m) as u64
}

/// Deterministic primality test for `u64`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }

    for &p in &MILLER_RABIN_BASES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in &MILLER_RABIN_BASES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }

    true
}
