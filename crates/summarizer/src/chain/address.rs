use sha3::{Digest, Keccak256};

const ADDRESS_HEX_LEN: usize = 40;

fn strip_prefix(candidate: &str) -> Option<&str> {
    candidate
        .strip_prefix("0x")
        .or_else(|| candidate.strip_prefix("0X"))
}

/// `0x` followed by 40 hex digits. Mixed-case digits must carry a valid
/// EIP-55 checksum; all-lower and all-upper forms are accepted as-is.
pub fn is_address(candidate: &str) -> bool {
    let Some(digits) = strip_prefix(candidate) else {
        return false;
    };

    if digits.len() != ADDRESS_HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    checksum_digits(digits) == digits
}

fn checksum_digits(digits: &str) -> String {
    let lower = digits.to_ascii_lowercase();
    let hash = hex::encode(Keccak256::digest(lower.as_bytes()));

    lower
        .chars()
        .zip(hash.chars())
        .map(|(c, h)| {
            let nibble = h.to_digit(16).unwrap_or(0);
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vectors from EIP-55.
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_accepts_checksummed_addresses() {
        for address in CHECKSUMMED {
            assert!(is_address(address), "{address} should be valid");
        }
    }

    #[test]
    fn test_accepts_single_case_addresses() {
        for address in CHECKSUMMED {
            let digits = &address[2..];
            assert!(is_address(&format!("0x{}", digits.to_ascii_lowercase())));
            assert!(is_address(&format!("0x{}", digits.to_ascii_uppercase())));
        }
    }

    #[test]
    fn test_rejects_bad_checksum() {
        assert!(!is_address("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(!is_address(""));
        assert!(!is_address("0x123"));
        assert!(!is_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed00"));
        assert!(!is_address("0xZZAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_checksum_conversion() {
        for address in CHECKSUMMED {
            let lower = address[2..].to_ascii_lowercase();
            assert_eq!(checksum_digits(&lower), &address[2..]);
        }
    }
}
