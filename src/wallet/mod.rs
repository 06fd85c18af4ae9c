use sha2::{Digest, Sha256};

/// Length of a wallet address in hex characters.
pub const ADDRESS_LEN: usize = 40;

/// Derive a wallet address from an account's email and a salt.
/// Address is the first 40 hex chars of SHA-256(email || salt).
pub fn derive_address(email: &str, salt: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(salt.to_string().as_bytes());
    let mut address = hex::encode(hasher.finalize());
    address.truncate(ADDRESS_LEN);
    address
}

#[cfg(test)]
pub(crate) fn is_well_formed(address: &str) -> bool {
    address.len() == ADDRESS_LEN
        && address
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
