use bcrypt::{BcryptResult, Version, hash_with_salt, verify};

/// Hashes with a caller-supplied salt so fixture hashes come out the same on
/// every start.
pub fn hash_password(password: &str, cost: u32, salt: [u8; 16]) -> BcryptResult<String> {
    hash_with_salt(password.as_bytes(), cost, salt)
        .map(|parts| parts.format_for_version(Version::TwoB))
}

pub fn verify_password(password: &str, hash: &str) -> BcryptResult<bool> {
    verify(password.as_bytes(), hash)
}

pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
