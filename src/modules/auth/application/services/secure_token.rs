use rand_core::{OsRng, RngCore};

/// Length in bytes of the random material behind every opaque token
/// (refresh, email verification, password reset). Hex-encoded, so the
/// resulting string is twice as long.
pub const SECURE_TOKEN_BYTES: usize = 32;

/// Generate an opaque token from the OS CSPRNG.
///
/// These tokens are bearer secrets validated purely by store lookup;
/// they carry no structure and no claims.
pub fn generate_secure_token() -> String {
    let mut bytes = [0u8; SECURE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
