//! Canonical owner-address derivation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Derive the owner address from the base64url-encoded owner public key.
///
/// The address is the unpadded base64url encoding of the SHA-256 digest of
/// the raw decoded key bytes. This must match the network's derivation
/// bit-for-bit; any divergence would hand the guest a different address than
/// every other consumer of the chain sees.
pub fn derive_owner_address(owner: &str) -> Result<String, base64::DecodeError> {
    let key_bytes = URL_SAFE_NO_PAD.decode(owner)?;
    let digest = Sha256::digest(&key_bytes);
    Ok(URL_SAFE_NO_PAD.encode(digest))
}
