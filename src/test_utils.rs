use std::sync::OnceLock;

use crate::keys::{KeyGenerator, PrivateKey, PublicKey, MIN_KEY_BITS};

static KEYPAIR: OnceLock<(PublicKey, PrivateKey)> = OnceLock::new();
static OTHER_KEYPAIR: OnceLock<(PublicKey, PrivateKey)> = OnceLock::new();

fn generate() -> (PublicKey, PrivateKey) {
    KeyGenerator::new(MIN_KEY_BITS)
        .generate()
        .expect("test keypair generation")
}

/// Shared 512-bit keypair; prime search dominates test time otherwise.
pub fn keypair() -> (&'static PublicKey, &'static PrivateKey) {
    let (pk, sk) = KEYPAIR.get_or_init(generate);
    (pk, sk)
}

/// A second, unrelated keypair for key-isolation tests.
pub fn other_keypair() -> (&'static PublicKey, &'static PrivateKey) {
    let (pk, sk) = OTHER_KEYPAIR.get_or_init(generate);
    (pk, sk)
}
