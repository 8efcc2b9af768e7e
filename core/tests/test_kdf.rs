// ## 🧪 Key derivation: known answers and properties

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use scatter_core::constants::{KDF_ITERATIONS, KDF_PASSPHRASE};
    use scatter_core::crypto::{derive_container_key, derive_key_32};

    fn salt_0_to_15() -> [u8; 16] {
        let mut s = [0u8; 16];
        for (i, b) in s.iter_mut().enumerate() {
            *b = i as u8;
        }
        s
    }

    #[test]
    fn container_key_zero_salt_known_answer() {
        let key = derive_container_key(&[0u8; 16]);
        assert_eq!(
            hex::encode(key),
            "732bcd16b49cfb0b1c1b8835bd123da4815534f835ed6dce6a08303474f74cd8"
        );
    }

    #[test]
    fn container_key_counting_salt_known_answer() {
        let key = derive_container_key(&salt_0_to_15());
        assert_eq!(
            hex::encode(key),
            "74c70fe68b0c5c063ef2a3936b455fd09d1e96043a4c090cecd623f484361770"
        );
    }

    #[test]
    fn single_round_known_answer() {
        let key = derive_key_32(b"OSD", &salt_0_to_15(), 1);
        assert_eq!(
            hex::encode(key),
            "f25316c4adfd3919dfa412c33a04e5da0d49e96fcfbfe411f4d3b8dc859c07db"
        );
    }

    #[test]
    fn container_key_uses_vendor_constants() {
        let salt = [0x5Au8; 16];
        assert_eq!(
            derive_container_key(&salt),
            derive_key_32(KDF_PASSPHRASE, &salt, KDF_ITERATIONS)
        );
        assert_ne!(
            derive_container_key(&salt),
            derive_key_32(KDF_PASSPHRASE, &salt, KDF_ITERATIONS - 1)
        );
    }

    proptest! {
        #[test]
        fn prop_deterministic(salt in any::<[u8; 16]>()) {
            prop_assert_eq!(derive_container_key(&salt), derive_container_key(&salt));
        }

        #[test]
        fn prop_salt_changes_key(salt1 in any::<[u8; 16]>(), salt2 in any::<[u8; 16]>()) {
            if salt1 != salt2 {
                prop_assert_ne!(derive_container_key(&salt1), derive_container_key(&salt2));
            }
        }
    }
}
