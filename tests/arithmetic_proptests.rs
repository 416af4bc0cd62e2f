#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for the arithmetic primitives and the ElGamal round trips.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed};
use ntcrypt::utils::{extended_gcd, mod_exp, mod_inverse, random_in_range};
use ntcrypt::{CryptoError, ElGamal, KeyPair, PrivateKey, PublicKey, SignatureOperations};
use proptest::prelude::*;

const P: u32 = 467;
const G: u32 = 2;

/// Fixed key pair over p = 467, g = 2, with secret exponent `b`
fn textbook_keys(b: u32) -> (PublicKey, PrivateKey) {
    let keypair = KeyPair::from_components(P.into(), G.into(), b.into()).unwrap();
    (keypair.public_key, keypair.private_key)
}

proptest! {
    /// a^0 mod m == 1 for every modulus, including 1
    #[test]
    fn mod_exp_zero_exponent(a in any::<u64>(), m in 1u64..) {
        let r = mod_exp(&a.into(), &BigUint::from(0u32), &m.into());
        prop_assert_eq!(r, BigUint::one());
    }

    /// a^1 mod m == a mod m
    #[test]
    fn mod_exp_unit_exponent(a in any::<u64>(), m in 1u64..) {
        let r = mod_exp(&a.into(), &BigUint::from(1u32), &m.into());
        prop_assert_eq!(r, BigUint::from(a % m));
    }

    /// (a^e1)^e2 == a^(e1*e2) mod m
    #[test]
    fn mod_exp_power_of_power(a in any::<u32>(), e1 in 0u32..200, e2 in 0u32..200, m in 2u32..) {
        let (a, m) = (BigUint::from(a), BigUint::from(m));
        let lhs = mod_exp(&mod_exp(&a, &e1.into(), &m), &e2.into(), &m);
        let rhs = mod_exp(&a, &(BigUint::from(e1) * e2), &m);
        prop_assert_eq!(lhs, rhs);
    }

    /// The Bezout identity holds for every pair
    #[test]
    fn extended_gcd_bezout(a in any::<i64>(), b in any::<i64>()) {
        let (a, b) = (BigInt::from(a), BigInt::from(b));
        let (g, x, y) = extended_gcd(&a, &b);
        prop_assert_eq!(&a * &x + &b * &y, g.clone());
        prop_assert_eq!(g.abs(), a.gcd(&b));
    }

    /// Inverses exist exactly for coprime pairs and land in [0, m)
    #[test]
    fn mod_inverse_property(a in 1u64.., m in 2u64..) {
        let (a_big, m_big) = (BigUint::from(a), BigUint::from(m));
        match mod_inverse(&a_big, &m_big) {
            Ok(inv) => {
                prop_assert!(inv < m_big);
                prop_assert_eq!((&a_big * &inv) % &m_big, BigUint::one());
            }
            Err(e) => {
                prop_assert!(matches!(e, CryptoError::NoInverseExists));
                prop_assert!(a.gcd(&m) != 1);
            }
        }
    }

    /// Sampled values stay inside the inclusive range
    #[test]
    fn random_in_range_bounds(lo in any::<u64>(), width in 0u64..1_000_000) {
        let lo_big = BigUint::from(lo);
        let hi_big = &lo_big + width;
        let r = random_in_range(&lo_big, &hi_big).unwrap();
        prop_assert!(r >= lo_big && r <= hi_big);
    }

    /// An inverted range is rejected
    #[test]
    fn random_in_range_empty(lo in 1u64.., gap in 1u64..1000) {
        let hi = lo.saturating_sub(gap);
        prop_assume!(hi < lo);
        let result = random_in_range(&lo.into(), &hi.into());
        prop_assert!(matches!(result, Err(CryptoError::EmptyRange)));
    }

    /// decrypt(encrypt(m)) == m for every m below p
    #[test]
    fn encryption_roundtrip(m in 0u32..P, b in 1u32..(P - 1)) {
        let (public_key, private_key) = textbook_keys(b);
        let elgamal = ElGamal::new(public_key);
        let ct = elgamal.encrypt(&m.into()).unwrap();
        prop_assert_eq!(elgamal.decrypt(&ct, &private_key).unwrap(), BigUint::from(m));
    }

    /// Signatures verify and a shifted x does not
    #[test]
    fn signature_roundtrip(digest in any::<u64>(), b in 1u32..(P - 1)) {
        let (public_key, private_key) = textbook_keys(b);
        let elgamal = ElGamal::new(public_key);
        let digest = BigUint::from(digest);

        let signature = elgamal.sign(&digest, &private_key).unwrap();
        prop_assert!(elgamal.verify(&digest, &signature));

        let tampered = ntcrypt::Signature::new(
            signature.r().clone(),
            (signature.x() + 1u32) % (P - 1),
        );
        prop_assert!(!elgamal.verify(&digest, &tampered));
    }

    /// Message signing accepts arbitrary bytes
    #[test]
    fn message_signature_roundtrip(message in proptest::collection::vec(any::<u8>(), 0..256)) {
        let (public_key, private_key) = textbook_keys(127);
        let elgamal = ElGamal::new(public_key);

        let signature = elgamal.sign_message(&message, &private_key).unwrap();
        prop_assert!(elgamal.verify_message(&message, &signature));
    }
}
