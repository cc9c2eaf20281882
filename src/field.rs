use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::One;

/// (a - b) mod p, for a and b already reduced below p
pub fn sub_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        p - b + a
    }
}

/// a⁻¹ mod p via the extended Euclidean algorithm, or `None` if gcd(a, p) != 1
pub fn inverse(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let a = BigInt::from_biguint(Sign::Plus, a % p);
    let m = BigInt::from_biguint(Sign::Plus, p.clone());

    let egcd = a.extended_gcd(&m);
    if !egcd.gcd.is_one() {
        return None;
    }

    // x may be negative; bring it back into [0, p)
    egcd.x.mod_floor(&m).to_biguint()
}
