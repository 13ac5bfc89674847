//! 512-bit intermediate values for full-precision multiply-divide.
//!
//! Only the operations `full_math` needs are provided: a 256x256 product,
//! addition with an overflow flag and a normalized long division by a
//! 256-bit divisor (Knuth, TAOCP vol. 2, algorithm D).

use crate::error::MathError;
use alloy_primitives::U256;

/// Unsigned 512-bit integer as eight little-endian 64-bit limbs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct U512([u64; 8]);

#[inline(always)]
const fn carry_out(x: u64, shift: u32) -> u64 {
    // `x >> 64` is undefined for u64, the unshifted case carries nothing.
    if shift == 0 { 0 } else { x >> (64 - shift) }
}

impl U512 {
    pub const ZERO: Self = Self([0; 8]);

    pub const fn from_limbs(limbs: [u64; 8]) -> Self {
        Self(limbs)
    }

    pub const fn as_limbs(&self) -> &[u64; 8] {
        &self.0
    }

    pub fn from_u256(x: U256) -> Self {
        let l = x.as_limbs();
        Self([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
    }

    /// Full 512-bit product of two 256-bit values.
    pub fn full_mul(a: U256, b: U256) -> Self {
        let a = a.as_limbs();
        let b = b.as_limbs();
        let mut out = [0u64; 8];

        for i in 0..4 {
            let mut carry: u128 = 0;
            for j in 0..4 {
                let t = a[i] as u128 * b[j] as u128 + out[i + j] as u128 + carry;
                out[i + j] = t as u64;
                carry = t >> 64;
            }
            out[i + 4] = carry as u64;
        }

        Self(out)
    }

    pub fn lo(&self) -> U256 {
        U256::from_limbs([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn hi(&self) -> U256 {
        U256::from_limbs([self.0[4], self.0[5], self.0[6], self.0[7]])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    pub fn fits_u256(&self) -> bool {
        self.hi().is_zero()
    }

    /// Narrows to 256 bits, failing `Overflow` if the high half is set.
    pub fn try_into_u256(self) -> Result<U256, MathError> {
        if self.fits_u256() {
            Ok(self.lo())
        } else {
            Err(MathError::Overflow)
        }
    }

    /// Wrapping addition returning the carry out of bit 511.
    pub fn overflowing_add(self, other: Self) -> (Self, bool) {
        let mut out = [0u64; 8];
        let mut carry = false;
        for (i, limb) in out.iter_mut().enumerate() {
            let (s1, c1) = self.0[i].overflowing_add(other.0[i]);
            let (s2, c2) = s1.overflowing_add(carry as u64);
            *limb = s2;
            carry = c1 || c2;
        }
        (Self(out), carry)
    }

    /// Number of significant limbs.
    fn len(&self) -> usize {
        self.0.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1)
    }

    fn lt_u256(&self, d: U256) -> bool {
        self.fits_u256() && self.lo() < d
    }

    /// Quotient and remainder of `self / d`.
    pub fn div_rem(self, d: U256) -> Result<(U512, U256), MathError> {
        if d.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        if self.lt_u256(d) {
            return Ok((Self::ZERO, self.lo()));
        }

        let v = d.as_limbs();
        let n = v.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1);

        if n == 1 {
            return Ok(self.div_rem_small(v[0]));
        }

        let u = &self.0;
        let m = self.len();

        // D1: normalize so the divisor's top limb has its high bit set.
        let s = v[n - 1].leading_zeros();
        let mut vn = [0u64; 4];
        for i in (1..n).rev() {
            vn[i] = (v[i] << s) | carry_out(v[i - 1], s);
        }
        vn[0] = v[0] << s;

        let mut un = [0u64; 9];
        un[m] = carry_out(u[m - 1], s);
        for i in (1..m).rev() {
            un[i] = (u[i] << s) | carry_out(u[i - 1], s);
        }
        un[0] = u[0] << s;

        const BASE: u128 = 1 << 64;
        let mut q = [0u64; 8];

        for j in (0..=m - n).rev() {
            // D3: estimate the quotient digit.
            let num = ((un[j + n] as u128) << 64) | un[j + n - 1] as u128;
            let mut qhat = num / vn[n - 1] as u128;
            let mut rhat = num % vn[n - 1] as u128;

            while qhat >= BASE || qhat * vn[n - 2] as u128 > ((rhat << 64) | un[j + n - 2] as u128)
            {
                qhat -= 1;
                rhat += vn[n - 1] as u128;
                if rhat >= BASE {
                    break;
                }
            }

            // D4: multiply and subtract.
            let mut borrow: i128 = 0;
            for i in 0..n {
                let p = qhat * vn[i] as u128;
                let t = un[i + j] as i128 - borrow - (p as u64) as i128;
                un[i + j] = t as u64;
                borrow = (p >> 64) as i128 - (t >> 64);
            }
            let t = un[j + n] as i128 - borrow;
            un[j + n] = t as u64;

            q[j] = qhat as u64;

            // D6: the estimate was one too large, add the divisor back.
            if t < 0 {
                q[j] = q[j].wrapping_sub(1);
                let mut carry: u128 = 0;
                for i in 0..n {
                    let t = un[i + j] as u128 + vn[i] as u128 + carry;
                    un[i + j] = t as u64;
                    carry = t >> 64;
                }
                un[j + n] = un[j + n].wrapping_add(carry as u64);
            }
        }

        // D8: unnormalize the remainder.
        let mut r = [0u64; 4];
        for i in 0..n {
            r[i] = (un[i] >> s) | if s == 0 { 0 } else { un[i + 1] << (64 - s) };
        }

        Ok((Self(q), U256::from_limbs(r)))
    }

    fn div_rem_small(self, d: u64) -> (U512, U256) {
        let d = d as u128;
        let mut q = [0u64; 8];
        let mut rem: u128 = 0;
        for i in (0..8).rev() {
            let cur = (rem << 64) | self.0[i] as u128;
            q[i] = (cur / d) as u64;
            rem = cur % d;
        }
        (Self(q), U256::from(rem))
    }
}
