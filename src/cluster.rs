//! The cluster kernel and halo primitive: the bit-twiddling core of the
//! engine. A cluster is a `u64` packing `C = 62` live cells in bits
//! `1..=62`; bit 0 and bit 63 are halo bits mirroring the adjacent cell in
//! the horizontally neighboring cluster.

use crate::rule::Rule;

/// Live cells packed per cluster (`W - 2` for a 64-bit word).
pub const CELLS_PER_CLUSTER: u32 = 62;

/// Bits `1..=62`: the interior cell bits of a cluster.
pub const INTERIOR_MASK: u64 = ((1u64 << CELLS_PER_CLUSTER) - 1) << 1;

/// Given three halo-valid clusters, splice `center`'s two halo bits from
/// the adjacent cell in `left` and `right`. The `C` interior bits of
/// `center` are unchanged; its own (possibly stale) halo bits are
/// discarded.
#[inline]
pub(crate) fn halo(left: u64, center: u64, right: u64) -> u64 {
    let low = (left >> CELLS_PER_CLUSTER) & 1;
    let high = (right & 0b10) << 62;
    (center & INTERIOR_MASK) | low | high
}

#[inline]
fn half_adder(x: u64, y: u64) -> (u64, u64) {
    (x ^ y, x & y)
}

#[inline]
fn full_adder(x: u64, y: u64, z: u64) -> (u64, u64) {
    (x ^ y ^ z, (x & y) | (x & z) | (y & z))
}

/// The four digit-words of the 8-neighbor Moore count, one bit per cell:
/// `count = bit4*8 + bit3*4 + bit2*2 + bit1`. See spec.md §4.1 for the
/// derivation of this adder network.
#[inline]
fn neighbor_count_digits(above: u64, center: u64, below: u64) -> (u64, u64, u64, u64) {
    let (middle_sum, middle_rem) = half_adder(above, below);
    let (base_sum, base_rem) = full_adder(above, center, below);
    let left_sum = base_sum << 1;
    let left_rem = base_rem << 1;
    let right_sum = base_sum >> 1;
    let right_rem = base_rem >> 1;
    let (bit1, k1) = full_adder(left_sum, middle_sum, right_sum);
    let (k2, k3) = full_adder(left_rem, middle_rem, right_rem);
    let (bit2, k4) = half_adder(k1, k2);
    let (bit3, bit4) = half_adder(k3, k4);
    (bit1, bit2, bit3, bit4)
}

/// Isolate the bit positions whose neighbor count equals `k` (1..=8).
#[inline]
fn ones_of_count(k: u8, bit1: u64, bit2: u64, bit3: u64, bit4: u64) -> u64 {
    let m1 = if k & 1 != 0 { bit1 } else { !bit1 };
    let m2 = if k & 2 != 0 { bit2 } else { !bit2 };
    let m3 = if k & 4 != 0 { bit3 } else { !bit3 };
    let m4 = if k & 8 != 0 { bit4 } else { !bit4 };
    m1 & m2 & m3 & m4
}

/// The fully generic kernel: correct for any `Rule`, used as the
/// reference the hand-specialized kernels below are tested against.
#[inline]
pub(crate) fn generic_kernel(above: u64, center: u64, below: u64, rule: Rule) -> u64 {
    let (bit1, bit2, bit3, bit4) = neighbor_count_digits(above, center, below);
    let mut survive_mask = 0u64;
    let mut birth_mask = 0u64;
    for k in 1u8..=8 {
        let ones = ones_of_count(k, bit1, bit2, bit3, bit4);
        if rule.survival & (1 << (k - 1)) != 0 {
            survive_mask |= ones;
        }
        if rule.birth & (1 << (k - 1)) != 0 {
            birth_mask |= ones;
        }
    }
    (center & survive_mask) | birth_mask
}

/// Conway's Game of Life (B3/S23), collapsed by hand: survive on count
/// 2 or 3, born on count 3. Whenever `bit2` is set the count is in
/// `{2,3,6,7}`, all below 8, so `bit4` is guaranteed clear and can be
/// dropped from the formula.
#[inline]
pub(crate) fn conway_kernel(above: u64, center: u64, below: u64) -> u64 {
    let (bit1, bit2, bit3, _bit4) = neighbor_count_digits(above, center, below);
    (center | bit1) & bit2 & !bit3
}

/// HighLife (B36/S23): same survival as Conway; birth adds count 6.
#[inline]
pub(crate) fn highlife_kernel(above: u64, center: u64, below: u64) -> u64 {
    let (bit1, bit2, bit3, _bit4) = neighbor_count_digits(above, center, below);
    let survive = bit2 & !bit3;
    let birth = bit2 & (bit1 ^ bit3);
    (center & survive) | birth
}

/// Seeds (B2/S): no survival, birth on count 2 only.
#[inline]
pub(crate) fn seeds_kernel(above: u64, center: u64, below: u64) -> u64 {
    let (bit1, bit2, bit3, _bit4) = neighbor_count_digits(above, center, below);
    bit2 & !bit1 & !bit3
}

/// B234/S: no survival, birth on count 2, 3, or 4.
#[inline]
pub(crate) fn b234s_kernel(above: u64, center: u64, below: u64) -> u64 {
    let (bit1, bit2, bit3, _bit4) = neighbor_count_digits(above, center, below);
    (bit2 & !bit3) | (!bit1 & !bit2 & bit3)
}

/// Dispatches to a hand-specialized closed-form kernel for the popular
/// rules named in spec.md §4.5, falling back to the generic formula for
/// any other parsed rule. This is the runtime stand-in for "compile-time
/// rule specialization": the rule is only known once a string is parsed
/// (§6), so the specialization is chosen by value, not by monomorphizing
/// a generic over a type-level rule.
#[derive(Clone, Copy)]
pub(crate) enum RuleKernel {
    Generic(Rule),
    Conway,
    HighLife,
    Seeds,
    B234S,
}

impl RuleKernel {
    pub(crate) fn for_rule(rule: Rule) -> Self {
        if rule == Rule::CONWAY {
            RuleKernel::Conway
        } else if rule == Rule::HIGHLIFE {
            RuleKernel::HighLife
        } else if rule == Rule::SEEDS {
            RuleKernel::Seeds
        } else if rule == Rule::B234_S {
            RuleKernel::B234S
        } else {
            RuleKernel::Generic(rule)
        }
    }

    #[inline]
    pub(crate) fn apply(&self, above: u64, center: u64, below: u64) -> u64 {
        match *self {
            RuleKernel::Generic(rule) => generic_kernel(above, center, below, rule),
            RuleKernel::Conway => conway_kernel(above, center, below),
            RuleKernel::HighLife => highlife_kernel(above, center, below),
            RuleKernel::Seeds => seeds_kernel(above, center, below),
            RuleKernel::B234S => b234s_kernel(above, center, below),
        }
    }
}
