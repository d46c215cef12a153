use crate::types::Representation;

/// Set the `bit_index` bit in `num` to `value`.
///
/// # Example
/// ```
/// use qtoolkit::utils::set_bit;
/// assert_eq!(set_bit(0, 1, true), 2);
/// assert_eq!(set_bit(1, 1, true), 3);
/// assert_eq!(set_bit(1, 0, false), 0);
/// ```
#[inline]
pub fn set_bit(num: usize, bit_index: usize, value: bool) -> usize {
    let v = 1 << bit_index;
    if value {
        num | v
    } else {
        num & !v
    }
}

/// Get the `bit_index` bit value from `num`.
///
/// # Example
/// ```
/// use qtoolkit::utils::get_bit;
/// assert!(get_bit(2, 1));
/// assert!(!get_bit(2, 0));
/// ```
#[inline]
pub fn get_bit(num: usize, bit_index: usize) -> bool {
    ((num >> bit_index) & 1) != 0
}

/// Reverses the lowest `n` bits of `num`.
///
/// # Example
///
/// ```
/// use qtoolkit::utils::flip_bits;
///
/// assert_eq!(flip_bits(3, 0b100), 0b001);
/// assert_eq!(flip_bits(3, 0b010), 0b010);
/// assert_eq!(flip_bits(4, 0b1010), 0b0101);
/// ```
#[inline]
pub fn flip_bits(n: usize, num: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let leading_zeros = usize::BITS as usize - n;
    num.reverse_bits() >> leading_zeros
}

/// Renders basis index `index` of an `n` qubit register as a bitstring. Character `k` of the
/// string is bit `k` of the index, so qubit 0 is always the leftmost character.
///
/// # Example
/// ```
/// use qtoolkit::utils::index_to_bitstring;
///
/// assert_eq!(index_to_bitstring(3, 0b001), "100");
/// assert_eq!(index_to_bitstring(3, 0b110), "011");
/// assert_eq!(index_to_bitstring(0, 0), "");
/// ```
pub fn index_to_bitstring(n: usize, index: usize) -> String {
    (0..n)
        .map(|k| if get_bit(index, k) { '1' } else { '0' })
        .collect()
}

/// Inverse of [`index_to_bitstring`]. Returns `None` for characters other than `0` and `1`.
///
/// # Example
/// ```
/// use qtoolkit::utils::bitstring_to_index;
///
/// assert_eq!(bitstring_to_index("100"), Some(0b001));
/// assert_eq!(bitstring_to_index("10x"), None);
/// ```
pub fn bitstring_to_index(bits: &str) -> Option<usize> {
    bits.chars().enumerate().try_fold(0, |acc, (k, c)| match c {
        '0' => Some(acc),
        '1' => Some(set_bit(acc, k, true)),
        _ => None,
    })
}

/// Convert a little-endian basis index to the requested representation.
#[inline]
pub fn reorder_index(n: usize, index: usize, order: Representation) -> usize {
    match order {
        Representation::LittleEndian => index,
        Representation::BigEndian => flip_bits(n, index),
    }
}
