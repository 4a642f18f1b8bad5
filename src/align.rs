//! Size-rounding helper, in the same macro style the teacher crate uses for
//! its own alignment arithmetic.

/// Rounds `value` up to the next multiple of `multiple`, which must be a power of two.
///
/// # Examples
///
/// ```
/// use segalloc::roundup;
///
/// assert_eq!(roundup!(13, 8), 16);
/// assert_eq!(roundup!(16, 8), 16);
/// assert_eq!(roundup!(0, 8), 0);
/// ```
#[macro_export]
macro_rules! roundup {
  ($value:expr, $multiple:expr) => {
    ($value + $multiple - 1) & !($multiple - 1)
  };
}

#[cfg(test)]
mod tests {
  #[test]
  fn rounds_up_to_the_next_multiple_of_eight() {
    for i in 0..10usize {
      let sizes = (8 * i + 1)..=(8 * (i + 1));
      let expected = 8 * (i + 1);

      for size in sizes {
        assert_eq!(expected, roundup!(size, 8));
      }
    }
  }

  #[test]
  fn zero_rounds_to_zero() {
    assert_eq!(0, roundup!(0usize, 8));
  }
}
