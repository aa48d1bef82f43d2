pub const fn div_ceil(a: usize, b: usize) -> usize {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_ceil_exact() {
        assert_eq!(div_ceil(8, 2), 4);
        assert_eq!(div_ceil(81, 9), 9);
    }

    #[test]
    fn div_ceil_rounds_up() {
        assert_eq!(div_ceil(81, 2), 41);
        assert_eq!(div_ceil(1, 2), 1);
    }
}
