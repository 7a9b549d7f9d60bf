//! Fibonacci numbers and the degree bound they imply.
//!
//! A node of degree `d` roots a subtree of at least `F(d + 2)` nodes, so a
//! heap of `n` nodes never holds a node of degree above `floor(log_phi(n))`.

/// The `n`-th Fibonacci number, with `F(0) = 0` and `F(1) = 1`.
///
/// Saturates at `u128::MAX` instead of overflowing.
pub fn fibonacci(n: u32) -> u128 {
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 0..n {
        (a, b) = (b, a.saturating_add(b));
    }
    a
}

/// The golden ratio `(1 + sqrt 5) / 2`
pub fn golden_ratio() -> f64 {
    (1.0 + 5f64.sqrt()) / 2.0
}

/// Largest degree a node may have in a heap of `n` nodes: `floor(log_phi(n))`
pub fn max_degree_bound(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    ((n as f64).ln() / golden_ratio().ln()).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fibonacci_sequence() {
        let first: Vec<u128> = (0..10).map(fibonacci).collect();
        assert_eq!(first, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
        assert_eq!(fibonacci(50), 12_586_269_025);
        assert_eq!(fibonacci(500), u128::MAX);
    }

    #[test]
    fn golden_ratio_value() {
        let phi = golden_ratio();
        assert!((phi - 1.618_033_988_749_895).abs() < 1e-12);
        assert!((phi * phi - phi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degree_bound() {
        assert_eq!(max_degree_bound(0), 0);
        assert_eq!(max_degree_bound(1), 0);
        assert_eq!(max_degree_bound(2), 1);
        assert_eq!(max_degree_bound(3), 2);
        assert_eq!(max_degree_bound(10), 4);
        assert_eq!(max_degree_bound(100), 9);
        assert_eq!(max_degree_bound(1000), 14);
    }

    #[test]
    fn degree_bound_admits_fibonacci_sized_trees() {
        // a tree of degree d needs F(d + 2) nodes, which must be enough for d
        for d in 0..60u32 {
            let n = fibonacci(d + 2) as usize;
            assert!(max_degree_bound(n) >= d as usize, "degree {d}, n = {n}");
        }
    }
}
