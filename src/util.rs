/// Asserts that a numerical value is in the closed interval `[a, b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```should_panic
/// let theta = -1.0;
/// gridmdp::assert_interval!(theta, 0.0, f64::INFINITY);
/// ```
/// This panics with the message "Invalid value for \`theta\`. Must be in the interval \[0, inf\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}
