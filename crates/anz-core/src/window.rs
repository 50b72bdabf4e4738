// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::AnzError;
use crate::score::WindowKind;

/// Borrowed reference/active split of a series for one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowPair<'a> {
    pub reference: &'a [f64],
    pub active: &'a [f64],
}

impl WindowPair<'_> {
    /// Combined length of both windows.
    pub fn len(&self) -> usize {
        self.reference.len() + self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty() && self.active.is_empty()
    }
}

/// Splits the tail of `series` into a reference window followed by an active
/// window.
///
/// The active window takes up to `active_size` trailing points; the reference
/// window takes up to `reference_size` points immediately before it. Fails when
/// the active window is empty or the reference window is shorter than
/// `min_reference_size`.
pub fn extract_windows(
    series: &[f64],
    reference_size: usize,
    active_size: usize,
    min_reference_size: usize,
) -> Result<WindowPair<'_>, AnzError> {
    let n = series.len();
    let active_len = active_size.min(n);
    if active_len == 0 {
        return Err(AnzError::insufficient_window(
            WindowKind::Active,
            active_size.max(1),
            active_len,
        ));
    }

    let reference_len = reference_size.min(n - active_len);
    if reference_len < min_reference_size {
        return Err(AnzError::insufficient_window(
            WindowKind::Reference,
            min_reference_size,
            reference_len,
        ));
    }

    let active_start = n - active_len;
    let reference_start = active_start - reference_len;
    Ok(WindowPair {
        reference: &series[reference_start..active_start],
        active: &series[active_start..],
    })
}

#[cfg(test)]
mod tests {
    use super::extract_windows;
    use crate::AnzError;
    use crate::score::WindowKind;

    #[test]
    fn full_windows_take_trailing_points() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let windows = extract_windows(&series, 4, 2, 1).expect("windows should extract");
        assert_eq!(windows.reference, &[2.0, 3.0, 4.0, 5.0]);
        assert_eq!(windows.active, &[6.0, 7.0]);
        assert_eq!(windows.len(), 6);
    }

    #[test]
    fn short_series_shrinks_reference_first() {
        let series = [1.0, 2.0, 3.0];
        let windows = extract_windows(&series, 4, 2, 1).expect("windows should extract");
        assert_eq!(windows.reference, &[1.0]);
        assert_eq!(windows.active, &[2.0, 3.0]);
    }

    #[test]
    fn active_window_is_capped_by_series_length() {
        let series = [1.0, 2.0];
        let windows = extract_windows(&series, 4, 5, 0).expect("zero minimum allows empty reference");
        assert!(windows.reference.is_empty());
        assert_eq!(windows.active, &[1.0, 2.0]);
    }

    #[test]
    fn reference_below_minimum_is_insufficient() {
        let series = [1.0, 2.0, 3.0];
        let err = extract_windows(&series, 4, 1, 3).expect_err("reference has 2 points");
        assert_eq!(
            err,
            AnzError::InsufficientWindow {
                window: WindowKind::Reference,
                required: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn empty_series_has_no_active_window() {
        let err = extract_windows(&[], 4, 1, 0).expect_err("empty series has no active window");
        assert_eq!(
            err,
            AnzError::InsufficientWindow {
                window: WindowKind::Active,
                required: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn windows_borrow_without_copying() {
        let series = vec![0.5; 10];
        let windows = extract_windows(&series, 4, 1, 1).expect("windows should extract");
        assert!(std::ptr::eq(windows.active.as_ptr(), &series[9]));
        assert!(std::ptr::eq(windows.reference.as_ptr(), &series[5]));
    }
}
