//! Bracket search over a sorted buffer.
//!
//! The bracket index of a query `x` is the largest `li` with
//! `buffer[li] < x`, so that `buffer[li] < x <= buffer[li + 1]`.
//! Positions evolve smoothly between calls, so [`from_guess`] tries the
//! previous bracket first: accept it in O(1) if it still holds, then
//! probe a small neighbourhood around it, and only then fall back to a
//! full binary search.
//!
//! Results are undefined when `x` lies outside `(buffer[0],
//! buffer[n - 1]]`; callers check bounds before searching.

/// Default half-width of the neighbourhood probed around the guess.
pub const DEFAULT_PROXIMITY: usize = 10;

/// Index of the first value `>= x`, within `y`.
fn lower_bound(y: &[f64], x: f64) -> usize {
    let mut lo = 0;
    let mut hi = y.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if y[mid] < x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    return lo;
}

/// Bracket index of `x` by full binary search.
pub fn full(y: &[f64], x: f64) -> usize {
    return lower_bound(y, x).saturating_sub(1);
}

/// Bracket index of `x`, seeded by a previous bracket index.
///
/// `proximity` is the half-width of the neighbourhood probed around
/// `guess` before falling back to [`full`]; zero disables the shortcut
/// entirely. A stale `guess` past the end of the buffer is tolerated
/// (the search degrades to [`full`]).
pub fn from_guess(y: &[f64], x: f64, guess: usize, proximity: usize) -> usize {
    let n = y.len();
    if proximity == 0 || guess >= n {
        return full(y, x);
    }

    // The previous bracket usually still holds.
    if guess + 1 < n && y[guess] < x && y[guess + 1] >= x {
        return guess;
    }

    let l = guess.saturating_sub(proximity);
    let r = usize::min(guess + proximity, n - 1);
    if l < r && y[l] < x && y[r] >= x {
        return l + full(&y[l..=r], x);
    }

    return full(y, x);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        return (0..n).map(|i| i as f64).collect();
    }

    #[test]
    fn full_search_brackets() {
        let y = ramp(11);
        assert_eq!(full(&y, 5.5), 5);
        assert_eq!(full(&y, 0.5), 0);
        assert_eq!(full(&y, 9.5), 9);
    }

    #[test]
    fn bracket_is_open_closed() {
        let y = ramp(11);
        // x exactly on a value belongs to the bracket ending there.
        assert_eq!(full(&y, 5.0), 4);
        assert_eq!(full(&y, 10.0), 9);
    }

    #[test]
    fn guess_accepted_in_place() {
        let y = ramp(101);
        assert_eq!(from_guess(&y, 42.5, 42, DEFAULT_PROXIMITY), 42);
    }

    #[test]
    fn guess_neighbourhood() {
        let y = ramp(101);
        assert_eq!(from_guess(&y, 48.5, 42, DEFAULT_PROXIMITY), 48);
        assert_eq!(from_guess(&y, 36.5, 42, DEFAULT_PROXIMITY), 36);
    }

    #[test]
    fn guess_far_away_falls_back() {
        let y = ramp(101);
        assert_eq!(from_guess(&y, 90.5, 5, DEFAULT_PROXIMITY), 90);
        assert_eq!(from_guess(&y, 3.5, 95, DEFAULT_PROXIMITY), 3);
    }

    #[test]
    fn zero_proximity_disables_shortcut() {
        let y = ramp(101);
        assert_eq!(from_guess(&y, 42.5, 42, 0), 42);
        assert_eq!(from_guess(&y, 90.5, 5, 0), 90);
    }

    #[test]
    fn stale_guess_is_tolerated() {
        let y = ramp(11);
        assert_eq!(from_guess(&y, 5.5, 500, DEFAULT_PROXIMITY), 5);
    }

    #[test]
    fn matches_full_search_everywhere() {
        let y: Vec<f64> = (0..50).map(|i| (i as f64).sqrt() * 3.0 + i as f64).collect();
        for guess in 0..y.len() {
            for k in 1..y.len() {
                let x = 0.5 * (y[k - 1] + y[k]);
                assert_eq!(from_guess(&y, x, guess, DEFAULT_PROXIMITY), full(&y, x));
            }
        }
    }
}
