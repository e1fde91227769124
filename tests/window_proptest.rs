//! Property-based tests for bracket search and window shifting.

use proptest::prelude::*;

use landscape::fixed::Fixed;
use landscape::search;
use landscape::validate::allclose;
use landscape::window::{Position, Window};
use landscape::Validate;

// =============================================================================
// Test helpers
// =============================================================================

/// A strictly increasing sequence built from positive increments.
fn arbitrary_landscape(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    return prop::collection::vec(0.001..2.0f64, 2..max_len).prop_map(|dy| {
        let mut y = Vec::with_capacity(dy.len());
        let mut acc = -5.0;
        for d in dy {
            acc += d;
            y.push(acc);
        }
        return y;
    });
}

/// A query position strictly inside `(y[0], y[n - 1]]`, as a fraction.
fn position_in(y: &[f64], pct: f64) -> f64 {
    let ymin = y[0];
    let ymax = y[y.len() - 1];
    return ymax - (1.0 - pct) * (ymax - ymin) * 0.999999;
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A guessed search agrees with the full binary search for every
    /// query and every possible stale guess.
    #[test]
    fn guessed_search_matches_full(
        y in arbitrary_landscape(64),
        pct in 0.0..=1.0f64,
        guess in 0usize..128,
        proximity in 0usize..16,
    ) {
        let x = position_in(&y, pct);
        let expect = search::full(&y, x);
        prop_assert_eq!(search::from_guess(&y, x, guess, proximity), expect);
    }

    /// The bracket invariant holds after any walk over a fixed
    /// landscape.
    #[test]
    fn bracket_invariant_holds(
        y in arbitrary_landscape(64),
        walk in prop::collection::vec(0.0..=1.0f64, 1..32),
    ) {
        let mut cursor = Fixed::new(position_in(&y, 0.5), y.clone()).unwrap();
        for pct in walk {
            let x = position_in(&y, pct);
            cursor.set_position(x).unwrap();
            let i = cursor.index();
            prop_assert!(y[i] < x && x <= y[i + 1]);
            prop_assert_eq!(cursor.left(), y[i]);
            prop_assert_eq!(cursor.right(), y[i + 1]);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A window fed the landscape in chunks agrees with a cursor that
    /// holds it whole, for any chunking and retention.
    #[test]
    fn chunked_window_matches_whole(
        y in arbitrary_landscape(200),
        chunk in 4usize..24,
        nbuffer in 1usize..4,
        walk in prop::collection::vec(0.0..=1.0f64, 1..32),
    ) {
        prop_assume!(y.len() > chunk);
        let x0 = position_in(&y, 0.0) + 1e-6;
        prop_assume!(x0 > y[0] && x0 <= y[chunk - 1]);

        let mut full = Fixed::new(x0, y.clone()).unwrap();
        let mut w = Window::new(x0, 0, y[..chunk].to_vec(), Validate::Strict).unwrap();

        // Monotone walk right so chunks always extend the same way.
        let mut sorted = walk.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pct in sorted {
            let x = position_in(&y, pct);
            full.set_position(x).unwrap();
            while let Position::Locked(_) = w.set_x(x) {
                let istop = w.istop() as usize;
                let next = usize::min(istop + chunk, y.len());
                w.rshift_y(istop as i64, &y[istop..next], nbuffer).unwrap();
            }
            prop_assert_eq!(w.i().unwrap(), full.index() as i64);
            prop_assert_eq!(w.yleft().unwrap(), full.left());
            prop_assert_eq!(w.yright().unwrap(), full.right());
        }
    }

    /// Delta-supplied chunks reconstruct the landscape the absolute
    /// chunks describe.
    #[test]
    fn delta_chunks_reconstruct(
        y in arbitrary_landscape(120),
        chunk in 4usize..16,
    ) {
        prop_assume!(y.len() > 2 * chunk);
        let x0 = 0.5 * (y[0] + y[1]) + 1e-9;
        let mut w = Window::new(x0, 0, y[..chunk].to_vec(), Validate::Fast).unwrap();

        let dy: Vec<f64> = y.windows(2).map(|p| p[1] - p[0]).collect();
        let mut istop = chunk;
        while istop < y.len() {
            let next = usize::min(istop + chunk, y.len());
            // dy[k - 1] is the distance leading into y[k].
            w.rshift_dy(istop as i64, &dy[istop - 1..next - 1], 2).unwrap();
            istop = next;
        }

        let held = w.y();
        let offset = w.istart() as usize;
        for (j, &v) in held.iter().enumerate() {
            prop_assert!(allclose(v, y[offset + j]));
        }
    }
}
