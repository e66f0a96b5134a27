//! Combinatorial helpers used by the coordinate encodings.
//!
//! Subsets are ranked with the combinatorial number system counted from the
//! last position, permutations with their Lehmer code. Both rank the
//! identity (or the subset occupying the last slots) as 0.

use const_for::const_for;

/// FACTORIAL[n] = n!
pub const FACTORIAL: [usize; 13] = factorial_list();

const fn factorial_list() -> [usize; 13] {
	let mut out = [1; 13];
	const_for!(i in 1..13 => { out[i] = out[i-1] * i; });
	out
}

/// The binomial coefficient (n choose k), zero if k > n.
pub const fn binomial(n: usize, k: usize) -> usize {
	if k > n {
		return 0;
	}

	let mut out = 1;
	const_for!(i in 0..k => { out = out * (n - i) / (i + 1); });
	out
}

/// Map a selection of k out of n positions to a number in 0..(n choose k).
pub fn map_nck(chosen: &[bool]) -> usize {
	let mut out = 0;
	let mut k = 0;

	for (n, _) in chosen.iter().rev().enumerate().filter(|(_, c)| **c) {
		k += 1;
		out += binomial(n, k);
	}

	out
}

/// The inverse of `map_nck`: the selection of `k` out of `n` positions
/// with the rank `idx`.
pub fn get_nck(n: usize, k: usize, idx: usize) -> Vec<bool> {
	let mut out = vec![false; n];
	let mut rest = idx;
	let mut k = k;

	for (i, chosen) in out.iter_mut().enumerate() {
		if k == 0 {
			break;
		}

		let b = binomial(n - 1 - i, k);
		if rest >= b {
			*chosen = true;
			rest -= b;
			k -= 1;
		}
	}

	out
}

/// Return the Lehmer rank of the permutation `perm` of 0..perm.len().
pub fn map_permutation(perm: &[usize]) -> usize {
	let n = perm.len();
	let mut out = 0;

	for i in 0..n {
		let smaller = perm[i + 1..].iter().filter(|x| **x < perm[i]).count();
		out += smaller * FACTORIAL[n - 1 - i];
	}

	out
}

/// Return the k-th permutation of 0..n, the inverse of `map_permutation`.
pub fn get_kth_perm(n: usize, k: usize) -> Vec<usize> {
	let mut rest: Vec<usize> = (0..n).collect();
	let mut k = k;

	(0..n)
		.map(|i| {
			let f = FACTORIAL[n - 1 - i];
			let digit = k / f;
			k %= f;
			rest.remove(digit)
		})
		.collect()
}

/// Reorder `v` by the k-th permutation.
pub fn permute_vec<T: Clone>(v: &[T], k: usize) -> Vec<T> {
	get_kth_perm(v.len(), k)
		.into_iter()
		.map(|i| v[i].clone())
		.collect()
}

/// 0 for even, 1 for odd permutations.
pub fn permutation_parity(perm: &[usize]) -> usize {
	let mut inversions = 0;
	for i in 0..perm.len() {
		inversions += perm[i + 1..].iter().filter(|x| **x < perm[i]).count();
	}
	inversions % 2
}
