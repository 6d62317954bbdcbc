//! Myers LCS over element identities
//!
//! Finds the longest common subsequence of two orderings of the same elements.
//! Elements are compared by `ElementId` only.
//!
//! # Algorithm Choice
//!
//! | Algorithm | Time | Space | Used for |
//! |-----------|------|-------|----------|
//! | DP table | O(n*m) | O(n*m) | sequences of at most 8 elements |
//! | **Myers** | O((n+m)*d) | O(d*(n+m)) | everything else |
//!
//! Import lists are usually close to sorted, so the edit distance `d` is small
//! and Myers runs in near-linear time.
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986)
//!
//! # Implementation Notes
//!
//! - Common prefix/suffix stripping before the core search
//! - The search always runs to completion: the returned LCS is maximal, which
//!   keeps the number of reported moves minimal

use crate::id::ElementId;

/// Sequences up to this length use the DP table instead of Myers.
const SMALL_DP_LIMIT: usize = 8;

// =============================================================================
// Main API
// =============================================================================

/// Longest common subsequence of `old` and `new` by identity.
///
/// Returns `(old_idx, new_idx)` pairs in ascending order of both indices.
pub fn longest_common_subsequence(old: &[ElementId], new: &[ElementId]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    if n == 0 || m == 0 {
        return Vec::new();
    }

    // Strip common prefix
    let mut prefix_len = 0;
    while prefix_len < n && prefix_len < m && old[prefix_len] == new[prefix_len] {
        prefix_len += 1;
    }

    // Strip common suffix
    let mut suffix_len = 0;
    while suffix_len < (n - prefix_len)
        && suffix_len < (m - prefix_len)
        && old[n - 1 - suffix_len] == new[m - 1 - suffix_len]
    {
        suffix_len += 1;
    }

    let mut lcs: Vec<(usize, usize)> = (0..prefix_len).map(|i| (i, i)).collect();

    let old_mid = &old[prefix_len..n - suffix_len];
    let new_mid = &new[prefix_len..m - suffix_len];

    if !old_mid.is_empty() && !new_mid.is_empty() {
        for (oi, ni) in myers_core(old_mid, new_mid) {
            lcs.push((oi + prefix_len, ni + prefix_len));
        }
    }

    for i in 0..suffix_len {
        lcs.push((n - suffix_len + i, m - suffix_len + i));
    }

    lcs
}

// =============================================================================
// Myers Algorithm Core
// =============================================================================

/// Explore the edit graph by edit distance `d`, tracking the furthest-reaching
/// path on each diagonal `k = x - y`, then backtrack through the saved frontiers.
fn myers_core(old: &[ElementId], new: &[ElementId]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    if n <= SMALL_DP_LIMIT && m <= SMALL_DP_LIMIT {
        return small_lcs_dp(old, new);
    }

    let max_d = n + m;
    let offset = max_d;

    // v[k + offset] = furthest x on diagonal k
    let mut v = vec![0usize; 2 * max_d + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();

    'outer: for d in 0..=max_d {
        trace.push(v.clone());

        for k in (-(d as isize)..=(d as isize)).step_by(2) {
            let kk = (k + offset as isize) as usize;

            // k == -d: must come from k+1 (insert); k == d: from k-1 (delete)
            let mut x = if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
                v[kk + 1]
            } else {
                v[kk - 1] + 1
            };

            let mut y = (x as isize - k) as usize;

            // Follow the snake while elements match
            while x < n && y < m && old[x] == new[y] {
                x += 1;
                y += 1;
            }

            v[kk] = x;

            if x >= n && y >= m {
                break 'outer;
            }
        }
    }

    backtrack(&trace, old, new, offset)
}

/// Walk the saved frontiers from (n, m) back to (0, 0), collecting diagonal
/// steps as LCS pairs.
fn backtrack(
    trace: &[Vec<usize>],
    old: &[ElementId],
    new: &[ElementId],
    offset: usize,
) -> Vec<(usize, usize)> {
    let mut x = old.len();
    let mut y = new.len();
    let mut lcs = Vec::new();

    for (d, v) in trace.iter().enumerate().rev() {
        let k = x as isize - y as isize;
        let kk = (k + offset as isize) as usize;

        let prev_k = if d == 0 {
            0isize
        } else if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
            k + 1
        } else {
            k - 1
        };

        let prev_kk = (prev_k + offset as isize) as usize;
        let prev_x = if d == 0 { 0 } else { v[prev_kk] };
        let prev_y = (prev_x as isize - prev_k) as usize;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            if old[x] == new[y] {
                lcs.push((x, y));
            }
        }

        if d > 0 {
            if prev_k < k {
                x = prev_x;
            } else {
                y = prev_y;
            }
        }

        if x == 0 && y == 0 {
            break;
        }
    }

    lcs.reverse();
    lcs
}

/// O(n*m) table for small sequences; no trace allocation, better locality.
fn small_lcs_dp(old: &[ElementId], new: &[ElementId]) -> Vec<(usize, usize)> {
    let n = old.len();
    let m = new.len();

    // dp[i][j] = LCS length of old[0..i] and new[0..j]
    let mut dp = [[0u8; SMALL_DP_LIMIT + 1]; SMALL_DP_LIMIT + 1];

    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if old[i - 1] == new[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lcs = Vec::with_capacity(dp[n][m] as usize);
    let mut i = n;
    let mut j = m;

    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}

// =============================================================================
// Tests
// =============================================================================
