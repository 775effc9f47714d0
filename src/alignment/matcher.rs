use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub expected_start: usize,
    pub produced_start: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// A span of the expected sequence paired with a span of the produced one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub expected: Range<usize>,
    pub produced: Range<usize>,
}

/// Longest contiguous run shared by `expected[e_lo..e_hi]` and `produced[p_lo..p_hi]`.
///
/// Among runs of equal length the one starting earliest in `expected` wins,
/// then the one starting earliest in `produced`. A zero-length block at
/// `(e_lo, p_lo)` means nothing matched.
pub fn find_longest_match<T: PartialEq>(
    expected: &[T],
    produced: &[T],
    e_lo: usize,
    e_hi: usize,
    p_lo: usize,
    p_hi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock {
        expected_start: e_lo,
        produced_start: p_lo,
        len: 0,
    };
    if e_lo >= e_hi || p_lo >= p_hi {
        return best;
    }

    // run_len[k + 1] = length of the match ending at (i, p_lo + k)
    let width = p_hi - p_lo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in e_lo..e_hi {
        for (k, item) in produced[p_lo..p_hi].iter().enumerate() {
            let run = if expected[i] == *item { prev[k] + 1 } else { 0 };
            curr[k + 1] = run;
            if run > best.len {
                best = MatchingBlock {
                    expected_start: i + 1 - run,
                    produced_start: p_lo + k + 1 - run,
                    len: run,
                };
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

/// All matching blocks in order, adjacent blocks merged.
pub fn matching_blocks<T: PartialEq>(expected: &[T], produced: &[T]) -> Vec<MatchingBlock> {
    let mut pending = vec![(0, expected.len(), 0, produced.len())];
    let mut found = Vec::new();

    while let Some((e_lo, e_hi, p_lo, p_hi)) = pending.pop() {
        let block = find_longest_match(expected, produced, e_lo, e_hi, p_lo, p_hi);
        if block.len == 0 {
            continue;
        }
        let e_end = block.expected_start + block.len;
        let p_end = block.produced_start + block.len;
        if e_lo < block.expected_start && p_lo < block.produced_start {
            pending.push((e_lo, block.expected_start, p_lo, block.produced_start));
        }
        if e_end < e_hi && p_end < p_hi {
            pending.push((e_end, e_hi, p_end, p_hi));
        }
        found.push(block);
    }
    found.sort_unstable();

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len());
    for block in found {
        if let Some(last) = merged.last_mut() {
            if last.expected_start + last.len == block.expected_start
                && last.produced_start + last.len == block.produced_start
            {
                last.len += block.len;
                continue;
            }
        }
        merged.push(block);
    }
    merged
}

/// Spans covering both sequences end to end, in order.
pub fn opcodes<T: PartialEq>(expected: &[T], produced: &[T]) -> Vec<Opcode> {
    let terminal = MatchingBlock {
        expected_start: expected.len(),
        produced_start: produced.len(),
        len: 0,
    };

    let mut codes = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    for block in matching_blocks(expected, produced)
        .into_iter()
        .chain(std::iter::once(terminal))
    {
        let tag = match (i < block.expected_start, j < block.produced_start) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            codes.push(Opcode {
                tag,
                expected: i..block.expected_start,
                produced: j..block.produced_start,
            });
        }
        i = block.expected_start + block.len;
        j = block.produced_start + block.len;
        if block.len > 0 {
            codes.push(Opcode {
                tag: OpTag::Equal,
                expected: block.expected_start..i,
                produced: block.produced_start..j,
            });
        }
    }
    codes
}
