use crate::alignment::matcher::{opcodes, OpTag};
use crate::types::{EditKind, EditOperation, EditScript, MISSING_SYMBOL, NONE_SYMBOL};

/// Expand block-matching opcodes into one operation per symbol.
///
/// Replace spans pair up position by position; whatever is left over on the
/// expected side becomes deletes, on the produced side inserts. The cursor
/// moves one step per expected symbol consumed, so inserts carry the index
/// of the expected symbol they precede.
pub fn build_edit_script(expected: &[String], produced: &[String]) -> EditScript {
    let mut operations = Vec::with_capacity(expected.len().max(produced.len()));
    let mut position = 0usize;

    let mut push = |kind: EditKind, expected: &str, produced: &str, position: &mut usize| {
        operations.push(EditOperation {
            kind,
            position: *position,
            expected: expected.to_string(),
            produced: produced.to_string(),
        });
        if kind != EditKind::Insert {
            *position += 1;
        }
    };

    for code in opcodes(expected, produced) {
        let exp = &expected[code.expected.clone()];
        let prod = &produced[code.produced.clone()];
        match code.tag {
            OpTag::Equal => {
                for (e, p) in exp.iter().zip(prod) {
                    push(EditKind::Equal, e, p, &mut position);
                }
            }
            OpTag::Delete => {
                for e in exp {
                    push(EditKind::Delete, e, MISSING_SYMBOL, &mut position);
                }
            }
            OpTag::Insert => {
                for p in prod {
                    push(EditKind::Insert, NONE_SYMBOL, p, &mut position);
                }
            }
            OpTag::Replace => {
                let paired = exp.len().min(prod.len());
                for (e, p) in exp.iter().zip(prod) {
                    push(EditKind::Substitute, e, p, &mut position);
                }
                for e in &exp[paired..] {
                    push(EditKind::Delete, e, MISSING_SYMBOL, &mut position);
                }
                for p in &prod[paired..] {
                    push(EditKind::Insert, NONE_SYMBOL, p, &mut position);
                }
            }
        }
    }

    debug_assert_eq!(
        position,
        expected.len(),
        "edit script must consume every expected symbol"
    );

    EditScript {
        operations,
        expected_len: expected.len(),
        produced_len: produced.len(),
    }
}
