use crate::alignment::build_edit_script;
use crate::pipeline::traits::SequenceAligner;
use crate::types::EditScript;

/// Longest-matching-block alignment with lowest-index tie breaking.
pub struct BlockMatchingAligner;

impl SequenceAligner for BlockMatchingAligner {
    fn align(&self, expected: &[String], produced: &[String]) -> EditScript {
        build_edit_script(expected, produced)
    }
}
