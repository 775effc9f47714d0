pub mod edit_script;
pub mod matcher;

pub use edit_script::build_edit_script;
pub use matcher::{find_longest_match, matching_blocks, opcodes, MatchingBlock, OpTag, Opcode};
