/// Relation code for a backward edge or a self-loop (`target <= source`).
pub const RELATION_BACKWARD: i64 = 2;

/// Relation code for a forward edge carrying the `xWant` commonsense type.
pub const RELATION_FORWARD_XWANT: i64 = 0;

/// Relation code for a forward edge of any other commonsense type.
pub const RELATION_FORWARD_OTHER: i64 = 1;

/// Derives the relation code and the `oWant` indicator for one graph edge.
///
/// The 3-way code summarizes temporal direction and type: backward edges and
/// self-loops dominate with code 2 regardless of type, forward `xWant` edges
/// get code 0, and every other forward edge gets code 1. The boolean flags
/// `oWant` edges independently of direction.
pub fn derive_relation(source_pos: usize, target_pos: usize, type_label: &str) -> (i64, bool) {
    let is_owant = type_label == "oWant";

    let code = if target_pos <= source_pos {
        RELATION_BACKWARD
    } else if type_label == "xWant" {
        RELATION_FORWARD_XWANT
    } else {
        RELATION_FORWARD_OTHER
    };

    (code, is_owant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_edge_dominates_type() {
        assert_eq!(derive_relation(2, 1, "xWant"), (2, false));
    }

    #[test]
    fn forward_xwant() {
        assert_eq!(derive_relation(1, 2, "xWant"), (0, false));
    }

    #[test]
    fn forward_other_type() {
        assert_eq!(derive_relation(1, 2, "iWant"), (1, false));
    }

    #[test]
    fn forward_owant_sets_flag() {
        assert_eq!(derive_relation(1, 2, "oWant"), (1, true));
    }

    #[test]
    fn self_loop_is_backward_and_keeps_owant_flag() {
        assert_eq!(derive_relation(3, 3, "oWant"), (2, true));
    }
}
