/// One non-blank line of a folder outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub line: usize, // 1-based line number in the submitted text
    pub name: String,
    pub level: usize,
    /// Index into the parsed node list of this node's parent.
    pub parent: Option<usize>,
}

/// Parses an indentation outline where every two leading spaces add one level.
///
/// A node at level L hangs under the nearest preceding node at level L-1. When
/// no such node exists it has no parent inside the outline.
pub fn parse_outline(text: &str) -> Vec<OutlineNode> {
    let mut nodes: Vec<OutlineNode> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }

        let leading_spaces = raw.chars().take_while(|c| *c == ' ').count();
        let level = leading_spaces / 2;

        let parent = if level == 0 {
            None
        } else {
            nodes.iter().rposition(|node| node.level == level - 1)
        };

        nodes.push(OutlineNode {
            line: index + 1,
            name: name.to_string(),
            level,
            parent,
        });
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_two_space_indentation() {
        let nodes = parse_outline("Year 1\n  Physics\n    Mechanics\n  Chemistry\nYear 2");

        let levels: Vec<usize> = nodes.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn parent_is_nearest_preceding_line_one_level_up() {
        let nodes =
            parse_outline("Year 1\n  Physics\n    Mechanics\n  Chemistry\nYear 2\n  Biology");

        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[1].parent, Some(0));
        assert_eq!(nodes[2].parent, Some(1));
        assert_eq!(nodes[3].parent, Some(0));
        assert_eq!(nodes[4].parent, None);
        assert_eq!(nodes[5].parent, Some(4));
    }

    #[test]
    fn odd_indentation_is_floored() {
        let nodes = parse_outline("Root\n   Three spaces\n     Five spaces");

        assert_eq!(nodes[1].level, 1);
        assert_eq!(nodes[1].parent, Some(0));
        assert_eq!(nodes[2].level, 2);
        assert_eq!(nodes[2].parent, Some(1));
    }

    #[test]
    fn orphaned_deep_line_has_no_parent() {
        let nodes = parse_outline("    Deep first\nRoot");

        assert_eq!(nodes[0].level, 2);
        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[1].parent, None);
    }

    #[test]
    fn blank_lines_are_skipped_but_line_numbers_kept() {
        let nodes = parse_outline("Root\n\n   \n  Child\r\n");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].name, "Child");
        assert_eq!(nodes[1].line, 4);
        assert_eq!(nodes[1].parent, Some(0));
    }

    #[test]
    fn empty_text_yields_no_nodes() {
        assert!(parse_outline("").is_empty());
        assert!(parse_outline("\n \n").is_empty());
    }
}
