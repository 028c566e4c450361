use super::{Edge, EdgeAction, Node, ROOT_ID};
use crate::encoding::{Encoding, Symbol};
use crate::parser::{
    ast::{AstKind, RepeatKind, SymbolSet},
    Ast,
};

/// Above this many non-latin1 code points a byte mode literal is clipped
/// instead of being spelled out as UTF-8 byte sequences.
const SPELL_OUT_LIMIT: u32 = 256;

pub(crate) struct Builder {
    nodes: Vec<Node>,
    encoding: Encoding,
}

impl Builder {
    pub fn build(ast: &Ast, encoding: Encoding) -> Vec<Node> {
        let mut builder = Builder {
            nodes: vec![],
            encoding,
        };
        builder.build_(ast);
        builder.nodes
    }

    fn build_(&mut self, ast: &Ast) {
        self.nodes.push(Node { nexts: vec![] }); // root
        self.nodes.push(Node { nexts: vec![] }); // submit

        let node_id = self.build_root(ast, super::SUBMIT_ID);

        self.asap(ROOT_ID, node_id);
    }

    fn new_node(&mut self) -> usize {
        self.nodes.push(Node { nexts: vec![] });
        self.nodes.len() - 1
    }

    fn asap(&mut self, from: usize, to: usize) {
        self.nodes[from].nexts.push(Edge {
            action: EdgeAction::Asap,
            next_id: to,
        });
    }

    fn build_root(&mut self, ast: &Ast, dst_id: usize) -> usize {
        match &ast.kind {
            AstKind::Group => self.build_root(&ast.children[0], dst_id),
            AstKind::Concat => self.build_concat(ast, dst_id),
            AstKind::Alternate => self.build_union(ast, dst_id),
            AstKind::Repeat(min, max) => self.build_repeat(ast, *min, *max, dst_id),
            AstKind::Literal(set) => self.build_literal(set, dst_id),
        }
    }

    fn build_concat(&mut self, ast: &Ast, dst_id: usize) -> usize {
        let mut dst_id = dst_id;
        for child in ast.children.iter().rev() {
            dst_id = self.build_root(child, dst_id);
        }
        dst_id
    }

    fn build_union(&mut self, ast: &Ast, dst_id: usize) -> usize {
        let node_id = self.new_node();

        for child in ast.children.iter() {
            let match_id = self.build_root(child, dst_id);
            self.asap(node_id, match_id);
        }
        node_id
    }

    fn build_repeat(&mut self, ast: &Ast, min: u32, max: RepeatKind, dst_id: usize) -> usize {
        match max {
            RepeatKind::Num(m) if m == min => self.build_repeat_count(ast, min, dst_id),
            RepeatKind::Num(m) => self.build_repeat_range(ast, min, m, dst_id),
            RepeatKind::Infinity => self.build_repeat_min(ast, min, dst_id),
        }
    }

    fn build_star(&mut self, ast: &Ast, dst_id: usize) -> usize {
        let loop_id = self.new_node();

        let match_id = self.build_root(&ast.children[0], loop_id);
        self.asap(loop_id, match_id);
        self.asap(loop_id, dst_id);

        loop_id
    }

    fn build_repeat_count(&mut self, ast: &Ast, count: u32, dst_id: usize) -> usize {
        let mut dst_id = dst_id;

        let child = &ast.children[0];
        for _ in 0..count {
            dst_id = self.build_root(child, dst_id);
        }

        dst_id
    }

    fn build_repeat_min(&mut self, ast: &Ast, count: u32, dst_id: usize) -> usize {
        let loop_id = self.build_star(ast, dst_id);
        self.build_repeat_count(ast, count, loop_id)
    }

    // x{n,m} = x{n} (x (x ...)?)?, every optional tail may skip straight to dst
    fn build_repeat_range(&mut self, ast: &Ast, min: u32, max: u32, dst_id: usize) -> usize {
        let mut match_id = dst_id;

        let child = &ast.children[0];
        for _ in min..max {
            let repeat_id = self.build_root(child, match_id);
            let split_id = self.new_node();
            self.asap(split_id, repeat_id);
            self.asap(split_id, dst_id);
            match_id = split_id;
        }

        self.build_repeat_count(ast, min, match_id)
    }

    fn build_literal(&mut self, set: &SymbolSet, dst_id: usize) -> usize {
        let node_id = self.new_node();

        let ranges = self.encoding.clip(set.ranges());
        if !ranges.is_empty() {
            self.nodes[node_id].nexts.push(Edge {
                action: EdgeAction::Match(ranges),
                next_id: dst_id,
            });
        }

        if self.encoding == Encoding::Ascii {
            for c in Self::wide_chars(set) {
                let bytes = self.encoding.literal(c);
                let seq_id = self.build_sequence(&bytes, dst_id);
                self.asap(node_id, seq_id);
            }
        }

        node_id
    }

    fn build_sequence(&mut self, symbols: &[Symbol], dst_id: usize) -> usize {
        let mut dst_id = dst_id;
        for s in symbols.iter().rev() {
            let node_id = self.new_node();
            self.nodes[node_id].nexts.push(Edge {
                action: EdgeAction::Match(vec![(*s, *s)]),
                next_id: dst_id,
            });
            dst_id = node_id;
        }
        dst_id
    }

    /// Members above U+00FF, when there are few enough to spell out.
    fn wide_chars(set: &SymbolSet) -> Vec<char> {
        let wide: Vec<(Symbol, Symbol)> = set
            .ranges()
            .iter()
            .filter(|(_, hi)| *hi > 0xFF)
            .map(|(lo, hi)| ((*lo).max(0x100), *hi))
            .collect();

        let total: u32 = wide.iter().map(|(lo, hi)| hi - lo + 1).sum();
        if total > SPELL_OUT_LIMIT {
            return vec![];
        }

        wide.into_iter()
            .flat_map(|(lo, hi)| lo..=hi)
            .filter_map(char::from_u32)
            .collect()
    }
}
