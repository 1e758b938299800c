//! Concrete syntax tree.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Terminal,
    Nonterminal,
}

/// A node of the concrete syntax tree.
///
/// Terminal nodes are labeled with a token tag and carry the matched text
/// (or no value at all for empty matches); nonterminal nodes are labeled
/// with the expanded nonterminal's name and carry their rule's children in
/// order. The tree retains every rule application and matched token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstNode {
    pub kind: NodeKind,
    pub label: String,
    pub value: Option<String>,
    pub children: Vec<CstNode>,
}

impl CstNode {
    pub fn terminal(label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            kind: NodeKind::Terminal,
            label: label.into(),
            value,
            children: vec![],
        }
    }

    pub fn nonterminal(label: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Nonterminal,
            label: label.into(),
            value: None,
            children: vec![],
        }
    }

    /// Collect the terminal leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&CstNode> {
        let mut out = vec![];
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a CstNode>) {
        if self.kind == NodeKind::Terminal {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    // One line per node: depth, `--` per level, then `kind/label: value`.
    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:4} ", depth)?;
        for _ in 0..depth {
            f.write_str("--")?;
        }
        match self.kind {
            NodeKind::Terminal => write!(f, "term/{}", self.label)?,
            NodeKind::Nonterminal => write!(f, "rule/{}", self.label)?,
        }
        if let Some(value) = &self.value {
            write!(f, ": {}", value)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for CstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
