//! Structural render plan for the tree view.
//!
//! The plan records every layout decision (which nodes become blocks, which
//! stay on one line, what each argument row is labeled) plus the open/closed
//! state of call blocks. Adapters in [`super::text`] and [`super::html`]
//! only materialize it, so both surfaces always agree on structure.

use crate::config::Config;
use crate::labels::resolve_arg_label;
use crate::parser::Expr;

use super::inline::{args_preview, to_inline};

/// Pre-order index of a call block within its plan, starting at 0.
pub type BlockId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Literal, reference or signed operand, already in inline form.
    Line(String),
    Paren(Box<Block>),
    Binary {
        left: Box<Block>,
        op: &'static str,
        right: Box<Block>,
    },
    Call(CallBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBlock {
    pub id: BlockId,
    /// Upper-cased function name.
    pub name: String,
    pub rows: Vec<ArgRow>,
    /// `(arg1, arg2, ...)` shown while the block is closed.
    pub preview: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgRow {
    /// Empty when labels are switched off.
    pub label: String,
    pub value: Block,
}

/// One line of [`RenderPlan::blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub id: BlockId,
    pub name: String,
    pub depth: usize,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    header: String,
    root: Block,
}

impl RenderPlan {
    /// Lay out `expr`. `header` is the formula text shown when the root
    /// block is collapsed. Every call block starts open.
    #[must_use]
    pub fn build(header: &str, expr: &Expr, config: &Config) -> Self {
        let mut builder = Builder { config, next_id: 0 };
        RenderPlan {
            header: header.to_string(),
            root: builder.block(expr),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Block {
        &self.root
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The header line shows only while a call at the root is collapsed.
    #[must_use]
    pub fn header_visible(&self) -> bool {
        matches!(&self.root, Block::Call(c) if !c.open)
    }

    /// Clicking the header re-expands the root. No-op while it is hidden.
    pub fn click_header(&mut self) {
        if self.header_visible()
            && let Block::Call(c) = &mut self.root
        {
            c.open = true;
        }
    }

    /// Flip block `id`; returns its new state, or `None` if there is no such block.
    pub fn toggle(&mut self, id: BlockId) -> Option<bool> {
        let block = find_mut(&mut self.root, id)?;
        block.open = !block.open;
        Some(block.open)
    }

    /// Returns false if there is no block `id`.
    pub fn set_open(&mut self, id: BlockId, open: bool) -> bool {
        match find_mut(&mut self.root, id) {
            Some(block) => {
                block.open = open;
                true
            }
            None => false,
        }
    }

    pub fn collapse_all(&mut self) {
        for_each_call(&mut self.root, &mut |c: &mut CallBlock| c.open = false);
    }

    pub fn expand_all(&mut self) {
        for_each_call(&mut self.root, &mut |c: &mut CallBlock| c.open = true);
    }

    /// Call blocks in pre-order with their nesting depth among calls.
    #[must_use]
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let mut out = Vec::new();
        collect_blocks(&self.root, 0, &mut out);
        out
    }
}

struct Builder<'c, 'a> {
    config: &'c Config<'a>,
    next_id: BlockId,
}

impl Builder<'_, '_> {
    fn block(&mut self, expr: &Expr) -> Block {
        match expr {
            Expr::Literal(..) | Expr::Ident(_) | Expr::Unary(..) => Block::Line(to_inline(expr)),
            Expr::Paren(inner) => Block::Paren(Box::new(self.block(inner))),
            Expr::Binary(l, op, r) => Block::Binary {
                left: Box::new(self.block(l)),
                op: op.symbol(),
                right: Box::new(self.block(r)),
            },
            Expr::Call(name, args) => {
                let id = self.next_id;
                self.next_id += 1;
                let name = name.to_uppercase();
                let rows = args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| ArgRow {
                        label: resolve_arg_label(
                            self.config.labels,
                            &name,
                            i,
                            self.config.label_mode,
                            self.config.locale,
                        ),
                        value: self.block(arg),
                    })
                    .collect();
                Block::Call(CallBlock {
                    id,
                    name,
                    rows,
                    preview: args_preview(args),
                    open: true,
                })
            }
        }
    }
}

fn find_mut(block: &mut Block, id: BlockId) -> Option<&mut CallBlock> {
    match block {
        Block::Line(_) => None,
        Block::Paren(inner) => find_mut(inner, id),
        Block::Binary { left, right, .. } => {
            find_mut(left, id).or_else(|| find_mut(right, id))
        }
        Block::Call(c) => {
            if c.id == id {
                Some(c)
            } else {
                c.rows.iter_mut().find_map(|row| find_mut(&mut row.value, id))
            }
        }
    }
}

fn for_each_call(block: &mut Block, f: &mut dyn FnMut(&mut CallBlock)) {
    match block {
        Block::Line(_) => {}
        Block::Paren(inner) => for_each_call(inner, f),
        Block::Binary { left, right, .. } => {
            for_each_call(left, f);
            for_each_call(right, f);
        }
        Block::Call(c) => {
            f(c);
            for row in &mut c.rows {
                for_each_call(&mut row.value, f);
            }
        }
    }
}

fn collect_blocks(block: &Block, depth: usize, out: &mut Vec<BlockInfo>) {
    match block {
        Block::Line(_) => {}
        Block::Paren(inner) => collect_blocks(inner, depth, out),
        Block::Binary { left, right, .. } => {
            collect_blocks(left, depth, out);
            collect_blocks(right, depth, out);
        }
        Block::Call(c) => {
            out.push(BlockInfo {
                id: c.id,
                name: c.name.clone(),
                depth,
                open: c.open,
            });
            for row in &c.rows {
                collect_blocks(&row.value, depth + 1, out);
            }
        }
    }
}
