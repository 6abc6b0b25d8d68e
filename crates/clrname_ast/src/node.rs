//! Scope nodes and name blocks.
//!
//! A scope node is one parsed occurrence of a type name: the root type or one
//! of its (possibly nested) generic arguments. Nodes live in a
//! [`ScopeTree`](crate::ScopeTree) arena and refer to each other by
//! [`ScopeId`]; children are owned through the parent's argument list, the
//! parent link is a plain index used only for navigation.

use std::fmt;

use clrname_core::{SourceText, TextPos, TextView};

use crate::render::RenderCache;

/// Index of a scope node in its tree. Assigned in creation order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The root scope of every tree.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a name block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    TypeName,
    AssemblyName,
    Version,
    Culture,
    PublicKeyToken,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::TypeName => "TypeName",
            BlockKind::AssemblyName => "AssemblyName",
            BlockKind::Version => "Version",
            BlockKind::Culture => "Culture",
            BlockKind::PublicKeyToken => "PublicKeyToken",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed view over the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameBlock {
    kind: BlockKind,
    view: TextView,
}

impl NameBlock {
    pub fn new(kind: BlockKind, start: TextPos, end: TextPos) -> Self {
        Self {
            kind,
            view: TextView::new(start, end),
        }
    }

    #[inline]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[inline]
    pub fn view(&self) -> &TextView {
        &self.view
    }

    #[inline]
    pub(crate) fn view_mut(&mut self) -> &mut TextView {
        &mut self.view
    }

    #[inline]
    pub fn start(&self) -> TextPos {
        self.view.start()
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.view.end()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.view.is_locked()
    }

    #[inline]
    pub fn is_empty(&self, source: &SourceText) -> bool {
        self.view.is_empty(source.len())
    }

    #[inline]
    pub fn text<'s>(&self, source: &'s SourceText) -> &'s str {
        self.view.text(source)
    }
}

/// One occurrence of a type name in the tree.
#[derive(Debug, Clone)]
pub struct ScopeNode {
    pub(crate) id: ScopeId,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) name: Option<NameBlock>,
    pub(crate) assembly_name: Option<NameBlock>,
    pub(crate) version: Option<NameBlock>,
    pub(crate) culture: Option<NameBlock>,
    pub(crate) public_key_token: Option<NameBlock>,
    /// Declared arity: `None` until the `` `N `` marker is seen.
    pub(crate) expected_generic_arg_count: Option<usize>,
    pub(crate) generic_arguments: Vec<ScopeId>,
    pub(crate) is_array: bool,
    pub(crate) generics_block_depth: u8,
    pub(crate) name_block_depth: u8,
    pub(crate) cache: RenderCache,
}

impl ScopeNode {
    pub(crate) fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            parent,
            name: None,
            assembly_name: None,
            version: None,
            culture: None,
            public_key_token: None,
            expected_generic_arg_count: None,
            generic_arguments: Vec::new(),
            is_array: false,
            generics_block_depth: 0,
            name_block_depth: 0,
            cache: RenderCache::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> ScopeId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_generic_argument(&self) -> bool {
        self.parent.is_some()
    }

    #[inline]
    pub fn is_generic_type(&self) -> bool {
        self.expected_generic_arg_count.is_some_and(|n| n > 0)
    }

    /// Declared arity, or 0 if none was declared.
    #[inline]
    pub fn expected_generic_arg_count(&self) -> usize {
        self.expected_generic_arg_count.unwrap_or(0)
    }

    /// Number of generic arguments recorded so far.
    #[inline]
    pub fn generic_arg_count(&self) -> usize {
        self.generic_arguments.len()
    }

    #[inline]
    pub fn has_generic_argument(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    #[inline]
    pub fn can_add_generic_argument(&self) -> bool {
        self.is_generic_type() && self.generic_arguments.len() < self.expected_generic_arg_count()
    }

    #[inline]
    pub fn generic_arguments(&self) -> &[ScopeId] {
        &self.generic_arguments
    }

    #[inline]
    pub fn in_name_block(&self) -> bool {
        self.name_block_depth > 0
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    #[inline]
    pub fn generics_block_depth(&self) -> u8 {
        self.generics_block_depth
    }

    #[inline]
    pub fn name_block_depth(&self) -> u8 {
        self.name_block_depth
    }

    pub fn block(&self, kind: BlockKind) -> Option<&NameBlock> {
        match kind {
            BlockKind::TypeName => self.name.as_ref(),
            BlockKind::AssemblyName => self.assembly_name.as_ref(),
            BlockKind::Version => self.version.as_ref(),
            BlockKind::Culture => self.culture.as_ref(),
            BlockKind::PublicKeyToken => self.public_key_token.as_ref(),
        }
    }

    pub(crate) fn block_mut(&mut self, kind: BlockKind) -> &mut Option<NameBlock> {
        match kind {
            BlockKind::TypeName => &mut self.name,
            BlockKind::AssemblyName => &mut self.assembly_name,
            BlockKind::Version => &mut self.version,
            BlockKind::Culture => &mut self.culture,
            BlockKind::PublicKeyToken => &mut self.public_key_token,
        }
    }

    pub(crate) fn blocks_mut(&mut self) -> impl Iterator<Item = &mut NameBlock> {
        [
            &mut self.name,
            &mut self.assembly_name,
            &mut self.version,
            &mut self.culture,
            &mut self.public_key_token,
        ]
        .into_iter()
        .filter_map(Option::as_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_id() {
        assert_eq!(ScopeId::ROOT.index(), 0);
        assert_eq!(ScopeId(7).to_string(), "#7");
    }

    #[test]
    fn test_name_block_text() {
        let source = SourceText::new("System.Int32, mscorlib");
        let block = NameBlock::new(BlockKind::AssemblyName, 14, 22);
        assert_eq!(block.text(&source), "mscorlib");
        assert!(!block.is_empty(&source));
        assert!(NameBlock::new(BlockKind::Version, 22, 22).is_empty(&source));
        assert_eq!(block.kind().to_string(), "AssemblyName");
    }

    #[test]
    fn test_fresh_node_facts() {
        let node = ScopeNode::new(ScopeId(1), Some(ScopeId::ROOT));
        assert!(!node.is_root());
        assert!(node.is_generic_argument());
        assert!(!node.is_generic_type());
        assert!(!node.can_add_generic_argument());
        assert_eq!(node.expected_generic_arg_count(), 0);
        assert!(node.block(BlockKind::TypeName).is_none());
    }
}
