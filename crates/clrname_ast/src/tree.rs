//! The scope tree arena and its read-only navigation handle.

use std::fmt;

use clrname_core::{SourceText, TextPos};
use clrname_diagnostics::{messages, DescriptorResult, ErrorDescriptor};

use crate::node::{BlockKind, NameBlock, ScopeId, ScopeNode};
use crate::render::{self, RenderStyle};

/// Arena of the scope nodes produced by one parse.
///
/// Node 0 is always the root. Children are appended as generic arguments
/// start, so ids follow source order. Mutators return the catalogue entry of
/// the violated rule; the caller attaches position and state.
#[derive(Clone)]
pub struct ScopeTree {
    source: SourceText,
    nodes: Vec<ScopeNode>,
}

impl ScopeTree {
    /// Create a tree holding only an empty root scope.
    pub fn new(text: &str) -> Self {
        Self::from_source(SourceText::new(text))
    }

    pub fn from_source(source: SourceText) -> Self {
        let mut nodes = Vec::with_capacity(4);
        nodes.push(ScopeNode::new(ScopeId::ROOT, None));
        Self { source, nodes }
    }

    #[inline]
    pub fn source(&self) -> &SourceText {
        &self.source
    }

    #[inline]
    pub fn text(&self) -> &str {
        self.source.as_str()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn root(&self) -> ScopeRef<'_> {
        ScopeRef {
            tree: self,
            id: ScopeId::ROOT,
        }
    }

    /// Handle to the node `id`, or `None` if it does not belong to this tree.
    pub fn get(&self, id: ScopeId) -> Option<ScopeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(ScopeRef { tree: self, id })
    }

    /// Raw node data. Panics on an id from another tree.
    #[inline]
    pub fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.index()]
    }

    /// All scopes in creation order, root first.
    pub fn iter(&self) -> impl Iterator<Item = ScopeRef<'_>> + '_ {
        self.nodes.iter().map(move |node| ScopeRef {
            tree: self,
            id: node.id,
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a new generic argument scope under `parent`.
    pub fn add_generic_argument(&mut self, parent: ScopeId) -> DescriptorResult<ScopeId> {
        if !self.nodes[parent.index()].can_add_generic_argument() {
            return Err(&messages::GENERICS_ARGUMENTS_COUNT_EXCEEDED);
        }
        let id = ScopeId(self.nodes.len() as u32);
        self.nodes.push(ScopeNode::new(id, Some(parent)));
        self.nodes[parent.index()].generic_arguments.push(id);
        self.invalidate(parent);
        Ok(id)
    }

    /// Open the type name block at `start`. The end follows as the name is scanned.
    pub fn set_name(&mut self, id: ScopeId, start: TextPos) -> DescriptorResult<()> {
        self.define_block(id, BlockKind::TypeName, start, start)
    }

    /// Move the end of the type name block. Ignored once the block is locked.
    pub fn set_name_end(&mut self, id: ScopeId, end: TextPos) -> DescriptorResult<()> {
        let block = self.nodes[id.index()]
            .name
            .as_mut()
            .ok_or(&messages::INVALID_TYPE_NAME)?;
        if block.view_mut().set_end(end) {
            self.invalidate(id);
        }
        Ok(())
    }

    pub fn set_assembly_name(&mut self, id: ScopeId, start: TextPos, end: TextPos) -> DescriptorResult<()> {
        self.define_block(id, BlockKind::AssemblyName, start, end)
    }

    pub fn set_version(&mut self, id: ScopeId, start: TextPos, end: TextPos) -> DescriptorResult<()> {
        self.define_block(id, BlockKind::Version, start, end)
    }

    pub fn set_culture(&mut self, id: ScopeId, start: TextPos, end: TextPos) -> DescriptorResult<()> {
        self.define_block(id, BlockKind::Culture, start, end)
    }

    pub fn set_public_key_token(&mut self, id: ScopeId, start: TextPos, end: TextPos) -> DescriptorResult<()> {
        self.define_block(id, BlockKind::PublicKeyToken, start, end)
    }

    /// Define a name block once. Identity properties require the assembly name.
    fn define_block(
        &mut self,
        id: ScopeId,
        kind: BlockKind,
        start: TextPos,
        end: TextPos,
    ) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if node.block(kind).is_some() {
            return Err(already_defined(kind));
        }
        if kind != BlockKind::TypeName && kind != BlockKind::AssemblyName && node.assembly_name.is_none() {
            return Err(defined_before_assembly_name(kind));
        }
        *node.block_mut(kind) = Some(NameBlock::new(kind, start, end));
        self.invalidate(id);
        Ok(())
    }

    /// Fix the generic arity of `id`. Allowed once, with a count of at least 1.
    pub fn set_expected_generic_arg_count(&mut self, id: ScopeId, count: usize) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if count < 1 || node.expected_generic_arg_count.is_some() {
            return Err(&messages::INVALID_GENERICS_COUNT);
        }
        node.expected_generic_arg_count = Some(count);
        node.generic_arguments.reserve_exact(count);
        self.invalidate(id);
        Ok(())
    }

    /// Flag `id` as an array type. A generic type cannot become an array.
    pub fn mark_array(&mut self, id: ScopeId) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if node.is_generic_type() {
            return Err(&messages::INVALID_ARRAY_START);
        }
        if !node.is_array {
            node.is_array = true;
            self.invalidate(id);
        }
        Ok(())
    }

    pub fn enter_generics_block(&mut self, id: ScopeId) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if !node.is_generic_type() || node.generics_block_depth != 0 {
            return Err(&messages::INVALID_GENERICS_START);
        }
        node.generics_block_depth = 1;
        Ok(())
    }

    pub fn leave_generics_block(&mut self, id: ScopeId) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if !node.is_generic_type() || node.generics_block_depth != 1 {
            return Err(&messages::INVALID_GENERICS_END);
        }
        node.generics_block_depth = 0;
        Ok(())
    }

    /// Enter the `[...]` wrapping an assembly-qualified generic argument.
    /// Never valid on the root.
    pub fn enter_name_block(&mut self, id: ScopeId) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if node.is_root() || node.name_block_depth != 0 {
            return Err(&messages::INVALID_GENERICS_ARG_BLOCK_OPEN);
        }
        node.name_block_depth = 1;
        Ok(())
    }

    pub fn leave_name_block(&mut self, id: ScopeId) -> DescriptorResult<()> {
        let node = &mut self.nodes[id.index()];
        if node.is_root() || node.name_block_depth != 1 {
            return Err(&messages::INVALID_GENERICS_ARG_BLOCK_CLOSE);
        }
        node.name_block_depth = 0;
        Ok(())
    }

    /// Freeze every name block of `id`.
    pub fn lock_scope(&mut self, id: ScopeId) {
        for block in self.nodes[id.index()].blocks_mut() {
            block.view_mut().lock();
        }
    }

    /// Freeze every name block in the tree.
    pub fn lock_all(&mut self) {
        for node in &mut self.nodes {
            for block in node.blocks_mut() {
                block.view_mut().lock();
            }
        }
    }

    /// Drop the memoized renderings of `id` and all of its ancestors.
    fn invalidate(&mut self, id: ScopeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.index()];
            node.cache.clear();
            current = node.parent;
        }
    }
}

fn already_defined(kind: BlockKind) -> &'static ErrorDescriptor {
    match kind {
        BlockKind::TypeName => &messages::TYPE_NAME_ALREADY_DEFINED,
        BlockKind::AssemblyName => &messages::ASSEMBLY_NAME_ALREADY_DEFINED,
        BlockKind::Version => &messages::ASSEMBLY_VERSION_ALREADY_DEFINED,
        BlockKind::Culture => &messages::ASSEMBLY_CULTURE_ALREADY_DEFINED,
        BlockKind::PublicKeyToken => &messages::ASSEMBLY_PUBLIC_KEY_TOKEN_ALREADY_DEFINED,
    }
}

fn defined_before_assembly_name(kind: BlockKind) -> &'static ErrorDescriptor {
    match kind {
        BlockKind::Culture => &messages::CANNOT_DEFINE_CULTURE_BEFORE_ASSEMBLY_NAME,
        BlockKind::PublicKeyToken => &messages::CANNOT_DEFINE_PUBLIC_KEY_TOKEN_BEFORE_ASSEMBLY_NAME,
        _ => &messages::CANNOT_DEFINE_VERSION_BEFORE_ASSEMBLY_NAME,
    }
}

impl fmt::Debug for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeTree")
            .field("source", &self.source)
            .field("nodes", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// ScopeRef
// ============================================================================

/// Read-only handle to one scope of a tree.
#[derive(Copy, Clone)]
pub struct ScopeRef<'t> {
    tree: &'t ScopeTree,
    id: ScopeId,
}

impl<'t> ScopeRef<'t> {
    #[inline]
    pub fn id(self) -> ScopeId {
        self.id
    }

    #[inline]
    pub fn tree(self) -> &'t ScopeTree {
        self.tree
    }

    #[inline]
    pub fn node(self) -> &'t ScopeNode {
        self.tree.node(self.id)
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self.node().is_root()
    }

    #[inline]
    pub fn is_generic_argument(self) -> bool {
        self.node().is_generic_argument()
    }

    #[inline]
    pub fn is_generic_type(self) -> bool {
        self.node().is_generic_type()
    }

    #[inline]
    pub fn has_generic_argument(self) -> bool {
        self.node().has_generic_argument()
    }

    #[inline]
    pub fn in_name_block(self) -> bool {
        self.node().in_name_block()
    }

    #[inline]
    pub fn is_array(self) -> bool {
        self.node().is_array()
    }

    #[inline]
    pub fn expected_generic_arg_count(self) -> usize {
        self.node().expected_generic_arg_count()
    }

    #[inline]
    pub fn generic_arg_count(self) -> usize {
        self.node().generic_arg_count()
    }

    #[inline]
    pub fn generics_block_depth(self) -> u8 {
        self.node().generics_block_depth()
    }

    #[inline]
    pub fn name_block_depth(self) -> u8 {
        self.node().name_block_depth()
    }

    #[inline]
    pub fn block(self, kind: BlockKind) -> Option<&'t NameBlock> {
        self.node().block(kind)
    }

    /// Text of a block, `None` if the block is missing or empty.
    pub fn block_text(self, kind: BlockKind) -> Option<&'t str> {
        self.block(kind)
            .map(|block| block.text(self.tree.source()))
            .filter(|text| !text.is_empty())
    }

    /// The type name including arity and array markers, `""` if not yet named.
    pub fn name(self) -> &'t str {
        self.block_text(BlockKind::TypeName).unwrap_or_default()
    }

    pub fn assembly_name(self) -> Option<&'t str> {
        self.block_text(BlockKind::AssemblyName)
    }

    pub fn version(self) -> Option<&'t str> {
        self.block_text(BlockKind::Version)
    }

    pub fn culture(self) -> Option<&'t str> {
        self.block_text(BlockKind::Culture)
    }

    pub fn public_key_token(self) -> Option<&'t str> {
        self.block_text(BlockKind::PublicKeyToken)
    }

    /// Whether this scope carries a non-empty assembly name.
    pub fn has_assembly(self) -> bool {
        self.assembly_name().is_some()
    }

    pub fn parent(self) -> Option<ScopeRef<'t>> {
        self.node().parent().map(|id| ScopeRef { tree: self.tree, id })
    }

    /// Parent, grandparent, ... up to and including the root.
    pub fn ancestors(self) -> impl Iterator<Item = ScopeRef<'t>> {
        std::iter::successors(self.parent(), |scope| scope.parent())
    }

    pub fn root(self) -> ScopeRef<'t> {
        self.tree.root()
    }

    pub fn generic_argument(self, index: usize) -> Option<ScopeRef<'t>> {
        let tree = self.tree;
        self.node()
            .generic_arguments()
            .get(index)
            .map(|&id| ScopeRef { tree, id })
    }

    pub fn generic_arguments(self) -> impl ExactSizeIterator<Item = ScopeRef<'t>> {
        let tree = self.tree;
        self.node()
            .generic_arguments()
            .iter()
            .map(move |&id| ScopeRef { tree, id })
    }

    /// Position of `child` in this scope's argument list.
    pub fn index_of(self, child: ScopeRef<'_>) -> Option<usize> {
        if !std::ptr::eq(self.tree, child.tree) {
            return None;
        }
        self.node().generic_arguments().iter().position(|&id| id == child.id)
    }

    /// Memoized rendering in `style`.
    pub fn render(self, style: RenderStyle) -> &'t str {
        self.node()
            .cache
            .slot(style)
            .get_or_init(|| render::render(self, style))
    }

    /// Type name with generic arguments, no assembly identities.
    pub fn short_name(self) -> &'t str {
        self.render(RenderStyle::Short)
    }

    /// Type name with the assembly identities of generic arguments.
    pub fn full_name(self) -> &'t str {
        self.render(RenderStyle::Full)
    }

    /// Type name with all assembly identities, including this scope's own.
    pub fn assembly_qualified_name(self) -> &'t str {
        self.render(RenderStyle::AssemblyQualified)
    }
}

impl PartialEq for ScopeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ScopeRef<'_> {}

impl fmt::Display for ScopeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.assembly_qualified_name())
    }
}

impl fmt::Debug for ScopeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        let mut s = f.debug_struct("Scope");
        s.field("id", &self.id)
            .field("is_root", &node.is_root())
            .field("in_name_block", &node.in_name_block())
            .field("is_generic_type", &node.is_generic_type())
            .field("expected_generic_arg_count", &node.expected_generic_arg_count())
            .field("generic_arg_count", &node.generic_arg_count())
            .field("is_array", &node.is_array());
        for kind in [
            BlockKind::TypeName,
            BlockKind::AssemblyName,
            BlockKind::Version,
            BlockKind::Culture,
            BlockKind::PublicKeyToken,
        ] {
            if let Some(block) = node.block(kind) {
                s.field(kind.as_str(), &block.text(self.tree.source()));
            }
        }
        s.finish()
    }
}
