//! clrname_ast: The scope tree produced by parsing a type name.
//!
//! A parsed type name is a tree of scopes: the root type and its generic
//! arguments, each carrying name blocks (type name, assembly name, version,
//! culture, public key token) that are views into the shared source text.
//! Every scope can be rendered back to text in three styles; renderings are
//! memoized per scope and invalidated up the ancestor chain on mutation.

pub mod node;
pub mod render;
pub mod tree;

pub use node::{BlockKind, NameBlock, ScopeId, ScopeNode};
pub use render::RenderStyle;
pub use tree::{ScopeRef, ScopeTree};
