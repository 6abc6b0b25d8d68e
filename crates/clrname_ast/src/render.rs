//! Tree-to-text renderings.
//!
//! All three renderings share one recursive walk; they differ only in which
//! assembly identities are emitted and whether an unbound generic root keeps
//! its (empty) argument list.

use once_cell::sync::OnceCell;

use crate::tree::ScopeRef;

const DEFAULT_VERSION: &str = "0.0.0.0";
const DEFAULT_CULTURE: &str = "neutral";
const DEFAULT_PUBLIC_KEY_TOKEN: &str = "null";

/// Which textual projection of a scope to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStyle {
    /// Type names and generic argument lists only.
    Short,
    /// Like `Short`, plus the assembly identity of every non-root scope.
    Full,
    /// Like `Full`, plus the root's own assembly identity.
    AssemblyQualified,
}

/// Memoized renderings of one node.
#[derive(Debug, Clone, Default)]
pub(crate) struct RenderCache {
    short: OnceCell<String>,
    full: OnceCell<String>,
    assembly_qualified: OnceCell<String>,
}

impl RenderCache {
    pub(crate) fn slot(&self, style: RenderStyle) -> &OnceCell<String> {
        match style {
            RenderStyle::Short => &self.short,
            RenderStyle::Full => &self.full,
            RenderStyle::AssemblyQualified => &self.assembly_qualified,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.short.take();
        self.full.take();
        self.assembly_qualified.take();
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.short.get().is_none()
            && self.full.get().is_none()
            && self.assembly_qualified.get().is_none()
    }
}

/// Render `scope` in `style`. Generic arguments are rendered through their
/// own memoized renderings.
pub(crate) fn render(scope: ScopeRef<'_>, style: RenderStyle) -> String {
    let is_root = scope.is_root();
    let emit_identity = match style {
        RenderStyle::Short => false,
        RenderStyle::Full => !is_root && scope.has_assembly(),
        RenderStyle::AssemblyQualified => scope.has_assembly(),
    };
    let bracketed = emit_identity && !is_root;

    let mut out = String::with_capacity(scope.tree().text().len());
    if bracketed {
        out.push('[');
    }

    out.push_str(scope.name());

    if scope.is_generic_type() {
        let unbound_root =
            style == RenderStyle::AssemblyQualified && is_root && !scope.has_generic_argument();
        if !unbound_root {
            out.push('[');
            for slot in 0..scope.expected_generic_arg_count() {
                if slot > 0 {
                    out.push(',');
                }
                if let Some(argument) = scope.generic_argument(slot) {
                    out.push_str(argument.render(style));
                }
            }
            out.push(']');
        }
    }

    if emit_identity {
        push_identity(&mut out, scope);
    }

    if bracketed {
        out.push(']');
    }
    out
}

fn push_identity(out: &mut String, scope: ScopeRef<'_>) {
    out.push_str(", ");
    out.push_str(scope.assembly_name().unwrap_or_default());

    let version = scope.version();
    let culture = scope.culture();
    let public_key_token = scope.public_key_token();
    if version.is_none() && culture.is_none() && public_key_token.is_none() {
        return;
    }

    out.push_str(", Version=");
    out.push_str(version.unwrap_or(DEFAULT_VERSION));
    out.push_str(", Culture=");
    out.push_str(culture.unwrap_or(DEFAULT_CULTURE));
    out.push_str(", PublicKeyToken=");
    out.push_str(public_key_token.unwrap_or(DEFAULT_PUBLIC_KEY_TOKEN));
}
