// crates/auditgate-blocks/src/register.rs
// ============================================================================
// Module: Built-in Block Registration
// Description: Wires the four reference blocks into a BlockRegistry.
// Purpose: Give the CLI a single call that produces a ready-to-use registry.
// Dependencies: auditgate-registry
// ============================================================================

//! ## Overview
//! [`register_builtin_blocks`] registers `site.a11y`, `site.links-assets`,
//! `brand.palette`, and `brand.tokens` under their unversioned spec
//! identifiers, matching the `blocks.<name>.main` convention named in the
//! block wire contract.

use auditgate_registry::AccessPolicy;
use auditgate_registry::BlockRegistry;

use crate::BrandPaletteBlock;
use crate::BrandTokensBlock;
use crate::SiteA11yBlock;
use crate::SiteLinksAssetsBlock;

/// Builds a [`BlockRegistry`] with the four built-in reference blocks
/// registered under `policy`.
#[must_use]
pub fn register_builtin_blocks(policy: AccessPolicy) -> BlockRegistry {
    let mut registry = BlockRegistry::new(policy);
    registry.register("site.a11y", SiteA11yBlock);
    registry.register("site.links-assets", SiteLinksAssetsBlock);
    registry.register("brand.palette", BrandPaletteBlock);
    registry.register("brand.tokens", BrandTokensBlock);
    registry
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
mod tests {
    use super::*;
    use auditgate_core::BlockResolver;

    #[test]
    fn all_four_builtins_resolve_under_allow_all() {
        let registry = register_builtin_blocks(AccessPolicy::allow_all());
        assert!(registry.resolves("site.a11y"));
        assert!(registry.resolves("site.links-assets"));
        assert!(registry.resolves("brand.palette"));
        assert!(registry.resolves("brand.tokens"));
    }
}
