// crates/auditgate-blocks/src/lib.rs
// ============================================================================
// Module: Auditgate Built-in Blocks
// Description: Four reference blocks grounding the BlockRegistry/Executor
//              contract: site.a11y, site.links-assets, brand.palette,
//              brand.tokens.
// Purpose: Give the engine runnable, deterministic fixtures without
//          depending on externally-registered blocks.
// Dependencies: auditgate-core, auditgate-registry, serde_json
// ============================================================================

//! ## Overview
//! Each block is a thin [`auditgate_core::Block`] implementation reading at
//! most one declared JSON/HTML input and, for `brand.palette`/`brand.tokens`,
//! optionally writing one declared JSON output. None perform network or
//! process I/O.

mod brand_palette;
mod brand_tokens;
mod register;
mod site_a11y;
mod site_links_assets;

pub use brand_palette::BrandPaletteBlock;
pub use brand_tokens::BrandTokensBlock;
pub use register::register_builtin_blocks;
pub use site_a11y::SiteA11yBlock;
pub use site_links_assets::SiteLinksAssetsBlock;
