// crates/auditgate-registry/src/registry.rs
// ============================================================================
// Module: Block Registry
// Description: Registry for compiled-in blocks with access-policy enforcement.
// Purpose: Route block invocations by block identifier; report unresolvable
//          or policy-blocked identifiers with the underlying cause preserved.
// Dependencies: auditgate-core
// ============================================================================

//! ## Overview
//! The block registry resolves block identifiers to a compiled-in table of
//! boxed [`Block`](auditgate_core::Block) trait objects (the static-table
//! strategy) and enforces allowlist/denylist policies. It implements
//! [`auditgate_core::BlockResolver`] for seamless integration with the
//! Validator and Planner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use auditgate_core::Block;
use auditgate_core::BlockResolver;

// ============================================================================
// SECTION: Access Policy
// ============================================================================

/// Access policy controlling which registered blocks may be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Optional allowlist of block identifiers. `None` permits every
    /// registered block, subject only to the denylist.
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of block identifiers; always rejected even if
    /// also allowlisted.
    pub denylist: BTreeSet<String>,
}

impl AccessPolicy {
    /// Returns a policy that permits every registered block.
    #[must_use]
    pub fn allow_all() -> Self {
        Self { allowlist: None, denylist: BTreeSet::new() }
    }

    /// Returns true iff `block_id` is permitted by this policy.
    #[must_use]
    pub fn is_allowed(&self, block_id: &str) -> bool {
        if self.denylist.contains(block_id) {
            return false;
        }
        match &self.allowlist {
            Some(allowlist) => allowlist.contains(block_id),
            None => true,
        }
    }
}

// ============================================================================
// SECTION: Registry Error
// ============================================================================

/// Errors raised while resolving or invoking a registered block.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No block is registered under this identifier.
    #[error("cannot import blocks.{block_id}.main")]
    NotRegistered {
        /// The block identifier that was requested.
        block_id: String,
    },
    /// The block is registered but rejected by the access policy.
    #[error("cannot import blocks.{block_id}.main")]
    DeniedByPolicy {
        /// The block identifier that was requested.
        block_id: String,
    },
    /// The block's entry point raised during execution.
    #[error(transparent)]
    Execution(#[from] auditgate_core::block::BlockExecutionError),
}

// ============================================================================
// SECTION: Block Registry
// ============================================================================

/// Compiled-in block registry with policy enforcement.
pub struct BlockRegistry {
    /// Block implementations keyed by block identifier.
    blocks: BTreeMap<String, Box<dyn Block + Send + Sync>>,
    /// Access control policy for block resolution.
    policy: AccessPolicy,
}

impl BlockRegistry {
    /// Creates an empty registry with the given policy.
    #[must_use]
    pub fn new(policy: AccessPolicy) -> Self {
        Self { blocks: BTreeMap::new(), policy }
    }

    /// Registers a block under the given identifier, overwriting any prior
    /// registration under the same identifier.
    pub fn register(&mut self, block_id: impl Into<String>, block: impl Block + Send + Sync + 'static) {
        self.blocks.insert(block_id.into(), Box::new(block));
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Looks up and invokes the block registered under `block_id`.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotRegistered`] if no block is registered
    /// under `block_id`, [`RegistryError::DeniedByPolicy`] if it is
    /// registered but rejected by the access policy, or
    /// [`RegistryError::Execution`] if the block's entry point raised.
    pub fn invoke(
        &self,
        block_id: &str,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Option<auditgate_core::model::BlockResult>, RegistryError> {
        if !self.policy.is_allowed(block_id) {
            return Err(RegistryError::DeniedByPolicy { block_id: block_id.to_owned() });
        }
        let Some(block) = self.blocks.get(block_id) else {
            return Err(RegistryError::NotRegistered { block_id: block_id.to_owned() });
        };
        Ok(block.run(inputs, outputs)?)
    }
}

impl BlockResolver for BlockRegistry {
    fn resolves(&self, block_id: &str) -> bool {
        self.blocks.contains_key(block_id) && self.policy.is_allowed(block_id)
    }
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
    use auditgate_core::block::BlockExecutionError;

    struct NoopBlock {
        id: &'static str,
    }

    impl Block for NoopBlock {
        fn block_id(&self) -> &str {
            self.id
        }

        fn run(
            &self,
            _inputs: &[String],
            _outputs: &[String],
        ) -> Result<Option<auditgate_core::model::BlockResult>, BlockExecutionError> {
            Ok(None)
        }
    }

    #[test]
    fn unregistered_block_does_not_resolve() {
        let registry = BlockRegistry::new(AccessPolicy::allow_all());
        assert!(!registry.resolves("site.a11y"));
    }

    #[test]
    fn registered_block_resolves_under_allow_all() {
        let mut registry = BlockRegistry::new(AccessPolicy::allow_all());
        registry.register("site.a11y", NoopBlock { id: "site.a11y@1.0.0" });
        assert!(registry.resolves("site.a11y"));
    }

    #[test]
    fn denylist_overrides_allowlist() {
        let mut policy = AccessPolicy::allow_all();
        policy.allowlist = Some(BTreeSet::from(["brand.palette".to_owned()]));
        policy.denylist.insert("brand.palette".to_owned());
        let mut registry = BlockRegistry::new(policy);
        registry.register("brand.palette", NoopBlock { id: "brand.palette@1.0.0" });
        assert!(!registry.resolves("brand.palette"));
    }

    #[test]
    fn allowlist_excludes_blocks_not_listed() {
        let mut policy = AccessPolicy::allow_all();
        policy.allowlist = Some(BTreeSet::from(["site.a11y".to_owned()]));
        let mut registry = BlockRegistry::new(policy);
        registry.register("site.a11y", NoopBlock { id: "site.a11y@1.0.0" });
        registry.register("brand.palette", NoopBlock { id: "brand.palette@1.0.0" });
        assert!(registry.resolves("site.a11y"));
        assert!(!registry.resolves("brand.palette"));
    }

    #[test]
    fn invoke_denied_by_policy_reports_cannot_import() {
        let mut policy = AccessPolicy::allow_all();
        policy.denylist.insert("brand.palette".to_owned());
        let mut registry = BlockRegistry::new(policy);
        registry.register("brand.palette", NoopBlock { id: "brand.palette@1.0.0" });
        let err = registry.invoke("brand.palette", &[], &[]).expect_err("denied");
        assert!(matches!(err, RegistryError::DeniedByPolicy { .. }));
    }

    #[test]
    fn invoke_not_registered_reports_cannot_import() {
        let registry = BlockRegistry::new(AccessPolicy::allow_all());
        let err = registry.invoke("site.a11y", &[], &[]).expect_err("not registered");
        assert!(matches!(err, RegistryError::NotRegistered { .. }));
    }
}
