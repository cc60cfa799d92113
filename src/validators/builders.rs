//! Component builders
//!
//! A builder is a plain, version-agnostic mirror of a component's constructor
//! arguments. Builders can be filled from an existing component, edited,
//! saved as JSON and committed later under any version. Committing re-runs
//! the whole construction-time validation against the version given to
//! [`Builder::commit`], never the one the builder was filled under.

use crate::error::Result;
use crate::version::VersionContext;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A mutable snapshot of a component's field values
pub trait Builder {
    /// The component this builder produces
    type Target;

    /// Whether every field and nested builder is empty
    fn is_empty(&self) -> bool;

    /// Construct the component, whether or not the builder is empty
    fn build(&self, ctx: &VersionContext) -> Result<Self::Target>;

    /// Construct the component under `ctx`, or `None` when the builder is empty
    ///
    /// A failed commit leaves the builder unchanged so it can be corrected and
    /// committed again.
    fn commit(&self, ctx: &VersionContext) -> Result<Option<Self::Target>> {
        let component = std::any::type_name::<Self::Target>();
        if self.is_empty() {
            tracing::trace!(component, version = %ctx.version(), "empty builder skipped");
            return Ok(None);
        }
        match self.build(ctx) {
            Ok(built) => {
                tracing::debug!(component, version = %ctx.version(), "builder committed");
                Ok(Some(built))
            }
            Err(err) => {
                tracing::debug!(component, version = %ctx.version(), error = %err, "builder rejected");
                Err(err)
            }
        }
    }
}

/// Commit every non-empty builder of a list, in order
pub fn commit_all<B: Builder>(builders: &[B], ctx: &VersionContext) -> Result<Vec<B::Target>> {
    let mut committed = Vec::new();
    for builder in builders {
        if let Some(component) = builder.commit(ctx)? {
            committed.push(component);
        }
    }
    Ok(committed)
}

/// Whether every builder of a list is empty
pub fn all_empty<B: Builder>(builders: &[B]) -> bool {
    builders.iter().all(|b| b.is_empty())
}

/// Save a builder as JSON
pub fn snapshot<B: Serialize>(builder: &B) -> Result<String> {
    Ok(serde_json::to_string_pretty(builder)?)
}

/// Restore a builder saved with [`snapshot`]
pub fn restore<B: DeserializeOwned>(json: &str) -> Result<B> {
    Ok(serde_json::from_str(json)?)
}
