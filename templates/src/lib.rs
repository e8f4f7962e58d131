//! Contract, script and transaction templates for the coin toss suite.
//!
//! Source text is embedded at build time and addressed by a logical name
//! (see [`assets`]). Templates reference their dependencies through quoted
//! placeholder tokens (`"FungibleToken"`, `"PseudoRandomGenerator"`, ...);
//! [`bind`] substitutes each token with a concrete deployed address,
//! producing ready-to-submit source. The typed generators in [`contracts`],
//! [`scripts`] and [`transactions`] wrap the lookup-and-bind step for every
//! template in the suite.

pub mod assets;
mod binding;
pub mod contracts;
pub mod scripts;
pub mod transactions;

pub use binding::{bind, AddressBindings};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no template registered under '{0}'")]
    NotFound(String),
}
