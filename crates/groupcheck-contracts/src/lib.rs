//! Declarative validation contracts for consumer group definitions.
//!
//! A [`Contract`] evaluates a [`RuleSet`] against a dynamically typed [`Value`] and the
//! [`Policy`] in force, collecting every failure into an [`Outcome`] instead of stopping at
//! the first one. Failures render through a [`MessageCatalog`]; [`MessageCatalog::audit`]
//! proves statically that every rule has a message.

mod catalog;
mod consumer_group;
mod contract;
mod outcome;
mod rule;
mod rule_set;
mod value;

pub use catalog::*;
pub use consumer_group::*;
pub use contract::*;
pub use outcome::*;
pub use rule::*;
pub use rule_set::*;
pub use value::*;

pub use groupcheck_policy::Policy;
