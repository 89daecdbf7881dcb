//! Eligibility rule DSL and evaluation engine. Given a profile and an
//! opportunity, decides whether the profile is eligible and produces
//! per-rule pass/fail reasons a caller can surface back to the user.

mod context;
mod dsl;
mod engine;

pub use context::{OpportunityContext, ProfileContext};
pub use dsl::{Mode, RuleKind, RuleProgram, RuleSet};
pub use engine::{evaluate, EvalResult, RuleOutcome};
