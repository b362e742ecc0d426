//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → table.rs (language bucket, name index)
//!     → pattern.rs (trim, wrap, fold optional slashes, prefix, anchor)
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path?query, scheme, host)
//!     → normalize.rs (strip base path, canonical slash, language)
//!         → non-canonical: Redirect (301)
//!     → matcher.rs (first match in language bucket, method check)
//!     → Return: Matched (200) / MethodMismatch (403) / NoMatch (404)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)
//! - Status is part of the outcome, never shared state

pub mod error;
pub mod matcher;
pub mod normalize;
pub mod outcome;
pub mod pattern;
pub mod router;
pub mod table;

pub use error::{RouteError, RouteResult};
pub use matcher::Matcher;
pub use normalize::{NormalizeError, Normalization, NormalizedPath, Redirect, UriNormalizer};
pub use outcome::{MatchOutcome, Params, RouteMatch};
pub use router::{RequestInfo, Resolution, Router};
pub use table::{LanguageSettings, Route, RouteDeclaration, RouteTable};
