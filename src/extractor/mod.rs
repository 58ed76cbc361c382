//! Conversation extraction.
//!
//! # Module Structure
//!
//! - `pairing`: two-state question/answer pairing with de-duplication
//! - `pipeline`: tier orchestration (site, paired lists, universal, last resort)
//!
//! # Usage
//!
//! ```rust
//! use rs_chat_navigator::extractor::{Fragment, PairingEngine};
//! use rs_chat_navigator::Role;
//!
//! let mut engine = PairingEngine::new(100, chrono::Utc::now());
//! engine.push(Fragment::new("How do I optimize performance?"), Role::User);
//! engine.push(Fragment::new("Use memoization."), Role::Assistant);
//!
//! let pairs = engine.finish();
//! assert_eq!(pairs.len(), 1);
//! ```

pub mod pairing;
pub mod pipeline;

pub use pairing::{Fragment, PairingEngine};
pub use pipeline::extract_conversations;
