//! Pattern-based detection for storefront conversations.
//!
//! - [`classify`] maps a user message to one [`Intent`](chat_core::Intent)
//! - [`is_handoff_request`] spots explicit requests for a human agent
//! - [`category_hint`] maps product nouns to catalog categories
//! - [`extract`] pulls contact data out of accumulated conversation text
//!
//! Rules are ordered tables of compiled patterns; adding a rule never touches
//! the evaluation loop.
//!
//! # Example
//!
//! ```rust
//! use chat_core::Intent;
//! use lead_detect::{classify, extract};
//!
//! assert_eq!(classify("cuanto cuesta el envío"), Intent::PriceInquiry);
//!
//! let lead = extract("mi nombre es Juan\njuan@mail.com").unwrap();
//! assert_eq!(lead.name.as_deref(), Some("Juan"));
//! assert_eq!(lead.email.as_deref(), Some("juan@mail.com"));
//! ```

mod extractor;
mod intent;

pub use extractor::{extract, extract_email, extract_name, extract_phone};
pub use intent::{category_hint, classify, is_handoff_request};
