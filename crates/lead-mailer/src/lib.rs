//! # lead-mailer
//!
//! SMTP implementation of [`LeadMailer`](chat_core::LeadMailer) used to email
//! captured leads to the sales inbox.
//!
//! ```no_run
//! use chat_core::LeadMailer;
//! use lead_mailer::{MailerConfig, SmtpMailer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MailerConfig::from_env()?;
//!     let mailer = SmtpMailer::new(config)?;
//!
//!     mailer
//!         .send("ventas@tienda.com", "Nuevo lead", "<p>Juan quiere un colchón</p>")
//!         .await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;

pub use client::SmtpMailer;
pub use config::MailerConfig;
pub use error::MailerError;
