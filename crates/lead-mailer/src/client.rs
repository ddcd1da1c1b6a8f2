use chat_core::{async_trait, ChatError, LeadMailer};
use lettre::{
    message::{MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, instrument};

use crate::{MailerConfig, MailerError};

/// Sends lead emails over SMTP.
///
/// Uses connection pooling so bursts of leads reuse one session.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Create a new mailer with the given configuration.
    ///
    /// No connection is made until the first send.
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| MailerError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };
        let mut builder = builder.port(config.smtp_port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password().to_string(),
            ));
        }

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            starttls = config.starttls,
            from = %config.from_address,
            "Created SMTP lead mailer"
        );

        Ok(Self {
            transport: builder.build(),
            from_address: config.from_address,
        })
    }

    /// Build a multipart text + HTML message.
    fn build_message(&self, to: &str, subject: &str, html_body: &str) -> Result<Message, MailerError> {
        let from = self
            .from_address
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("From: {}", e)))?;
        let to = to
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("To '{}': {}", to, e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(html_to_text(html_body)?))
                    .singlepart(SinglePart::html(html_body.to_string())),
            )
            .map_err(|e| MailerError::BuildEmail(e.to_string()))
    }

    /// Send one email.
    #[instrument(skip_all, fields(to = %to, subject = %subject))]
    pub async fn send_html(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailerError> {
        let message = self.build_message(to, subject, html_body)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Send(e.to_string()))?;

        info!(to = %to, subject = %subject, "Lead email sent");
        Ok(())
    }
}

#[async_trait]
impl LeadMailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ChatError> {
        self.send_html(to, subject, html_body).await.map_err(ChatError::from)
    }
}

/// Line width of the plain-text alternative.
const TEXT_WIDTH: usize = 80;

/// Plain-text alternative rendered from the HTML body.
fn html_to_text(html: &str) -> Result<String, MailerError> {
    html2text::from_read(html.as_bytes(), TEXT_WIDTH)
        .map_err(|e| MailerError::BuildEmail(format!("HTML to text failed: {}", e)))
}
