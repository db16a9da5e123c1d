pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod webhook;

use chrono::Utc;
use log::{debug, info};
use std::time::Duration;

use crate::cli::Args;
use crate::config::Config;
use crate::error::Error;
use crate::message::WebhookMessage;
use crate::webhook::{HttpTransport, Transport, Webhook, WebhookUrl};

/// Loads the configuration and delivers one status alert.
///
/// # Errors
///
/// Fails before any request is made when no valid webhook URL is configured, and afterwards if
/// either webhook call fails.
pub async fn run(args: Args) -> Result<(), Error> {
    let config = Config::load(args.config.as_deref())?;
    let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
    let webhook = webhook_from_config(&config, transport)?;

    send_status_alert(&webhook, &config.mention, &args.service, &args.status).await
}

/// Validates the configured webhook URL and pairs it with `transport`.
///
/// # Errors
///
/// Returns [`Error::MissingWebhookUrl`] when no URL is configured, or a parse error when it is
/// not a Discord webhook URL; no request is made.
pub fn webhook_from_config<T: Transport>(
    config: &Config,
    transport: T,
) -> Result<Webhook<T>, Error> {
    let url = WebhookUrl::parse(config.webhook_url()?)?;
    Ok(Webhook::new(url, transport))
}

/// Posts the status card, then the broadcast mention.
///
/// The mention is only sent once the card went through; an empty `mention` skips it.
///
/// # Errors
///
/// Returns the first transport error; nothing is retried.
pub async fn send_status_alert<T: Transport>(
    webhook: &Webhook<T>,
    mention: &str,
    service: &str,
    status: &str,
) -> Result<(), Error> {
    info!("Sending status alert: {service} -> {status}");
    webhook
        .send(&WebhookMessage::status(service, status, Utc::now()))
        .await?;

    if mention.trim().is_empty() {
        debug!("No mention configured, skipping broadcast");
    } else {
        webhook.send(&WebhookMessage::mention(mention)).await?;
    }

    info!("Status alert for {service} delivered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::IS_COMPONENTS_V2;
    use crate::webhook::MockTransport;
    use mockall::Sequence;

    fn config_with(url: &str) -> Config {
        Config {
            webhook_url: Some(url.to_string()),
            ..Config::default()
        }
    }

    const URL: &str = "https://discord.com/api/webhooks/1234567890/abcdefg";

    #[tokio::test]
    async fn test_send_status_alert_success() {
        let mut transport = MockTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_post()
            .withf(|_, message| {
                message.flags == Some(IS_COMPONENTS_V2) && message.content.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        transport
            .expect_post()
            .withf(|_, message| message.content.as_deref() == Some("@everyone"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let webhook = webhook_from_config(&config_with(URL), transport).unwrap();
        send_status_alert(&webhook, "@everyone", "service", "STARTED")
            .await
            .expect("Expected alert to be delivered");
    }

    #[tokio::test]
    async fn test_mention_not_sent_when_status_fails() {
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .times(1)
            .returning(|_, _| Err(Error::Io(std::io::Error::other("connection reset"))));

        let webhook = webhook_from_config(&config_with(URL), transport).unwrap();
        let result = send_status_alert(&webhook, "@everyone", "service", "ERROR").await;

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_empty_mention_skips_broadcast() {
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .withf(|_, message| message.flags == Some(IS_COMPONENTS_V2))
            .times(1)
            .returning(|_, _| Ok(()));

        let webhook = webhook_from_config(&config_with(URL), transport).unwrap();
        send_status_alert(&webhook, "", "service", "STOPPED")
            .await
            .unwrap();
    }

    #[test]
    fn test_missing_url_fails_before_any_request() {
        let mut transport = MockTransport::new();
        transport.expect_post().never();

        let result = webhook_from_config(&Config::default(), transport);
        assert!(matches!(result, Err(Error::MissingWebhookUrl)));
    }

    #[test]
    fn test_invalid_url_fails_before_any_request() {
        let mut transport = MockTransport::new();
        transport.expect_post().never();

        let result = webhook_from_config(&config_with("https://example.com/hook"), transport);
        assert!(matches!(result, Err(Error::InvalidWebhookUrl(_))));
    }

    #[ignore = "This test requires a valid Discord webhook URL"]
    #[tokio::test]
    async fn test_discord_notification() {
        let webhook_url =
            dotenvy::var(config::WEBHOOK_URL_VAR).expect("DISCORD_WEBHOOK_URL not set");
        let transport = HttpTransport::new(Duration::from_secs(10)).unwrap();
        let webhook = webhook_from_config(&config_with(&webhook_url), transport).unwrap();
        let result = send_status_alert(&webhook, "", "discord-alert", "TESTING").await;
        assert!(
            result.is_ok(),
            "Expected notification to be sent successfully"
        );
    }
}
