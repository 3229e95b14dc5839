use packmule_primitives::models::dtos::clients_dto::NotificationRequest;
use packmule_primitives::models::entities::enum_types::NotificationKind;
use reqwest::{Client, Url};
use uuid::Uuid;

/// Fire-and-forget client for the notification sink. Delivery failures are
/// logged and swallowed; a notification must never block or roll back a
/// financial state transition.
#[derive(Clone)]
pub struct NotifyClient {
    http: Client,
    base_url: Option<Url>,
}

impl NotifyClient {
    pub fn new(http: Client, base_url: Option<&str>) -> Self {
        let base_url = base_url.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid NOTIFY_API_URL, notifications disabled");
                None
            }
        });

        Self { http, base_url }
    }

    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
        booking_id: Uuid,
    ) {
        let Some(base) = &self.base_url else {
            tracing::debug!(%user_id, %kind, "Notification sink disabled, dropping notification");
            return;
        };

        let mut url = base.clone();
        url.set_path("notifications");

        let payload = NotificationRequest {
            user_id,
            kind,
            title,
            body,
            booking_id,
        };

        match self.http.post(url).json(&payload).send().await {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!(
                    http_status = resp.status().as_u16(),
                    %user_id,
                    %kind,
                    "Notification sink rejected notification"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, %user_id, %kind, "Notification delivery failed");
            }
        }
    }
}
