//! Discord webhook delivery for ban and unban events

mod dispatcher;
mod payload;
mod url;

pub use dispatcher::{BanEvent, WebhookDescriptor, WebhookDispatcher};
pub use payload::{build_payload, Embed, EmbedFooter, PayloadTemplate, WebhookPayload, BAN_COLOR, UNBAN_COLOR};
pub use url::WebhookIdentity;
