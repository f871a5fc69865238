//! MIME assembly for a single recipient

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};

use super::DeliveryError;

/// A file read into memory, ready to be attached
#[derive(Debug, Clone)]
pub struct LoadedAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Read every attachment in order. The first unreadable file aborts the load.
pub async fn load_attachments(paths: &[PathBuf]) -> Result<Vec<LoadedAttachment>, DeliveryError> {
    let mut loaded = Vec::with_capacity(paths.len());

    for path in paths {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| DeliveryError::Attachment {
                path: path.clone(),
                source,
            })?;

        loaded.push(LoadedAttachment {
            filename: base_name(path),
            content,
        });
    }

    Ok(loaded)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}

/// Outgoing message for one recipient
pub struct OutgoingMessage<'a> {
    pub sender_name: &'a str,
    pub sender_address: &'a str,
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

/// Build a `multipart/mixed` message: the plain-text body first, then one
/// `application/octet-stream` part per attachment.
pub fn build_message(
    outgoing: &OutgoingMessage<'_>,
    attachments: Vec<LoadedAttachment>,
) -> Result<Message, DeliveryError> {
    let sender: Address = outgoing.sender_address.parse()?;
    let from = Mailbox::new(Some(outgoing.sender_name.to_string()), sender);
    let to: Mailbox = outgoing.recipient.parse()?;

    let octet_stream = ContentType::parse("application/octet-stream")
        .map_err(|e| DeliveryError::Message(e.to_string()))?;

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(outgoing.body.to_string()));
    for attachment in attachments {
        parts = parts.singlepart(
            Attachment::new(attachment.filename).body(attachment.content, octet_stream.clone()),
        );
    }

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(outgoing.subject)
        .multipart(parts)?;

    Ok(message)
}
