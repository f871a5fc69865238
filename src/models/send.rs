use std::path::PathBuf;

use serde_json::Value;

use crate::error::Result;

use super::{require_fields, string_field, string_list_field};

pub const REQUIRED_FIELDS: [&str; 4] = ["recipient_emails", "sender_name", "email_topic", "email_body"];

/// One bulk send, as accepted by `/api/send`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub recipients: Vec<String>,
    pub sender_name: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

impl SendRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let object = require_fields(payload, &REQUIRED_FIELDS)?;

        Ok(Self {
            recipients: string_list_field(object, "recipient_emails")?,
            sender_name: string_field(object, "sender_name")?,
            subject: string_field(object, "email_topic")?,
            body: string_field(object, "email_body")?,
            attachments: string_list_field(object, "attachment_files")?
                .into_iter()
                .map(PathBuf::from)
                .collect(),
        })
    }
}
