//! The `dig` slash command and its "Run again" button.
//!
//! The representative handler for the full deferred pattern: validate options synchronously,
//! then acknowledge and resolve the lookup in a supervised background task that edits the
//! original response with the answers.

use crate::deferred;
use crate::dig::SharedQuerier;
use crate::error::Error;
use crate::interactions::model::{Button, Embed, MessageData, ResponseEnvelope};
use crate::registry::{Context, Handler, OptionSchema};
use crate::report::Tags;
use std::str::FromStr;
use trust_dns_client::rr::{Name, RecordType};

const RECORD_TYPE_CHOICES: &[&str] = &[
    "A", "AAAA", "CAA", "CNAME", "MX", "NS", "PTR", "SOA", "SRV", "TXT",
];

const EMBED_COLOR: u32 = 0x00E5_7B25;

pub(crate) struct Dig;

#[async_trait::async_trait]
impl Handler for Dig {
    fn name(&self) -> &'static str {
        "dig"
    }

    fn options(&self) -> Vec<OptionSchema> {
        vec![
            OptionSchema {
                name: "name",
                kind: "string",
                required: true,
                choices: &[],
            },
            OptionSchema {
                name: "type",
                kind: "string",
                required: false,
                choices: RECORD_TYPE_CHOICES,
            },
        ]
    }

    async fn execute(&self, ctx: &Context) -> Result<ResponseEnvelope, Error> {
        let name = ctx.option_str("name").ok_or(Error::MissingOption("name"))?;
        let record_type = ctx.option_str("type").unwrap_or("A");
        Ok(run_lookup(ctx, Tags::command("dig"), name, record_type))
    }
}

/// Re-runs a lookup when the "Run again" button minted by a previous response is clicked.
/// The arguments come back encoded in the button's `custom_id` as `dig:{name}:{type}`.
pub(crate) struct DigRerun;

#[async_trait::async_trait]
impl Handler for DigRerun {
    fn name(&self) -> &'static str {
        "dig-rerun"
    }

    async fn execute(&self, ctx: &Context) -> Result<ResponseEnvelope, Error> {
        let custom_id = ctx
            .interaction
            .data
            .as_ref()
            .and_then(|data| data.custom_id.clone())
            .unwrap_or_default();
        let mut parts = custom_id.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("dig"), Some(name), Some(record_type)) => {
                Ok(run_lookup(ctx, Tags::component("dig-rerun"), name, record_type))
            }
            _ => Err(Error::MalformedCustomId(custom_id)),
        }
    }
}

fn run_lookup(ctx: &Context, tags: Tags, name: &str, record_type: &str) -> ResponseEnvelope {
    let Ok(fqdn) = Name::from_str(name) else {
        return ResponseEnvelope::message(MessageData::ephemeral_text(format!(
            "\"{name}\" is not a valid domain name."
        )));
    };
    let Some(record_type) = parse_record_type(record_type) else {
        return ResponseEnvelope::message(MessageData::ephemeral_text(format!(
            "\"{record_type}\" is not a supported record type."
        )));
    };

    let querier: SharedQuerier = ctx.querier.clone();
    deferred::respond_later(ctx, tags, async move {
        let answers = querier.lookup(&fqdn, record_type).await?;
        Ok(lookup_message(&fqdn, record_type, &answers))
    })
}

fn parse_record_type(value: &str) -> Option<RecordType> {
    let value = value.to_uppercase();
    if !RECORD_TYPE_CHOICES.contains(&value.as_str()) {
        return None;
    }
    RecordType::from_str(&value).ok()
}

fn lookup_message(fqdn: &Name, record_type: RecordType, answers: &[String]) -> MessageData {
    let description = if answers.is_empty() {
        format!("No {record_type} records found for **{fqdn}**.")
    } else {
        format!("```\n{}\n```", answers.join("\n"))
    };
    MessageData::default()
        .with_embed(Embed {
            title: Some(format!("{record_type} {fqdn}")),
            description: Some(description),
            color: Some(EMBED_COLOR),
        })
        .with_buttons(vec![Button::secondary(
            "Run again",
            format!("dig:{fqdn}:{record_type}"),
        )])
}
