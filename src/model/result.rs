//! Conversion output records.

use serde::{Serialize, Serializer};

/// Fields extracted from one model reply.
///
/// Missing markers degrade to the empty value of each field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    /// Restored text, empty if the reply had no `text: '...'`
    pub text: String,
    /// Label, if the reply had `label: <digits>`
    pub label: Option<u32>,
    /// Noise flag, if the reply had `noise: 1` or `noise: 0`
    pub noise: Option<bool>,
    /// Free-form explanation, empty if absent
    pub reason: String,
}

impl ParsedReply {
    /// Returns true if no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.label.is_none() && self.noise.is_none() && self.reason.is_empty()
    }
}

/// One restored row.
///
/// Serializes as `ID, original, text, target, noise` regardless of
/// which fields were parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    #[serde(rename = "ID")]
    pub id: String,
    /// Source text as it appeared in the input
    pub original: String,
    /// Restored text, empty if parsing failed
    pub text: String,
    /// Label from the reply
    pub target: Option<u32>,
    /// Noise flag from the reply, written as "1", "0" or ""
    #[serde(serialize_with = "serialize_noise_flag")]
    pub noise: Option<bool>,
}

impl ConversionResult {
    /// Builds a result from the source row fields and a parsed reply.
    ///
    /// The reason is dropped.
    pub fn from_reply(id: impl Into<String>, original: impl Into<String>, reply: ParsedReply) -> Self {
        Self {
            id: id.into(),
            original: original.into(),
            text: reply.text,
            target: reply.label,
            noise: reply.noise,
        }
    }

    /// Returns the noise flag in its written form.
    pub fn noise_flag(&self) -> &'static str {
        noise_flag_str(self.noise)
    }
}

fn noise_flag_str(noise: Option<bool>) -> &'static str {
    match noise {
        Some(true) => "1",
        Some(false) => "0",
        None => "",
    }
}

fn serialize_noise_flag<S: Serializer>(noise: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(noise_flag_str(*noise))
}
