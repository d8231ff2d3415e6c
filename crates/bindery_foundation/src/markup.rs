//! CDATA handling for markup-derived text.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::value::Value;

/// Opening marker of a CDATA section.
pub const CDATA_START: &str = "<![CDATA[";
/// Closing marker of a CDATA section.
pub const CDATA_END: &str = "]]>";

/// Returns true if `text` contains a CDATA section.
#[must_use]
pub fn is_cdata(text: &str) -> bool {
    text.contains(CDATA_START)
}

/// Strips CDATA wrappers from a text value.
///
/// Nil passes through. Text without a CDATA section is returned unchanged.
/// Otherwise section bodies are kept verbatim and the text between sections
/// has its character entities decoded.
pub fn strip_cdata(value: &Value) -> Result<Value> {
    match value {
        Value::Nil => Ok(Value::Nil),
        Value::Text(text) => match strip_cdata_text(text)? {
            Cow::Borrowed(_) => Ok(value.clone()),
            Cow::Owned(stripped) => Ok(Value::from(stripped)),
        },
        other => Err(Error::type_mismatch("cdata", other, "text")),
    }
}

/// Text form of [`strip_cdata`].
pub fn strip_cdata_text(text: &str) -> Result<Cow<'_, str>> {
    if !is_cdata(text) {
        return Ok(Cow::Borrowed(text));
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(CDATA_START) {
        out.push_str(&html_escape::decode_html_entities(&rest[..start]));
        let body = &rest[start + CDATA_START.len()..];
        let end = body
            .find(CDATA_END)
            .ok_or_else(|| Error::malformed("cdata section", text))?;
        out.push_str(&body[..end]);
        rest = &body[end + CDATA_END.len()..];
    }
    out.push_str(&html_escape::decode_html_entities(rest));
    Ok(Cow::Owned(out))
}

/// Wraps text in a CDATA section.
///
/// Any `]]>` inside `text` is split across two sections so the result
/// strips back to the original.
#[must_use]
pub fn wrap_cdata(text: &str) -> String {
    format!(
        "{CDATA_START}{}{CDATA_END}",
        text.replace(CDATA_END, "]]]]><![CDATA[>")
    )
}
