// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing and resolution of user-supplied channel references.
//!
//! Accepts `<#id>` mention syntax, a bare numeric id, or an exact channel
//! name; the resolved channel must be text-capable.

use wicket_core::{Platform, WicketError};

/// A parsed, not yet resolved, channel reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(String),
    Name(String),
}

fn invalid(input: &str) -> WicketError {
    WicketError::InvalidChannelReference {
        input: input.to_string(),
    }
}

/// Parse a channel reference from free text.
pub fn parse_channel_ref(input: &str) -> Result<ChannelRef, WicketError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(invalid(input));
    }

    if let Some(inner) = s.strip_prefix("<#").and_then(|rest| rest.strip_suffix('>')) {
        if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
            return Ok(ChannelRef::Id(inner.to_string()));
        }
        return Err(invalid(input));
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        return Ok(ChannelRef::Id(s.to_string()));
    }

    // Fall back to an exact name match; a leading `#` is cosmetic.
    Ok(ChannelRef::Name(s.trim_start_matches('#').to_string()))
}

/// Parse and resolve a reference to a text-capable channel id.
pub async fn resolve_text_channel(
    platform: &dyn Platform,
    input: &str,
) -> Result<String, WicketError> {
    let channel_id = match parse_channel_ref(input)? {
        ChannelRef::Id(id) => id,
        ChannelRef::Name(name) => platform
            .channel_by_name(&name)
            .await?
            .ok_or_else(|| invalid(input))?,
    };

    if !platform.is_text_channel(&channel_id).await? {
        return Err(invalid(input));
    }
    Ok(channel_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_test_utils::MockPlatform;

    #[test]
    fn mention_syntax_parses_to_id() {
        assert_eq!(
            parse_channel_ref("<#123456>").unwrap(),
            ChannelRef::Id("123456".into())
        );
    }

    #[test]
    fn bare_numeric_parses_to_id() {
        assert_eq!(
            parse_channel_ref(" 123456 ").unwrap(),
            ChannelRef::Id("123456".into())
        );
    }

    #[test]
    fn anything_else_parses_to_name() {
        assert_eq!(
            parse_channel_ref("#transcripts").unwrap(),
            ChannelRef::Name("transcripts".into())
        );
        assert_eq!(
            parse_channel_ref("transcripts").unwrap(),
            ChannelRef::Name("transcripts".into())
        );
    }

    #[test]
    fn malformed_mentions_are_rejected() {
        assert!(parse_channel_ref("<#notanid>").is_err());
        assert!(parse_channel_ref("<#>").is_err());
        assert!(parse_channel_ref("").is_err());
        assert!(parse_channel_ref("   ").is_err());
    }

    #[tokio::test]
    async fn resolution_requires_a_text_capable_channel() {
        let platform = MockPlatform::new();
        platform.add_channel("555", "transcripts", true).await;
        platform.add_channel("666", "voice-lounge", false).await;

        assert_eq!(
            resolve_text_channel(&platform, "<#555>").await.unwrap(),
            "555"
        );
        assert_eq!(
            resolve_text_channel(&platform, "transcripts").await.unwrap(),
            "555"
        );

        let err = resolve_text_channel(&platform, "666").await.unwrap_err();
        assert!(matches!(err, WicketError::InvalidChannelReference { .. }));

        let err = resolve_text_channel(&platform, "no-such-name").await.unwrap_err();
        assert!(matches!(err, WicketError::InvalidChannelReference { .. }));
    }

    #[tokio::test]
    async fn unknown_id_is_rejected() {
        let platform = MockPlatform::new();
        let err = resolve_text_channel(&platform, "999").await.unwrap_err();
        assert!(matches!(err, WicketError::InvalidChannelReference { .. }));
    }
}
