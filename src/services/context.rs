use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::config::SalesChannelSettings;
use crate::models::SalesChannelContext;

pub const ACCESS_KEY_HEADER: &str = "sw-access-key";
pub const CONTEXT_TOKEN_HEADER: &str = "sw-context-token";
pub const LANGUAGE_ID_HEADER: &str = "sw-language-id";

/// Errors raised while resolving the request context
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("Header sw-access-key is required")]
    MissingAccessKey,

    #[error("Unknown access key")]
    UnknownAccessKey,

    #[error("Invalid language id: {0}")]
    InvalidLanguageId(String),
}

#[derive(Debug, Clone, Copy)]
struct SalesChannel {
    id: Uuid,
    language_id: Uuid,
}

/// Maps Store API access keys to sales channels
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    channels: HashMap<String, SalesChannel>,
}

impl ContextResolver {
    pub fn new(settings: &[SalesChannelSettings]) -> Self {
        let channels = settings
            .iter()
            .map(|s| {
                (
                    s.access_key.clone(),
                    SalesChannel {
                        id: s.id,
                        language_id: s.language_id,
                    },
                )
            })
            .collect();

        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Build the context for one request
    ///
    /// A missing context token is replaced by a freshly generated one.
    pub fn resolve(
        &self,
        access_key: Option<&str>,
        context_token: Option<&str>,
        language_id: Option<&str>,
    ) -> Result<SalesChannelContext, ContextError> {
        let access_key = access_key
            .filter(|k| !k.is_empty())
            .ok_or(ContextError::MissingAccessKey)?;

        let channel = self
            .channels
            .get(access_key)
            .ok_or(ContextError::UnknownAccessKey)?;

        let language_id = match language_id.filter(|l| !l.is_empty()) {
            Some(raw) => Uuid::try_parse(raw)
                .map_err(|_| ContextError::InvalidLanguageId(raw.to_string()))?,
            None => channel.language_id,
        };

        let token = match context_token.filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };

        Ok(SalesChannelContext {
            sales_channel_id: channel.id,
            language_id,
            default_language_id: channel.language_id,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> (ContextResolver, SalesChannelSettings) {
        let settings = SalesChannelSettings {
            access_key: "SWSCTESTKEY".to_string(),
            id: Uuid::new_v4(),
            language_id: Uuid::new_v4(),
        };
        (ContextResolver::new(std::slice::from_ref(&settings)), settings)
    }

    #[test]
    fn test_resolve_defaults() {
        let (resolver, settings) = resolver();
        let context = resolver.resolve(Some("SWSCTESTKEY"), None, None).unwrap();

        assert_eq!(context.sales_channel_id, settings.id);
        assert_eq!(context.language_id, settings.language_id);
        assert_eq!(context.token.len(), 32);
    }

    #[test]
    fn test_resolve_keeps_token_and_language() {
        let (resolver, settings) = resolver();
        let language = Uuid::new_v4();
        let context = resolver
            .resolve(Some("SWSCTESTKEY"), Some("abc"), Some(&language.to_string()))
            .unwrap();

        assert_eq!(context.token, "abc");
        assert_eq!(context.language_id, language);
        assert_eq!(context.default_language_id, settings.language_id);
    }

    #[test]
    fn test_resolve_errors() {
        let (resolver, _) = resolver();

        assert_eq!(
            resolver.resolve(None, None, None),
            Err(ContextError::MissingAccessKey)
        );
        assert_eq!(
            resolver.resolve(Some("nope"), None, None),
            Err(ContextError::UnknownAccessKey)
        );
        assert_eq!(
            resolver.resolve(Some("SWSCTESTKEY"), None, Some("de-DE")),
            Err(ContextError::InvalidLanguageId("de-DE".to_string()))
        );
    }
}
