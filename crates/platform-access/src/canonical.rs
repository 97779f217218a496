//! # Canonical Resources
//!
//! Turns a request URI and action into the canonical descriptor used by the
//! access matcher and by stored grants.
//!
//! ```text
//! http://host/api/entity/company            GET  →  COMPANY:*:#:GET
//! http://host/api/entity/company/<id>       GET  →  COMPANY:<ID>:#:GET
//! http://host/reports/summary.csv?fmt=wide  GET  →  REPORTS:SUMMARY.CSV:#:GET:WIDE
//! http://host/                              GET  →  ROOT:#:GET
//! ```

use std::fmt;

use tracing::warn;
use url::Url;

use crate::descriptor::{ChainElement, MODIFIER_DELIMITER, ROOT, TOKEN_SEPARATOR, WILDCARD};

/// Path prefix of API resources.
pub const API_PREFIX: &str = "/api";

/// Service segment that follows the API prefix for entity-service resources.
pub const ENTITY_SERVICE_SEGMENT: &str = "entity";

/// A request resource in canonical form.
///
/// Construction validates the input and computes the descriptor once; the
/// value is immutable afterwards.
///
/// # Examples
///
/// ```
/// use platform_access::CanonicalResource;
///
/// let resource = CanonicalResource::build("http://host/api/entity/company", "GET").unwrap();
/// assert_eq!(resource.descriptor(), "COMPANY:*:#:GET");
///
/// assert!(CanonicalResource::build("not a uri", "GET").is_none());
/// assert!(CanonicalResource::build("http://host/", "").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalResource {
    uri: Url,
    action: String,
    message: String,
    resource_chain: Vec<String>,
    descriptor: String,
}

impl CanonicalResource {
    /// Build a canonical resource from an absolute URI string and an action.
    ///
    /// Returns `None`, logging a warning with the offending input, when the
    /// URI is not a well-formed absolute URI or the action is empty.
    pub fn build(uri: &str, action: &str) -> Option<Self> {
        match Url::parse(uri) {
            Ok(url) => Self::from_url(url, action),
            Err(e) => {
                warn!(uri = %uri, action = %action, error = %e, "Rejected malformed resource URI");
                None
            }
        }
    }

    /// Build a canonical resource from an already parsed URI.
    pub fn from_url(uri: Url, action: &str) -> Option<Self> {
        if action.trim().is_empty() {
            warn!(uri = %uri, "Rejected resource with empty action");
            return None;
        }

        let segments = path_segments(&uri);
        let resource_chain = canonical_chain(&segments, is_api_path(&uri));
        let message = query_message(uri.query());
        let descriptor = compose_descriptor(&resource_chain, action, &message);

        Some(Self {
            uri,
            action: action.to_string(),
            message,
            resource_chain,
            descriptor,
        })
    }

    /// The original URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// The action as supplied by the caller.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The message modifier taken from the query string (upper-cased, may be empty).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Upper-cased resource chain tokens.
    pub fn resource_chain(&self) -> &[String] {
        &self.resource_chain
    }

    /// The full canonical descriptor.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Check if the URI path starts with `/api` (case-insensitive).
    pub fn is_api_resource(&self) -> bool {
        is_api_path(&self.uri)
    }

    /// Check if this is an API resource addressed through service `segment`,
    /// i.e. `/api/<segment>/...`.
    pub fn targets_service(&self, segment: &str) -> bool {
        self.is_api_resource()
            && path_segments(&self.uri)
                .get(1)
                .is_some_and(|s| s.eq_ignore_ascii_case(segment))
    }

    /// Check if this is an entity-service resource (`/api/entity/...`).
    pub fn targets_entity_service(&self) -> bool {
        self.targets_service(ENTITY_SERVICE_SEGMENT)
    }
}

impl fmt::Display for CanonicalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor)
    }
}

fn is_api_path(uri: &Url) -> bool {
    uri.path().to_lowercase().starts_with(API_PREFIX)
}

fn path_segments(uri: &Url) -> Vec<&str> {
    uri.path().split('/').filter(|s| !s.is_empty()).collect()
}

/// Map path segments to upper-cased chain tokens.
fn canonical_chain(segments: &[&str], is_api: bool) -> Vec<String> {
    let mut segments = segments;
    if is_api {
        segments = segments.get(1..).unwrap_or_default();
        if segments
            .first()
            .is_some_and(|s| s.eq_ignore_ascii_case(ENTITY_SERVICE_SEGMENT))
        {
            segments = &segments[1..];
        }
    }

    let Some(last) = segments.last() else {
        return vec![ROOT.to_string()];
    };

    let mut chain: Vec<String> = segments
        .iter()
        .map(|s| match ChainElement::classify(s) {
            ChainElement::EntityId(id) => id.canonical(),
            _ => s.to_string(),
        })
        .map(|s| s.to_uppercase())
        .collect();

    if ChainElement::classify(last).is_namespace() {
        chain.push(WILDCARD.to_string());
    }
    chain
}

/// Extract the message modifier from a raw query string.
///
/// Only the first parameter counts; the rest are ignored.
fn query_message(query: Option<&str>) -> String {
    let Some(fragment) = query.and_then(|q| q.split('?').find(|f| !f.trim().is_empty())) else {
        return String::new();
    };

    let parameter = fragment.split('&').next().unwrap_or_default();
    let value = match parameter.split_once('=') {
        Some((_, value)) => value,
        None => parameter,
    };
    value.trim().to_uppercase()
}

fn compose_descriptor(chain: &[String], action: &str, message: &str) -> String {
    let mut descriptor = chain.join(&TOKEN_SEPARATOR.to_string());
    descriptor.push_str(MODIFIER_DELIMITER);
    descriptor.push_str(action);
    if !message.is_empty() {
        descriptor.push(TOKEN_SEPARATOR);
        descriptor.push_str(message);
    }
    descriptor.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{extract_action, extract_message, extract_resource_list};
    use platform_entity::EntityId;

    fn descriptor(uri: &str, action: &str) -> String {
        CanonicalResource::build(uri, action)
            .unwrap()
            .descriptor()
            .to_string()
    }

    #[test]
    fn test_entity_collection() {
        assert_eq!(descriptor("http://host/api/entity/company", "GET"), "COMPANY:*:#:GET");
    }

    #[test]
    fn test_entity_by_id() {
        let id = EntityId::new();
        let uri = format!("http://host/api/entity/company/{}", id);
        assert_eq!(
            descriptor(&uri, "get"),
            format!("COMPANY:{}:#:GET", id.canonical().to_uppercase())
        );
    }

    #[test]
    fn test_entity_id_is_canonicalized() {
        let id = EntityId::new();
        let simple = id.as_uuid().simple().to_string();
        let uri = format!("http://host/api/entity/company/{}/campaign", simple);
        assert_eq!(
            descriptor(&uri, "GET"),
            format!("COMPANY:{}:CAMPAIGN:*:#:GET", id.canonical().to_uppercase())
        );
    }

    #[test]
    fn test_api_without_entity_segment() {
        assert_eq!(descriptor("http://host/api/data/stats", "GET"), "DATA:STATS:*:#:GET");
        assert_eq!(descriptor("http://host/API/Entity/company", "GET"), "COMPANY:*:#:GET");
    }

    #[test]
    fn test_root_and_files() {
        assert_eq!(descriptor("http://host/", "GET"), "ROOT:#:GET");
        assert_eq!(descriptor("http://host", "GET"), "ROOT:#:GET");
        assert_eq!(descriptor("http://host/api", "GET"), "ROOT:#:GET");
        assert_eq!(descriptor("http://host/api/entity", "GET"), "ROOT:#:GET");
        assert_eq!(descriptor("http://host/foo.html", "GET"), "FOO.HTML:#:GET");
        assert_eq!(descriptor("http://host/css/site.css", "GET"), "CSS:SITE.CSS:#:GET");
    }

    #[test]
    fn test_non_api_namespace_gets_wildcard() {
        assert_eq!(descriptor("http://host/reports/", "GET"), "REPORTS:*:#:GET");
        assert_eq!(descriptor("http://host//reports//daily", "GET"), "REPORTS:DAILY:*:#:GET");
    }

    #[test]
    fn test_message_extraction() {
        assert_eq!(descriptor("http://host/foo.html?", "GET"), "FOO.HTML:#:GET");
        assert_eq!(descriptor("http://host/foo.html?verbose", "GET"), "FOO.HTML:#:GET:VERBOSE");
        assert_eq!(descriptor("http://host/foo.html?fmt=wide", "GET"), "FOO.HTML:#:GET:WIDE");
        assert_eq!(
            descriptor("http://host/foo.html?fmt=wide&page=2", "GET"),
            "FOO.HTML:#:GET:WIDE"
        );
        assert_eq!(descriptor("http://host/foo.html?fmt=", "GET"), "FOO.HTML:#:GET");
    }

    #[test]
    fn test_message_accessor() {
        let resource = CanonicalResource::build("http://host/x.csv?mode=Summary", "GET").unwrap();
        assert_eq!(resource.message(), "SUMMARY");
        let resource = CanonicalResource::build("http://host/x.csv", "GET").unwrap();
        assert_eq!(resource.message(), "");
    }

    #[test]
    fn test_invalid_input() {
        assert!(CanonicalResource::build("relative/path", "GET").is_none());
        assert!(CanonicalResource::build("", "GET").is_none());
        assert!(CanonicalResource::build("http://host/", "").is_none());
        assert!(CanonicalResource::build("http://host/", "   ").is_none());
    }

    #[test]
    fn test_round_trip_extraction() {
        let resource = CanonicalResource::build("http://host/a/b", "Post").unwrap();
        assert_eq!(
            extract_resource_list(resource.descriptor()),
            vec!["A", "B", "*"]
        );
        assert!(extract_action(resource.descriptor()).eq_ignore_ascii_case(resource.action()));
        assert_eq!(extract_message(resource.descriptor()), "");
    }

    #[test]
    fn test_is_api_and_targets() {
        let api = CanonicalResource::build("http://host/api/entity/company", "GET").unwrap();
        assert!(api.is_api_resource());
        assert!(api.targets_entity_service());

        let data = CanonicalResource::build("http://host/api/data/x", "GET").unwrap();
        assert!(data.is_api_resource());
        assert!(!data.targets_entity_service());
        assert!(data.targets_service("data"));

        let page = CanonicalResource::build("http://host/index.html", "GET").unwrap();
        assert!(!page.is_api_resource());
        assert!(!page.targets_entity_service());
    }

    #[test]
    fn test_deterministic() {
        let a = CanonicalResource::build("http://host/api/entity/company?x=1", "GET").unwrap();
        let b = CanonicalResource::build("http://host/api/entity/company?x=1", "GET").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "COMPANY:*:#:GET:1");
    }
}
