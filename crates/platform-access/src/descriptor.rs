//! # Descriptor Grammar
//!
//! Canonical descriptors and grant descriptors share one colon-delimited
//! grammar:
//!
//! ```text
//! RESOURCE_CHAIN :#: ACTION [: MESSAGE]
//!
//! Examples:
//!   "ROOT:#:GET"                         - The root page
//!   "COMPANY:*:#:GET"                    - Listing companies
//!   "COMPANY:<id>:CAMPAIGN:*:#:POST"     - Creating a campaign under a company
//!   "*:#:*:*"                            - Everything, any action, any message
//! ```
//!
//! This module tokenizes descriptors, aligns grant tokens to a resource chain
//! and compares token lists. Chain tokens and modifier tokens (action,
//! message) are compared by two separate functions because a wildcard means
//! something different in each position.

use platform_entity::EntityId;

use crate::pattern;

/// Separates the resource chain from the action/message modifiers.
pub const MODIFIER_DELIMITER: &str = ":#:";

/// Separates individual tokens.
pub const TOKEN_SEPARATOR: char = ':';

/// Matches anything at its position.
pub const WILDCARD: &str = "*";

/// Resource chain of the site root.
pub const ROOT: &str = "ROOT";

/// Namespace heading company-scoped chains.
pub const COMPANY: &str = "COMPANY";

/// Classification of a single resource-chain element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainElement {
    /// A file name (contains a `.`).
    File,
    /// A concrete entity id.
    EntityId(EntityId),
    /// Anything else, including the empty string.
    Namespace,
}

impl ChainElement {
    /// Classify a chain element.
    ///
    /// # Examples
    ///
    /// ```
    /// use platform_access::descriptor::ChainElement;
    ///
    /// assert_eq!(ChainElement::classify("logo.png"), ChainElement::File);
    /// assert_eq!(ChainElement::classify("company"), ChainElement::Namespace);
    /// assert_eq!(ChainElement::classify(""), ChainElement::Namespace);
    /// ```
    pub fn classify(element: &str) -> Self {
        if element.contains('.') {
            return ChainElement::File;
        }
        match EntityId::try_parse(element) {
            Some(id) => ChainElement::EntityId(id),
            None => ChainElement::Namespace,
        }
    }

    /// Check if this element is a namespace.
    pub fn is_namespace(&self) -> bool {
        matches!(self, ChainElement::Namespace)
    }

    /// The entity id, if this element is one.
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            ChainElement::EntityId(id) => Some(*id),
            _ => None,
        }
    }
}

/// Split a descriptor into its chain part and its modifier part.
fn split_descriptor(descriptor: &str) -> (&str, &str) {
    descriptor
        .split_once(MODIFIER_DELIMITER)
        .unwrap_or((descriptor, ""))
}

/// Tokens of the resource chain (everything before `:#:`).
///
/// Empty tokens are kept; in a grant they mean "unspecified".
///
/// # Examples
///
/// ```
/// use platform_access::descriptor::extract_resource_list;
///
/// assert_eq!(extract_resource_list("COMPANY:*:#:GET"), vec!["COMPANY", "*"]);
/// assert_eq!(extract_resource_list("ROOT:#:GET"), vec!["ROOT"]);
/// ```
pub fn extract_resource_list(descriptor: &str) -> Vec<String> {
    let (chain, _) = split_descriptor(descriptor);
    chain.split(TOKEN_SEPARATOR).map(str::to_string).collect()
}

/// The action token (first modifier), or empty.
pub fn extract_action(descriptor: &str) -> String {
    let (_, modifiers) = split_descriptor(descriptor);
    modifiers
        .split(TOKEN_SEPARATOR)
        .next()
        .unwrap_or_default()
        .to_string()
}

/// The message token (second modifier), or empty.
pub fn extract_message(descriptor: &str) -> String {
    let (_, modifiers) = split_descriptor(descriptor);
    modifiers
        .split(TOKEN_SEPARATOR)
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Align grant chain tokens to the length of a resource chain.
///
/// Supplied tokens are kept as-is. A literal `*` turns on the sticky flag:
/// from then on every unsupplied position (missing or empty) becomes `*`.
/// Unsupplied positions before any wildcard become the empty string. Grant
/// tokens beyond the resource length are dropped.
///
/// # Examples
///
/// ```
/// use platform_access::descriptor::expand_access_descriptor_tokens;
///
/// let grant = vec!["COMPANY".to_string(), "*".to_string()];
/// assert_eq!(
///     expand_access_descriptor_tokens(4, &grant),
///     vec!["COMPANY", "*", "*", "*"],
/// );
///
/// let grant = vec!["COMPANY".to_string()];
/// assert_eq!(expand_access_descriptor_tokens(3, &grant), vec!["COMPANY", "", ""]);
/// ```
pub fn expand_access_descriptor_tokens(resource_len: usize, access: &[String]) -> Vec<String> {
    let mut sticky = false;
    (0..resource_len)
        .map(|i| match access.get(i).filter(|t| !t.is_empty()) {
            Some(token) => {
                if token == WILDCARD {
                    sticky = true;
                }
                token.clone()
            }
            None if sticky => WILDCARD.to_string(),
            None => String::new(),
        })
        .collect()
}

/// Check a single resource token against a single access token.
///
/// Matches on case-insensitive equality or on the access token read as an
/// anchored glob.
pub fn token_matches(resource: &str, access: &str) -> bool {
    resource.to_uppercase() == access.to_uppercase() || pattern::glob_matches(access, resource)
}

/// Compare a resource chain against (expanded) grant chain tokens.
///
/// A `*` access token matches its position and every position after it.
/// Missing access positions are treated as empty.
pub fn compare_chain_tokens(resource: &[String], access: &[String]) -> bool {
    for (i, resource_token) in resource.iter().enumerate() {
        let access_token = access.get(i).map(String::as_str).unwrap_or_default();
        if access_token == WILDCARD {
            return true;
        }
        if !token_matches(resource_token, access_token) {
            return false;
        }
    }
    true
}

/// Compare action or message token lists.
///
/// A `*` access token matches its own position only; comparison carries on
/// with the next position. Missing access positions are treated as empty.
pub fn compare_modifier_tokens(resource: &[String], access: &[String]) -> bool {
    resource.iter().enumerate().all(|(i, resource_token)| {
        let access_token = access.get(i).map(String::as_str).unwrap_or_default();
        access_token == WILDCARD || token_matches(resource_token, access_token)
    })
}

/// Entity ids found in a token list, in order.
pub fn entity_ids(tokens: &[String]) -> Vec<EntityId> {
    tokens
        .iter()
        .filter_map(|t| ChainElement::classify(t).entity_id())
        .collect()
}
