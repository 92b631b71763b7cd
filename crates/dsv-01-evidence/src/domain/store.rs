//! # Token Store
//!
//! Owns the deduplicated tokens of one validation run. Adding a token that
//! is already present merges the origin into the existing entry.

use super::found::FoundToken;
use super::origins::{CertificateOrigin, Origin, RevocationOrigin};
use super::tokens::{CertificateToken, RevocationToken, Token};
use shared_types::{TokenId, TokenKind};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct TokenStore {
    tokens: Vec<FoundToken>,
    index: HashMap<TokenId, usize>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `token` found through `origin`. Returns the token identity.
    pub fn add(&mut self, token: Token, origin: Origin) -> TokenId {
        let id = self.insert(token);
        if let Some(position) = self.index.get(&id) {
            self.tokens[*position].merge_origin(origin);
        }
        id
    }

    /// Insert `token` without recording an origin (referenced only).
    ///
    /// Used when a reference resolves to a token that the owner does not
    /// carry itself.
    pub fn insert(&mut self, token: Token) -> TokenId {
        let id = token.id();
        if !self.index.contains_key(&id) {
            let position = self.tokens.len();
            self.tokens.push(FoundToken::new(token, position));
            self.index.insert(id, position);
        }
        id
    }

    pub fn add_certificate(&mut self, certificate: Arc<CertificateToken>, origin: CertificateOrigin) -> TokenId {
        self.add(Token::Certificate(certificate), origin.into())
    }

    pub fn add_revocation(&mut self, revocation: Arc<RevocationToken>, origin: RevocationOrigin) -> TokenId {
        self.add(Token::Revocation(revocation), origin.into())
    }

    /// Merge every token and origin of `other` into this store, keeping
    /// this store's discovery order first.
    pub fn merge(&mut self, other: &TokenStore) {
        for found in &other.tokens {
            let id = self.insert(found.token().clone());
            if let Some(position) = self.index.get(&id) {
                for origin in found.origins() {
                    self.tokens[*position].merge_origin(*origin);
                }
            }
        }
    }

    pub fn get(&self, id: TokenId) -> Option<&FoundToken> {
        self.index.get(&id).map(|position| &self.tokens[*position])
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.index.contains_key(&id)
    }

    /// Tokens found through `origin`.
    pub fn by_origin(&self, origin: Origin) -> Vec<&FoundToken> {
        self.tokens.iter().filter(|t| t.has_origin(origin)).collect()
    }

    /// Tokens with at least one origin accepted by `filter`.
    pub fn by_origin_filter<F>(&self, filter: F) -> Vec<&FoundToken>
    where
        F: Fn(&Origin) -> bool,
    {
        self.tokens
            .iter()
            .filter(|t| t.origins().iter().any(&filter))
            .collect()
    }

    pub fn all_of_kind(&self, kind: TokenKind) -> Vec<&FoundToken> {
        self.tokens.iter().filter(|t| t.token().kind() == kind).collect()
    }

    /// Certificates in discovery order.
    pub fn certificates(&self) -> impl Iterator<Item = &Arc<CertificateToken>> + '_ {
        self.tokens.iter().filter_map(|t| t.token().as_certificate())
    }

    /// Revocation tokens in discovery order.
    pub fn revocations(&self) -> impl Iterator<Item = &Arc<RevocationToken>> + '_ {
        self.tokens.iter().filter_map(|t| t.token().as_revocation())
    }

    /// All found tokens in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &FoundToken> + '_ {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
