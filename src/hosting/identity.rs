use crate::ID;

/// Marker for player identities. The identity provider is external; the
/// core only ever sees the stable id and never interprets it.
#[derive(Debug)]
pub struct Member;

/// The identity gateway: turn whatever credential a connection presents
/// into a player id. Token issuance, accounts, and JWT plumbing live
/// outside the core.
pub trait Gate: Send + Sync {
    fn authenticate(&self, token: &str) -> anyhow::Result<ID<Member>>;
}

/// Default gate: any non-empty token is accepted and mapped to a stable
/// id, so the same token always reattaches to the same seats. Good for
/// development and for deployments that terminate auth upstream.
pub struct Turnstile;

impl Gate for Turnstile {
    fn authenticate(&self, token: &str) -> anyhow::Result<ID<Member>> {
        if token.is_empty() {
            anyhow::bail!("empty credential");
        }
        match uuid::Uuid::try_parse(token) {
            Ok(id) => Ok(ID::from(id)),
            Err(_) => Ok(ID::from(uuid::Uuid::new_v5(
                &uuid::Uuid::NAMESPACE_OID,
                token.as_bytes(),
            ))),
        }
    }
}
