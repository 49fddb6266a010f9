//! Adapters between host entities and bemfa topics.
//!
//! Each device class registers one [`SyncAdapter`] into [`REGISTRY`]. An adapter is a
//! pair of tables: generators that project entity state onto message fields, and
//! resolvers that turn an inbound message back into a service call.

pub mod light;

use linkme::distributed_slice;
use tracing::debug;

use crate::entity::entity_domain;
use crate::entity::Attributes;
use crate::entity::EntityState;
use crate::error::Result;
use crate::error::SyncError;
use crate::message::Message;
use crate::message::MsgField;
use crate::service::ServiceCall;
use crate::topic::TopicSuffix;

/// Projects (status token, attributes) onto one message field. `Ok(None)` means no value.
pub type MsgGenerator = fn(&str, &Attributes) -> Result<Option<MsgField>>;

/// Decodes inbound messages whose field count lies in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct MsgResolver {
    pub min: usize,
    pub max: usize,
    pub resolve: fn(&[MsgField], &Attributes) -> Result<ServiceCall>,
}

impl MsgResolver {
    pub fn accepts(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

#[distributed_slice]
pub static REGISTRY: [fn() -> Box<dyn SyncAdapter>];

/// Trait that all device-class adapters implement
pub trait SyncAdapter: Send + Sync {
    /// Host domain this adapter handles (e.g. "light")
    fn domain(&self) -> &'static str;

    fn topic_suffix(&self) -> TopicSuffix;

    /// Field generators, in message order
    fn msg_generators(&self) -> &'static [MsgGenerator];

    fn msg_resolvers(&self) -> &'static [MsgResolver];

    /// Encode entity state into an outbound message.
    fn generate_msg(&self, state: &EntityState) -> Result<Message> {
        let generated = self
            .msg_generators()
            .iter()
            .map(|generate| generate(&state.state, &state.attributes))
            .collect::<Result<Vec<_>>>()?;

        let msg = Message::from_generated(generated);
        debug!("{}: encoded {} as {:?}", self.domain(), state.entity_id, msg.to_payload());
        Ok(msg)
    }

    /// Decode an inbound message against the device's current attributes.
    fn resolve_msg(&self, msg: &Message, attributes: &Attributes) -> Result<ServiceCall> {
        let resolver = self
            .msg_resolvers()
            .iter()
            .find(|r| r.accepts(msg.len()))
            .ok_or(SyncError::FieldCount {
                domain: self.domain(),
                count: msg.len(),
            })?;

        let call = (resolver.resolve)(msg.fields(), attributes)?;
        debug!(
            "{}: resolved {:?} to {}.{}",
            self.domain(),
            msg.to_payload(),
            call.domain,
            call.service
        );
        Ok(call)
    }
}

/// Find the adapter registered for a host domain
pub fn lookup(domain: &str) -> Result<Box<dyn SyncAdapter>> {
    REGISTRY
        .iter()
        .map(|constr| constr())
        .find(|adapter| adapter.domain() == domain)
        .ok_or_else(|| SyncError::UnknownDomain(domain.to_string()))
}

pub fn lookup_for_entity(entity_id: &str) -> Result<Box<dyn SyncAdapter>> {
    lookup(entity_domain(entity_id))
}
