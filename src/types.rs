//! Data structures shared by the generator and the submitter.
//!
//! Peers are kept as JSON objects rather than a fixed struct: the template
//! decides which fields the API receives (IKE version, IPsec policies,
//! shared secret and so on) and the generator only overwrites the handful of
//! fields that must differ between peers.

use serde::Serialize;
use serde_json::{Map, Value};

/// The example peer every generated record is copied from.
///
/// Built once from the template file and only ever read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    peer: Map<String, Value>,
}

impl Template {
    pub fn new(peer: Map<String, Value>) -> Self {
        Self { peer }
    }

    pub fn peer(&self) -> &Map<String, Value> {
        &self.peer
    }
}

/// One third-party VPN peer as sent to the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Peer(Map<String, Value>);

impl Peer {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn peer_id(&self) -> Option<&str> {
        self.get("peerId").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn subnet(&self) -> Option<&str> {
        self.first_of("privateSubnets")
    }

    pub fn network_tag(&self) -> Option<&str> {
        self.first_of("networkTags")
    }

    fn first_of(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_str)
    }
}

/// Body of the bulk "replace all third-party VPN peers" call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub peers: Vec<Peer>,
}

impl Payload {
    pub fn new(peers: Vec<Peer>) -> Self {
        Self { peers }
    }
}
