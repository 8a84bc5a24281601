//! Synthesizes peer records from the template.

use log::{debug, info};
use rand::Rng;
use serde_json::Value;
use thiserror::Error;

use crate::subnet::{integer_to_subnet, SubnetError, MAX_SUBNET_INDEX};
use crate::types::{Peer, Template};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("peer count {0} is outside 0..=65535")]
    CountOutOfRange(i64),
    #[error("peer id base {0} plus sequence index {1} does not fit in 64 bits")]
    PeerIdOverflow(u64, u32),
    #[error("template peer has no non-empty `{0}` array")]
    MissingField(&'static str),
    #[error(transparent)]
    Subnet(#[from] SubnetError),
}

/// Checks a requested peer count before anything is generated.
pub fn validate_peer_count(count: i64) -> Result<u16, GenerateError> {
    if !(0..=MAX_SUBNET_INDEX).contains(&count) {
        return Err(GenerateError::CountOutOfRange(count));
    }
    u16::try_from(count).map_err(|_| GenerateError::CountOutOfRange(count))
}

/// Builds one peer from a fresh copy of the template.
///
/// `peerId` and `name` use `sequence_index` as is. The public IP and the
/// local/remote identifiers are random placeholders and may repeat across
/// peers.
pub fn create_peer_object<R: Rng + ?Sized>(
    template: &Template,
    sequence_index: u32,
    name_prefix: &str,
    subnet: &str,
    id_base: u64,
    rng: &mut R,
) -> Result<Peer, GenerateError> {
    let peer_id = id_base
        .checked_add(u64::from(sequence_index))
        .ok_or(GenerateError::PeerIdOverflow(id_base, sequence_index))?;

    let mut peer = Peer::new(template.peer().clone());
    let fields = peer.fields_mut();

    fields.insert("peerId".into(), Value::String(peer_id.to_string()));
    fields.insert(
        "name".into(),
        Value::String(format!("{}{}", name_prefix, sequence_index)),
    );
    fields.insert("publicIp".into(), Value::String(random_host(rng, "200.100")));
    fields.insert("localId".into(), Value::String(random_host(rng, "192.168")));
    fields.insert("remoteId".into(), Value::String(random_host(rng, "10.0")));

    // Only one subnet per peer is supported.
    set_first(fields, "privateSubnets", subnet.to_string())?;
    set_first(fields, "networkTags", format!("peer{}", sequence_index))?;

    Ok(peer)
}

/// Generates `count` peers named `<prefix>0..`.
///
/// Subnet indexes start at 1 so no peer is handed 10.0.0.0/24.
pub fn generate_peers<R: Rng + ?Sized>(
    template: &Template,
    count: u16,
    name_prefix: &str,
    id_base: u64,
    rng: &mut R,
) -> Result<Vec<Peer>, GenerateError> {
    info!("Generating {} peers...", count);

    let mut peers = Vec::with_capacity(usize::from(count));
    for sequence_index in 0..u32::from(count) {
        let subnet = integer_to_subnet(i64::from(sequence_index) + 1)?;
        let peer = create_peer_object(template, sequence_index, name_prefix, &subnet, id_base, rng)?;
        debug!(
            "Peer {} (id {}, tag {}) -> {}",
            peer.name().unwrap_or_default(),
            peer.peer_id().unwrap_or_default(),
            peer.network_tag().unwrap_or_default(),
            subnet
        );
        peers.push(peer);
    }
    Ok(peers)
}

fn random_host<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let x: u8 = rng.gen_range(0..=255);
    let y: u8 = rng.gen_range(1..=254);
    format!("{}.{}.{}", prefix, x, y)
}

fn set_first(
    fields: &mut serde_json::Map<String, Value>,
    key: &'static str,
    value: String,
) -> Result<(), GenerateError> {
    let slot = fields
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .and_then(|items| items.first_mut())
        .ok_or(GenerateError::MissingField(key))?;
    *slot = Value::String(value);
    Ok(())
}
