//! Minimal MQTT 3.1.1 client for the serial broker bridge.
//!
//! Only what telemetry needs: CONNECT and QoS 0 PUBLISH, encoded with
//! `mqttrs`. Nothing is read back; the bridge owns the network link and
//! reconnects on its own.

use mqttrs::{encode_slice, Connect, Packet, Protocol, QosPid};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::{CLIENT_ID_PREFIX, CLIENT_ID_SUFFIX_LEN};
use crate::telemetry::Publish;

/// Keep alive 0 turns the broker's idle timeout off.
const KEEP_ALIVE_SECS: u16 = 0;
/// Largest packet ever built: a full LED frame plus its topic.
pub const MAX_PACKET: usize = 192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    BufferTooSmall,
    /// The codec rejected a length or field.
    Invalid,
}

impl From<mqttrs::Error> for EncodeError {
    fn from(e: mqttrs::Error) -> Self {
        match e {
            mqttrs::Error::WriteZero => EncodeError::BufferTooSmall,
            _ => EncodeError::Invalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MqttError<E> {
    Encode(EncodeError),
    Transport(E),
}

impl<E> From<EncodeError> for MqttError<E> {
    fn from(e: EncodeError) -> Self {
        MqttError::Encode(e)
    }
}

/// Byte sink towards the broker bridge.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error;
    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Encode a CONNECT packet with a clean session. Empty `user` or `password`
/// are left out. Returns the packet length.
pub fn encode_connect(
    buf: &mut [u8],
    client_id: &str,
    user: &str,
    password: &str,
) -> Result<usize, EncodeError> {
    let packet = Packet::Connect(Connect {
        protocol: Protocol::MQTT311,
        keep_alive: KEEP_ALIVE_SECS,
        client_id,
        clean_session: true,
        last_will: None,
        username: (!user.is_empty()).then_some(user),
        password: (!password.is_empty()).then_some(password.as_bytes()),
    });
    Ok(encode_slice(&packet, buf)?)
}

/// Encode a QoS 0 PUBLISH packet. Returns the packet length.
pub fn encode_publish(buf: &mut [u8], topic: &str, payload: &[u8]) -> Result<usize, EncodeError> {
    let packet = Packet::Publish(mqttrs::Publish {
        dup: false,
        qospid: QosPid::AtMostOnce,
        retain: false,
        topic_name: topic,
        payload,
    });
    Ok(encode_slice(&packet, buf)?)
}

/// Client id: a fixed prefix plus random capital letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientId {
    bytes: [u8; CLIENT_ID_PREFIX.len() + CLIENT_ID_SUFFIX_LEN],
}

impl ClientId {
    pub fn random(rng: &mut Pcg32) -> Self {
        let mut bytes = [0u8; CLIENT_ID_PREFIX.len() + CLIENT_ID_SUFFIX_LEN];
        let (prefix, suffix) = bytes.split_at_mut(CLIENT_ID_PREFIX.len());
        prefix.copy_from_slice(CLIENT_ID_PREFIX.as_bytes());
        for b in suffix {
            *b = rng.random_range(b'A'..=b'Z');
        }
        Self { bytes }
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII is ever written
        core::str::from_utf8(&self.bytes).unwrap_or(CLIENT_ID_PREFIX)
    }
}

/// Publishes telemetry as MQTT packets over a byte transport.
pub struct MqttPublisher<T> {
    transport: T,
    buf: [u8; MAX_PACKET],
}

impl<T: Transport> MqttPublisher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            buf: [0; MAX_PACKET],
        }
    }

    pub async fn connect(
        &mut self,
        client_id: &ClientId,
        user: &str,
        password: &str,
    ) -> Result<(), MqttError<T::Error>> {
        let len = encode_connect(&mut self.buf, client_id.as_str(), user, password)?;
        self.transport
            .write(&self.buf[..len])
            .await
            .map_err(MqttError::Transport)?;
        info!("mqtt: connect sent as {=str}", client_id.as_str());
        Ok(())
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: Transport> Publish for MqttPublisher<T> {
    type Error = MqttError<T::Error>;

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error> {
        let len = encode_publish(&mut self.buf, topic, payload)?;
        self.transport
            .write(&self.buf[..len])
            .await
            .map_err(MqttError::Transport)
    }
}
