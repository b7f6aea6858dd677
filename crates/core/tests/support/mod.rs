//! In-memory broker double recording every port interaction in order.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use homielink_core::ports::{BrokerConnection, BrokerError, LastWill, Qos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerEvent {
    Connect {
        will_topic: String,
        will_payload: String,
    },
    Publish {
        topic: String,
        payload: String,
        retained: bool,
        qos: Qos,
    },
    Subscribe {
        topic: String,
        qos: Qos,
    },
    Disconnect,
}

/// Expected retained publish at the default quality of service.
pub fn retained(topic: &str, payload: &str) -> BrokerEvent {
    BrokerEvent::Publish {
        topic: topic.to_string(),
        payload: payload.to_string(),
        retained: true,
        qos: Qos::AtLeastOnce,
    }
}

#[derive(Default)]
pub struct MemoryBroker {
    events: Mutex<Vec<BrokerEvent>>,
    inbound: Mutex<HashMap<String, mpsc::Sender<Vec<u8>>>>,
    connected: AtomicBool,
    disconnecting: AtomicBool,
}

impl MemoryBroker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every port interaction so far, in call order.
    pub fn events(&self) -> Vec<BrokerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The topics of all publishes, in order.
    pub fn published_topics(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BrokerEvent::Publish { topic, .. } => Some(topic),
                _ => None,
            })
            .collect()
    }

    /// All payloads published to one topic, in order.
    pub fn payloads_for(&self, topic: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BrokerEvent::Publish {
                    topic: published,
                    payload,
                    ..
                } if published == topic => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Deliver an inbound message on a subscribed topic.
    ///
    /// # Panics
    ///
    /// Panics when nothing subscribed to the topic.
    pub async fn inject(&self, topic: &str, payload: &[u8]) {
        let sender = self
            .inbound
            .lock()
            .unwrap()
            .get(topic)
            .cloned()
            .unwrap_or_else(|| panic!("no subscription for {topic}"));
        sender
            .send(payload.to_vec())
            .await
            .expect("subscription receiver dropped");
    }

    /// Simulate a disconnect in progress: publishes and subscribes fail
    /// with [`BrokerError::Disconnecting`] while set.
    pub fn set_disconnecting(&self, disconnecting: bool) {
        self.disconnecting.store(disconnecting, Ordering::SeqCst);
    }

    fn record(&self, event: BrokerEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl BrokerConnection for MemoryBroker {
    fn connect(&self, last_will: LastWill) -> BoxFuture<'_, Result<(), BrokerError>> {
        Box::pin(async move {
            if self.connected.swap(true, Ordering::SeqCst) {
                return Err(BrokerError::AlreadyConnected);
            }
            self.record(BrokerEvent::Connect {
                will_topic: last_will.topic,
                will_payload: String::from_utf8_lossy(&last_will.payload).into_owned(),
            });
            Ok(())
        })
    }

    fn publish<'a>(
        &'a self,
        topic: &'a str,
        payload: Vec<u8>,
        retained: bool,
        qos: Qos,
    ) -> BoxFuture<'a, Result<(), BrokerError>> {
        Box::pin(async move {
            if self.disconnecting.load(Ordering::SeqCst) {
                return Err(BrokerError::Disconnecting);
            }
            self.record(BrokerEvent::Publish {
                topic: topic.to_string(),
                payload: String::from_utf8_lossy(&payload).into_owned(),
                retained,
                qos,
            });
            Ok(())
        })
    }

    fn subscribe<'a>(
        &'a self,
        topic: &'a str,
        qos: Qos,
    ) -> BoxFuture<'a, Result<mpsc::Receiver<Vec<u8>>, BrokerError>> {
        Box::pin(async move {
            if self.disconnecting.load(Ordering::SeqCst) {
                return Err(BrokerError::Disconnecting);
            }
            let (sender, receiver) = mpsc::channel(16);
            self.inbound
                .lock()
                .unwrap()
                .insert(topic.to_string(), sender);
            self.record(BrokerEvent::Subscribe {
                topic: topic.to_string(),
                qos,
            });
            Ok(receiver)
        })
    }

    fn disconnect(&self) -> BoxFuture<'_, Result<(), BrokerError>> {
        Box::pin(async move {
            self.disconnecting.store(true, Ordering::SeqCst);
            self.record(BrokerEvent::Disconnect);
            Ok(())
        })
    }
}
