//! In-process fan-out for realtime chat.
//!
//! Each room and each online user has a broadcast channel. A connection holds at
//! most one room receiver at a time plus the receiver of its own user channel.
//! Presence is the number of live connections per user.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::types::ChatServerEvent;

struct UserChannel {
    sender: broadcast::Sender<ChatServerEvent>,
    connections: usize,
}

pub struct ChatHub {
    rooms: RwLock<HashMap<String, broadcast::Sender<ChatServerEvent>>>,
    users: RwLock<HashMap<String, UserChannel>>,
    capacity: usize,
}

impl ChatHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn subscribe_room(&self, room_id: &str) -> broadcast::Receiver<ChatServerEvent> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop the room channel once nobody listens to it.
    pub async fn prune_room(&self, room_id: &str) {
        let mut rooms = self.rooms.write().await;
        if rooms
            .get(room_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            rooms.remove(room_id);
            debug!(room_id = %room_id, "room channel released");
        }
    }

    /// Register a connection for `user_id` and return its receiver.
    pub async fn connect_user(&self, user_id: &str) -> broadcast::Receiver<ChatServerEvent> {
        let mut users = self.users.write().await;
        let channel = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserChannel {
                sender: broadcast::channel(self.capacity).0,
                connections: 0,
            });
        channel.connections += 1;
        channel.sender.subscribe()
    }

    pub async fn disconnect_user(&self, user_id: &str) {
        let mut users = self.users.write().await;
        if let Some(channel) = users.get_mut(user_id) {
            channel.connections = channel.connections.saturating_sub(1);
            if channel.connections == 0 {
                users.remove(user_id);
                debug!(user_id = %user_id, "user went offline");
            }
        }
    }

    /// Returns how many receivers got the event.
    pub async fn publish_to_room(&self, room_id: &str, event: ChatServerEvent) -> usize {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0)
    }

    pub async fn publish_to_user(&self, user_id: &str, event: ChatServerEvent) -> usize {
        let users = self.users.read().await;
        users
            .get(user_id)
            .and_then(|channel| channel.sender.send(event).ok())
            .unwrap_or(0)
    }

    pub async fn is_online(&self, user_id: &str) -> bool {
        self.users.read().await.contains_key(user_id)
    }

    pub async fn online_users(&self) -> Vec<String> {
        let mut online: Vec<String> = self.users.read().await.keys().cloned().collect();
        online.sort();
        online
    }

    pub async fn room_listeners(&self, room_id: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new(100)
    }
}
