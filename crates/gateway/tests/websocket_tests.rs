use std::time::Duration;

use alumni_chats::CreateRoomRequest;
use alumni_config::AppConfig;
use alumni_database::initialize_database;
use alumni_gateway::{create_router, GatewayState};
use alumni_payments::DisabledProvider;
use alumni_users::CreateUserRequest;
use anyhow::{anyhow, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct ChatServer {
    state: GatewayState,
    url: String,
    _dir: TempDir,
}

impl ChatServer {
    async fn start() -> Result<Self> {
        let dir = TempDir::new()?;
        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", dir.path().join("chat.db").display());
        config.database.max_connections = 4;
        config.uploads.directory = dir.path().join("uploads").display().to_string();

        let pool = initialize_database(&config.database).await?;
        let state = GatewayState::new(pool, config, Arc::new(DisabledProvider));
        let router = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            state,
            url: format!("ws://{addr}/ws/chat"),
            _dir: dir,
        })
    }

    async fn member(&self, name: &str, cohort: &str, verified: bool) -> Result<String> {
        let user = self
            .state
            .user_service
            .create_user(CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@alumni.test", name.to_lowercase()),
                cohort: Some(cohort.to_string()),
                is_verified_alumni: verified,
                ..Default::default()
            })
            .await?;
        Ok(user.id)
    }

    async fn room(&self, name: &str, room_type: &str, scope_value: Option<&str>) -> Result<String> {
        let room = self
            .state
            .chat_service
            .create_room(CreateRoomRequest {
                name: name.to_string(),
                description: None,
                room_type: room_type.to_string(),
                scope_value: scope_value.map(str::to_string),
            })
            .await?;
        Ok(room.id)
    }

    async fn connect(&self) -> Result<Socket> {
        let (socket, _) = connect_async(self.url.as_str()).await?;
        Ok(socket)
    }
}

async fn send(socket: &mut Socket, event: &str, data: Value) -> Result<()> {
    let frame = json!({"event": event, "data": data});
    socket.send(Message::Text(frame.to_string())).await?;
    Ok(())
}

async fn next_event(socket: &mut Socket) -> Result<Value> {
    loop {
        let frame = timeout(Duration::from_secs(5), socket.next())
            .await?
            .ok_or_else(|| anyhow!("socket closed"))??;
        if let Message::Text(text) = frame {
            return Ok(serde_json::from_str(&text)?);
        }
    }
}

async fn expect_silence(socket: &mut Socket) -> bool {
    timeout(Duration::from_millis(300), socket.next()).await.is_err()
}

/// Connect, identify and enter a room, consuming the acknowledgements.
async fn join(server: &ChatServer, user_id: &str, room_id: &str) -> Result<Socket> {
    let mut socket = server.connect().await?;
    send(&mut socket, "join_user", json!({"user_id": user_id})).await?;
    assert_eq!(next_event(&mut socket).await?["event"], "user_joined");
    send(&mut socket, "join_room", json!({"room_id": room_id})).await?;
    assert_eq!(next_event(&mut socket).await?["event"], "joined_room");
    Ok(socket)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_join_user_and_room_are_acknowledged() -> Result<()> {
    let server = ChatServer::start().await?;
    let ada = server.member("Ada", "2019", true).await?;
    let lounge = server.room("Lounge", "general", None).await?;

    let mut socket = server.connect().await?;
    send(&mut socket, "join_user", json!({"user_id": ada, "user_name": "Ada L."})).await?;
    let joined = next_event(&mut socket).await?;
    assert_eq!(joined["event"], "user_joined");
    assert_eq!(joined["data"]["user_id"], ada.as_str());
    assert_eq!(joined["data"]["user_name"], "Ada L.");

    send(&mut socket, "join_room", json!({"room_id": lounge})).await?;
    let room = next_event(&mut socket).await?;
    assert_eq!(room["event"], "joined_room");
    assert_eq!(room["data"]["room_name"], "Lounge");

    assert_eq!(server.state.chat_hub.online_users().await, vec![ada]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_room_messages_reach_only_that_room() -> Result<()> {
    let server = ChatServer::start().await?;
    let ada = server.member("Ada", "2019", true).await?;
    let grace = server.member("Grace", "2020", true).await?;
    let linus = server.member("Linus", "2019", true).await?;
    let lounge = server.room("Lounge", "general", None).await?;
    let cohort = server.room("Class of 2019", "cohort", Some("2019")).await?;

    let mut ada_socket = join(&server, &ada, &lounge).await?;
    let mut grace_socket = join(&server, &grace, &lounge).await?;
    let mut linus_socket = join(&server, &linus, &cohort).await?;

    send(
        &mut ada_socket,
        "send_message",
        json!({"room_id": lounge, "content": "Hello lounge"}),
    )
    .await?;

    for socket in [&mut ada_socket, &mut grace_socket] {
        let event = next_event(socket).await?;
        assert_eq!(event["event"], "new_message");
        assert_eq!(event["data"]["content"], "Hello lounge");
        assert_eq!(event["data"]["sender_id"], ada.as_str());
        assert_eq!(event["data"]["room_id"], lounge.as_str());
    }
    assert!(expect_silence(&mut linus_socket).await);

    let history = server
        .state
        .chat_service
        .room_messages(&lounge, &grace, None)
        .await?;
    assert_eq!(history.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cohort_room_is_closed_to_other_cohorts() -> Result<()> {
    let server = ChatServer::start().await?;
    let grace = server.member("Grace", "2020", true).await?;
    let cohort = server.room("Class of 2019", "cohort", Some("2019")).await?;

    let mut socket = server.connect().await?;
    send(&mut socket, "join_user", json!({"user_id": grace})).await?;
    next_event(&mut socket).await?;
    send(&mut socket, "join_room", json!({"room_id": cohort})).await?;

    let denied = next_event(&mut socket).await?;
    assert_eq!(denied["event"], "error");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_direct_messages_reach_both_parties() -> Result<()> {
    let server = ChatServer::start().await?;
    let ada = server.member("Ada", "2019", true).await?;
    let grace = server.member("Grace", "2020", true).await?;
    let lounge = server.room("Lounge", "general", None).await?;

    let mut ada_socket = join(&server, &ada, &lounge).await?;
    let mut grace_socket = join(&server, &grace, &lounge).await?;

    send(
        &mut ada_socket,
        "send_direct_message",
        json!({"receiver_id": grace, "content": "Coffee?"}),
    )
    .await?;

    for socket in [&mut grace_socket, &mut ada_socket] {
        let event = next_event(socket).await?;
        assert_eq!(event["event"], "new_direct_message");
        assert_eq!(event["data"]["receiver_id"], grace.as_str());
        assert_eq!(event["data"]["content"], "Coffee?");
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_frames_and_unverified_users_get_errors() -> Result<()> {
    let server = ChatServer::start().await?;
    let pending = server.member("Pending", "2021", false).await?;

    let mut socket = server.connect().await?;
    socket.send(Message::Text("not json".to_string())).await?;
    let invalid = next_event(&mut socket).await?;
    assert_eq!(invalid["event"], "error");
    assert!(invalid["data"]["message"]
        .as_str()
        .is_some_and(|message| message.starts_with("Invalid chat event")));

    send(&mut socket, "send_message", json!({"room_id": "any", "content": "hi"})).await?;
    assert_eq!(next_event(&mut socket).await?["event"], "error");

    send(&mut socket, "join_user", json!({"user_id": pending})).await?;
    let denied = next_event(&mut socket).await?;
    assert_eq!(denied["event"], "error");
    assert_eq!(denied["data"]["message"], "Access denied. Verified alumni only.");
    assert!(server.state.chat_hub.online_users().await.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_presence_clears_when_the_socket_closes() -> Result<()> {
    let server = ChatServer::start().await?;
    let ada = server.member("Ada", "2019", true).await?;
    let lounge = server.room("Lounge", "general", None).await?;

    let mut socket = join(&server, &ada, &lounge).await?;
    assert!(server.state.chat_hub.is_online(&ada).await);

    socket.close(None).await?;
    drop(socket);

    let mut online = true;
    for _ in 0..50 {
        online = server.state.chat_hub.is_online(&ada).await;
        if !online {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!online);
    assert_eq!(server.state.chat_hub.room_listeners(&lounge).await, 0);
    Ok(())
}
