use super::Parlor;
use crate::ID;
use crate::gameroom::Command;
use crate::gameroom::Connection;
use crate::gameroom::Event;
use crate::gameroom::Post;
use crate::gameroom::Session;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

/// Bridge one websocket to a room. The connection gets its own event
/// channel, which is what gives each connection ordered delivery: the
/// room pushes events in emission order and this loop drains them in
/// order into the socket.
///
/// Inbound frames are JSON commands; unparseable frames bounce an Error
/// back to this connection only. When either side closes, the room
/// hears a detach and the registry forgets the connection.
pub async fn bridge(
    parlor: Arc<Parlor>,
    id: ID<Session>,
    mut socket: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
    token: String,
) -> anyhow::Result<()> {
    use futures::StreamExt;
    let player = parlor.gate().authenticate(&token)?;
    let handle = parlor.handle(id).await?;
    let conn: ID<Connection> = ID::default();
    let (outbox, mut events) = unbounded_channel::<Event>();
    handle
        .post
        .send(Post::Attach {
            conn,
            player,
            outbox,
        })
        .map_err(|_| anyhow::anyhow!("session closed"))?;
    parlor.track(conn, id).await;
    log::info!("connection {} enters session {}", conn, id);
    actix_web::rt::spawn(async move {
        'sesh: loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(_) => continue 'sesh,
                        };
                        if socket.text(json).await.is_err() { break 'sesh }
                    }
                    None => break 'sesh,
                },
                frame = stream.next() => match frame {
                    Some(Ok(actix_ws::Message::Text(text))) => match serde_json::from_str::<Command>(&text) {
                        Ok(command) => if handle.post.send(Post::Act { conn, command }).is_err() { break 'sesh },
                        Err(e) => {
                            let bounce = Event::Error { reason: format!("unreadable command: {}", e) };
                            let json = serde_json::to_string(&bounce).unwrap_or_default();
                            if socket.text(json).await.is_err() { break 'sesh }
                        }
                    },
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        let _ = handle.post.send(Post::Detach { conn });
        parlor.untrack(conn).await;
        log::info!("connection {} leaves session {}", conn, id);
    });
    Ok(())
}
