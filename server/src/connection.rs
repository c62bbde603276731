use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::sync::Arc;

use system::serde_json;
use system::{ClientMessage, Destination, ServerMessage};

use crate::server_state::ServerState;

pub type ConnectionId = uuid::Uuid;
pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// An already encoded text frame.
    Frame(Arc<str>),
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

struct ConnectionActor {
    connection_id: ConnectionId,
    state: web::Data<ServerState>,
    tx: Option<ConnectionTx>,
}

impl ConnectionActor {
    fn handle_client_message(&mut self, message: ClientMessage) -> Result<(), String> {
        match message {
            ClientMessage::Subscribe { destination } => {
                let channel = Destination::parse(&destination)
                    .and_then(Destination::into_channel)
                    .map_err(|err| err.to_string())?;
                let tx = self
                    .tx
                    .clone()
                    .ok_or_else(|| "connection is not ready".to_string())?;
                self.state.hub.subscribe(channel, self.connection_id, tx);
                Ok(())
            }
            ClientMessage::Unsubscribe { destination } => {
                let channel = Destination::parse(&destination)
                    .and_then(Destination::into_channel)
                    .map_err(|err| err.to_string())?;
                self.state.hub.unsubscribe(&channel, &self.connection_id);
                Ok(())
            }
            ClientMessage::Send { destination, body } => {
                let key = Destination::parse(&destination)
                    .and_then(Destination::into_publish_key)
                    .map_err(|err| err.to_string())?;
                self.state
                    .engine
                    .receive(&key, body)
                    .map(|_| ())
                    .map_err(|err| err.to_string())
            }
        }
    }

    fn handle_frame(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let result = serde_json::from_str::<ClientMessage>(text)
            .map_err(|err| format!("malformed frame: {}", err))
            .and_then(|message| {
                log::debug!("Ingress {:?}", message);
                self.handle_client_message(message)
            });
        if let Err(reason) = result {
            log::warn!("Connection {} sent a rejected frame: {}", self.connection_id, reason);
            match serde_json::to_string(&ServerMessage::Error { reason }) {
                Ok(frame) => ctx.text(frame),
                Err(err) => log::error!("Cannot encode error frame: {}", err),
            }
        }
    }
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) =
            tokio::sync::mpsc::channel::<ConnectionEvent>(self.state.config.outbound_queue.max(1));
        self.tx = Some(tx);

        let addr = ctx.address().recipient();
        let connection_id = self.connection_id;

        actix_web::rt::spawn(async move {
            log::info!("Connection {} - outbound relay started", connection_id);
            while let Some(event) = rx.recv().await {
                addr.do_send(ConnectionActorMessage(event));
            }
            log::info!("Connection {} - outbound relay terminated", connection_id);
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        let removed = self.state.hub.remove_connection(&self.connection_id);
        log::info!(
            "Connection {} closed, dropped {} subscriptions",
            self.connection_id,
            removed
        );
        // closing the last sender ends the relay task
        self.tx = None;
        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => self.handle_frame(&text, ctx),
            Ok(ws::Message::Binary(bin)) => match std::str::from_utf8(&bin) {
                Ok(text) => self.handle_frame(text, ctx),
                Err(_) => ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Invalid,
                    description: None,
                })),
            },
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(err) => {
                log::warn!("Connection {} protocol error: {}", self.connection_id, err);
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        match msg.0 {
            ConnectionEvent::Frame(frame) => {
                log::debug!("Egress {}", frame);
                ctx.text(frame.to_string());
            }
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<ServerState>,
) -> Result<HttpResponse, Error> {
    let connection_id = uuid::Uuid::new_v4();
    log::info!("Connection {} opened", connection_id);
    ws::start(
        ConnectionActor {
            connection_id,
            state,
            tx: None,
        },
        &req,
        stream,
    )
}
