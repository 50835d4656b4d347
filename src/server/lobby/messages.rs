use actix::prelude::*;
use uuid::Uuid;

use crate::server::connection::Connection;

/// A new connection asks for a slot.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub connection_id: Uuid,
    pub addr: Addr<Connection>,
}

/// A connection sent its name frame.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub connection_id: Uuid,
    pub name: String,
    pub addr: Addr<Connection>,
}

/// A connection stopped.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub connection_id: Uuid,
}

/// A frame was received on some connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Activity;

/// A game session stopped.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SessionEnded {
    pub session_id: Uuid,
}
