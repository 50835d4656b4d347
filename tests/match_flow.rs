//! End-to-end tests: a real listener on an ephemeral port, driven by plain
//! TCP clients speaking the newline-delimited JSON protocol.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use triqui_server::server::listener;
use triqui_server::{ServerConfig, ServerError};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE: Duration = Duration::from_millis(300);
const WRITE_GAP: Duration = Duration::from_millis(100);

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (read, writer) = stream.into_split();
        Client {
            lines: BufReader::new(read).lines(),
            writer,
        }
    }

    async fn send_raw(&mut self, bytes: &str) {
        self.writer.write_all(bytes.as_bytes()).await.expect("write");
    }

    async fn send_line(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.expect("write");
        self.writer.write_all(b"\n").await.expect("write");
    }

    async fn send_move(&mut self, position: usize) {
        let frame = json!({ "tipo": "movimiento", "posicion": position }).to_string();
        self.send_line(&frame).await;
    }

    /// Next message, or `None` once the server closed the connection.
    async fn recv(&mut self) -> Option<Value> {
        match timeout(RECV_TIMEOUT, self.lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                Some(serde_json::from_str(&line).expect("server sent invalid JSON"))
            }
            Ok(Ok(None)) | Ok(Err(_)) => None,
            Err(_) => panic!("timed out waiting for a server message"),
        }
    }

    async fn is_silent(&mut self) -> bool {
        timeout(SILENCE, self.lines.next_line()).await.is_err()
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    }
}

async fn start_server(config: ServerConfig) -> (SocketAddr, JoinHandle<Result<(), ServerError>>) {
    let tcp = listener::bind(&config).await.expect("bind");
    let addr = tcp.local_addr().expect("local addr");
    let handle = tokio::task::spawn_local(listener::serve(tcp, config));
    (addr, handle)
}

/// A started match: clients ordered by player index, plus the opening turn.
struct Started {
    players: [Client; 2],
    names: [String; 2],
    marks: [String; 2],
    turn: usize,
}

async fn start_match(addr: SocketAddr) -> Started {
    let mut alice = Client::connect(addr).await;
    alice.send_line("Alice").await;
    let mut bob = Client::connect(addr).await;
    bob.send_line("Bob").await;

    let a = alice.recv().await.expect("inicio_juego for Alice");
    let b = bob.recv().await.expect("inicio_juego for Bob");
    assert_eq!(a["tipo"], "inicio_juego");
    assert_eq!(b["tipo"], "inicio_juego");
    assert_eq!(a["nombres"], b["nombres"]);
    assert_eq!(a["puntuaciones"], json!([0, 0]));
    assert_ne!(a["turno"], b["turno"], "exactly one player opens");
    assert_ne!(a["simbolo"], b["simbolo"], "players never share a mark");

    let names: [String; 2] = serde_json::from_value(a["nombres"].clone()).expect("names");
    let alice_index = names.iter().position(|n| n == "Alice").expect("Alice listed");
    let (players, infos) = if alice_index == 0 {
        ([alice, bob], [a, b])
    } else {
        ([bob, alice], [b, a])
    };
    let turn = if infos[0]["turno"] == true { 0 } else { 1 };
    let marks = [
        infos[0]["simbolo"].as_str().expect("mark").to_string(),
        infos[1]["simbolo"].as_str().expect("mark").to_string(),
    ];
    Started { players, names, marks, turn }
}

/// Read the same broadcast from both players.
async fn recv_both(players: &mut [Client; 2]) -> Value {
    let first = players[0].recv().await.expect("broadcast to player 0");
    let second = players[1].recv().await.expect("broadcast to player 1");
    assert_eq!(first, second);
    first
}

/// Play one round that `winner` takes on the top row. Returns the message
/// broadcast after the winning move.
async fn win_round(game: &mut Started, winner: usize) -> Value {
    let loser = 1 - winner;
    let mut script = vec![(winner, 0), (loser, 3), (winner, 1), (loser, 4), (winner, 2)];
    if game.turn == loser {
        script.insert(0, (loser, 8));
    }
    let mut last = Value::Null;
    for (player, position) in script {
        assert_eq!(game.turn, player);
        game.players[player].send_move(position).await;
        last = recv_both(&mut game.players).await;
        if last["tipo"] == "estado_juego" {
            game.turn = last["turno"].as_u64().expect("turn") as usize;
        }
    }
    last
}

#[actix::test]
async fn accepted_move_is_broadcast_and_flips_turn() {
    let (addr, _server) = start_server(test_config()).await;
    let mut game = start_match(addr).await;

    let mover = game.turn;
    game.players[mover].send_move(4).await;
    let state = recv_both(&mut game.players).await;

    assert_eq!(state["tipo"], "estado_juego");
    assert_eq!(state["tablero"][4], game.marks[mover].as_str());
    assert_eq!(state["turno"], 1 - mover);
    assert_eq!(state["puntuaciones"], json!([0, 0]));
    let empty = state["tablero"]
        .as_array()
        .expect("board")
        .iter()
        .filter(|c| *c == " ")
        .count();
    assert_eq!(empty, 8);
}

#[actix::test]
async fn out_of_turn_move_is_ignored() {
    let (addr, _server) = start_server(test_config()).await;
    let mut game = start_match(addr).await;

    let idle = 1 - game.turn;
    game.players[idle].send_move(4).await;
    assert!(game.players[0].is_silent().await);
    assert!(game.players[1].is_silent().await);

    // The cell is still free for the real turn holder.
    let mover = game.turn;
    game.players[mover].send_move(4).await;
    let state = recv_both(&mut game.players).await;
    assert_eq!(state["tablero"][4], game.marks[mover].as_str());
}

#[actix::test]
async fn occupied_cell_is_ignored() {
    let (addr, _server) = start_server(test_config()).await;
    let mut game = start_match(addr).await;

    let first = game.turn;
    game.players[first].send_move(0).await;
    let state = recv_both(&mut game.players).await;
    let second = 1 - first;
    assert_eq!(state["turno"], second);

    game.players[second].send_move(0).await;
    assert!(game.players[0].is_silent().await);
    assert!(game.players[1].is_silent().await);
}

#[actix::test]
async fn two_to_one_match_ends_with_single_fin_juego() {
    let (addr, _server) = start_server(test_config()).await;
    let mut game = start_match(addr).await;

    let after_first = win_round(&mut game, 0).await;
    assert_eq!(after_first["tipo"], "estado_juego");
    assert_eq!(after_first["puntuaciones"], json!([1, 0]));
    assert!(after_first["tablero"].as_array().expect("board").iter().all(|c| c == " "));

    let after_second = win_round(&mut game, 1).await;
    assert_eq!(after_second["puntuaciones"], json!([1, 1]));

    let end = win_round(&mut game, 0).await;
    assert_eq!(end["tipo"], "fin_juego");
    assert_eq!(end["ganador"], game.names[0].as_str());
    assert_eq!(end["empate_global"], false);
    assert_eq!(end["puntuaciones"], json!([2, 1]));

    // Nothing after fin_juego: both connections are closed.
    assert_eq!(game.players[0].recv().await, None);
    assert_eq!(game.players[1].recv().await, None);
}

#[actix::test]
async fn peer_disconnect_closes_remaining_player() {
    let (addr, _server) = start_server(test_config()).await;
    let game = start_match(addr).await;
    let [leaver, mut stayer] = game.players;

    drop(leaver);
    let notice = stayer.recv().await.expect("closure notice");
    assert_eq!(notice["tipo"], "conexion_cerrada");
    assert_eq!(stayer.recv().await, None);
}

#[actix::test]
async fn malformed_frame_drops_sender_and_tears_down_match() {
    let (addr, _server) = start_server(test_config()).await;
    let game = start_match(addr).await;
    let [mut offender, mut peer] = game.players;

    offender.send_line("{not json").await;
    assert_eq!(offender.recv().await, None);
    let notice = peer.recv().await.expect("closure notice");
    assert_eq!(notice["tipo"], "conexion_cerrada");
    assert_eq!(peer.recv().await, None);
}

#[actix::test]
async fn third_connection_is_refused() {
    let (addr, _server) = start_server(test_config()).await;
    let _game = start_match(addr).await;

    let mut third = Client::connect(addr).await;
    let notice = third.recv().await.expect("refusal notice");
    assert_eq!(notice["tipo"], "servidor_lleno");
    assert_eq!(third.recv().await, None);
}

#[actix::test]
async fn idle_lobby_notifies_and_shuts_down() {
    let config = ServerConfig {
        idle_timeout: Duration::from_millis(200),
        idle_check_interval: Duration::from_millis(50),
        ..test_config()
    };
    let (addr, server) = start_server(config).await;

    let mut lonely = Client::connect(addr).await;
    lonely.send_line("Alice").await;

    let notice = lonely.recv().await.expect("shutdown notice");
    assert_eq!(notice["tipo"], "servidor_cerrado");
    assert_eq!(lonely.recv().await, None);

    let result = timeout(RECV_TIMEOUT, server)
        .await
        .expect("listener did not stop")
        .expect("listener task panicked");
    assert!(result.is_ok());
}

#[actix::test]
async fn split_and_coalesced_frames_are_applied_once() {
    let (addr, _server) = start_server(test_config()).await;

    let mut alice = Client::connect(addr).await;
    alice.send_raw("Ali").await;
    tokio::time::sleep(WRITE_GAP).await;
    alice.send_raw("ce\n").await;
    assert!(alice.is_silent().await);
    let mut bob = Client::connect(addr).await;
    bob.send_line("Bob").await;

    let a = alice.recv().await.expect("inicio_juego for Alice");
    let b = bob.recv().await.expect("inicio_juego for Bob");
    assert_eq!(a["nombres"], json!(["Alice", "Bob"]));
    let mut players = [alice, bob];
    let mover = if a["turno"] == true { 0 } else { 1 };
    let mark = [&a, &b][mover]["simbolo"].clone();

    // One move split across two writes, followed in the same write by a
    // second move that arrives out of turn.
    players[mover].send_raw(r#"{"tipo":"movimiento","#).await;
    tokio::time::sleep(WRITE_GAP).await;
    players[mover]
        .send_raw("\"posicion\":4}\n{\"tipo\":\"movimiento\",\"posicion\":5}\n")
        .await;

    let state = recv_both(&mut players).await;
    assert_eq!(state["tipo"], "estado_juego");
    assert_eq!(state["tablero"][4], mark);
    assert_eq!(state["tablero"][5], " ");
    assert_eq!(state["turno"], 1 - mover);
    assert!(players[0].is_silent().await);
    assert!(players[1].is_silent().await);
}

#[actix::test]
async fn peer_dropping_right_after_registering_ends_the_match() {
    let config = ServerConfig {
        idle_timeout: Duration::from_secs(1),
        idle_check_interval: Duration::from_millis(50),
        ..test_config()
    };
    let (addr, server) = start_server(config).await;

    let mut alice = Client::connect(addr).await;
    alice.send_line("Alice").await;
    assert!(alice.is_silent().await);

    // Bob's name and a broken frame land together: his connection is gone
    // before the match he was paired into can reach him.
    let mut bob = Client::connect(addr).await;
    bob.send_raw("Bob\n{bad\n").await;
    assert_eq!(bob.recv().await, None);

    let start = alice.recv().await.expect("inicio_juego");
    assert_eq!(start["tipo"], "inicio_juego");
    assert_eq!(start["nombres"], json!(["Alice", "Bob"]));
    let notice = alice.recv().await.expect("closure notice");
    assert_eq!(notice["tipo"], "conexion_cerrada");
    assert_eq!(alice.recv().await, None);

    // With the session gone the lobby idles out and the listener stops.
    let result = timeout(RECV_TIMEOUT, server)
        .await
        .expect("listener did not stop")
        .expect("listener task panicked");
    assert!(result.is_ok());
}

#[actix::test]
async fn blank_name_drops_connection() {
    let (addr, _server) = start_server(test_config()).await;

    let mut blank = Client::connect(addr).await;
    blank.send_line("   ").await;
    assert_eq!(blank.recv().await, None);

    // The slot is released: a regular pair still gets a match.
    let game = start_match(addr).await;
    assert!(game.names.iter().any(|n| n == "Alice"));
    assert!(game.names.iter().any(|n| n == "Bob"));
}
