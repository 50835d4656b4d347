//! Session state machine.
//!
//! `WaitingForPlayers -> InRound -> RoundOver -> (InRound | MatchOver)`.
//! The machine is pure: every transition returns the messages to deliver and
//! leaves transport to the caller. `RoundOver` is only ever observed inside a
//! single call, since it resolves immediately.

use log::{debug, info};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::config::game::PLAYERS_PER_MATCH;
use crate::game::board::Board;
use crate::game::scoring::{Match, MatchProgress};
use crate::game::types::{BoardStatus, Mark, MoveError, PlayerIndex, opponent};
use crate::server::protocol::ServerMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForPlayers,
    InRound,
    RoundOver,
    MatchOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Player(PlayerIndex),
    Both,
}

/// A message produced by a transition, addressed to one or both players.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipient,
    pub message: ServerMessage,
}

impl Outbound {
    fn to_player(player: PlayerIndex, message: ServerMessage) -> Self {
        Self {
            to: Recipient::Player(player),
            message,
        }
    }

    fn to_both(message: ServerMessage) -> Self {
        Self {
            to: Recipient::Both,
            message,
        }
    }
}

pub struct SessionState<R: Rng = ThreadRng> {
    names: Vec<String>,
    marks: [Mark; PLAYERS_PER_MATCH],
    board: Board,
    scoring: Option<Match>,
    turn: PlayerIndex,
    phase: Phase,
    rng: R,
}

impl SessionState<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl<R: Rng> SessionState<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            names: Vec::with_capacity(PLAYERS_PER_MATCH),
            marks: [Mark::X, Mark::O],
            board: Board::new(),
            scoring: None,
            turn: 0,
            phase: Phase::WaitingForPlayers,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> PlayerIndex {
        self.turn
    }

    pub fn mark_of(&self, player: PlayerIndex) -> Mark {
        self.marks[player]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn scores(&self) -> [u32; PLAYERS_PER_MATCH] {
        self.scoring.as_ref().map(Match::scores).unwrap_or_default()
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::MatchOver
    }

    /// Register a player name. The second registration starts the match.
    /// Registrations outside `WaitingForPlayers` are ignored.
    pub fn register(&mut self, name: String) -> Vec<Outbound> {
        if self.phase != Phase::WaitingForPlayers {
            debug!("[SessionState] Ignoring registration of {} in phase {:?}", name, self.phase);
            return Vec::new();
        }
        self.names.push(name);
        if self.names.len() < PLAYERS_PER_MATCH {
            return Vec::new();
        }
        self.start_match()
    }

    fn start_match(&mut self) -> Vec<Outbound> {
        let names = [self.names[0].clone(), self.names[1].clone()];
        let x_holder = self.rng.random_range(0..PLAYERS_PER_MATCH);
        self.marks[x_holder] = Mark::X;
        self.marks[opponent(x_holder)] = Mark::O;
        self.turn = self.rng.random_range(0..PLAYERS_PER_MATCH);
        self.board.reset();
        self.scoring = Some(Match::new(names.clone()));
        self.phase = Phase::InRound;
        info!(
            "[SessionState] Match started: {} ({:?}) vs {} ({:?}), {} opens",
            names[0], self.marks[0], names[1], self.marks[1], names[self.turn]
        );

        let scores = self.scores();
        (0..PLAYERS_PER_MATCH)
            .map(|player| {
                Outbound::to_player(
                    player,
                    ServerMessage::MatchStarted {
                        your_turn: player == self.turn,
                        mark: self.marks[player],
                        names: names.clone(),
                        scores,
                    },
                )
            })
            .collect()
    }

    /// Validate and apply a move. A rejected move leaves every field untouched.
    pub fn apply_move(
        &mut self,
        player: PlayerIndex,
        position: usize,
    ) -> Result<Vec<Outbound>, MoveError> {
        if self.phase != Phase::InRound {
            return Err(MoveError::NoRoundInProgress);
        }
        if player != self.turn {
            return Err(MoveError::NotYourTurn(player));
        }
        self.board.apply(position, self.marks[player])?;

        match self.board.evaluate() {
            BoardStatus::InProgress => {
                self.turn = opponent(player);
                Ok(vec![self.state_update()])
            }
            BoardStatus::Won => {
                debug!(
                    "[SessionState] Line {:?} won by player {}",
                    self.board.winning_line(),
                    player
                );
                Ok(self.finish_round(Some(player)))
            }
            BoardStatus::Full => Ok(self.finish_round(None)),
        }
    }

    fn finish_round(&mut self, winner: Option<PlayerIndex>) -> Vec<Outbound> {
        self.phase = Phase::RoundOver;
        self.board.reset();
        let Some(scoring) = self.scoring.as_mut() else {
            return Vec::new();
        };
        let progress = scoring.record_round(winner);
        info!(
            "[SessionState] Round {} over (winner: {:?}), scores {:?}, {:?}",
            scoring.rounds_played(),
            winner,
            scoring.scores(),
            progress
        );

        match progress {
            MatchProgress::Continue | MatchProgress::Tiebreak => {
                self.turn = self.rng.random_range(0..PLAYERS_PER_MATCH);
                self.phase = Phase::InRound;
                vec![self.state_update()]
            }
            MatchProgress::Complete => {
                self.phase = Phase::MatchOver;
                let winner = scoring.winner_name().map(str::to_string);
                vec![Outbound::to_both(ServerMessage::MatchOver {
                    draw: winner.is_none(),
                    winner,
                    scores: scoring.scores(),
                })]
            }
        }
    }

    /// Tear the session down after `player` dropped. The remaining peer, if
    /// registered, gets a closure notice.
    pub fn disconnect(&mut self, player: PlayerIndex) -> Vec<Outbound> {
        if self.phase == Phase::MatchOver {
            return Vec::new();
        }
        self.phase = Phase::MatchOver;
        let peer = opponent(player);
        if self.names.len() < PLAYERS_PER_MATCH {
            return Vec::new();
        }
        let leaver = self.names.get(player).map(String::as_str).unwrap_or("El oponente");
        vec![Outbound::to_player(peer, ServerMessage::opponent_left(leaver))]
    }

    fn state_update(&self) -> Outbound {
        Outbound::to_both(ServerMessage::GameState {
            board: self.board.clone(),
            turn: self.turn,
            scores: self.scores(),
        })
    }
}
