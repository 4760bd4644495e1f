use super::Clock;
use super::MatchView;
use super::Snapshot;
use crate::CHAT_CAPACITY;
use crate::ID;
use crate::Unique;
use crate::board::Color;
use crate::gameplay::Engine;
use crate::gameplay::Match;
use crate::hosting::Member;
use crate::records::GameCheckpoint;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::Instant;

/// Marker for transport connection identities. The session references
/// connections; their lifecycle belongs to the websocket layer.
#[derive(Debug)]
pub struct Connection;

/// What a connection is to this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Color),
    Spectator,
}

/// The live container for the current game of a match: engine, seats,
/// every connection of every participant, clock, and a short chat ring.
/// A player may hold several simultaneous connections; all of them map
/// to the same seat. Mutated only by the owning room actor.
#[derive(Debug)]
pub struct Session {
    id: ID<Self>,
    matchplay: Match,
    game: ID<GameCheckpoint>,
    engine: Engine,
    seats: [Option<ID<Member>>; 2],
    connections: HashMap<ID<Connection>, Role>,
    analysis: Option<ID<Member>>,
    clock: Option<Clock>,
    created_at: Instant,
    last_activity: Instant,
    chat: VecDeque<(Color, String)>,
}

impl Unique for Session {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Session {
    pub fn new(matchplay: Match, engine: Engine, clock: Option<Clock>) -> Self {
        let now = Instant::now();
        Self {
            id: ID::default(),
            matchplay,
            game: ID::default(),
            engine,
            seats: [None; 2],
            connections: HashMap::new(),
            analysis: None,
            clock,
            created_at: now,
            last_activity: now,
            chat: VecDeque::with_capacity(CHAT_CAPACITY),
        }
    }

    //
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
    pub fn matchplay(&self) -> &Match {
        &self.matchplay
    }
    pub fn matchplay_mut(&mut self) -> &mut Match {
        &mut self.matchplay
    }
    pub fn game_id(&self) -> ID<GameCheckpoint> {
        self.game
    }
    /// Rack up the next game of the match: fresh engine, fresh game id,
    /// and a fresh reserve when a clock is in play. Seats and
    /// connections carry over.
    pub fn next_game(&mut self, engine: Engine, clock: Option<Clock>) {
        self.engine = engine;
        self.clock = clock;
        self.game = ID::default();
        self.touch();
    }
    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }
    pub fn clock_mut(&mut self) -> Option<&mut Clock> {
        self.clock.as_mut()
    }
    pub fn created_at(&self) -> Instant {
        self.created_at
    }
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
    pub fn analysis_owner(&self) -> Option<ID<Member>> {
        self.analysis
    }
    pub fn enter_analysis(&mut self, owner: ID<Member>) {
        self.analysis = Some(owner);
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
    }

    // seating

    pub fn seat_of(&self, player: ID<Member>) -> Option<Color> {
        match (
            self.seats[0] == Some(player), //
            self.seats[1] == Some(player),
        ) {
            (true, _) => Some(Color::White),
            (_, true) => Some(Color::Red),
            _ => None,
        }
    }
    pub fn player(&self, color: Color) -> Option<ID<Member>> {
        self.seats[color.index()]
    }
    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }
    pub fn is_turn(&self, player: ID<Member>) -> bool {
        self.seat_of(player)
            .is_some_and(|seat| self.engine.current() == Some(seat))
    }
    /// Seat a bot or an invited player before any connection shows up.
    pub fn reserve(&mut self, color: Color, player: ID<Member>) {
        assert!(self.seats[color.index()].is_none(), "seat taken");
        self.seats[color.index()] = Some(player);
    }

    /// Bind a connection: back to your own seat if you hold one, into an
    /// empty seat otherwise, or as a spectator when the table is full.
    pub fn attach(&mut self, conn: ID<Connection>, player: ID<Member>) -> Role {
        self.touch();
        let role = match self.seat_of(player) {
            Some(seat) => Role::Player(seat),
            None => match self.seats.iter().position(Option::is_none) {
                Some(0) => {
                    self.seats[0] = Some(player);
                    Role::Player(Color::White)
                }
                Some(_) => {
                    self.seats[1] = Some(player);
                    Role::Player(Color::Red)
                }
                None => Role::Spectator,
            },
        };
        self.connections.insert(conn, role);
        role
    }
    pub fn detach(&mut self, conn: ID<Connection>) -> Option<Role> {
        self.touch();
        self.connections.remove(&conn)
    }
    pub fn role(&self, conn: ID<Connection>) -> Option<Role> {
        self.connections.get(&conn).copied()
    }
    pub fn connections(&self) -> impl Iterator<Item = (ID<Connection>, Role)> + '_ {
        self.connections.iter().map(|(c, r)| (*c, *r))
    }
    pub fn is_deserted(&self) -> bool {
        self.connections.is_empty()
    }
    /// Live connections bound to a seat, spectators excluded.
    pub fn presence(&self, color: Color) -> usize {
        self.connections
            .values()
            .filter(|role| **role == Role::Player(color))
            .count()
    }

    // chat

    pub fn chat(&mut self, from: Color, text: String) {
        if self.chat.len() == CHAT_CAPACITY {
            self.chat.pop_front();
        }
        self.chat.push_back((from, text));
    }
    pub fn chat_history(&self) -> impl Iterator<Item = &(Color, String)> {
        self.chat.iter()
    }

    /// Per-viewer state view. The legal move set is disclosed only to
    /// the player on turn, or to the analysis owner in analysis mode.
    pub fn snapshot(&self, viewer: Option<ID<Connection>>) -> Snapshot {
        let role = viewer.and_then(|conn| self.role(conn));
        let you = match role {
            Some(Role::Player(color)) => Some(color),
            _ => None,
        };
        let on_turn = you.is_some() && you == self.engine.current();
        let analyzing = self.analysis.is_some()
            && you.is_some_and(|seat| self.player(seat) == self.analysis);
        let moves = match on_turn || analyzing {
            true => Some(self.engine.legal()),
            false => None,
        };
        let board = self.engine.board();
        Snapshot {
            session: self.id,
            points: (1..=crate::POINTS).map(|i| *board.point(i)).collect(),
            bar: [board.bar(Color::White), board.bar(Color::Red)],
            off: [board.off(Color::White), board.off(Color::Red)],
            pips: [
                board.pip_count(Color::White),
                board.pip_count(Color::Red),
            ],
            current: self.engine.current(),
            roll: self.engine.rolled(),
            remaining: self.engine.remaining().to_vec(),
            moves,
            cube_value: self.engine.cube().value(),
            cube_owner: self.engine.cube().owner(),
            pending_double: self.engine.cube().offer(),
            matchplay: MatchView {
                target: self.matchplay.target(),
                white: self.matchplay.score(Color::White),
                red: self.matchplay.score(Color::Red),
                crawford: self.matchplay.is_crawford(),
                game: self.matchplay.game_number(),
            },
            clock: self.clock.as_ref().map(Clock::view),
            phase: self.engine.phase(),
            you,
        }
    }
}
