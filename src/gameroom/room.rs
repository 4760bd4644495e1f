use super::Bot;
use super::Clock;
use super::Command;
use super::Connection;
use super::Event;
use super::Role;
use super::Session;
use super::Snapshot;
use crate::BOT_DELIBERATION_SECS;
use crate::BOT_PAUSE_MILLIS;
use crate::ID;
use crate::Unique;
use crate::board::Color;
use crate::board::PositionId;
use crate::gameplay::Engine;
use crate::gameplay::GameResult;
use crate::gameplay::Match;
use crate::gameplay::Rejection;
use crate::hosting::Member;
use crate::hosting::Pulse;
use crate::hosting::RoomHandle;
use crate::records::Archive;
use crate::records::GameCheckpoint;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;

/// Mailbox traffic for one room. Everything that can touch a session
/// funnels through here, which is what makes actions totally ordered:
/// connections post acts, the sweeper posts eviction, the time
/// controller posts ticks, and scheduled bot turns post back to the
/// same mailbox instead of running inline.
pub enum Post {
    Attach {
        conn: ID<Connection>,
        player: ID<Member>,
        outbox: UnboundedSender<Event>,
    },
    Act {
        conn: ID<Connection>,
        command: Command,
    },
    Detach {
        conn: ID<Connection>,
    },
    Tick,
    Robot {
        game: usize,
    },
    Inspect {
        reply: oneshot::Sender<Snapshot>,
    },
    /// Operator surface: pin the next roll of this session's cup.
    Reseed {
        d1: crate::Die,
        d2: crate::Die,
    },
    Evict,
}

/// Per-session actor: the single source of truth for one live game and
/// the only code that calls the engine. Validates inbound actions
/// against the session, mutates state, settles finished games into the
/// match, schedules the automated opponent, and fans state out to every
/// connection of every participant.
pub struct Room {
    session: Session,
    bots: [Option<Box<dyn Bot>>; 2],
    outboxes: HashMap<ID<Connection>, UnboundedSender<Event>>,
    mailbox: UnboundedReceiver<Post>,
    loopback: UnboundedSender<Post>,
    archive: Arc<dyn Archive>,
    pulse: Arc<Pulse>,
    last_tick: Instant,
    evicted: bool,
}

impl Room {
    /// Spawn the room task and hand back its mailbox and heartbeat.
    pub fn spawn(
        session: Session,
        bots: [Option<Box<dyn Bot>>; 2],
        archive: Arc<dyn Archive>,
    ) -> RoomHandle {
        let (tx, rx) = unbounded_channel();
        let pulse = Arc::new(Pulse::default());
        pulse.beat();
        let handle = RoomHandle {
            id: session.id(),
            post: tx.clone(),
            pulse: pulse.clone(),
        };
        let room = Self {
            session,
            bots,
            outboxes: HashMap::new(),
            mailbox: rx,
            loopback: tx,
            archive,
            pulse,
            last_tick: Instant::now(),
            evicted: false,
        };
        tokio::spawn(room.run());
        handle
    }

    async fn run(mut self) {
        log::info!("[room {}] open", self.session.id());
        while let Some(post) = self.mailbox.recv().await {
            self.handle(post).await;
            if self.evicted {
                break;
            }
        }
        self.checkpoint_now().await;
        log::info!("[room {}] closed", self.session.id());
    }

    async fn handle(&mut self, post: Post) {
        match post {
            Post::Attach {
                conn,
                player,
                outbox,
            } => {
                self.pulse.beat();
                self.join(conn, player, outbox);
            }
            Post::Act { conn, command } => {
                self.pulse.beat();
                self.session.touch();
                log::debug!("[room {}] {}: {}", self.session.id(), conn, command);
                if let Err(reason) = self.act(conn, command) {
                    self.unicast(conn, Event::Error { reason });
                }
            }
            Post::Detach { conn } => {
                self.pulse.beat();
                self.drop_connection(conn);
            }
            Post::Tick => {
                let elapsed = self.last_tick.elapsed();
                self.last_tick = Instant::now();
                self.tick(elapsed);
            }
            Post::Robot { game } => {
                if game == self.session.matchplay().game_number() {
                    self.robot_turn().await;
                }
            }
            Post::Inspect { reply } => {
                let _ = reply.send(self.session.snapshot(None));
            }
            Post::Reseed { d1, d2 } => {
                if (1..=6).contains(&d1) && (1..=6).contains(&d2) {
                    self.session.engine_mut().reseed(d1, d2);
                }
            }
            Post::Evict => {
                self.evicted = true;
            }
        }
    }
}

/// Inbound action validation and execution.
impl Room {
    fn act(&mut self, conn: ID<Connection>, command: Command) -> Result<(), String> {
        match command {
            Command::Join => {
                let snapshot = self.session.snapshot(Some(conn));
                self.unicast(conn, Event::GameUpdate { snapshot });
                Ok(())
            }
            Command::Roll => {
                self.mover(conn)?;
                self.session.engine_mut().throw().map_err(stringify)?;
                self.publish();
                Ok(())
            }
            Command::Play { from, to } => {
                self.mover(conn)?;
                let chosen = self
                    .session
                    .engine()
                    .resolve(from, to)
                    .ok_or(Rejection::IllegalMove)
                    .map_err(stringify)?;
                self.session.engine_mut().play(chosen).map_err(stringify)?;
                match self.session.engine().result() {
                    Some(result) => self.settle(result),
                    None => self.publish(),
                }
                Ok(())
            }
            Command::End => {
                self.mover(conn)?;
                let next = self.session.engine_mut().pass().map_err(stringify)?;
                if let Some(clock) = self.session.clock_mut() {
                    clock.start_turn(next);
                }
                self.publish();
                self.schedule_robot();
                Ok(())
            }
            Command::Undo => {
                self.mover(conn)?;
                self.session.engine_mut().undo().map_err(stringify)?;
                self.publish();
                Ok(())
            }
            Command::OfferDouble => {
                let by = self.mover(conn)?;
                let proposed = self.session.engine_mut().double().map_err(stringify)?;
                self.broadcast(Event::DoubleOffered {
                    session: self.session.id(),
                    by,
                    proposed,
                });
                self.publish();
                self.schedule_robot();
                Ok(())
            }
            Command::AcceptDouble => {
                self.responder(conn)?;
                let (value, owner) = self.session.engine_mut().take().map_err(stringify)?;
                self.broadcast(Event::DoubleAccepted {
                    session: self.session.id(),
                    value,
                    owner,
                });
                self.publish();
                Ok(())
            }
            Command::DeclineDouble => {
                self.responder(conn)?;
                let result = self.session.engine_mut().drop_cube().map_err(stringify)?;
                self.settle(result);
                Ok(())
            }
            Command::Abandon => {
                let color = self.seat(conn)?;
                let result = self.session.engine_mut().forfeit(color).map_err(stringify)?;
                self.settle(result);
                Ok(())
            }
            Command::Leave => {
                self.drop_connection(conn);
                Ok(())
            }
            Command::Chat { text } => {
                let from = self.seat(conn)?;
                self.session.chat(from, text.clone());
                self.broadcast(Event::Chat {
                    session: self.session.id(),
                    from,
                    text,
                });
                Ok(())
            }
            Command::Analyze => {
                let color = self.seat(conn)?;
                let owner = self
                    .session
                    .player(color)
                    .ok_or_else(|| "seat is empty".to_string())?;
                self.session.enter_analysis(owner);
                self.publish();
                Ok(())
            }
            Command::Reseed { d1, d2 } => {
                self.seat(conn)?;
                if !(1..=6).contains(&d1) || !(1..=6).contains(&d2) {
                    return Err("dice faces run 1 through 6".into());
                }
                self.session.engine_mut().reseed(d1, d2);
                Ok(())
            }
        }
    }

    /// The connection must be seated.
    fn seat(&self, conn: ID<Connection>) -> Result<Color, String> {
        match self.session.role(conn) {
            Some(Role::Player(color)) => Ok(color),
            Some(Role::Spectator) => Err("spectators only watch".into()),
            None => Err("unknown connection".into()),
        }
    }
    /// The connection must be seated and on turn. The analysis owner
    /// drives both sides.
    fn mover(&self, conn: ID<Connection>) -> Result<Color, String> {
        let color = self.seat(conn)?;
        let current = self.session.engine().current();
        if current == Some(color) {
            return Ok(color);
        }
        if self.session.analysis_owner().is_some()
            && self.session.analysis_owner() == self.session.player(color)
        {
            return current.ok_or_else(|| stringify(Rejection::GameNotStarted));
        }
        Err(stringify(Rejection::NotYourTurn))
    }
    /// The connection must be the one a pending double was offered to.
    fn responder(&self, conn: ID<Connection>) -> Result<Color, String> {
        let color = self.seat(conn)?;
        match self.session.engine().cube().offer() {
            None => Err(stringify(Rejection::NoDoublePending)),
            Some(by) if by.opponent() == color => Ok(color),
            Some(_) => Err(stringify(Rejection::NotYourTurn)),
        }
    }
}

/// Lifecycle: seating, game start, settlement, eviction.
impl Room {
    fn join(&mut self, conn: ID<Connection>, player: ID<Member>, outbox: UnboundedSender<Event>) {
        self.outboxes.insert(conn, outbox);
        let role = self.session.attach(conn, player);
        self.pulse.set_links(self.session.connections().count());
        log::info!("[room {}] {} attached as {:?}", self.session.id(), conn, role);
        if let Role::Player(color) = role {
            self.broadcast(Event::OpponentJoined {
                session: self.session.id(),
                color,
            });
        }
        if self.session.is_full() {
            self.begin_game();
        }
        self.publish();
    }

    fn drop_connection(&mut self, conn: ID<Connection>) {
        self.outboxes.remove(&conn);
        if let Some(Role::Player(color)) = self.session.detach(conn) {
            if self.session.presence(color) == 0 {
                self.broadcast(Event::OpponentLeft {
                    session: self.session.id(),
                    color,
                });
            }
        }
        self.pulse.set_links(self.session.connections().count());
        // a table nobody ever played at folds up immediately
        if self.session.is_deserted() && !self.session.engine().is_started() {
            self.evicted = true;
        }
    }

    fn begin_game(&mut self) {
        if self.session.engine().is_started() || self.session.engine().result().is_some() {
            return;
        }
        let (first, _) = match self.session.engine_mut().open() {
            Ok(opening) => opening,
            Err(_) => return,
        };
        if let Some(clock) = self.session.clock_mut() {
            clock.start_turn(first);
        }
        let event = Event::GameStart {
            session: self.session.id(),
            game: self.session.matchplay().game_number(),
            first,
        };
        log::info!("[room {}] {}", self.session.id(), event);
        self.broadcast(event);
        self.checkpoint();
        self.publish();
        self.schedule_robot();
    }

    /// A game is over: fold it into the match, checkpoint, and either
    /// rack the next game or close the match out.
    fn settle(&mut self, result: GameResult) {
        let id = self.session.id();
        log::info!("[room {}] {}", id, result);
        if let Some(clock) = self.session.clock_mut() {
            clock.stop();
        }
        self.session.matchplay_mut().absorb(result);
        self.broadcast(Event::GameOver {
            session: id,
            result,
        });
        let standing = self.session.matchplay();
        self.broadcast(Event::MatchUpdate {
            session: id,
            target: standing.target(),
            white: standing.score(Color::White),
            red: standing.score(Color::Red),
            crawford: standing.is_crawford(),
        });
        self.checkpoint();
        match self.session.matchplay().winner() {
            Some(winner) => {
                self.pulse.finish();
                self.broadcast(Event::MatchCompleted {
                    session: id,
                    winner,
                });
                self.publish();
            }
            None => {
                let engine = match self.session.matchplay().is_crawford() {
                    true => Engine::crawford(None),
                    false => Engine::new(),
                };
                let clock = self
                    .session
                    .clock()
                    .is_some()
                    .then(|| Clock::chicago(self.session.matchplay().target()));
                self.session.next_game(engine, clock);
                self.begin_game();
            }
        }
    }

    fn tick(&mut self, elapsed: Duration) {
        let id = self.session.id();
        let Some(clock) = self.session.clock_mut() else {
            return;
        };
        let flagged = clock.tick(elapsed);
        let announce = flagged.is_none() && clock.running().is_some() && clock.announce(elapsed);
        let view = clock.view();
        match flagged {
            Some(color) => {
                self.broadcast(Event::PlayerTimedOut { session: id, color });
                if let Ok(result) = self.session.engine_mut().forfeit(color) {
                    self.settle(result);
                }
            }
            None if announce => {
                self.broadcast(Event::TimeUpdate { session: id, clock: view });
            }
            None => {}
        }
    }
}

/// Automated opponent scheduling. The runner never acts inline with the
/// triggering action: it posts back to the mailbox after a short pause,
/// then replays the bot's intent through the same validated paths a
/// human uses.
impl Room {
    fn automated_next(&self) -> Option<Color> {
        let engine = self.session.engine();
        if engine.result().is_some() || !engine.is_started() {
            return None;
        }
        let color = match engine.cube().offer() {
            Some(by) => by.opponent(),
            None => engine.current()?,
        };
        self.bots[color.index()].is_some().then_some(color)
    }

    fn schedule_robot(&self) {
        if self.automated_next().is_none() {
            return;
        }
        let post = self.loopback.clone();
        let game = self.session.matchplay().game_number();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(BOT_PAUSE_MILLIS)).await;
            let _ = post.send(Post::Robot { game });
        });
    }

    async fn robot_turn(&mut self) {
        let Some(color) = self.automated_next() else {
            return;
        };
        let Some(mut bot) = self.bots[color.index()].take() else {
            return;
        };
        let patience = Duration::from_secs(BOT_DELIBERATION_SECS);
        // a pending double gets answered before anything else
        if self.session.engine().cube().offer().is_some() {
            let view = self.session.engine().clone();
            let take = tokio::time::timeout(patience, bot.take_double(&view))
                .await
                .unwrap_or(true);
            self.bots[color.index()] = Some(bot);
            match take {
                true => {
                    if let Ok((value, owner)) = self.session.engine_mut().take() {
                        self.broadcast(Event::DoubleAccepted {
                            session: self.session.id(),
                            value,
                            owner,
                        });
                        self.publish();
                    }
                }
                false => {
                    if let Ok(result) = self.session.engine_mut().drop_cube() {
                        self.settle(result);
                    }
                }
            }
            return;
        }
        if self.session.engine().rolled().is_none()
            && self.session.engine_mut().throw().is_err()
        {
            self.bots[color.index()] = Some(bot);
            return;
        }
        self.publish();
        let view = self.session.engine().clone();
        let moves = tokio::time::timeout(patience, bot.choose(&view))
            .await
            .unwrap_or_default();
        self.bots[color.index()] = Some(bot);
        for chosen in moves {
            match self.session.engine_mut().play(chosen) {
                Ok(()) => self.publish(),
                Err(reason) => {
                    log::warn!("[room {}] bot move {} refused: {}", self.session.id(), chosen, reason);
                    break;
                }
            }
            if let Some(result) = self.session.engine().result() {
                self.settle(result);
                return;
            }
        }
        // finish the turn legally even if the bot under-delivered
        loop {
            match self.session.engine_mut().pass() {
                Ok(next) => {
                    if let Some(clock) = self.session.clock_mut() {
                        clock.start_turn(next);
                    }
                    break;
                }
                Err(_) => match self.session.engine().optimal().first().copied() {
                    Some(fallback) => {
                        if self.session.engine_mut().play(fallback).is_err() {
                            break;
                        }
                        self.publish();
                        if let Some(result) = self.session.engine().result() {
                            self.settle(result);
                            return;
                        }
                    }
                    None => break,
                },
            }
        }
        self.publish();
        self.schedule_robot();
    }
}

/// Fan-out. Per-viewer snapshots keep the legal move set private to the
/// mover; emission order is per-connection delivery order.
impl Room {
    fn publish(&self) {
        for (conn, _) in self.session.connections() {
            let snapshot = self.session.snapshot(Some(conn));
            self.unicast(conn, Event::GameUpdate { snapshot });
        }
    }
    fn broadcast(&self, event: Event) {
        for (conn, _) in self.session.connections() {
            self.unicast(conn, event.clone());
        }
    }
    fn unicast(&self, conn: ID<Connection>, event: Event) {
        if let Some(outbox) = self.outboxes.get(&conn) {
            if outbox.send(event).is_err() {
                log::warn!("[room {}] dead outbox {}", self.session.id(), conn);
            }
        }
    }
}

/// Checkpointing. State is captured in-actor; writes run on their own
/// task so the mailbox never waits on storage.
impl Room {
    fn capture(&self) -> (GameCheckpoint, Match) {
        let engine = self.session.engine();
        let standing = self.session.matchplay();
        let game = match engine.result().is_some() {
            true => standing.games().len(),
            false => standing.game_number(),
        };
        let checkpoint = GameCheckpoint::new(
            self.session.game_id(),
            self.session.id(),
            standing.id(),
            game,
            PositionId::from(engine.board()),
            engine.current(),
            engine.remaining().to_vec(),
            engine.cube().value(),
            engine.cube().owner(),
            engine.is_crawford(),
            engine.phase(),
            engine.result(),
        );
        (checkpoint, standing.clone())
    }
    fn checkpoint(&self) {
        let (checkpoint, matchplay) = self.capture();
        let archive = self.archive.clone();
        tokio::spawn(async move {
            Self::write(archive, checkpoint, matchplay).await;
        });
    }
    async fn checkpoint_now(&self) {
        let (checkpoint, matchplay) = self.capture();
        Self::write(self.archive.clone(), checkpoint, matchplay).await;
    }
    async fn write(archive: Arc<dyn Archive>, checkpoint: GameCheckpoint, matchplay: Match) {
        if let Err(e) = archive.save_game(&checkpoint).await {
            log::error!("[room {}] game checkpoint failed: {}", checkpoint.session(), e);
        }
        if let Err(e) = archive.save_match(&matchplay).await {
            log::error!("[room {}] match checkpoint failed: {}", checkpoint.session(), e);
        }
        if let Some(result) = checkpoint.result() {
            if let Err(e) = archive
                .append_result(checkpoint.matchplay(), checkpoint.game(), result)
                .await
            {
                log::error!("[room {}] result append failed: {}", checkpoint.session(), e);
            }
        }
    }
}

fn stringify(rejection: Rejection) -> String {
    rejection.to_string()
}
