use std::collections::HashMap;

use common::games::omo::{
    GameSnapshot, GameState, LineView, MIN_GRID_SIZE, Mark, OmoEngine, Player, TurnOutcome,
};
use common::id_generator::generate_unique_room_id;
use common::{ConnectionId, PlayerName, RoomId, ServerMessage, log};

use crate::broadcaster::{Broadcaster, ClientSender};
use crate::room_error::RoomError;
use crate::server_config::ServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    WaitingForSecondPlayer,
    Active,
}

#[derive(Debug)]
pub struct Room {
    id: RoomId,
    grid_size: usize,
    slots: [Option<ConnectionId>; 2],
    player_names: [Option<PlayerName>; 2],
    status: RoomStatus,
    engine: OmoEngine,
    state: GameState,
}

impl Room {
    fn new(id: RoomId, grid_size: usize, creator: ConnectionId, creator_name: PlayerName) -> Self {
        Self {
            id,
            grid_size,
            slots: [Some(creator), None],
            player_names: [Some(creator_name), None],
            status: RoomStatus::WaitingForSecondPlayer,
            engine: OmoEngine::new(grid_size),
            state: GameState::new(grid_size),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player_name(&self, player: Player) -> Option<&PlayerName> {
        self.player_names[player.slot()].as_ref()
    }

    pub fn connection(&self, player: Player) -> Option<ConnectionId> {
        self.slots[player.slot()]
    }

    pub fn occupants(&self) -> Vec<ConnectionId> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn free_slot(&self) -> Option<Player> {
        self.slots
            .iter()
            .position(Option::is_none)
            .and_then(Player::from_slot)
    }

    fn seat(&mut self, player: Player, connection_id: ConnectionId, name: PlayerName) {
        self.slots[player.slot()] = Some(connection_id);
        self.player_names[player.slot()] = Some(name);
        self.status = if self.slots.iter().all(Option::is_some) {
            RoomStatus::Active
        } else {
            RoomStatus::WaitingForSecondPlayer
        };
    }

    fn vacate(&mut self, player: Player) {
        self.slots[player.slot()] = None;
        self.status = RoomStatus::WaitingForSecondPlayer;
    }

    fn reset(&mut self) {
        self.state = GameState::new(self.grid_size);
    }

    fn current_lines(&self) -> Vec<LineView> {
        LineView::all(self.state.all_lines(), self.grid_size)
    }

    fn init_message(&self, player: Player, joiner_name: &PlayerName) -> ServerMessage {
        ServerMessage::Init {
            player,
            room_id: self.id.clone(),
            game_state: GameSnapshot::of(&self.state),
            lines: self.current_lines(),
            player_name: joiner_name.clone(),
            player1_name: self.player_name(Player::One).cloned(),
            player2_name: self.player_name(Player::Two).cloned(),
            grid_size: self.grid_size,
        }
    }

    fn update_message(&self, lines: Vec<LineView>, is_game_over: bool) -> ServerMessage {
        ServerMessage::Update {
            game_state: GameSnapshot::of(&self.state),
            lines,
            is_game_over,
        }
    }
}

/// Where a connection sits. One seat per connection.
#[derive(Debug, Clone)]
struct Seat {
    room_id: RoomId,
    player: Player,
    name: PlayerName,
}

#[derive(Debug, Clone, Copy)]
pub struct RoomSettings {
    pub default_grid_size: usize,
    pub max_grid_size: usize,
}

impl From<&ServerConfig> for RoomSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            default_grid_size: config.default_grid_size,
            max_grid_size: config.max_grid_size,
        }
    }
}

/// Registry of rooms and of which connection sits where. Owned by the
/// dispatcher; every method runs to completion, including its broadcasts,
/// before the next event is looked at.
#[derive(Debug)]
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
    seats: HashMap<ConnectionId, Seat>,
    broadcaster: Broadcaster,
    settings: RoomSettings,
}

impl RoomManager {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            rooms: HashMap::new(),
            seats: HashMap::new(),
            broadcaster: Broadcaster::new(),
            settings,
        }
    }

    pub fn connect(&mut self, connection_id: ConnectionId, sender: ClientSender) {
        self.broadcaster.register(connection_id, sender);
    }

    pub fn send_to(&self, connection_id: &ConnectionId, message: ServerMessage) {
        self.broadcaster.send_to_client(connection_id, message);
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn seat_of(&self, connection_id: &ConnectionId) -> Option<(&RoomId, Player)> {
        self.seats
            .get(connection_id)
            .map(|seat| (&seat.room_id, seat.player))
    }

    fn ensure_unseated(&self, connection_id: &ConnectionId) -> Result<(), RoomError> {
        match self.seats.get(connection_id) {
            Some(seat) => Err(RoomError::AlreadyInRoom(seat.room_id.clone())),
            None => Ok(()),
        }
    }

    fn resolve_grid_size(&self, requested: Option<usize>) -> Result<usize, RoomError> {
        let grid_size = requested.unwrap_or(self.settings.default_grid_size);
        if grid_size < MIN_GRID_SIZE || grid_size > self.settings.max_grid_size {
            return Err(RoomError::InvalidGridSize {
                requested: grid_size,
                min: MIN_GRID_SIZE,
                max: self.settings.max_grid_size,
            });
        }
        Ok(grid_size)
    }

    /// Opens a room with the creator in slot 0 and replies `roomCreated`.
    /// A missing or blank id is replaced by a generated one.
    pub fn create_room(
        &mut self,
        connection_id: ConnectionId,
        room_id: Option<RoomId>,
        player_name: PlayerName,
        grid_size: Option<usize>,
    ) -> Result<RoomId, RoomError> {
        self.ensure_unseated(&connection_id)?;
        let grid_size = self.resolve_grid_size(grid_size)?;

        let room_id = match room_id.filter(|id| !id.is_blank()) {
            Some(id) if self.rooms.contains_key(&id) => {
                return Err(RoomError::RoomAlreadyExists(id));
            }
            Some(id) => id,
            None => generate_unique_room_id(|candidate| self.rooms.contains_key(candidate)),
        };

        log!(
            "Room {} created by {} ({}) with grid size {}",
            room_id, player_name, connection_id, grid_size
        );

        let room = Room::new(room_id.clone(), grid_size, connection_id, player_name.clone());
        self.rooms.insert(room_id.clone(), room);
        self.seats.insert(
            connection_id,
            Seat {
                room_id: room_id.clone(),
                player: Player::One,
                name: player_name,
            },
        );

        self.broadcaster.send_to_client(
            &connection_id,
            ServerMessage::RoomCreated {
                room_id: room_id.clone(),
                grid_size,
            },
        );

        Ok(room_id)
    }

    /// Seats the joiner in the free slot and sends `init` to both occupants.
    pub fn join_room(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        player_name: PlayerName,
    ) -> Result<Player, RoomError> {
        self.ensure_unseated(&connection_id)?;

        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| RoomError::RoomNotFound(room_id.clone()))?;
        let player = room
            .free_slot()
            .ok_or_else(|| RoomError::RoomFull(room_id.clone()))?;

        room.seat(player, connection_id, player_name.clone());
        self.seats.insert(
            connection_id,
            Seat {
                room_id: room_id.clone(),
                player,
                name: player_name.clone(),
            },
        );

        log!("{} joined room {} as {}", player_name, room_id, player);

        for seated in [Player::One, Player::Two] {
            if let Some(occupant) = room.connection(seated) {
                self.broadcaster
                    .send_to_client(&occupant, room.init_message(seated, &player_name));
            }
        }

        Ok(player)
    }

    /// Plays a move for the sender's seat. Anything that does not line up
    /// (no seat, wrong room, wrong player, room not active, illegal cell) is
    /// dropped without a reply.
    pub fn make_move(
        &mut self,
        connection_id: ConnectionId,
        room_id: Option<&RoomId>,
        cell: usize,
        player: Player,
        mark: Mark,
    ) -> Option<TurnOutcome> {
        let seat = self.seats.get(&connection_id)?;
        if room_id.is_some_and(|id| id != &seat.room_id) || player != seat.player {
            return None;
        }

        let room = self.rooms.get_mut(&seat.room_id)?;
        if room.status != RoomStatus::Active || !room.state.is_valid_move(cell, player) {
            return None;
        }

        let outcome = room.engine.play(&mut room.state, cell, mark);
        if outcome.newly_scored > 0 {
            log!(
                "Room {}: {} scored {} line(s), {} to {}",
                room.id,
                outcome.mover,
                outcome.newly_scored,
                room.state.score(Player::One),
                room.state.score(Player::Two)
            );
        }

        let update = room.update_message(
            LineView::all(&outcome.lines, room.grid_size),
            outcome.board_full,
        );
        self.broadcaster.broadcast_to_clients(&room.occupants(), update);

        Some(outcome)
    }

    /// Starts the sender's room over and broadcasts the empty board.
    pub fn end_game(&mut self, connection_id: ConnectionId, room_id: Option<&RoomId>) -> bool {
        let Some(seat) = self.seats.get(&connection_id) else {
            return false;
        };
        if room_id.is_some_and(|id| id != &seat.room_id) {
            return false;
        }
        let Some(room) = self.rooms.get_mut(&seat.room_id) else {
            return false;
        };

        room.reset();
        log!("Room {} reset by {}", room.id, seat.name);

        let update = room.update_message(Vec::new(), false);
        self.broadcaster.broadcast_to_clients(&room.occupants(), update);
        true
    }

    /// Frees the connection's seat. The room goes away with its last
    /// occupant; otherwise the survivor is told who left.
    pub fn disconnect(&mut self, connection_id: ConnectionId) {
        self.broadcaster.unregister(&connection_id);

        let Some(seat) = self.seats.remove(&connection_id) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&seat.room_id) else {
            return;
        };

        room.vacate(seat.player);

        if room.is_empty() {
            self.rooms.remove(&seat.room_id);
            log!("Room {} deleted", seat.room_id);
            return;
        }

        log!("{} left room {}", seat.name, seat.room_id);
        let notice = ServerMessage::OpponentLeft {
            room_id: seat.room_id.clone(),
            player_name: Some(seat.name),
        };
        self.broadcaster.broadcast_to_clients(&room.occupants(), notice);
    }
}
