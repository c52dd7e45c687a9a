use common::RoomId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    RoomAlreadyExists(RoomId),
    RoomNotFound(RoomId),
    RoomFull(RoomId),
    AlreadyInRoom(RoomId),
    InvalidGridSize { requested: usize, min: usize, max: usize },
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomError::RoomAlreadyExists(_) => write!(f, "Room already exists"),
            RoomError::RoomNotFound(_) => write!(f, "Room not found"),
            RoomError::RoomFull(_) => write!(f, "Room is full"),
            RoomError::AlreadyInRoom(room_id) => write!(f, "Already in room {}", room_id),
            RoomError::InvalidGridSize { requested, min, max } => {
                write!(f, "Invalid grid size {}: must be between {} and {}", requested, min, max)
            }
        }
    }
}

impl std::error::Error for RoomError {}
