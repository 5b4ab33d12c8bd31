//! Star Checkers library - two-player Chinese Checkers on a star board
//!
//! # Architecture
//!
//! - **Games**: board, direction geometry, move engine and win rules
//! - **Sync**: the command queues shared between listeners and game loops
//! - **Protocol / Room / Session / Server**: the TCP relay that pairs two
//!   clients by room name and forwards their key bytes
//! - **Tui**: terminal rendering, input sources and game loops
//!
//! # Example
//!
//! ```
//! use star_checkers::{Command, Direction, MoveEngine, Outcome};
//!
//! let mut engine = MoveEngine::new();
//! // Walk the cursor from the tip to the front row.
//! for _ in 0..3 {
//!     engine.apply(Command::Move(Direction::LeftUp));
//! }
//! engine.apply(Command::Toggle);
//! engine.apply(Command::Move(Direction::LeftUp));
//! assert_eq!(engine.apply(Command::Toggle), Outcome::TurnChanged);
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod games;
pub mod protocol;
pub mod room;
pub mod server;
pub mod session;
pub mod sync;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ClientConfig, RelayConfig};

// Crate-level exports - Errors
pub use error::{BoardError, ClientError, ConfigError, ProtocolError, RoomError, SourceError};

// Crate-level exports - Game types
pub use games::checkers::{
    Board, Cell, Command, Direction, Frame, MoveEngine, MoveKind, Outcome, Perspective, Player,
    Pos, Side,
};

// Crate-level exports - Relay
pub use protocol::{Request, RequestDecoder};
pub use room::{Room, RoomManager};
pub use server::RelayServer;
pub use session::{Action, Session, SessionState};

// Crate-level exports - Concurrency
pub use sync::{BlockingQueue, CommandQueue, PollQueue, Signal};
