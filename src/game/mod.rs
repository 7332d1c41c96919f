//! Lipinski Rule-of-5 design game.
//!
//! Play is a sequence of [`Action`]s applied to a serializable
//! [`SessionRecord`]; nothing is kept between calls except what the record
//! carries. Depictions for viewers come from a [`RenderCache`].
//!
//! ```
//! use pharmsim::game::{Action, GameMode, SessionRecord, handle};
//!
//! let record = handle(SessionRecord::default(), Action::SetMode(GameMode::DesignChallenge), 0);
//! let record = handle(record, Action::AddGroup("[*:1]C(=O)O".into()), 5);
//! assert_eq!(record.current_smiles, "CCC(=O)O");
//! assert_eq!(record.score, 2);
//! ```

mod cache;
mod error;
mod session;

pub use cache::RenderCache;
pub use error::Error;
pub use session::{
    Action, Game, GameMode, MSG_CURRENT_INVALID, MSG_GROUP_ADDED, MSG_INVALID_MODIFICATION,
    MSG_INVALID_SMILES, MSG_SMILES_UPDATED, MSG_TIME_UP, SessionRecord, Turn, handle,
};
