pub mod state;
pub mod storage;

pub use state::{JudgingState, SubmitPayload};
pub use storage::{load_state, save_state};
