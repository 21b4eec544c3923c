pub mod cards;
pub mod nft;
pub mod reading;
pub mod session;
pub mod shuffle;

pub use crate::domain::model::{DrawnCard, DrawnCardPayload, Reading, ReadingRequest};
pub use crate::domain::ports::{Interpreter, ReadingStore, Storage};
pub use crate::utils::error::Result;
