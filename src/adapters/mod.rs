// Concrete implementations of the domain ports: disk storage, the JSON reading ledger, and the
// chat-completions interpreter.

pub mod openai;
pub mod storage;
pub mod store;

pub use openai::OpenAiInterpreter;
pub use storage::LocalStorage;
pub use store::JsonFileStore;
