//! 进程内共享状态
//!
//! 账本与会话表各自独立加锁，只通过原子的读-改-写接口访问。

mod ledger_store;
mod session_store;

pub use ledger_store::{LabelReservation, LedgerStore, LedgerTransaction};
pub use session_store::{SessionSlot, SessionStore};
