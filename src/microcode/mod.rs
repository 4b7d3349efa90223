pub mod fields;
pub mod record;
pub mod rom;

pub use fields::{encode, AluOp, BusSource, ControlLines, Encoded, FieldWarning};
pub use record::{MemoryAction, MicroInstructionRecord, NextAddress};
pub use rom::{MicrocodeRom, RomEntry};
