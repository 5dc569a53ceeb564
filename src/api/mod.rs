//! Per-record CRUD API shared by the server routes and the HTTP client.

mod client;
mod wire;

pub use client::{ApiError, DataClient, RemoteData};
pub use wire::{
    EntryPatch, EntryRecord, ExercisePatch, ExerciseRecord, PlanPatch, PlanRecord, RecordMeta,
    WireEntity,
};
