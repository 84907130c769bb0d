//! Data transfer objects for console and report output

pub mod responses;

pub use responses::{
    RankedReactantResponse, ReactionTypeResponse, RecountReport, RegistrationReport, SeedReport,
};
