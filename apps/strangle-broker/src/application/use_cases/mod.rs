//! Use Cases

mod open_strangle;

pub use open_strangle::{
    OpenStrangleError, OpenStrangleOutcome, OpenStrangleRequest, OpenStrangleUseCase,
};
