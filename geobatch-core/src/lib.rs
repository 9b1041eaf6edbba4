pub mod cache;
pub mod gateways;
pub mod stats;
pub mod usecases;
pub mod util;

pub mod entities {
    pub use geobatch_entities::{address::*, geo::*, outcome::*};
}
