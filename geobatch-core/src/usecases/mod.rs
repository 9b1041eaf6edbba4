mod error;
mod render_map;
mod resolve_address;
mod resolve_batch;

#[cfg(test)]
pub mod tests;

pub use self::{
    error::{FailureKind, LookupFailure},
    render_map::*,
    resolve_address::*,
    resolve_batch::*,
};

mod prelude {
    pub use super::error::{FailureKind, LookupFailure};
    pub use crate::{cache::*, entities::*, gateways::geocode::*};
}
