//! Order requests and their parameter composition

pub mod compose;
pub mod params;
pub mod request;

pub use compose::{compose_batch, compose_cancel, compose_cancel_batch, compose_edit, compose_order};
pub use params::ParameterSet;
pub use request::{
    BatchRequest, CloseOrder, EditRequest, OrderId, OrderOptions, OrderPayload, OrderRequest,
    OrderTime, MAX_BATCH_ORDERS,
};
