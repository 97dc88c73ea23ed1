//! End-to-end behavior tests, driving a full `Brain` over trees loaded from
//! JSON the same way a host application would, rather than exercising one
//! node class's pure dispatch functions in isolation.

mod actions;
mod common;
mod conditions;
mod controls;
mod decorators;
