// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod apply;
pub mod cache;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod pager;
pub mod search;
pub mod state;
pub mod workflow;

pub use apply::*;
pub use cache::*;
pub use ids::*;
pub use model::*;
pub use normalize::*;
pub use pager::*;
pub use search::*;
pub use state::*;
pub use workflow::*;
