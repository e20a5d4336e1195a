// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod browse;
pub mod catalog;
pub mod categories;
pub mod gate;
pub mod ids;
pub mod model;
pub mod shop;
pub mod state;

pub use browse::*;
pub use catalog::*;
pub use categories::*;
pub use gate::*;
pub use ids::*;
pub use model::*;
pub use shop::*;
pub use state::*;
