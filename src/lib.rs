//! Dynasty Jobs - village job assignment and production engine

pub mod city;
pub mod core;
pub mod jobs;
pub mod population;
