// Copyright (c) 2024 Mike Tsao

pub use transposer::{OutOfRangePolicy, TransposerCore, TransposerCoreBuilder};

mod transposer;
