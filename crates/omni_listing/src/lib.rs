//
// lib.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

pub mod candidate;
pub mod listing;
pub mod snippet;

pub use crate::candidate::Candidate;
pub use crate::candidate::Category;
pub use crate::listing::parse_record;
pub use crate::listing::parse_records;
pub use crate::snippet::synthesize;
