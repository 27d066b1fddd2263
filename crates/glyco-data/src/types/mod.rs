//! Concrete record types
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

pub mod basal;
pub mod blob;
pub mod bolus;
pub mod glucose;
pub mod upload;
pub mod water;
pub mod wizard;

pub use basal::Basal;
pub use blob::Blob;
pub use bolus::Bolus;
pub use glucose::{Glucose, GlucoseKind};
pub use upload::Upload;
pub use water::Water;
pub use wizard::Wizard;
