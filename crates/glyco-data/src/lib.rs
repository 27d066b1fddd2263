//! Glyco Data - diabetes device record types and batch ingestion
//!
//! Records arrive as decoded JSON objects discriminated by their `type` key.
//! The [`Registry`] maps each discriminator to a constructor, the [`Builder`]
//! runs parse, validate and normalize for one record, and the [`Processor`]
//! drives the builder over a whole batch so that every problem in every
//! element is reported, not only the first.
//!
//! ```rust
//! use glyco_data::{Context, Processor};
//! use glyco_structure::Origin;
//! use serde_json::json;
//!
//! let context = Context::new(Origin::External)
//!     .with_user_id("abcdef0123")
//!     .with_upload_id("0123456789abcdef0123456789abcdef");
//!
//! let outcome = Processor::standard(context).process(&[
//!     json!({"type": "basal", "deliveryType": "scheduled", "rate": 1.75, "duration": 28800000}),
//!     json!({"type": "bogus"}),
//! ]);
//!
//! assert_eq!(outcome.records.len(), 1);
//! let errors = outcome.errors.unwrap();
//! assert_eq!(errors.at("/1/type").count(), 1);
//! ```
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

pub mod association;
pub mod batch;
pub mod blood_glucose;
pub mod builder;
pub mod common;
pub mod datum;
pub mod formats;
pub mod registry;
pub mod types;

pub use association::Association;
pub use batch::{BatchOutcome, Processor};
pub use builder::{Builder, Context};
pub use common::Common;
pub use datum::{DataNormalizer, Datum, WireObject};
pub use registry::{Policy, Registration, Registry};
