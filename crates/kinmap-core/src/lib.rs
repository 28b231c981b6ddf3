//! Kinmap Core - Family member model and geodesic math
//!
//! This crate defines the entities the relationship graph is built from:
//! people, their identifiers, name parts and residence coordinates. It also
//! holds the Haversine distance used for every geographic query, and the
//! integrity error taxonomy used by the opt-in validation checks.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use kinmap_core::{Coordinate, NameParts, Person};
//!
//! let birth = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
//! let person = Person::new(
//!     "p1",
//!     NameParts::new("Juan", "Pérez"),
//!     "123456789",
//!     birth,
//!     Coordinate::new(9.9281, -84.0907),
//! );
//! assert_eq!(person.full_name(), "Juan Pérez");
//! ```

pub mod error;
pub mod geo;
pub mod person;

pub use error::{IntegrityError, Result};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use person::{NameParts, Person, PersonId};
